use crate::config::Settings;
use crate::notify::{Severity, Toasts};
use crate::session::Session;
use crate::species::CATALOG;
use crate::view::{self, Rgb};
use chrono::{DateTime, Local, Utc};
use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

/// Placeholder for the right half of a wide glyph.
const WIDE_TAIL: char = '\0';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
            bold: false,
        }
    }
}

pub struct CellBuffer {
    pub w: u16,
    pub h: u16,
    pub cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        (x < self.w && y < self.h).then(|| self.cells[self.idx(x, y)])
    }
    pub fn clear(&mut self, bg: Color) {
        self.cells.fill(Cell {
            bg,
            ..Cell::default()
        });
    }

    /// Text on row `y` with wide-glyph tails dropped.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.w)
            .filter_map(|x| self.get(x, y))
            .map(|c| c.ch)
            .filter(|&ch| ch != WIDE_TAIL)
            .collect()
    }
}

pub struct Terminal {
    pub out: io::Stdout,
    pub cols: u16,
    pub rows: u16,
    pub prev: CellBuffer,
    pub cur: CellBuffer,
}

impl Terminal {
    pub fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    pub fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_bold = false;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c.ch == WIDE_TAIL || (diff_only && c == self.prev.cells[i]) {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                if last_bold != c.bold {
                    let attr = if c.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    };
                    queue!(self.out, SetAttribute(attr))?;
                    last_bold = c.bold;
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Text primitives
------------------------------ */

/// Terminal columns a char takes. Good enough for the symbols used here.
pub fn char_width(ch: char) -> u16 {
    match ch as u32 {
        0xFE00..=0xFE0F | 0x200D => 0,
        0x1F300..=0x1FAFF => 2,
        _ => 1,
    }
}

pub fn text_width(s: &str) -> u16 {
    s.chars().map(char_width).sum()
}

pub fn draw_text_styled(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bold: bool) {
    let bg = Color::Black;
    let mut xx = x;
    for ch in s.chars() {
        let w = char_width(ch);
        if w == 0 {
            continue;
        }
        if y >= buf.h || xx.saturating_add(w) > buf.w {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg, bold });
        if w == 2 {
            buf.set(
                xx + 1,
                y,
                Cell {
                    ch: WIDE_TAIL,
                    fg,
                    bg,
                    bold,
                },
            );
        }
        xx += w;
    }
}

pub fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color) {
    draw_text_styled(buf, x, y, s, fg, false);
}

fn draw_centered(buf: &mut CellBuffer, y: u16, s: &str, fg: Color, bold: bool) {
    let x = buf.w.saturating_sub(text_width(s)) / 2;
    draw_text_styled(buf, x, y, s, fg, bold);
}

fn bar(value: u8, width: usize) -> String {
    let v = (value.min(100) as f32) / 100.0;
    let fill = (v * width as f32 + 0.5) as usize;
    let mut s = String::with_capacity(width + 2);
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { ' ' });
    }
    s.push(']');
    s
}

pub fn draw_box(buf: &mut CellBuffer, x0: u16, y0: u16, w: u16, h: u16, fg: Color) {
    if w < 2 || h < 2 {
        return;
    }
    let cell = |ch| Cell {
        ch,
        fg,
        bg: Color::Black,
        bold: false,
    };
    for x in x0 + 1..x0 + w - 1 {
        buf.set(x, y0, cell('─'));
        buf.set(x, y0 + h - 1, cell('─'));
    }
    for y in y0 + 1..y0 + h - 1 {
        buf.set(x0, y, cell('│'));
        buf.set(x0 + w - 1, y, cell('│'));
    }
    buf.set(x0, y0, cell('┌'));
    buf.set(x0 + w - 1, y0, cell('┐'));
    buf.set(x0, y0 + h - 1, cell('└'));
    buf.set(x0 + w - 1, y0 + h - 1, cell('┘'));
}

fn fill_blank(buf: &mut CellBuffer, x0: u16, y0: u16, w: u16, h: u16) {
    for y in y0..y0.saturating_add(h) {
        for x in x0..x0.saturating_add(w) {
            buf.set(x, y, Cell::default());
        }
    }
}

pub fn draw_center_box(buf: &mut CellBuffer, title: &str, body: &str, fg: Color) {
    let w = buf.w;
    let h = buf.h;
    let lines = body.lines().count() as u16;

    let bw = 60.min(w.saturating_sub(4));
    let bh = (lines + 4).min(h.saturating_sub(2));
    if bw < 4 || bh < 4 {
        return;
    }
    let x0 = (w - bw) / 2;
    let y0 = (h - bh) / 2;

    fill_blank(buf, x0, y0, bw, bh);
    draw_box(buf, x0, y0, bw, bh, fg);
    draw_text_styled(buf, x0 + 2, y0 + 1, title, fg, true);
    for (i, line) in body.lines().enumerate() {
        let yy = y0 + 3 + i as u16;
        if yy >= y0 + bh - 1 {
            break;
        }
        draw_text(buf, x0 + 2, yy, line, Color::White);
    }
}

pub fn to_color(rgb: Rgb, enable_color: bool) -> Color {
    if enable_color {
        Color::Rgb {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
        }
    } else {
        Color::White
    }
}

/* -----------------------------
   Scenes
------------------------------ */

pub fn draw_menu(buf: &mut CellBuffer, cursor: usize, settings: &Settings) {
    let fg = Color::White;
    let hi = if settings.enable_color {
        Color::Yellow
    } else {
        Color::White
    };

    draw_centered(buf, 1, "Choose Your Pet", fg, true);

    let top = 3u16;
    for (i, sp) in CATALOG.iter().enumerate() {
        let selected = i == cursor;
        let icon = if settings.enable_emoji {
            sp.icon
        } else {
            sp.ascii_stages[1]
        };
        let line = format!(
            "{} {}. {}  {}",
            if selected { ">" } else { " " },
            i + 1,
            icon,
            sp.name
        );
        let x = buf.w.saturating_sub(24) / 2;
        draw_text_styled(buf, x, top + i as u16 * 2, &line, if selected { hi } else { fg }, selected);
    }

    if let Some(when) = settings.last_played_utc {
        let who = settings
            .last_pet
            .as_deref()
            .and_then(crate::species::find)
            .map(|s| s.name)
            .unwrap_or("?");
        let line = format!("Last played: {} ({})", format_local(when), who);
        draw_centered(buf, top + CATALOG.len() as u16 * 2 + 1, &line, Color::DarkGrey, false);
    }

    draw_text(
        buf,
        1,
        buf.h.saturating_sub(1),
        "Menu: ↑↓ select | enter/1-4 choose | e emoji | h help | q quit",
        fg,
    );
}

fn format_local(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn draw_pet(buf: &mut CellBuffer, session: &Session, settings: &Settings, toasts: &Toasts) {
    let fg = Color::White;
    let st = session.state();
    let species = session.species();

    let badge = if settings.enable_emoji {
        view::status_badge(st)
    } else if !st.is_alive {
        "x"
    } else if st.is_sleeping {
        "z"
    } else {
        "<3"
    };
    draw_text_styled(buf, 1, 0, &format!("Tamagotchi  |  {}", species.name), fg, true);
    let right = format!("Age: {}  {}", st.age, badge);
    draw_text(buf, buf.w.saturating_sub(text_width(&right) + 1), 0, &right, fg);

    // pet frame, sized by stage
    let (fw, fh) = view::scale_tier(st).frame();
    let fx = buf.w.saturating_sub(fw) / 2;
    let fy = 2;
    draw_box(buf, fx, fy, fw, fh, Color::DarkGrey);
    let glyph = if settings.enable_emoji {
        view::glyph(st)
    } else {
        view::ascii_glyph(st, species)
    };
    let gx = fx + fw.saturating_sub(text_width(glyph)) / 2;
    let gy = fy + fh / 2;
    draw_text_styled(buf, gx, gy, glyph, to_color(view::shade(st), settings.enable_color), true);

    // stat bars
    let sy = fy + view::ScaleTier::Large.frame().1 + 1;
    for (i, (name, val)) in view::stat_rows(st).iter().enumerate() {
        let line = format!("{name:<11} {} {:>3}%", bar(*val, 20), val);
        let x = buf.w.saturating_sub(text_width(&line)) / 2;
        draw_text(buf, x, sy + i as u16, &line, fg);
    }

    // toasts, newest at the bottom
    let tx = 1;
    let mut ty = sy + 5;
    for n in toasts.visible() {
        let col = match (n.severity, settings.enable_color) {
            (Severity::Destructive, true) => Color::Red,
            (Severity::Info, true) => Color::Cyan,
            _ => fg,
        };
        draw_text_styled(buf, tx, ty, &n.title, col, true);
        draw_text(buf, tx + text_width(&n.title) + 2, ty, &n.description, fg);
        ty += 1;
    }

    let help = if !st.is_alive {
        "Dead: r new game | esc menu | q quit"
    } else if st.is_sleeping {
        "Sleeping: s wake | r reset | esc menu | h help | q quit"
    } else {
        "Keys: f feed | p play | c clean | s sleep | r reset | esc menu | h help | q quit"
    };
    draw_text(buf, 1, buf.h.saturating_sub(1), help, fg);

    if let Some(cause) = st.cause_of_death {
        draw_center_box(
            buf,
            "Game Over",
            &format!(
                "Your {} died from {} at age {}.\n\nPress R for a new game.",
                species.name.to_lowercase(),
                cause.label().to_lowercase(),
                st.age
            ),
            if settings.enable_color { Color::Red } else { fg },
        );
    }
}

pub fn draw_help(buf: &mut CellBuffer) {
    draw_center_box(
        buf,
        "How to play",
        "Keep hunger, happiness and cleanliness up.\n\
         Any of them under 20 drains health; all over 80 heals.\n\
         Your pet grows at ages 50, 100 and 150,\n\
         and changes color at 200 and 500.\n\n\
         F Feed   P Play   C Clean   S Sleep/wake\n\
         R Reset (new egg, save discarded)\n\
         Nothing but S works while the pet sleeps.\n\n\
         Esc or H to close help.",
        Color::White,
    );
}
