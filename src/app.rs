use crate::config::{load_settings, save_settings_atomic, Overrides, Paths, Settings};
use crate::input::{collect_input_nonblocking, map_event_to_action, Scene, UiAction};
use crate::notify::Toasts;
use crate::render::{draw_help, draw_menu, draw_pet, Terminal};
use crate::session::Session;
use crate::species::{self, Species, CATALOG};
use crate::storage::{FileStore, KvStore};
use anyhow::Context;
use chrono::{DateTime, Utc};
use crossterm::style::Color;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const FPS: u32 = 30;
const TOAST_TTL: Duration = Duration::from_secs(4);
const TOAST_CAP: usize = 4;

/// What the command line asked for.
#[derive(Clone, Debug, Default)]
pub struct LaunchOptions {
    pub pet: Option<String>,
    pub overrides: Overrides,
}

/// The settings file contents next to the copy this run uses.
#[derive(Debug)]
struct Prefs {
    saved: Settings,
    run: Settings,
}

impl Prefs {
    fn new(saved: Settings, overrides: &Overrides) -> Self {
        let run = saved.with_overrides(overrides);
        Self { saved, run }
    }

    /// Saved, unlike `--ascii`.
    fn toggle_emoji(&mut self) {
        self.run.enable_emoji = !self.run.enable_emoji;
        self.saved.enable_emoji = self.run.enable_emoji;
    }

    fn remember_pet(&mut self, id: &str) {
        self.saved.last_pet = Some(id.to_string());
        self.run.last_pet = Some(id.to_string());
    }

    fn to_save(&self, now: DateTime<Utc>) -> Settings {
        Settings {
            last_played_utc: Some(now),
            ..self.saved.clone()
        }
    }
}

pub struct App {
    prefs: Prefs,
    paths: Paths,
    term: Terminal,
    scene: Scene,
    menu_cursor: usize,
    session: Option<Session>,
    // parked here while no session owns it
    store: Option<Box<dyn KvStore>>,
    toasts: Toasts,
    should_quit: bool,
}

impl App {
    fn init(paths: Paths, opts: &LaunchOptions) -> anyhow::Result<Self> {
        let prefs = Prefs::new(load_settings(&paths.settings_path), &opts.overrides);

        let store = FileStore::open(&paths.store_dir)?;

        let menu_cursor = prefs
            .saved
            .last_pet
            .as_deref()
            .and_then(|id| CATALOG.iter().position(|s| s.id == id))
            .unwrap_or(0);

        let initial = match opts.pet.as_deref() {
            Some(id) => Some(species::find(id).with_context(|| format!("unknown pet '{id}'"))?),
            None => None,
        };

        let term = Terminal::begin()?;

        let mut app = Self {
            prefs,
            paths,
            term,
            scene: Scene::Menu,
            menu_cursor,
            session: None,
            store: Some(Box::new(store)),
            toasts: Toasts::new(TOAST_TTL, TOAST_CAP, Instant::now()),
            should_quit: false,
        };

        if let Some(sp) = initial {
            app.open_pet(sp);
        }
        Ok(app)
    }

    fn open_pet(&mut self, sp: &'static Species) {
        self.close_pet();
        let Some(store) = self.store.take() else {
            return;
        };
        let interval = Duration::from_millis(self.prefs.run.tick_ms_clamped());
        self.session = Some(Session::open(sp, store, interval, Instant::now()));
        self.prefs.remember_pet(sp.id);
        self.menu_cursor = CATALOG.iter().position(|s| s.id == sp.id).unwrap_or(0);
        self.scene = Scene::Pet;
    }

    fn close_pet(&mut self) {
        if let Some(session) = self.session.take() {
            self.store = Some(session.close());
        }
        self.toasts.clear();
    }

    fn handle(&mut self, action: UiAction) {
        match action {
            UiAction::Quit => self.should_quit = true,
            UiAction::ToggleEmoji => self.prefs.toggle_emoji(),
            UiAction::HelpToggle => {
                self.scene = match self.scene {
                    Scene::Help { back_to_pet: true } => Scene::Pet,
                    Scene::Help { back_to_pet: false } => Scene::Menu,
                    Scene::Pet => Scene::Help { back_to_pet: true },
                    Scene::Menu => Scene::Help { back_to_pet: false },
                };
            }
            UiAction::MenuMove(delta) => {
                let len = CATALOG.len() as i32;
                let next = (self.menu_cursor as i32 + delta).rem_euclid(len);
                self.menu_cursor = next as usize;
            }
            UiAction::MenuPick => self.open_pet(&CATALOG[self.menu_cursor]),
            UiAction::MenuPickIndex(i) => {
                if let Some(sp) = CATALOG.get(i) {
                    self.open_pet(sp);
                }
            }
            UiAction::Pet(event) => {
                if let Some(session) = self.session.as_mut() {
                    session.submit(event);
                }
            }
            UiAction::BackToMenu => {
                self.close_pet();
                self.scene = Scene::Menu;
            }
        }
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let frame_dt = Duration::from_secs_f32(1.0 / FPS as f32);

        while !self.should_quit {
            self.term.resize_if_needed()?;

            for ev in collect_input_nonblocking(frame_dt)? {
                if let Some(action) = map_event_to_action(self.scene, &ev) {
                    self.handle(action);
                    if self.should_quit {
                        break;
                    }
                }
            }

            let now = Instant::now();
            self.toasts.prune(now);
            if let Some(session) = self.session.as_mut() {
                session.pump(now, &mut self.toasts);
            }

            self.render_frame()?;

            spin_sleep(frame_dt, Instant::now());
        }
        Ok(())
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        self.term.cur.clear(Color::Black);
        match (self.scene, self.session.as_ref()) {
            (Scene::Pet, Some(s)) | (Scene::Help { back_to_pet: true }, Some(s)) => {
                draw_pet(&mut self.term.cur, s, &self.prefs.run, &self.toasts)
            }
            _ => draw_menu(&mut self.term.cur, self.menu_cursor, &self.prefs.run),
        }
        if matches!(self.scene, Scene::Help { .. }) {
            draw_help(&mut self.term.cur);
        }
        self.term.present(true)
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        self.close_pet();
        let settings = self.prefs.to_save(Utc::now());
        if let Err(e) = save_settings_atomic(&self.paths.settings_path, &settings) {
            warn!(error = ?e, "could not save settings");
        }
        self.term.end()
    }
}

pub fn run(paths: Paths, opts: LaunchOptions) -> anyhow::Result<()> {
    let mut app = App::init(paths, &opts)?;
    info!(tick_ms = app.prefs.run.tick_ms_clamped(), "started");
    let result = app.run();
    // restore the terminal even when the loop failed
    let ended = app.shutdown();
    result.and(ended)
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
