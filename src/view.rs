use crate::model::{PetColor, PetState};
use crate::species::{Species, EGG};

pub const SKULL: &str = "💀";
pub const SLEEP: &str = "💤";
pub const HEART: &str = "♥";

const ASCII_SKULL: &str = "x_x";
const ASCII_SLEEP: &str = "zzz";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const fn hex(v: u32) -> Rgb {
    Rgb {
        r: (v >> 16) as u8,
        g: (v >> 8) as u8,
        b: v as u8,
    }
}

/// Lightest to darkest.
const YELLOW: [Rgb; 3] = [hex(0xFFF9C4), hex(0xFFEB3B), hex(0xFBC02D)];
const ORANGE: [Rgb; 3] = [hex(0xFFE0B2), hex(0xFF9800), hex(0xF57C00)];
const RED: [Rgb; 3] = [hex(0xFFCDD2), hex(0xF44336), hex(0xD32F2F)];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleTier {
    Tiny,
    Small,
    Medium,
    Large,
}

impl ScaleTier {
    /// Frame size in cells (w, h) the pet is drawn in.
    pub fn frame(self) -> (u16, u16) {
        match self {
            ScaleTier::Tiny => (9, 3),
            ScaleTier::Small => (13, 5),
            ScaleTier::Medium => (17, 7),
            ScaleTier::Large => (21, 9),
        }
    }
}

pub fn glyph<'a>(st: &'a PetState) -> &'a str {
    if !st.is_alive {
        return SKULL;
    }
    if st.is_sleeping {
        return SLEEP;
    }
    st.stages
        .get(st.evolution_stage as usize)
        .or_else(|| st.stages.first())
        .map(String::as_str)
        .unwrap_or(EGG)
}

pub fn ascii_glyph(st: &PetState, species: &Species) -> &'static str {
    if !st.is_alive {
        return ASCII_SKULL;
    }
    if st.is_sleeping {
        return ASCII_SLEEP;
    }
    species
        .ascii_stages
        .get(st.evolution_stage as usize)
        .copied()
        .unwrap_or(species.ascii_stages[0])
}

pub fn shade(st: &PetState) -> Rgb {
    let palette = match st.color {
        PetColor::Yellow => &YELLOW,
        PetColor::Orange => &ORANGE,
        PetColor::Red => &RED,
    };
    if st.health > 66 {
        palette[2]
    } else if st.health > 33 {
        palette[1]
    } else {
        palette[0]
    }
}

pub fn scale_tier(st: &PetState) -> ScaleTier {
    match st.evolution_stage {
        1 => ScaleTier::Small,
        2 => ScaleTier::Medium,
        3 => ScaleTier::Large,
        _ => ScaleTier::Tiny,
    }
}

pub fn status_badge(st: &PetState) -> &'static str {
    if !st.is_alive {
        SKULL
    } else if st.is_sleeping {
        SLEEP
    } else {
        HEART
    }
}

pub fn stat_rows(st: &PetState) -> [(&'static str, u8); 4] {
    [
        ("Hunger", st.hunger),
        ("Happiness", st.happiness),
        ("Health", st.health),
        ("Cleanliness", st.cleanliness),
    ]
}
