use crate::species::Species;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const STAT_MAX: u8 = 100;
pub const STAGE_MAX: u8 = 3;

pub const START_HUNGER: u8 = 50;
pub const START_HAPPINESS: u8 = 50;
pub const START_HEALTH: u8 = 100;
pub const START_CLEANLINESS: u8 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetColor {
    Yellow,
    Orange,
    Red,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CauseOfDeath {
    Starvation,
    Loneliness,
    Illness,
    #[serde(rename = "Old age")]
    OldAge,
}

impl CauseOfDeath {
    pub fn label(self) -> &'static str {
        match self {
            CauseOfDeath::Starvation => "Starvation",
            CauseOfDeath::Loneliness => "Loneliness",
            CauseOfDeath::Illness => "Illness",
            CauseOfDeath::OldAge => "Old age",
        }
    }

    fn from_label(s: &str) -> Option<Self> {
        match s {
            "Starvation" => Some(CauseOfDeath::Starvation),
            "Loneliness" => Some(CauseOfDeath::Loneliness),
            "Illness" => Some(CauseOfDeath::Illness),
            "Old age" => Some(CauseOfDeath::OldAge),
            _ => None,
        }
    }
}

impl fmt::Display for CauseOfDeath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Simulation state of one pet. Serialized as the persisted snapshot, so the
/// field names stay camelCase and "no cause" is stored as an empty string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetState {
    pub hunger: u8,
    pub happiness: u8,
    pub health: u8,
    pub cleanliness: u8,
    pub age: u64,
    pub is_sleeping: bool,
    pub evolution_stage: u8,
    pub color: PetColor,
    pub is_alive: bool,
    #[serde(with = "cause_field", default)]
    pub cause_of_death: Option<CauseOfDeath>,
    pub stages: Vec<String>,
}

impl PetState {
    pub fn new(species: &Species) -> Self {
        Self {
            hunger: START_HUNGER,
            happiness: START_HAPPINESS,
            health: START_HEALTH,
            cleanliness: START_CLEANLINESS,
            age: 0,
            is_sleeping: false,
            evolution_stage: 0,
            color: PetColor::Yellow,
            is_alive: true,
            cause_of_death: None,
            stages: species.stages.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Priority order when health runs out.
    pub(crate) fn derive_cause(&self) -> CauseOfDeath {
        if self.hunger == 0 {
            CauseOfDeath::Starvation
        } else if self.happiness == 0 {
            CauseOfDeath::Loneliness
        } else if self.cleanliness == 0 {
            CauseOfDeath::Illness
        } else {
            CauseOfDeath::OldAge
        }
    }

    /// Repairs a snapshot that parsed but breaks the state invariants.
    /// Returns true when anything had to change.
    pub fn sanitize(&mut self, species: &Species) -> bool {
        let before = self.clone();

        self.hunger = self.hunger.min(STAT_MAX);
        self.happiness = self.happiness.min(STAT_MAX);
        self.health = self.health.min(STAT_MAX);
        self.cleanliness = self.cleanliness.min(STAT_MAX);
        self.evolution_stage = self.evolution_stage.min(STAGE_MAX);

        if self.stages.len() != species.stages.len() {
            self.stages = species.stages.iter().map(|s| s.to_string()).collect();
        }

        if self.health == 0 && self.is_alive {
            self.is_alive = false;
        }
        match (self.is_alive, self.cause_of_death) {
            (true, Some(_)) => self.cause_of_death = None,
            (false, None) => self.cause_of_death = Some(self.derive_cause()),
            _ => {}
        }
        if !self.is_alive {
            self.is_sleeping = false;
        }

        *self != before
    }
}

mod cause_field {
    use super::CauseOfDeath;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        cause: &Option<CauseOfDeath>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        s.serialize_str(cause.map(CauseOfDeath::label).unwrap_or(""))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<CauseOfDeath>, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.is_empty() {
            return Ok(None);
        }
        CauseOfDeath::from_label(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("unknown cause of death: {raw}")))
    }
}
