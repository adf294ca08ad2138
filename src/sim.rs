use crate::model::{PetColor, PetState, STAT_MAX};
use crate::notify::Notice;
use crate::species::Species;

pub const DECAY_EVERY: u64 = 5;
pub const CARE_STEP: u8 = 10;
pub const LOW_STAT: u8 = 20;
pub const HIGH_STAT: u8 = 80;
pub const ORANGE_AT: u64 = 200;
pub const RED_AT: u64 = 500;

/// (age, stage reached, message suffix)
const EVOLUTIONS: [(u64, u8, &str); 3] = [
    (50, 1, "has evolved!"),
    (100, 2, "has evolved again!"),
    (150, 3, "has reached its final form!"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PetEvent {
    Tick,
    Feed,
    Play,
    Clean,
    ToggleSleep,
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    AlreadyFull,
    NeedsRest,
    AlreadyClean,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Rejected(Rejection),
    /// Precondition on life or sleep not met; nothing changed, nothing said.
    Ignored,
}

#[derive(Clone, Debug)]
pub struct Transition {
    pub state: PetState,
    pub outcome: Outcome,
    pub notices: Vec<Notice>,
}

/// Applies one event to an owned state and hands back the next state.
pub fn reduce(mut state: PetState, event: PetEvent, species: &Species) -> Transition {
    let mut notices = Vec::new();
    let outcome = match event {
        PetEvent::Tick => state.tick(species, &mut notices),
        PetEvent::Feed | PetEvent::Play | PetEvent::Clean => state.care(event, &mut notices),
        PetEvent::ToggleSleep => state.toggle_sleep(&mut notices),
        PetEvent::Reset => {
            state = PetState::new(species);
            notices.push(Notice::info(
                "New game",
                "Starting a new game with a fresh pet! 🥚",
            ));
            Outcome::Applied
        }
    };
    Transition {
        state,
        outcome,
        notices,
    }
}

impl PetState {
    fn tick(&mut self, species: &Species, notices: &mut Vec<Notice>) -> Outcome {
        if !self.is_alive {
            return Outcome::Ignored;
        }

        if self.age % DECAY_EVERY == 0 && !self.is_sleeping {
            self.hunger = self.hunger.saturating_sub(1);
            self.happiness = self.happiness.saturating_sub(1);
            self.cleanliness = self.cleanliness.saturating_sub(1);
        }
        self.age += 1;

        let needs = [self.hunger, self.happiness, self.cleanliness];
        if needs.iter().any(|&v| v < LOW_STAT) {
            self.health = self.health.saturating_sub(1);
        } else if needs.iter().all(|&v| v > HIGH_STAT) {
            self.health = (self.health + 1).min(STAT_MAX);
        }

        for (at, stage, suffix) in EVOLUTIONS {
            if self.age == at && self.evolution_stage < stage {
                self.evolution_stage = stage;
                notices.push(Notice::info(
                    "Evolution!",
                    format!("Your {} {suffix}", species.name.to_lowercase()),
                ));
            }
        }

        // exact-age triggers; a skipped age skips the change
        if self.age == ORANGE_AT {
            self.color = self.color.max(PetColor::Orange);
        }
        if self.age == RED_AT {
            self.color = self.color.max(PetColor::Red);
        }

        if self.health == 0 && self.is_alive {
            let cause = self.derive_cause();
            self.is_alive = false;
            self.cause_of_death = Some(cause);
            notices.push(Notice::destructive(
                "Game Over",
                format!(
                    "Your pet has died from {}. 😢",
                    cause.label().to_lowercase()
                ),
            ));
        }

        Outcome::Applied
    }

    fn care(&mut self, event: PetEvent, notices: &mut Vec<Notice>) -> Outcome {
        if !self.is_alive || self.is_sleeping {
            return Outcome::Ignored;
        }

        let (stat, rejection, refused, done) = match event {
            PetEvent::Feed => (
                &mut self.hunger,
                Rejection::AlreadyFull,
                ("Can't feed", "Your pet is already full!"),
                ("Yummy!", "Your pet enjoyed the meal! 🍕"),
            ),
            PetEvent::Play => (
                &mut self.happiness,
                Rejection::NeedsRest,
                ("Too tired", "Your pet needs some rest!"),
                ("Fun time!", "Your pet had fun playing! 🎮"),
            ),
            PetEvent::Clean => (
                &mut self.cleanliness,
                Rejection::AlreadyClean,
                ("Already clean", "Your pet is squeaky clean!"),
                ("Splash!", "Your pet is now clean! 🚿"),
            ),
            _ => return Outcome::Ignored,
        };

        if *stat >= STAT_MAX {
            notices.push(Notice::info(refused.0, refused.1));
            return Outcome::Rejected(rejection);
        }
        *stat = (*stat + CARE_STEP).min(STAT_MAX);
        notices.push(Notice::info(done.0, done.1));
        Outcome::Applied
    }

    fn toggle_sleep(&mut self, notices: &mut Vec<Notice>) -> Outcome {
        if !self.is_alive {
            return Outcome::Ignored;
        }
        let notice = if self.is_sleeping {
            Notice::info("Rise and shine!", "Your pet woke up! 🌞")
        } else {
            Notice::info("Sweet dreams!", "Your pet is sleeping... 💤")
        };
        self.is_sleeping = !self.is_sleeping;
        notices.push(notice);
        Outcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CauseOfDeath;
    use crate::notify::Severity;
    use crate::species::CATALOG;

    fn chicken() -> &'static Species {
        &CATALOG[0]
    }

    fn run(st: PetState, events: &[PetEvent]) -> PetState {
        events
            .iter()
            .fold(st, |st, &ev| reduce(st, ev, chicken()).state)
    }

    #[test]
    fn decay_fires_on_multiples_of_five() {
        let st = run(PetState::new(chicken()), &[PetEvent::Tick; 5]);
        // age 0 decays, ages 1..4 do not
        assert_eq!((st.hunger, st.happiness, st.cleanliness), (49, 49, 99));
        assert_eq!(st.age, 5);
        let st = reduce(st, PetEvent::Tick, chicken()).state;
        assert_eq!(st.hunger, 48);
    }

    #[test]
    fn sleeping_pet_skips_decay_but_ages() {
        let mut st = PetState::new(chicken());
        st.is_sleeping = true;
        let st = run(st, &[PetEvent::Tick; 10]);
        assert_eq!(st.hunger, 50);
        assert_eq!(st.age, 10);
    }

    #[test]
    fn health_moves_one_way_per_tick() {
        let mut st = PetState::new(chicken());
        st.age = 1;
        st.hunger = 10;
        st.health = 50;
        assert_eq!(reduce(st.clone(), PetEvent::Tick, chicken()).state.health, 49);

        st.hunger = 90;
        st.happiness = 90;
        st.cleanliness = 90;
        assert_eq!(reduce(st.clone(), PetEvent::Tick, chicken()).state.health, 51);

        st.happiness = 80;
        assert_eq!(reduce(st, PetEvent::Tick, chicken()).state.health, 50);
    }

    #[test]
    fn evolution_triggers_once_with_species_name() {
        let mut st = PetState::new(chicken());
        st.age = 49;
        let t = reduce(st, PetEvent::Tick, chicken());
        assert_eq!(t.state.evolution_stage, 1);
        assert_eq!(t.notices.len(), 1);
        assert_eq!(t.notices[0].description, "Your chicken has evolved!");

        let t = reduce(t.state, PetEvent::Tick, chicken());
        assert_eq!(t.state.evolution_stage, 1);
        assert!(t.notices.is_empty());
    }

    #[test]
    fn evolution_never_regresses_from_a_higher_stage() {
        let mut st = PetState::new(chicken());
        st.age = 49;
        st.evolution_stage = 2;
        let t = reduce(st, PetEvent::Tick, chicken());
        assert_eq!(t.state.evolution_stage, 2);
        assert!(t.notices.is_empty());
    }

    #[test]
    fn color_changes_only_at_exact_ages() {
        let mut st = PetState::new(chicken());
        st.age = 199;
        let st = reduce(st, PetEvent::Tick, chicken()).state;
        assert_eq!(st.color, PetColor::Orange);

        let mut late = PetState::new(chicken());
        late.age = 200;
        let late = reduce(late, PetEvent::Tick, chicken()).state;
        assert_eq!(late.color, PetColor::Yellow);

        let mut st = st;
        st.age = 499;
        assert_eq!(reduce(st, PetEvent::Tick, chicken()).state.color, PetColor::Red);
    }

    #[test]
    fn death_picks_cause_by_priority() {
        let cases = [
            ((0, 0, 0), CauseOfDeath::Starvation),
            ((5, 0, 0), CauseOfDeath::Loneliness),
            ((5, 5, 0), CauseOfDeath::Illness),
            ((5, 5, 5), CauseOfDeath::OldAge),
        ];
        for ((hunger, happiness, cleanliness), want) in cases {
            let mut st = PetState::new(chicken());
            st.age = 1;
            st.hunger = hunger;
            st.happiness = happiness;
            st.cleanliness = cleanliness;
            st.health = 1;
            let t = reduce(st, PetEvent::Tick, chicken());
            assert!(!t.state.is_alive);
            assert_eq!(t.state.cause_of_death, Some(want));
            assert_eq!(t.notices.last().map(|n| n.severity), Some(Severity::Destructive));
        }
    }

    #[test]
    fn dead_pet_ignores_everything_but_reset() {
        let mut st = PetState::new(chicken());
        st.is_alive = false;
        st.health = 0;
        st.cause_of_death = Some(CauseOfDeath::OldAge);
        for ev in [
            PetEvent::Tick,
            PetEvent::Feed,
            PetEvent::Play,
            PetEvent::Clean,
            PetEvent::ToggleSleep,
        ] {
            let t = reduce(st.clone(), ev, chicken());
            assert_eq!(t.outcome, Outcome::Ignored);
            assert_eq!(t.state, st);
            assert!(t.notices.is_empty());
        }
        let t = reduce(st, PetEvent::Reset, chicken());
        assert_eq!(t.state, PetState::new(chicken()));
    }

    #[test]
    fn care_is_blocked_while_sleeping() {
        let mut st = PetState::new(chicken());
        st.is_sleeping = true;
        let t = reduce(st, PetEvent::Feed, chicken());
        assert_eq!(t.outcome, Outcome::Ignored);
        assert_eq!(t.state.hunger, 50);

        let t = reduce(t.state, PetEvent::ToggleSleep, chicken());
        assert!(!t.state.is_sleeping);
        assert_eq!(t.notices[0].title, "Rise and shine!");
    }

    #[test]
    fn care_caps_and_then_rejects() {
        let mut st = PetState::new(chicken());
        st.happiness = 95;
        let t = reduce(st, PetEvent::Play, chicken());
        assert_eq!(t.state.happiness, 100);
        assert_eq!(t.notices[0].title, "Fun time!");

        let t = reduce(t.state, PetEvent::Play, chicken());
        assert_eq!(t.outcome, Outcome::Rejected(Rejection::NeedsRest));
        assert_eq!(t.notices[0].description, "Your pet needs some rest!");

        let t = reduce(t.state, PetEvent::Clean, chicken());
        assert_eq!(t.outcome, Outcome::Rejected(Rejection::AlreadyClean));
    }
}
