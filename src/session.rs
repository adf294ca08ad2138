use crate::model::PetState;
use crate::notify::{NoticeSink, Severity};
use crate::sim::{reduce, Outcome, PetEvent};
use crate::species::Species;
use crate::storage::{clear_pet, load_pet, save_pet, KvStore};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Fixed-interval timer driven by the caller's clock.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    accum: Duration,
    last: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            accum: Duration::ZERO,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn start(&mut self, now: Instant) {
        self.accum = Duration::ZERO;
        self.last = Some(now);
    }

    /// No tick is reported after this until `start` is called again.
    pub fn cancel(&mut self) {
        self.accum = Duration::ZERO;
        self.last = None;
    }

    pub fn is_running(&self) -> bool {
        self.last.is_some()
    }

    /// Whole intervals elapsed since the previous call.
    pub fn due(&mut self, now: Instant) -> u32 {
        let Some(last) = self.last else {
            return 0;
        };
        self.accum = self
            .accum
            .saturating_add(now.saturating_duration_since(last));
        self.last = Some(now);

        let mut n = 0;
        while self.accum >= self.interval {
            self.accum -= self.interval;
            n += 1;
        }
        n
    }
}

/// One selected pet: its state, its save slot, and the queue every
/// mutation goes through.
pub struct Session {
    species: &'static Species,
    state: PetState,
    store: Box<dyn KvStore>,
    queue: VecDeque<PetEvent>,
    ticker: Ticker,
    // ticks applied since the last save
    dirty: bool,
}

impl Session {
    pub fn open(
        species: &'static Species,
        store: Box<dyn KvStore>,
        interval: Duration,
        now: Instant,
    ) -> Self {
        let state = load_pet(store.as_ref(), species);
        info!(
            pet = species.id,
            age = state.age,
            alive = state.is_alive,
            "session opened"
        );
        let mut ticker = Ticker::new(interval);
        ticker.start(now);
        Self {
            species,
            state,
            store,
            queue: VecDeque::new(),
            ticker,
            dirty: false,
        }
    }

    pub fn species(&self) -> &'static Species {
        self.species
    }

    pub fn state(&self) -> &PetState {
        &self.state
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn submit(&mut self, event: PetEvent) {
        self.queue.push_back(event);
    }

    /// Queues one tick per elapsed interval.
    pub fn advance(&mut self, now: Instant) -> u32 {
        let n = self.ticker.due(now);
        for _ in 0..n {
            self.queue.push_back(PetEvent::Tick);
        }
        n
    }

    /// Runs queued events through the reducer in order, then saves once if
    /// any tick changed the pet.
    pub fn drain(&mut self, now: Instant, sink: &mut dyn NoticeSink) -> usize {
        let mut handled = 0;
        while let Some(event) = self.queue.pop_front() {
            self.apply(event, now, sink);
            handled += 1;
        }
        if self.dirty {
            self.persist();
        }
        handled
    }

    /// `advance` then `drain`.
    pub fn pump(&mut self, now: Instant, sink: &mut dyn NoticeSink) -> usize {
        self.advance(now);
        self.drain(now, sink)
    }

    fn apply(&mut self, event: PetEvent, now: Instant, sink: &mut dyn NoticeSink) {
        let was_alive = self.state.is_alive;
        let t = reduce(self.state.clone(), event, self.species);
        self.state = t.state;

        match t.outcome {
            Outcome::Applied => {}
            Outcome::Rejected(why) => debug!(pet = self.species.id, ?event, ?why, "rejected"),
            Outcome::Ignored => {
                if event != PetEvent::Tick {
                    debug!(pet = self.species.id, ?event, "ignored");
                }
            }
        }

        for notice in t.notices {
            match notice.severity {
                Severity::Info => info!(title = %notice.title, "{}", notice.description),
                Severity::Destructive => warn!(title = %notice.title, "{}", notice.description),
            }
            sink.notify(notice);
        }

        match event {
            PetEvent::Tick if t.outcome == Outcome::Applied => {
                if was_alive && !self.state.is_alive {
                    info!(
                        pet = self.species.id,
                        age = self.state.age,
                        cause = ?self.state.cause_of_death,
                        "pet died"
                    );
                }
                self.dirty = true;
            }
            PetEvent::Reset => {
                self.dirty = false;
                // ticks the old timer already queued belong to the old pet
                self.queue.retain(|e| *e != PetEvent::Tick);
                self.ticker.cancel();
                if let Err(e) = clear_pet(self.store.as_mut(), self.species.id) {
                    warn!(pet = self.species.id, error = ?e, "could not clear save");
                }
                self.ticker.start(now);
            }
            _ => {}
        }
    }

    fn persist(&mut self) {
        match save_pet(self.store.as_mut(), self.species.id, &self.state) {
            Ok(()) => self.dirty = false,
            Err(e) => warn!(pet = self.species.id, error = ?e, "could not save pet"),
        }
    }

    /// Stops the timer and writes the latest state. Returns the store so the
    /// caller can open another pet on it.
    pub fn close(mut self) -> Box<dyn KvStore> {
        self.ticker.cancel();
        self.queue.clear();
        self.persist();
        info!(pet = self.species.id, age = self.state.age, "session closed");
        self.store
    }
}
