use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};
use tamagotchi::notify::{Notice, Severity};
use tamagotchi::session::Session;
use tamagotchi::species::{self, CATALOG};
use tamagotchi::storage::{load_pet, save_pet, state_key, FileStore, KvStore, MemoryStore};
use tamagotchi::{reduce, CauseOfDeath, Outcome, PetEvent, PetState, Rejection};

const SEC: Duration = Duration::from_secs(1);

fn chicken() -> &'static tamagotchi::species::Species {
    species::find("chicken").unwrap()
}

#[test]
fn five_awake_ticks_decay_once() {
    let t0 = Instant::now();
    let mut s = Session::open(chicken(), Box::new(MemoryStore::new()), SEC, t0);
    let mut sink: Vec<Notice> = Vec::new();
    s.pump(t0 + SEC * 5, &mut sink);

    let st = s.state();
    assert_eq!(st.age, 5);
    assert_eq!(st.hunger, 49);
    assert_eq!(st.happiness, 49);
    assert_eq!(st.cleanliness, 99);
    assert_eq!(st.health, 100);
    assert!(sink.is_empty());
}

#[test]
fn feeding_caps_then_rejects() {
    let mut st = PetState::new(chicken());
    st.hunger = 95;
    let t = reduce(st, PetEvent::Feed, chicken());
    assert_eq!(t.outcome, Outcome::Applied);
    assert_eq!(t.state.hunger, 100);
    assert_eq!(t.notices[0].title, "Yummy!");

    let t = reduce(t.state, PetEvent::Feed, chicken());
    assert_eq!(t.outcome, Outcome::Rejected(Rejection::AlreadyFull));
    assert_eq!(t.state.hunger, 100);
    assert_eq!(t.notices[0].description, "Your pet is already full!");
}

#[test]
fn starving_pet_dies_of_starvation() {
    let t0 = Instant::now();
    let mut store = MemoryStore::new();
    let mut st = PetState::new(chicken());
    st.hunger = 0;
    st.health = 1;
    st.age = 3;
    save_pet(&mut store, "chicken", &st).unwrap();

    let mut s = Session::open(chicken(), Box::new(store), SEC, t0);
    let mut sink: Vec<Notice> = Vec::new();
    s.pump(t0 + SEC, &mut sink);

    assert!(!s.state().is_alive);
    assert_eq!(s.state().cause_of_death, Some(CauseOfDeath::Starvation));
    let last = sink.last().unwrap();
    assert_eq!(last.severity, Severity::Destructive);
    assert_eq!(last.description, "Your pet has died from starvation. 😢");

    // more time changes nothing
    let frozen = s.state().clone();
    s.pump(t0 + SEC * 30, &mut sink);
    assert_eq!(s.state(), &frozen);
}

#[test]
fn evolution_at_fifty_fires_once() {
    let t0 = Instant::now();
    let mut store = MemoryStore::new();
    let mut st = PetState::new(chicken());
    st.age = 49;
    save_pet(&mut store, "chicken", &st).unwrap();

    let mut s = Session::open(chicken(), Box::new(store), SEC, t0);
    let mut sink: Vec<Notice> = Vec::new();
    s.pump(t0 + SEC, &mut sink);
    assert_eq!(s.state().evolution_stage, 1);
    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].title, "Evolution!");

    s.pump(t0 + SEC * 2, &mut sink);
    assert_eq!(s.state().age, 51);
    assert_eq!(s.state().evolution_stage, 1);
    assert_eq!(sink.len(), 1);
}

#[test]
fn reset_after_death_clears_the_save() {
    let t0 = Instant::now();
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();
    let mut st = PetState::new(chicken());
    st.happiness = 0;
    st.health = 1;
    st.age = 2;
    save_pet(&mut store, "chicken", &st).unwrap();

    let mut s = Session::open(chicken(), Box::new(store), SEC, t0);
    let mut sink: Vec<Notice> = Vec::new();
    s.pump(t0 + SEC, &mut sink);
    assert_eq!(s.state().cause_of_death, Some(CauseOfDeath::Loneliness));
    assert!(dir.path().join("tamagotchiState_chicken.json").exists());

    s.submit(PetEvent::Reset);
    s.drain(t0 + SEC, &mut sink);
    assert_eq!(s.state(), &PetState::new(chicken()));
    assert!(s.state().is_alive);
    assert_eq!(s.state().cause_of_death, None);
    assert!(!dir.path().join("tamagotchiState_chicken.json").exists());
    assert_eq!(sink.last().unwrap().title, "New game");
}

#[test]
fn each_pet_has_its_own_slot() {
    let t0 = Instant::now();
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    let cat = species::find("cat").unwrap();
    let mut s = Session::open(cat, Box::new(store), SEC, t0);
    s.submit(PetEvent::Play);
    s.pump(t0 + SEC * 3, &mut Vec::<Notice>::new());
    let store = s.close();

    let cat_state = load_pet(store.as_ref(), cat);
    assert_eq!(cat_state.happiness, 59);
    assert_eq!(cat_state.age, 3);
    assert_eq!(load_pet(store.as_ref(), chicken()), PetState::new(chicken()));
    assert!(store.get(&state_key("dog")).unwrap().is_none());
}

#[test]
fn corrupt_file_means_fresh_pet() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tamagotchiState_rabbit.json"), "{ not json").unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let rabbit = &CATALOG[3];
    assert_eq!(load_pet(&store, rabbit), PetState::new(rabbit));
}

#[test]
fn sleeping_pet_only_answers_to_the_sleep_toggle() {
    let t0 = Instant::now();
    let mut s = Session::open(chicken(), Box::new(MemoryStore::new()), SEC, t0);
    let mut sink: Vec<Notice> = Vec::new();
    s.submit(PetEvent::ToggleSleep);
    s.submit(PetEvent::Feed);
    s.submit(PetEvent::Clean);
    s.pump(t0 + SEC * 10, &mut sink);

    assert!(s.state().is_sleeping);
    assert_eq!(s.state().hunger, 50);
    assert_eq!(s.state().age, 10);
    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].title, "Sweet dreams!");
}

#[test]
fn closed_session_stops_ticking() {
    let t0 = Instant::now();
    let mut s = Session::open(chicken(), Box::new(MemoryStore::new()), SEC, t0);
    s.pump(t0 + SEC * 3, &mut Vec::<Notice>::new());
    let store = s.close();

    let mut reopened = Session::open(chicken(), store, SEC, t0 + SEC * 100);
    assert_eq!(reopened.state().age, 3);
    reopened.pump(t0 + SEC * 101, &mut Vec::<Notice>::new());
    assert_eq!(reopened.state().age, 4);
}
