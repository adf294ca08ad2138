use crate::config::write_atomic;
use crate::model::PetState;
use crate::species::Species;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::{fs, path::PathBuf};
use tracing::{debug, warn};

pub const KEY_PREFIX: &str = "tamagotchiState_";

pub fn state_key(pet_id: &str) -> String {
    format!("{KEY_PREFIX}{pet_id}")
}

/// String-keyed JSON value store.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&mut self, key: &str, value: &Value) -> Result<()>;
    fn delete(&mut self, key: &str) -> Result<()>;
}

/// One pretty-printed `<key>.json` per key.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("could not create store dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        let s = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("could not read {}", path.display()))
            }
        };
        let v = serde_json::from_str(&s)
            .with_context(|| format!("{} is not valid JSON", path.display()))?;
        Ok(Some(v))
    }

    fn set(&mut self, key: &str, value: &Value) -> Result<()> {
        let data = serde_json::to_vec_pretty(value)?;
        write_atomic(&self.path_for(key), &data)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("could not delete {}", path.display())),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &Value) -> Result<()> {
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Saved pet for `species`, or a fresh one when there is no usable save.
pub fn load_pet(store: &dyn KvStore, species: &Species) -> PetState {
    let key = state_key(species.id);
    let raw = match store.get(&key) {
        Ok(Some(v)) => v,
        Ok(None) => {
            debug!(pet = species.id, "no saved state, starting fresh");
            return PetState::new(species);
        }
        Err(e) => {
            warn!(pet = species.id, error = ?e, "unreadable save, starting fresh");
            return PetState::new(species);
        }
    };

    match serde_json::from_value::<PetState>(raw) {
        Ok(mut st) => {
            if st.sanitize(species) {
                warn!(pet = species.id, "saved state broke invariants, repaired on load");
            }
            st
        }
        Err(e) => {
            warn!(pet = species.id, error = %e, "malformed save, starting fresh");
            PetState::new(species)
        }
    }
}

pub fn save_pet(store: &mut dyn KvStore, pet_id: &str, state: &PetState) -> Result<()> {
    let v = serde_json::to_value(state)?;
    store.set(&state_key(pet_id), &v)
}

pub fn clear_pet(store: &mut dyn KvStore, pet_id: &str) -> Result<()> {
    store.delete(&state_key(pet_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::CATALOG;
    use serde_json::json;

    #[test]
    fn key_is_prefixed_pet_id() {
        assert_eq!(state_key("cat"), "tamagotchiState_cat");
    }

    #[test]
    fn memory_store_round_trip() {
        let cat = &CATALOG[1];
        let mut store = MemoryStore::new();
        let mut st = PetState::new(cat);
        st.age = 42;
        st.hunger = 7;
        save_pet(&mut store, cat.id, &st).unwrap();
        assert_eq!(load_pet(&store, cat), st);

        clear_pet(&mut store, cat.id).unwrap();
        assert!(store.is_empty());
        assert_eq!(load_pet(&store, cat), PetState::new(cat));
    }

    #[test]
    fn malformed_value_falls_back_to_fresh() {
        let dog = &CATALOG[2];
        let mut store = MemoryStore::new();
        store
            .set(&state_key(dog.id), &json!({"hunger": "lots"}))
            .unwrap();
        assert_eq!(load_pet(&store, dog), PetState::new(dog));

        store.set(&state_key(dog.id), &json!(17)).unwrap();
        assert_eq!(load_pet(&store, dog), PetState::new(dog));
    }

    #[test]
    fn out_of_range_value_is_clamped_on_load() {
        let dog = &CATALOG[2];
        let mut store = MemoryStore::new();
        let mut v = serde_json::to_value(PetState::new(dog)).unwrap();
        v["happiness"] = json!(250);
        store.set(&state_key(dog.id), &v).unwrap();
        assert_eq!(load_pet(&store, dog).happiness, 100);
    }
}
