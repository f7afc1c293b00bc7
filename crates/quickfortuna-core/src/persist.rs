//! Saving and restoring a seed blob across process runs.
//!
//! The generator persists nothing by itself; a host that wants warm starts
//! gives it a [`PersistStore`]. Saving writes 128 bits of fresh output.
//! Restoring stirs the blob back into the pools with a **zero** entropy
//! credit: a store the attacker can read or replace must never count
//! toward readiness. It can help, not vouch.
//!
//! # Storage format
//!
//! [`FileStore`] keeps a small versioned JSON document:
//!
//! ```json
//! { "version": 1, "seed": "8f1d..." }
//! ```
//!
//! Unknown versions are treated as absent rather than as errors.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::generator::Fortuna;

/// Format version written by [`FileStore::save`].
pub const STATE_VERSION: u32 = 1;

/// Words in a saved seed blob (128 bits).
pub const SEED_BLOB_WORDS: usize = 4;

/// Source tag under which a restored blob is stirred in.
const LOAD_SOURCE: &str = "loadpool";

/// Host-provided storage for the seed blob.
pub trait PersistStore {
    /// Fetch the previously saved blob, or `None` when there is none.
    fn load(&mut self) -> Result<Option<Vec<u8>>, Error>;

    /// Store a blob, replacing any previous one.
    fn save(&mut self, blob: &[u8]) -> Result<(), Error>;
}

#[derive(Serialize, Deserialize)]
struct StateFile {
    version: u32,
    seed: String,
}

/// [`PersistStore`] backed by a JSON file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PersistStore for FileStore {
    fn load(&mut self) -> Result<Option<Vec<u8>>, Error> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)?;
        let state: StateFile = serde_json::from_str(&text)?;
        if state.version != STATE_VERSION {
            return Ok(None);
        }
        Ok(Some(hex::decode(&state.seed)?))
    }

    fn save(&mut self, blob: &[u8]) -> Result<(), Error> {
        let state = StateFile {
            version: STATE_VERSION,
            seed: hex::encode(blob),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&state)?)?;
        Ok(())
    }
}

impl Fortuna {
    /// Draw a fresh 128-bit blob and hand it to the store.
    ///
    /// Fails with [`Error::NotReady`] when the generator cannot produce
    /// output yet; there is nothing worth saving from a cold generator.
    pub fn persist_to(&mut self, store: &mut dyn PersistStore) -> Result<(), Error> {
        let words = self.random_words(SEED_BLOB_WORDS, None)?;
        let mut blob = Vec::with_capacity(SEED_BLOB_WORDS * 4);
        for w in words {
            blob.extend_from_slice(&w.to_be_bytes());
        }
        store.save(&blob)
    }

    /// Stir a previously saved blob back in, credited zero bits.
    ///
    /// Returns whether a blob was present.
    pub fn restore_from(&mut self, store: &mut dyn PersistStore) -> Result<bool, Error> {
        let Some(blob) = store.load()? else {
            return Ok(false);
        };
        let words: Vec<u32> = blob
            .chunks(4)
            .map(|chunk| {
                let mut bytes = [0u8; 4];
                bytes[..chunk.len()].copy_from_slice(chunk);
                u32::from_be_bytes(bytes)
            })
            .collect();
        self.add_entropy(&words[..], Some(0), LOAD_SOURCE);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readiness::Paranoia;

    fn seeded_generator() -> Fortuna {
        let mut generator = Fortuna::new();
        generator.set_default_paranoia(Paranoia::new(0).unwrap());
        generator.add_entropy("bootstrap entropy for tests", Some(128), "test");
        generator
    }

    #[test]
    fn save_then_load_round_trips_the_blob() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("seed.json"));

        let mut generator = seeded_generator();
        generator.persist_to(&mut store).unwrap();

        let blob = store.load().unwrap().expect("blob should exist");
        assert_eq!(blob.len(), SEED_BLOB_WORDS * 4);
    }

    #[test]
    fn missing_file_is_none_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn unknown_version_is_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, r#"{ "version": 99, "seed": "00ff" }"#).unwrap();

        let mut store = FileStore::new(path);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn corrupt_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, "not json at all").unwrap();

        let mut store = FileStore::new(path);
        assert!(matches!(store.load(), Err(Error::Format(_))));
    }

    #[test]
    fn corrupt_hex_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, r#"{ "version": 1, "seed": "zz" }"#).unwrap();

        let mut store = FileStore::new(path);
        assert!(matches!(store.load(), Err(Error::SeedBlob(_))));
    }

    #[test]
    fn restore_claims_zero_entropy() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("seed.json"));
        seeded_generator().persist_to(&mut store).unwrap();

        let mut cold = Fortuna::new();
        assert!(cold.restore_from(&mut store).unwrap());
        // The blob stirs the pools without moving the readiness needle.
        assert_eq!(cold.pool_strength(), 0);
        assert_eq!(cold.working_strength(), 0);
        assert!(cold.robin(LOAD_SOURCE).is_some());
    }

    #[test]
    fn restore_without_blob_reports_false() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("absent.json"));
        let mut generator = Fortuna::new();
        assert!(!generator.restore_from(&mut store).unwrap());
    }

    #[test]
    fn cold_generator_refuses_to_persist() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("seed.json"));
        let mut generator = Fortuna::new();
        assert!(matches!(
            generator.persist_to(&mut store),
            Err(Error::NotReady { .. })
        ));
        assert!(!dir.path().join("seed.json").exists());
    }
}
