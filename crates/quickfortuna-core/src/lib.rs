//! # quickfortuna-core
//!
//! **A Fortuna generator that earns trust fast.**
//!
//! `quickfortuna-core` is a cryptographically secure pseudo-random number
//! generator in the Fortuna lineage, adapted for hosts that must become
//! usable quickly and cannot count on a persisted seed file: entropy flows
//! in from host collectors (pointer motion, keystrokes, sensors, the OS
//! random primitive), accumulates in a cascade of SHA-256 pools, and gates
//! an AES-256-CTR output stage behind an explicit, paranoia-indexed
//! readiness threshold.
//!
//! ## Quick Start
//!
//! ```no_run
//! use quickfortuna_core::{EventKind, Fortuna};
//!
//! let mut rng = Fortuna::new();
//! rng.add_listener(EventKind::Seeded, |_| println!("ready"));
//! rng.start_collectors();
//!
//! // Feed whatever noise the host observes...
//! rng.add_entropy("host noise here", None, "demo");
//!
//! // ...and draw output once the oracle allows it.
//! if rng.is_ready(None).is_ready() {
//!     let words = rng.random_words(4, None).unwrap();
//!     assert_eq!(words.len(), 4);
//! }
//! ```
//!
//! ## Architecture
//!
//! Submissions → Pool bank (round-robin) → Reseed cascade → AES-CTR output
//!
//! - Every submission is absorbed by one streaming SHA-256 pool, chosen
//!   round-robin per source so a noisy source spreads across the bank.
//! - A reseed finalizes a schedule-chosen prefix of pools into the working
//!   key; pool `i` participates in one of every `2^i` reseeds, and the bank
//!   grows whenever the schedule has consumed its last pool.
//! - Output is AES-256 over a 128-bit counter, rekeyed from its own output
//!   every burst and after every call, so compromise of a later state never
//!   exposes earlier output.
//! - Readiness is explicit: [`Fortuna::random_words`] refuses to run until
//!   the entropy accounting clears the chosen [`Paranoia`] level, and
//!   `progress`/`seeded` events report the climb.

pub mod collectors;
pub mod entropy;
pub mod error;
pub mod events;
pub mod generator;
pub mod persist;
pub mod platform;
pub mod pool;
pub mod readiness;

pub use collectors::HostEvent;
pub use entropy::EntropyInput;
pub use error::Error;
pub use events::{Event, EventKind, ListenerId};
pub use generator::{Fortuna, BITS_PER_RESEED, MAX_WORDS_PER_BURST, MILLISECONDS_PER_RESEED};
pub use persist::{FileStore, PersistStore, SEED_BLOB_WORDS};
pub use platform::{Platform, SystemPlatform};
pub use pool::{HashPool, PoolBank};
pub use readiness::{Paranoia, ReadyState, PARANOIA_LEVELS};

use std::sync::{Mutex, OnceLock};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

static GLOBAL: OnceLock<Mutex<Fortuna>> = OnceLock::new();

/// The process-wide generator, created on first use.
///
/// The core itself is single-threaded; this is the one sanctioned sharing
/// point, a `Mutex` at the boundary. Hosts that want isolation (or tests)
/// should construct their own [`Fortuna`] instances instead.
pub fn global() -> &'static Mutex<Fortuna> {
    GLOBAL.get_or_init(|| Mutex::new(Fortuna::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_returns_the_same_instance() {
        let a = global() as *const _;
        let b = global() as *const _;
        assert_eq!(a, b);
    }

    #[test]
    fn global_is_usable_behind_the_mutex() {
        let mut rng = global().lock().unwrap();
        rng.add_entropy(42u32, Some(1), "smoke");
        assert!(rng.pool_strength() >= 1);
    }
}
