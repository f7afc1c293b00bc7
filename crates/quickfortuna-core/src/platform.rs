//! Host-environment dependencies of the generator.
//!
//! The core never reads the clock or the OS random source directly; it goes
//! through [`Platform`], so hosts can substitute their own implementations
//! (embedded targets, scripted clocks in tests). The OS random word is used
//! opportunistically: it is stirred into every submission header and reseed
//! but credited conservatively, so a weak host primitive cannot inflate the
//! entropy accounting.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::RngCore;

/// Clock and random-word primitives supplied by the host.
pub trait Platform {
    /// Wall-clock time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;

    /// One 32-bit word from the host's random primitive.
    fn random_word(&self) -> u32;
}

/// Default [`Platform`] backed by the system clock and the OS CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPlatform;

impl Platform for SystemPlatform {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn random_word(&self) -> u32 {
        OsRng.next_u32()
    }
}
