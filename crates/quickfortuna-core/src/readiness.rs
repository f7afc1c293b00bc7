//! Paranoia levels and the readiness states derived from them.
//!
//! A paranoia level is an index into [`PARANOIA_LEVELS`], selecting how many
//! bits of entropy must have been folded into the working key before output
//! is permitted. Readiness is a pair of flags: whether output may be drawn
//! now, and whether a reseed is due first.

use crate::error::Error;

/// Required entropy (bits) per paranoia level. Index = level.
pub const PARANOIA_LEVELS: [u64; 11] = [0, 48, 64, 96, 128, 192, 256, 384, 512, 768, 1024];

// ---------------------------------------------------------------------------
// Paranoia
// ---------------------------------------------------------------------------

/// A validated paranoia level in `0..=10`.
///
/// Validation happens once, at construction, so every readiness query and
/// output request downstream is infallible with respect to the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Paranoia(u8);

impl Paranoia {
    /// Default level used by [`crate::Fortuna::new`]: 256 bits.
    pub const DEFAULT: Paranoia = Paranoia(6);

    /// Validate a raw level.
    pub fn new(level: u8) -> Result<Self, Error> {
        if usize::from(level) < PARANOIA_LEVELS.len() {
            Ok(Self(level))
        } else {
            Err(Error::ParanoiaOutOfRange(level))
        }
    }

    /// The raw level.
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Entropy bits required at this level.
    pub fn required_bits(self) -> u64 {
        PARANOIA_LEVELS[usize::from(self.0)]
    }
}

impl std::fmt::Display for Paranoia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} bits)", self.0, self.required_bits())
    }
}

// ---------------------------------------------------------------------------
// ReadyState
// ---------------------------------------------------------------------------

/// Readiness of the generator, as two combinable flags.
///
/// Bit 0: output may be drawn at the queried paranoia level.
/// Bit 1: a reseed is due before (or instead of) drawing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyState(u8);

impl ReadyState {
    /// Not enough entropy anywhere.
    pub const NOT_READY: ReadyState = ReadyState(0);
    /// The working key is strong enough; no reseed due.
    pub const READY: ReadyState = ReadyState(1);
    /// Pools hold enough entropy but none of it has reached the key yet.
    pub const RESEED_NOT_READY: ReadyState = ReadyState(2);
    /// The working key is strong enough and a scheduled reseed is due.
    pub const RESEED_READY: ReadyState = ReadyState(3);

    /// Whether output may be drawn.
    pub fn is_ready(self) -> bool {
        self.0 & 1 != 0
    }

    /// Whether a reseed is due.
    pub fn requires_reseed(self) -> bool {
        self.0 & 2 != 0
    }

    /// Raw flag bits.
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for ReadyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::NOT_READY => write!(f, "not ready"),
            Self::READY => write!(f, "ready"),
            Self::RESEED_NOT_READY => write!(f, "not ready (reseed due)"),
            Self::RESEED_READY => write!(f, "ready (reseed due)"),
            _ => write!(f, "invalid ({:#04b})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paranoia_table_is_monotonic() {
        for pair in PARANOIA_LEVELS.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn paranoia_accepts_full_range() {
        for level in 0..=10u8 {
            let p = Paranoia::new(level).unwrap();
            assert_eq!(p.level(), level);
            assert_eq!(p.required_bits(), PARANOIA_LEVELS[level as usize]);
        }
    }

    #[test]
    fn paranoia_rejects_out_of_range() {
        assert!(matches!(
            Paranoia::new(11),
            Err(Error::ParanoiaOutOfRange(11))
        ));
        assert!(matches!(
            Paranoia::new(255),
            Err(Error::ParanoiaOutOfRange(255))
        ));
    }

    #[test]
    fn ready_state_flags() {
        assert!(!ReadyState::NOT_READY.is_ready());
        assert!(!ReadyState::NOT_READY.requires_reseed());
        assert!(ReadyState::READY.is_ready());
        assert!(!ReadyState::READY.requires_reseed());
        assert!(!ReadyState::RESEED_NOT_READY.is_ready());
        assert!(ReadyState::RESEED_NOT_READY.requires_reseed());
        assert!(ReadyState::RESEED_READY.is_ready());
        assert!(ReadyState::RESEED_READY.requires_reseed());
    }

    #[test]
    fn ready_state_bits_round_trip() {
        assert_eq!(ReadyState::NOT_READY.bits(), 0);
        assert_eq!(ReadyState::READY.bits(), 1);
        assert_eq!(ReadyState::RESEED_NOT_READY.bits(), 2);
        assert_eq!(ReadyState::RESEED_READY.bits(), 3);
    }
}
