//! Error surface for the generator and its persistence layer.

use thiserror::Error;

/// Errors reported by the generator.
#[derive(Debug, Error)]
pub enum Error {
    /// Output was requested before enough entropy reached the working key.
    ///
    /// Feed more entropy via `add_entropy` (or a running collector) and retry,
    /// or wait for the `seeded` event.
    #[error("generator is not seeded: {have}/{need} bits at paranoia level {level}")]
    NotReady {
        /// Paranoia level the request was checked against.
        level: u8,
        /// Bits required at that level.
        need: u64,
        /// Bits currently credited to the working key.
        have: u64,
    },

    /// Paranoia level outside the supported table.
    #[error("paranoia level {0} out of range (valid: 0..=10)")]
    ParanoiaOutOfRange(u8),

    /// State-file I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// State file exists but is not valid JSON.
    #[error("malformed state file: {0}")]
    Format(#[from] serde_json::Error),

    /// Seed blob field is not valid hex.
    #[error("malformed seed blob: {0}")]
    SeedBlob(#[from] hex::FromHexError),
}
