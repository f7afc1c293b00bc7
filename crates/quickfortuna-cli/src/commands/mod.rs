//! Subcommands plus the timing-jitter pump they share.
//!
//! The CLI is an ordinary host from the generator's point of view: it has no
//! pointer or keyboard to watch, so it feeds clock-read jitter instead,
//! credited a conservative one bit per delta.

pub mod generate;
pub mod status;

use std::time::Instant;

use quickfortuna_core::{Fortuna, Paranoia};

/// Timer reads per jitter round.
const JITTER_ROUNDS: usize = 64;

/// Submit one round of timing-jitter entropy.
pub(crate) fn pump_jitter_round(rng: &mut Fortuna) {
    let mut timings: Vec<u32> = Vec::with_capacity(JITTER_ROUNDS);
    for _ in 0..JITTER_ROUNDS {
        let t0 = Instant::now();
        std::hint::black_box(Instant::now());
        timings.push(t0.elapsed().as_nanos() as u32);
    }

    let deltas: Vec<u32> = timings
        .windows(2)
        .map(|w| w[1].wrapping_sub(w[0]))
        .collect();
    let claimed = deltas.len() as u64;
    rng.add_entropy(&deltas[..], Some(claimed), "jitter");
}

/// Pump jitter until the generator can serve output at `paranoia`.
///
/// Pool entropy alone does not make the generator ready; once the pools
/// cover the requirement, an empty zero-paranoia draw forces the reseed
/// that folds them into the working key.
pub(crate) fn seed_until_ready(rng: &mut Fortuna, paranoia: Paranoia) {
    rng.start_collectors();
    while rng.progress(Some(paranoia)) < 1.0 {
        pump_jitter_round(rng);
    }
    if !rng.is_ready(Some(paranoia)).is_ready() {
        let zero = Paranoia::new(0).expect("level 0 is always valid");
        rng.random_words(0, Some(zero))
            .expect("zero-paranoia output is always allowed");
    }
}
