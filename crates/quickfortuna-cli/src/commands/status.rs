use quickfortuna_core::{Fortuna, Paranoia};

/// Jitter rounds fed before reporting.
const SEEDING_ROUNDS: usize = 4;

pub fn run(paranoia: u8) {
    let paranoia = match Paranoia::new(paranoia) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    let mut rng = Fortuna::new();
    rng.start_collectors();
    for _ in 0..SEEDING_ROUNDS {
        super::pump_jitter_round(&mut rng);
    }

    println!("\n{}", "=".repeat(60));
    println!("GENERATOR STATUS");
    println!("{}", "=".repeat(60));
    println!("Paranoia:  {paranoia}");
    println!("State:     {}", rng.is_ready(Some(paranoia)));
    println!(
        "Progress:  {:.0}%",
        rng.progress(Some(paranoia)) * 100.0
    );
    println!(
        "Strength:  {} bits working | {} bits pooled",
        rng.working_strength(),
        rng.pool_strength()
    );
    println!("Reseeds:   {}", rng.reseed_count());

    println!("\n{:<8} {:>12}", "Pool", "Bits");
    println!("{}", "-".repeat(21));
    for pool in 0..rng.pool_count() {
        println!("{:<8} {:>12}", pool, rng.pool_bits(pool));
    }
}
