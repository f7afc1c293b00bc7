use std::io::{self, Write};

use quickfortuna_core::{Fortuna, Paranoia};

pub fn run(bytes: usize, format: &str, paranoia: u8) {
    let paranoia = match Paranoia::new(paranoia) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    let mut rng = Fortuna::new();
    super::seed_until_ready(&mut rng, paranoia);

    let data = match rng.random_bytes(bytes, Some(paranoia)) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    match format {
        "hex" => println!("{}", hex::encode(&data)),
        _ => {
            io::stdout()
                .write_all(&data)
                .expect("stdout write failed");
        }
    }
}
