//! CLI for quickfortuna — a fast-start Fortuna CSPRNG.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "quickfortuna")]
#[command(about = "quickfortuna — fast-start Fortuna CSPRNG")]
#[command(version = quickfortuna_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show generator readiness and entropy accounting after a short seeding run
    Status {
        /// Paranoia level to report against (0-10)
        #[arg(long, default_value = "6")]
        paranoia: u8,
    },

    /// Seed from host jitter and write random bytes to stdout
    Generate {
        /// Number of bytes to produce
        #[arg(long, default_value = "32")]
        bytes: usize,

        /// Output format
        #[arg(long, default_value = "hex", value_parser = ["raw", "hex"])]
        format: String,

        /// Paranoia level gating the output (0-10)
        #[arg(long, default_value = "6")]
        paranoia: u8,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status { paranoia } => commands::status::run(paranoia),
        Commands::Generate {
            bytes,
            format,
            paranoia,
        } => commands::generate::run(bytes, &format, paranoia),
    }
}
