use clap::{Parser, Subcommand};
use monocrack::{Alphabet, CipherMachine};
use std::process;
use tracing::error;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Cipher alphabet; every key and dataset must be a permutation of it.
    #[arg(global = true, short, long, default_value = "ABCDEFGHIJKLMNOPQRSTUVWXYZ")]
    alphabet: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Substitute plaintext under a key, carrying foreign characters through.
    Encode(cmd::encode::EncodeArgs),
    /// Invert a substitution under a known key.
    Decode(cmd::decode::DecodeArgs),
    /// Recover the key of a ciphertext with the genetic breaker.
    Crack(cmd::crack::CrackArgs),
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let alphabet = Alphabet::new(cli.alphabet.chars()).unwrap_or_else(|e| {
        error!("❌ {}", e);
        process::exit(1);
    });

    let result = match &cli.command {
        Commands::Encode(args) => cmd::encode::run(args, &CipherMachine::new(alphabet)),
        Commands::Decode(args) => cmd::decode::run(args, &CipherMachine::new(alphabet)),
        Commands::Crack(args) => cmd::crack::run(args, alphabet),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
