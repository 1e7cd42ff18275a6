use clap::Args;
use monocrack::{CipherMachine, CrackResult};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct EncodeArgs {
    /// Permutation of the alphabet, e.g. "QWERTYUIOPASDFGHJKLZXCVBNM".
    #[arg(short, long)]
    pub key: String,

    /// Inline plaintext; falls back to --file, then stdin.
    #[arg(short, long)]
    pub text: Option<String>,

    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

pub fn run(args: &EncodeArgs, machine: &CipherMachine) -> CrackResult<()> {
    let text = super::read_input(&args.text, &args.file)?;
    let encoded = machine.encode_with_ignoring(&text, &args.key)?;
    println!("{}", encoded);
    Ok(())
}
