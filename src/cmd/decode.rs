use clap::Args;
use monocrack::{CipherMachine, CrackResult};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    #[arg(short, long)]
    pub key: String,

    /// Inline ciphertext; falls back to --file, then stdin.
    #[arg(short, long)]
    pub text: Option<String>,

    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

pub fn run(args: &DecodeArgs, machine: &CipherMachine) -> CrackResult<()> {
    let text = super::read_input(&args.text, &args.file)?;
    let decoded = machine.decode_with_ignoring(&text, &args.key)?;
    println!("{}", decoded);
    Ok(())
}
