pub mod crack;
pub mod decode;
pub mod encode;

use monocrack::CrackResult;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// Resolves the text input for a subcommand: inline argument, file, or
/// stdin (in that order).
pub fn read_input(text: &Option<String>, file: &Option<PathBuf>) -> CrackResult<String> {
    if let Some(text) = text {
        return Ok(text.clone());
    }
    if let Some(path) = file {
        return Ok(fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
