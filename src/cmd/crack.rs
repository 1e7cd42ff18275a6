use crate::reports;
use clap::Args;
use monocrack::breaker::BreakSummary;
use monocrack::{Alphabet, BreakParams, CrackResult, ProgressSink, QuadgramModel, Session};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct CrackArgs {
    #[command(flatten)]
    pub params: BreakParams,

    /// Quadgram frequency dataset (`GRAM COUNT` per line).
    #[arg(short, long, default_value = "data/quadgrams_eng.txt")]
    pub dataset: String,

    /// JSON preset overriding the individual parameter flags.
    #[arg(long)]
    pub preset: Option<PathBuf>,

    /// Inline ciphertext; falls back to --file, then stdin.
    #[arg(short, long)]
    pub text: Option<String>,

    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

struct CliSink;

impl ProgressSink for CliSink {
    fn on_generation(&self, generation: usize, best_fitness: f64) {
        info!("[Gen {:4}] {}", generation, best_fitness);
    }

    fn on_finish(&self, _summary: &BreakSummary) {
        // Summary is rendered as a table by the caller.
    }
}

pub fn run(args: &CrackArgs, alphabet: Alphabet) -> CrackResult<()> {
    let ciphertext = super::read_input(&args.text, &args.file)?;

    info!("📚 Loading quadgram dataset: {}", args.dataset);
    let model = Arc::new(QuadgramModel::load_from_file(&alphabet, &args.dataset)?);

    let params: BreakParams = match &args.preset {
        Some(path) => {
            info!("⚙️  Loading parameter preset: {}", path.display());
            serde_json::from_str(&fs::read_to_string(path)?)?
        }
        None => args.params.clone(),
    };

    let session = Session::new(alphabet, model);
    let outcome = session.crack(&ciphertext, &params, Some(&CliSink))?;

    reports::print_summary(&outcome);
    println!("{}", outcome.plaintext);
    Ok(())
}
