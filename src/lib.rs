pub mod alphabet;
pub mod breaker;
pub mod cipher;
pub mod error;
pub mod fitness;
pub mod pool;
pub mod session;

pub use alphabet::Alphabet;
pub use breaker::{BreakOutcome, BreakParams, Breaker, ProgressSink, WriteSink};
pub use cipher::CipherMachine;
pub use error::{CrackError, CrackResult};
pub use fitness::{FitnessModel, QuadgramModel};
pub use session::Session;
