use crate::alphabet::Alphabet;
use crate::breaker::{BreakOutcome, BreakParams, Breaker, ProgressSink};
use crate::cipher::CipherMachine;
use crate::error::{CrackError, CrackResult};
use crate::fitness::FitnessModel;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Host-side session state: one alphabet, one cipher machine, one loaded
/// fitness model, and a single-slot admission gate.
///
/// The gate serializes jobs the way an interactive front end needs: a
/// second submission while one is in flight is rejected with
/// [`CrackError::Busy`], never queued.
pub struct Session {
    machine: CipherMachine,
    model: Arc<dyn FitnessModel>,
    busy: AtomicBool,
}

impl Session {
    pub fn new(alphabet: Alphabet, model: Arc<dyn FitnessModel>) -> Self {
        Self {
            machine: CipherMachine::new(alphabet),
            model,
            busy: AtomicBool::new(false),
        }
    }

    pub fn alphabet(&self) -> &Alphabet {
        self.machine.alphabet()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn encode(&self, text: &str, key: &str) -> CrackResult<String> {
        let _slot = self.admit()?;
        self.machine.encode_with_ignoring(text, key)
    }

    pub fn decode(&self, text: &str, key: &str) -> CrackResult<String> {
        let _slot = self.admit()?;
        self.machine.decode_with_ignoring(text, key)
    }

    /// Runs a full breaking job against `ciphertext`. The breaker and all
    /// of its pooled buffers live only for this call.
    pub fn crack(
        &self,
        ciphertext: &str,
        params: &BreakParams,
        sink: Option<&dyn ProgressSink>,
    ) -> CrackResult<BreakOutcome> {
        let _slot = self.admit()?;
        let breaker = Breaker::new(
            self.machine.alphabet().clone(),
            Arc::clone(&self.model),
            ciphertext,
        );
        breaker.break_cipher(params, sink)
    }

    /// A fresh shuffled key, for seeding a key input field.
    pub fn random_key(&self) -> String {
        let mut rng = fastrand::Rng::new();
        self.machine.alphabet().random_key(&mut rng)
    }

    fn admit(&self) -> CrackResult<SlotGuard<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CrackError::Busy);
        }
        Ok(SlotGuard { busy: &self.busy })
    }
}

/// Releases the admission slot on every exit path.
struct SlotGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::QuadgramModel;

    fn session() -> Session {
        let alphabet = Alphabet::english();
        let model = Arc::new(
            QuadgramModel::from_counts(&alphabet, [("TION", 100u64), ("THER", 80)]).unwrap(),
        );
        Session::new(alphabet, model)
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let s = session();
        let key = s.random_key();
        let encoded = s.encode("Attack at dawn!", &key).unwrap();
        let decoded = s.decode(&encoded, &key).unwrap();
        assert_eq!(decoded, "ATTACK AT DAWN!");
    }

    #[test]
    fn test_slot_released_after_error() {
        let s = session();
        assert!(s.encode("HI", "not a key").is_err());
        assert!(!s.is_busy());
        assert!(s.encode("HI", &s.random_key()).is_ok());
    }

    #[test]
    fn test_second_job_dropped_while_busy() {
        let s = session();
        let _slot = s.admit().unwrap();
        assert!(s.is_busy());
        match s.encode("HI", &s.random_key()) {
            Err(CrackError::Busy) => {}
            other => panic!("expected Busy, got {:?}", other),
        }
    }
}
