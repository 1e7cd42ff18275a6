use crate::alphabet::Alphabet;
use crate::error::{CrackError, CrackResult};
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

const WINDOW: usize = 4;

/// Scores a candidate plaintext buffer of alphabet indices.
///
/// Lower is more language-like. Implementations must be pure and safe to
/// call concurrently on disjoint buffers, and must return a defined score
/// for buffers shorter than their window.
pub trait FitnessModel: Send + Sync {
    fn score(&self, text: &[u8]) -> f64;
}

/// Quadgram log-likelihood model.
///
/// Holds a flat `n^4` table of `-log10(count / total)` costs per 4-symbol
/// window; grams absent from the dataset get a floor cost slightly above
/// the rarest observed gram. The aggregate over all overlapping windows is
/// the fitness of the buffer.
#[derive(Debug)]
pub struct QuadgramModel {
    alphabet_len: usize,
    costs: Vec<f64>,
}

impl QuadgramModel {
    /// Builds the model from `(gram, count)` pairs. Grams whose symbols are
    /// not all alphabet members, or whose length is not 4, are skipped.
    pub fn from_counts<'a, I>(alphabet: &Alphabet, counts: I) -> CrackResult<Self>
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let n = alphabet.len();
        let mut raw = vec![0u64; n * n * n * n];
        let mut total: u64 = 0;
        let mut skipped = 0usize;

        for (gram, count) in counts {
            match Self::gram_index(alphabet, gram) {
                Some(idx) => {
                    raw[idx] += count;
                    total += count;
                }
                None => skipped += 1,
            }
        }

        if total == 0 {
            return Err(CrackError::Dataset(
                "No usable quadgrams in the dataset".into(),
            ));
        }
        if skipped > 0 {
            warn!("Skipped {} quadgrams outside the alphabet", skipped);
        }

        let total_f = total as f64;
        // Standard smoothing for unseen grams: pretend count 0.01.
        let floor = -(0.01 / total_f).log10();
        let costs = raw
            .into_iter()
            .map(|c| {
                if c > 0 {
                    -((c as f64) / total_f).log10()
                } else {
                    floor
                }
            })
            .collect();

        debug!(
            "Quadgram model built: {} symbols, {} total observations",
            n, total
        );

        Ok(Self {
            alphabet_len: n,
            costs,
        })
    }

    /// Loads a `GRAM COUNT` dataset (one pair per line, space- or
    /// TAB-separated, e.g. `TION 13168375`). Malformed rows are skipped.
    pub fn load_from_file<P: AsRef<Path>>(alphabet: &Alphabet, path: P) -> CrackResult<Self> {
        let file = File::open(path.as_ref())?;

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut pairs: Vec<(String, u64)> = Vec::new();
        let mut malformed = 0usize;

        for result in rdr.records() {
            let rec = match result {
                Ok(rec) => rec,
                Err(_) => {
                    malformed += 1;
                    continue;
                }
            };
            if rec.len() < 2 {
                malformed += 1;
                continue;
            }
            let gram = rec[0].trim().to_string();
            match rec[1].trim().parse::<u64>() {
                Ok(count) => pairs.push((gram, count)),
                Err(_) => malformed += 1,
            }
        }

        if malformed > 0 {
            warn!("Skipped {} malformed dataset rows", malformed);
        }

        Self::from_counts(alphabet, pairs.iter().map(|(g, c)| (g.as_str(), *c)))
    }

    fn gram_index(alphabet: &Alphabet, gram: &str) -> Option<usize> {
        let mut chars = gram.chars();
        let mut idx = 0usize;
        for _ in 0..WINDOW {
            let c = chars.next()?;
            idx = idx * alphabet.len() + alphabet.index_of(c)? as usize;
        }
        if chars.next().is_some() {
            return None;
        }
        Some(idx)
    }
}

impl FitnessModel for QuadgramModel {
    fn score(&self, text: &[u8]) -> f64 {
        if text.len() < WINDOW {
            return 0.0;
        }

        let n = self.alphabet_len;
        let mut sum = 0.0;

        // Rolling index over overlapping windows: drop the leading symbol,
        // shift, append the next one.
        let mut idx = text[0] as usize * n * n + text[1] as usize * n + text[2] as usize;
        let high = n * n * n;
        for &next in &text[3..] {
            idx = idx * n + next as usize;
            sum += self.costs[idx];
            idx %= high;
        }

        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn abc() -> Alphabet {
        Alphabet::new("ABCD".chars()).unwrap()
    }

    #[test]
    fn test_short_buffer_scores_zero() {
        let model = QuadgramModel::from_counts(&abc(), [("ABCD", 10)]).unwrap();
        assert_eq!(model.score(&[]), 0.0);
        assert_eq!(model.score(&[0, 1, 2]), 0.0);
    }

    #[test]
    fn test_known_gram_beats_unknown() {
        let model = QuadgramModel::from_counts(&abc(), [("ABCD", 90), ("DCBA", 10)]).unwrap();
        let common = model.score(&[0, 1, 2, 3]);
        let rare = model.score(&[3, 2, 1, 0]);
        let unseen = model.score(&[0, 0, 0, 0]);
        assert!(common < rare);
        assert!(rare < unseen);
    }

    #[test]
    fn test_overlapping_windows_accumulate() {
        let model = QuadgramModel::from_counts(&abc(), [("ABCD", 50), ("BCDA", 50)]).unwrap();
        let single = model.score(&[0, 1, 2, 3]);
        let double = model.score(&[0, 1, 2, 3, 0]);
        let expected = single + model.score(&[1, 2, 3, 0]);
        assert!((double - expected).abs() < 1e-9);
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let err = QuadgramModel::from_counts(&abc(), []).unwrap_err();
        assert!(matches!(err, CrackError::Dataset(_)));
    }

    #[test]
    fn test_load_from_file_skips_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ABCD 100").unwrap();
        writeln!(file, "not-a-gram").unwrap();
        writeln!(file, "BCDA twelve").unwrap();
        writeln!(file, "DCBA 1").unwrap();
        file.flush().unwrap();

        let model = QuadgramModel::load_from_file(&abc(), file.path()).unwrap();
        assert!(model.score(&[0, 1, 2, 3]) < model.score(&[1, 0, 3, 2]));
    }
}
