use crate::error::{CrackError, CrackResult};
use std::collections::HashMap;

/// Ordered set of cipher symbols, each mapped to a stable byte index.
///
/// Symbols are uppercased on construction and on every lookup, so the
/// whole engine is case-insensitive. At most 256 symbols are allowed
/// (indices must fit in a `u8`).
#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: Vec<char>,
    index_by_symbol: HashMap<char, u8>,
}

pub(crate) fn fold(c: char) -> char {
    c.to_uppercase().next().unwrap_or(c)
}

impl Alphabet {
    pub fn new<I: IntoIterator<Item = char>>(symbols: I) -> CrackResult<Self> {
        let mut ordered = Vec::new();
        let mut index_by_symbol = HashMap::new();

        for c in symbols {
            let up = fold(c);
            if index_by_symbol.contains_key(&up) {
                continue;
            }
            if ordered.len() >= u8::MAX as usize + 1 {
                return Err(CrackError::InvalidParameter(
                    "Alphabet must be no longer than 256 symbols".into(),
                ));
            }
            index_by_symbol.insert(up, ordered.len() as u8);
            ordered.push(up);
        }

        if ordered.is_empty() {
            return Err(CrackError::InvalidParameter("Alphabet is empty".into()));
        }

        Ok(Self {
            symbols: ordered,
            index_by_symbol,
        })
    }

    /// The English A-Z alphabet used by the bundled quadgram datasets.
    pub fn english() -> Self {
        Self::new('A'..='Z').expect("A-Z alphabet is always valid")
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Case-insensitive lookup. `None` for a character outside the alphabet.
    pub fn index_of(&self, c: char) -> Option<u8> {
        self.index_by_symbol.get(&fold(c)).copied()
    }

    pub fn symbol_at(&self, index: u8) -> char {
        self.symbols[index as usize]
    }

    /// Renders an index buffer back into symbol text.
    pub fn render(&self, indices: &[u8]) -> String {
        indices.iter().map(|&i| self.symbol_at(i)).collect()
    }

    /// Parses a user-supplied key string into an index permutation.
    ///
    /// The key must contain every alphabet symbol exactly once.
    pub fn parse_key(&self, key: &str) -> CrackResult<Vec<u8>> {
        let mut indices = Vec::with_capacity(self.len());
        for c in key.chars() {
            match self.index_of(c) {
                Some(i) => indices.push(i),
                None => return Err(CrackError::SymbolNotInAlphabet(c)),
            }
        }
        self.validate_key(&indices)?;
        Ok(indices)
    }

    /// Checks that `key` is a permutation of `[0, len)`.
    pub fn validate_key(&self, key: &[u8]) -> CrackResult<()> {
        if key.len() != self.len() {
            return Err(CrackError::InvalidKey(format!(
                "Key length {} does not match alphabet length {}",
                key.len(),
                self.len()
            )));
        }
        let mut seen = vec![false; self.len()];
        for &v in key {
            let slot = seen
                .get_mut(v as usize)
                .ok_or_else(|| CrackError::InvalidKey(format!("Index {} out of range", v)))?;
            if *slot {
                return Err(CrackError::InvalidKey(format!(
                    "Symbol '{}' appears more than once",
                    self.symbol_at(v)
                )));
            }
            *slot = true;
        }
        Ok(())
    }

    /// A fresh random permutation key, rendered as text.
    pub fn random_key(&self, rng: &mut fastrand::Rng) -> String {
        let mut indices: Vec<u8> = (0..self.len()).map(|v| v as u8).collect();
        rng.shuffle(&mut indices);
        self.render(&indices)
    }
}
