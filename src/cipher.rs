use crate::alphabet::{fold, Alphabet};
use crate::error::CrackResult;
use std::collections::BTreeMap;

/// Characters of a source string that are not alphabet members, keyed by
/// their original character position. Stored uppercased, matching how the
/// clearing step folds everything before lookup.
pub type ExternalSymbols = BTreeMap<usize, char>;

/// Deterministic encode/decode under a permutation key.
///
/// All text entering the machine is folded to uppercase; characters
/// outside the alphabet are either dropped ("clearing") or carried in an
/// [`ExternalSymbols`] map and reinserted at their original positions
/// ("ignoring").
#[derive(Debug, Clone)]
pub struct CipherMachine {
    alphabet: Alphabet,
}

impl CipherMachine {
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Folds `text` to uppercase and keeps only alphabet symbols, as indices.
    pub fn clear(&self, text: &str) -> Vec<u8> {
        text.chars()
            .filter_map(|c| self.alphabet.index_of(c))
            .collect()
    }

    /// Like [`clear`](Self::clear), but also records every dropped character
    /// (uppercased) under its original char position.
    pub fn clear_with_external(&self, text: &str) -> (Vec<u8>, ExternalSymbols) {
        let mut indices = Vec::with_capacity(text.len());
        let mut symbols = ExternalSymbols::new();

        for (pos, c) in text.chars().enumerate() {
            match self.alphabet.index_of(c) {
                Some(i) => indices.push(i),
                None => {
                    symbols.insert(pos, fold(c));
                }
            }
        }

        (indices, symbols)
    }

    /// Renders indices back to text and reinserts the external symbols at
    /// their original offsets. Ascending-position insertion into the growing
    /// buffer is equivalent to building over the original index space.
    pub fn repair(&self, indices: &[u8], symbols: &ExternalSymbols) -> String {
        let mut chars: Vec<char> = Vec::with_capacity(indices.len() + symbols.len());
        chars.extend(indices.iter().map(|&i| self.alphabet.symbol_at(i)));

        for (&pos, &c) in symbols {
            chars.insert(pos.min(chars.len()), c);
        }

        chars.into_iter().collect()
    }

    pub fn encode(&self, text: &[u8], key: &[u8]) -> Vec<u8> {
        let mut out = vec![0u8; text.len()];
        self.encode_into(&mut out, text, key);
        out
    }

    pub fn decode(&self, text: &[u8], key: &[u8]) -> Vec<u8> {
        let mut out = vec![0u8; text.len()];
        let mut subkey = vec![0u8; self.alphabet.len()];
        self.decode_into(&mut out, &mut subkey, text, key);
        out
    }

    /// Allocation-free encode: `out[i] = key[text[i]]`.
    ///
    /// `out` may be wider than `text` (pooled buffers are fixed-shape);
    /// only the first `text.len()` slots are written.
    pub fn encode_into(&self, out: &mut [u8], text: &[u8], key: &[u8]) {
        for (o, &t) in out.iter_mut().zip(text) {
            *o = key[t as usize];
        }
    }

    /// Allocation-free decode. The inverse permutation is built into the
    /// caller-supplied `subkey` scratch (`subkey[key[x]] = x`), then applied.
    pub fn decode_into(&self, out: &mut [u8], subkey: &mut [u8], text: &[u8], key: &[u8]) {
        for (x, &v) in key.iter().enumerate() {
            subkey[v as usize] = x as u8;
        }
        for (o, &t) in out.iter_mut().zip(text) {
            *o = subkey[t as usize];
        }
    }

    /// `clear` -> `encode` -> `repair`: substitutes alphabet symbols and
    /// carries everything else through at its original position.
    pub fn encode_with_ignoring(&self, text: &str, key: &str) -> CrackResult<String> {
        let key = self.alphabet.parse_key(key)?;
        let (indices, symbols) = self.clear_with_external(text);
        Ok(self.repair(&self.encode(&indices, &key), &symbols))
    }

    pub fn decode_with_ignoring(&self, text: &str, key: &str) -> CrackResult<String> {
        let key = self.alphabet.parse_key(key)?;
        let (indices, symbols) = self.clear_with_external(text);
        Ok(self.repair(&self.decode(&indices, &key), &symbols))
    }

    /// Like the ignoring variant, but foreign characters are dropped.
    pub fn encode_with_clearing(&self, text: &str, key: &str) -> CrackResult<String> {
        let key = self.alphabet.parse_key(key)?;
        Ok(self.alphabet.render(&self.encode(&self.clear(text), &key)))
    }

    pub fn decode_with_clearing(&self, text: &str, key: &str) -> CrackResult<String> {
        let key = self.alphabet.parse_key(key)?;
        Ok(self.alphabet.render(&self.decode(&self.clear(text), &key)))
    }
}
