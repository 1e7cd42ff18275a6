pub mod crossover;
pub mod mutation;
pub mod progress;

pub use progress::{BreakSummary, ProgressSink, WriteSink};

use crate::alphabet::Alphabet;
use crate::cipher::{CipherMachine, ExternalSymbols};
use crate::error::{CrackError, CrackResult};
use crate::fitness::FitnessModel;
use crate::pool::{Scratch, ScratchPool};
use clap::Args;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Scratch depth of the decoded-text pool; must cover the number of
/// fitness evaluations rayon may run concurrently.
const TEXT_POOL_DEPTH: usize = 10;

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakParams {
    /// Individuals per generation (at least 2, crossover needs two parents).
    #[arg(long, default_value_t = 300)]
    pub population_size: usize,

    /// Hard cap on the number of generations.
    #[arg(long, default_value_t = 1000)]
    pub generations: usize,

    /// Probability that a child is mutated at all.
    #[arg(long, default_value_t = 0.35)]
    pub mutation_chance: f64,

    /// Upper bound on gene swaps per mutated child.
    #[arg(long, default_value_t = 5)]
    pub max_genes_to_mutate: usize,

    /// Stop as soon as the best fitness drops below this.
    #[arg(long, default_value_t = 0.0)]
    pub threshold_fitness: f64,

    /// Seed for the control-thread RNG; omit for entropy seeding.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for BreakParams {
    fn default() -> Self {
        Self {
            population_size: 300,
            generations: 1000,
            mutation_chance: 0.35,
            max_genes_to_mutate: 5,
            threshold_fitness: 0.0,
            seed: None,
        }
    }
}

impl BreakParams {
    pub fn validate(&self, alphabet_len: usize) -> CrackResult<()> {
        if self.population_size < 2 {
            return Err(CrackError::InvalidParameter(
                "population_size must be at least 2".into(),
            ));
        }
        if self.generations == 0 {
            return Err(CrackError::InvalidParameter(
                "generations must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_chance) {
            return Err(CrackError::InvalidParameter(
                "mutation_chance must lie in [0, 1]".into(),
            ));
        }
        if self.max_genes_to_mutate == 0 || self.max_genes_to_mutate > alphabet_len {
            return Err(CrackError::InvalidParameter(format!(
                "max_genes_to_mutate must lie in (0, {}]",
                alphabet_len
            )));
        }
        if !(self.threshold_fitness >= 0.0) {
            return Err(CrackError::InvalidParameter(
                "threshold_fitness must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Result of one breaking run.
#[derive(Debug, Clone)]
pub struct BreakOutcome {
    pub plaintext: String,
    pub best_key: Vec<u8>,
    pub best_key_text: String,
    pub best_fitness: f64,
    pub generations: usize,
    pub elapsed: Duration,
}

/// One candidate key and its fitness. The key buffer is rented from the
/// breaker's key pool and flows back on drop.
struct Individual {
    key: Scratch<u8>,
    fitness: f64,
}

/// Genetic-algorithm search for the substitution key of one ciphertext.
///
/// Owns the cleared ciphertext, its external-symbol map and the scratch
/// pools for the whole run. The ciphertext and fitness model are read-only
/// during the search and shared freely across the rayon evaluation tasks;
/// crossover and mutation stay on the control thread.
pub struct Breaker {
    machine: CipherMachine,
    model: Arc<dyn FitnessModel>,

    text: Vec<u8>,
    symbols: ExternalSymbols,
    text_len: usize,
    alphabet_len: usize,

    text_pool: ScratchPool<u8>,
    key_pool: ScratchPool<u8>,
    marks_pool: ScratchPool<bool>,
}

impl Breaker {
    pub fn new(alphabet: Alphabet, model: Arc<dyn FitnessModel>, ciphertext: &str) -> Self {
        let machine = CipherMachine::new(alphabet);
        let (text, symbols) = machine.clear_with_external(ciphertext);

        let text_len = text.len();
        let alphabet_len = machine.alphabet().len();

        Self {
            machine,
            model,
            text,
            symbols,
            text_len,
            alphabet_len,
            text_pool: ScratchPool::new(text_len, TEXT_POOL_DEPTH),
            key_pool: ScratchPool::new(alphabet_len, 1),
            marks_pool: ScratchPool::new(alphabet_len, 1),
        }
    }

    /// Runs the search and returns the repaired best-key plaintext.
    ///
    /// Stops when the best fitness drops below `threshold_fitness` or after
    /// `generations` rounds, whichever comes first. Progress is emitted per
    /// round; the reported best fitness never regresses.
    pub fn break_cipher(
        &self,
        params: &BreakParams,
        sink: Option<&dyn ProgressSink>,
    ) -> CrackResult<BreakOutcome> {
        params.validate(self.alphabet_len)?;

        let start = Instant::now();

        // Already-plaintext fast path: no search, no pool traffic.
        let raw_fitness = self.model.score(&self.text);
        if raw_fitness < params.threshold_fitness {
            let identity: Vec<u8> = (0..self.alphabet_len).map(|v| v as u8).collect();
            return Ok(BreakOutcome {
                plaintext: self.machine.repair(&self.text, &self.symbols),
                best_key_text: self.machine.alphabet().render(&identity),
                best_key: identity,
                best_fitness: raw_fitness,
                generations: 0,
                elapsed: start.elapsed(),
            });
        }

        let mut rng = match params.seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };

        // Triangular rank weights: rank r drawn with weight (pop - r).
        let weights = rank_weights(params.population_size);

        let mut generation = self.first_generation(params.population_size, &mut rng);
        let mut extended: Vec<Individual> = (0..2 * params.population_size)
            .map(|_| Individual {
                key: self.key_pool.rent(),
                fitness: f64::INFINITY,
            })
            .collect();

        let mut best_key = generation[0].key.to_vec();
        let mut best_fitness = generation[0].fitness;
        let mut rounds = 0;

        while best_fitness > params.threshold_fitness && rounds < params.generations {
            rounds += 1;

            self.crossover_generation(&generation, &mut extended, &weights, &mut rng);

            for child in extended.iter_mut() {
                mutation::mutate(
                    &mut child.key,
                    params.mutation_chance,
                    params.max_genes_to_mutate,
                    &mut rng,
                );
            }

            // Data-parallel scoring; the sort below is the barrier.
            self.evaluate(&mut extended);
            extended.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));

            // Truncation elitism: best half of the children replaces the
            // whole generation.
            for (dst, src) in generation.iter_mut().zip(extended.iter()) {
                dst.key.copy_from_slice(&src.key);
                dst.fitness = src.fitness;
            }

            if generation[0].fitness < best_fitness {
                best_fitness = generation[0].fitness;
                best_key.copy_from_slice(&generation[0].key);
            }

            if let Some(sink) = sink {
                sink.on_generation(rounds, best_fitness);
            }
        }

        let elapsed = start.elapsed();
        let best_key_text = self.machine.alphabet().render(&best_key);

        if let Some(sink) = sink {
            sink.on_finish(&BreakSummary {
                generations: rounds,
                elapsed,
                best_fitness,
                best_key: best_key_text.clone(),
            });
        }

        let plaintext = self
            .machine
            .repair(&self.machine.decode(&self.text, &best_key), &self.symbols);

        // `generation` and `extended` drop here, returning every rented key
        // buffer to the pool.
        Ok(BreakOutcome {
            plaintext,
            best_key,
            best_key_text,
            best_fitness,
            generations: rounds,
            elapsed,
        })
    }

    fn first_generation(&self, population_size: usize, rng: &mut fastrand::Rng) -> Vec<Individual> {
        let mut seed_key: Vec<u8> = (0..self.alphabet_len).map(|v| v as u8).collect();

        let mut generation: Vec<Individual> = (0..population_size)
            .map(|_| {
                rng.shuffle(&mut seed_key);
                let mut ind = Individual {
                    key: self.key_pool.rent(),
                    fitness: f64::INFINITY,
                };
                ind.key.copy_from_slice(&seed_key);
                ind
            })
            .collect();

        self.evaluate(&mut generation);
        generation.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
        generation
    }

    /// Scores every individual in parallel. Each task rents its own decode
    /// and subkey scratch, so no synchronization beyond the pools is needed.
    fn evaluate(&self, individuals: &mut [Individual]) {
        individuals.par_iter_mut().for_each(|ind| {
            let mut decoded = self.text_pool.rent();
            let mut subkey = self.key_pool.rent();
            self.machine
                .decode_into(&mut decoded, &mut subkey, &self.text, &ind.key);
            ind.fitness = self.model.score(&decoded[..self.text_len]);
        });
    }

    fn crossover_generation(
        &self,
        generation: &[Individual],
        extended: &mut [Individual],
        weights: &[usize],
        rng: &mut fastrand::Rng,
    ) {
        let mut used = self.marks_pool.rent();
        let mut left: Vec<u8> = Vec::with_capacity(self.alphabet_len);

        for pair in extended.chunks_exact_mut(2) {
            let (first, second) = select_parents(generation.len(), weights, rng);

            let (better, worse) = if generation[first].fitness < generation[second].fitness {
                (&generation[first], &generation[second])
            } else {
                (&generation[second], &generation[first])
            };

            let (child_a, child_b) = pair.split_at_mut(1);
            crossover::crossover_pair(
                (&better.key[..], better.fitness),
                (&worse.key[..], worse.fitness),
                (&mut child_a[0].key[..], &mut child_b[0].key[..]),
                &mut used,
                &mut left,
                rng,
            );
            child_a[0].fitness = f64::INFINITY;
            child_b[0].fitness = f64::INFINITY;
        }
    }
}

fn rank_weights(population_size: usize) -> Vec<usize> {
    let mut weights = Vec::with_capacity(population_size * (population_size + 1) / 2);
    for rank in 0..population_size {
        for _ in rank..population_size {
            weights.push(rank);
        }
    }
    weights
}

/// Two distinct parent ranks, drawn by triangular weight; a collision with
/// the first draw is resampled.
fn select_parents(
    population_size: usize,
    weights: &[usize],
    rng: &mut fastrand::Rng,
) -> (usize, usize) {
    debug_assert!(population_size >= 2);
    let first = weights[rng.usize(0..weights.len())];
    let mut second = first;
    while second == first {
        second = weights[rng.usize(0..weights.len())];
    }
    (first, second)
}
