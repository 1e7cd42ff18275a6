use fastrand::Rng;

/// Fitness-biased conserving crossover.
///
/// Builds two children gene-by-gene from the same parent pair. At each
/// position the child inherits whichever parent gene is still unplaced;
/// when both are unplaced the better parent wins with probability
/// `worse / (better + worse)`, and when both are taken a uniformly random
/// still-unplaced value fills the slot. The result is always a permutation
/// when both parents are.
///
/// `used` and `left` are caller-provided scratch (alphabet-width marks and
/// the unplaced-value list); both are reset here before each child.
pub fn crossover_pair(
    better: (&[u8], f64),
    worse: (&[u8], f64),
    children: (&mut [u8], &mut [u8]),
    used: &mut [bool],
    left: &mut Vec<u8>,
    rng: &mut Rng,
) {
    let sum = better.1 + worse.1;
    let bias_toward_better = if sum > 0.0 { worse.1 / sum } else { 0.5 };

    fill_child(children.0, better.0, worse.0, bias_toward_better, used, left, rng);
    fill_child(children.1, better.0, worse.0, bias_toward_better, used, left, rng);
}

fn fill_child(
    child: &mut [u8],
    better: &[u8],
    worse: &[u8],
    bias_toward_better: f64,
    used: &mut [bool],
    left: &mut Vec<u8>,
    rng: &mut Rng,
) {
    let len = child.len();
    used[..len].fill(false);
    left.clear();
    left.extend((0..len).map(|v| v as u8));

    for i in 0..len {
        let b = better[i];
        let w = worse[i];

        let value = match (used[b as usize], used[w as usize]) {
            (true, false) => w,
            (false, true) => b,
            (false, false) => {
                if rng.f64() < bias_toward_better {
                    b
                } else {
                    w
                }
            }
            (true, true) => left[rng.usize(0..left.len())],
        };

        child[i] = value;
        used[value as usize] = true;
        let pos = left
            .iter()
            .position(|&x| x == value)
            .expect("chosen gene was still unplaced");
        left.swap_remove(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastrand::Rng;
    use proptest::prelude::*;

    fn run_pair(better: &[u8], worse: &[u8], seed: u64) -> (Vec<u8>, Vec<u8>) {
        let mut rng = Rng::with_seed(seed);
        let n = better.len();
        let mut c1 = vec![0u8; n];
        let mut c2 = vec![0u8; n];
        let mut used = vec![false; n];
        let mut left = Vec::new();

        crossover_pair(
            (better, 100.0),
            (worse, 300.0),
            (&mut c1, &mut c2),
            &mut used,
            &mut left,
            &mut rng,
        );
        (c1, c2)
    }

    fn is_permutation(key: &[u8]) -> bool {
        let mut seen = vec![false; key.len()];
        key.iter().all(|&v| {
            let slot = &mut seen[v as usize];
            !std::mem::replace(slot, true)
        })
    }

    #[test]
    fn test_children_are_permutations() {
        let p1 = vec![0, 1, 2, 3, 4];
        let p2 = vec![4, 3, 2, 1, 0];
        let (c1, c2) = run_pair(&p1, &p2, 42);
        assert!(is_permutation(&c1));
        assert!(is_permutation(&c2));
    }

    #[test]
    fn test_identical_parents_clone_through() {
        let p = vec![3, 0, 4, 1, 2];
        let (c1, c2) = run_pair(&p, &p, 7);
        assert_eq!(c1, p);
        assert_eq!(c2, p);
    }

    #[test]
    fn test_strong_bias_favors_better_parent() {
        // Worse parent is catastrophically unfit, so nearly every gene
        // should come from the better one.
        let better = vec![0, 1, 2, 3, 4, 5, 6, 7];
        let worse = vec![7, 6, 5, 4, 3, 2, 1, 0];
        let mut from_better = 0;
        for seed in 0..50u64 {
            let mut rng = Rng::with_seed(seed);
            let mut c1 = vec![0u8; 8];
            let mut c2 = vec![0u8; 8];
            let mut used = vec![false; 8];
            let mut left = Vec::new();
            crossover_pair(
                (&better, 1.0),
                (&worse, 10_000.0),
                (&mut c1, &mut c2),
                &mut used,
                &mut left,
                &mut rng,
            );
            from_better += c1.iter().zip(&better).filter(|(a, b)| a == b).count();
        }
        // 50 children x 8 genes; expect the overwhelming majority inherited.
        assert!(from_better > 350, "only {} genes from better parent", from_better);
    }

    proptest! {
        #[test]
        fn prop_permutation_invariant(seed in any::<u64>(), len in 2usize..40) {
            let mut rng = Rng::with_seed(seed);
            let mut p1: Vec<u8> = (0..len as u8).collect();
            let mut p2 = p1.clone();
            rng.shuffle(&mut p1);
            rng.shuffle(&mut p2);

            let (c1, c2) = run_pair(&p1, &p2, seed ^ 0xDEAD);
            prop_assert!(is_permutation(&c1));
            prop_assert!(is_permutation(&c2));
        }
    }
}
