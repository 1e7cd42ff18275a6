use fastrand::Rng;

/// Transposition mutation.
///
/// With probability `chance`, performs between 1 and `max_genes - 1` swaps
/// of two distinct key positions. Swaps preserve the permutation property
/// by construction.
pub fn mutate(key: &mut [u8], chance: f64, max_genes: usize, rng: &mut Rng) {
    if key.len() < 2 {
        return;
    }
    if rng.f64() > chance {
        return;
    }

    let swaps = if max_genes <= 2 {
        1
    } else {
        rng.usize(1..max_genes)
    };

    for _ in 0..swaps {
        let first = rng.usize(0..key.len());
        let mut second = first;
        while second == first {
            second = rng.usize(0..key.len());
        }
        key.swap(first, second);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permutation(key: &[u8]) -> bool {
        let mut seen = vec![false; key.len()];
        key.iter().all(|&v| !std::mem::replace(&mut seen[v as usize], true))
    }

    #[test]
    fn test_zero_chance_never_mutates() {
        let mut rng = Rng::with_seed(1);
        let original: Vec<u8> = (0..26).collect();
        let mut key = original.clone();
        for _ in 0..100 {
            mutate(&mut key, 0.0, 10, &mut rng);
        }
        assert_eq!(key, original);
    }

    #[test]
    fn test_full_chance_changes_key() {
        let mut rng = Rng::with_seed(2);
        let original: Vec<u8> = (0..26).collect();
        let mut key = original.clone();
        mutate(&mut key, 1.0, 10, &mut rng);
        assert_ne!(key, original);
    }

    #[test]
    fn test_permutation_preserved_across_rounds() {
        let mut rng = Rng::with_seed(3);
        let mut key: Vec<u8> = (0..26).collect();
        for _ in 0..500 {
            mutate(&mut key, 0.8, 26, &mut rng);
            assert!(is_permutation(&key));
        }
    }

    #[test]
    fn test_single_gene_budget_does_one_swap() {
        let mut rng = Rng::with_seed(4);
        let original: Vec<u8> = (0..10).collect();
        let mut key = original.clone();
        mutate(&mut key, 1.0, 1, &mut rng);
        let moved = key.iter().zip(&original).filter(|(a, b)| a != b).count();
        assert_eq!(moved, 2);
    }
}
