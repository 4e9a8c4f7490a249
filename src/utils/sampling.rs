use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Draw `amount` distinct elements uniformly at random, without replacement.
///
/// Runs a partial Fisher-Yates shuffle over indices: every subset of size
/// `min(amount, items.len())` is equally likely and so is every ordering of
/// it. The returned order is the draw order.
pub fn sample_without_replacement<'a, T, R>(items: &'a [T], amount: usize, rng: &mut R) -> Vec<&'a T>
where
    R: Rng + ?Sized,
{
    let amount = amount.min(items.len());
    let mut indices: Vec<usize> = (0..items.len()).collect();
    let (chosen, _) = indices.partial_shuffle(rng, amount);

    chosen.iter().map(|&index| &items[index]).collect()
}

/// Seeded generator for reproducible runs, OS entropy otherwise
pub fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_size_is_capped_by_input() {
        let items: Vec<u32> = (0..3).collect();
        let mut rng = create_rng(Some(7));

        assert_eq!(sample_without_replacement(&items, 10, &mut rng).len(), 3);
        assert_eq!(sample_without_replacement(&items, 2, &mut rng).len(), 2);
        assert!(sample_without_replacement(&items, 0, &mut rng).is_empty());
    }

    #[test]
    fn test_sample_of_empty_input() {
        let items: Vec<u32> = Vec::new();
        let mut rng = create_rng(Some(7));
        assert!(sample_without_replacement(&items, 5, &mut rng).is_empty());
    }

    #[test]
    fn test_sample_has_no_duplicates() {
        let items: Vec<u32> = (0..50).collect();
        let mut rng = create_rng(Some(42));

        for amount in [1, 10, 49, 50] {
            let sample = sample_without_replacement(&items, amount, &mut rng);
            let unique: HashSet<_> = sample.iter().collect();
            assert_eq!(unique.len(), amount);
        }
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let items: Vec<u32> = (0..100).collect();
        let first = sample_without_replacement(&items, 10, &mut create_rng(Some(3)));
        let second = sample_without_replacement(&items, 10, &mut create_rng(Some(3)));
        assert_eq!(first, second);
    }

    #[test]
    fn test_selection_is_roughly_uniform() {
        let items = [0usize, 1, 2, 3];
        let mut counts = [0usize; 4];
        let mut rng = create_rng(Some(1234));

        for _ in 0..6000 {
            for &item in sample_without_replacement(&items, 2, &mut rng) {
                counts[item] += 1;
            }
        }

        // Each item is expected in half of the draws
        for count in counts {
            assert!((2700..=3300).contains(&count), "count out of range: {count}");
        }
    }
}
