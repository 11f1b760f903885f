// Seeded shuffling, sampling and stratified train/test splitting.
//
// Everything here is driven by an explicit seed so that the same input files
// and seed always produce the same row order and the same split.

use std::collections::BTreeMap;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::SeedableRng;

use super::models::Label;

/// Seed used for the dataset shuffle, CI sampling and the split.
pub const DEFAULT_SEED: u64 = 42;

/// Shuffle `items` in place with a seeded RNG.
pub fn shuffle<T>(items: &mut [T], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);
}

/// Draw `n` items without replacement. Returns every item (in seeded random
/// order) when `n` is at least the number of items.
pub fn sample<T>(items: Vec<T>, n: usize, seed: u64) -> Vec<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    let amount = n.min(items.len());
    let picked = index::sample(&mut rng, items.len(), amount);
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    picked.iter().filter_map(|i| slots[i].take()).collect()
}

/// Row indices of the two partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split row indices into train and test partitions, preserving the class
/// balance of `labels` in both.
///
/// The test partition gets `ceil(test_size * n)` rows, allocated across
/// classes in proportion to their size (largest remainder first). Every
/// class must have at least two rows, and every class ends up with at least
/// one row in each partition.
pub fn stratified_split(labels: &[Label], test_size: f64, seed: u64) -> Result<Split> {
    if !(test_size > 0.0 && test_size < 1.0) {
        anyhow::bail!("test_size must be strictly between 0 and 1, got {test_size}");
    }

    let mut by_class: BTreeMap<Label, Vec<usize>> = BTreeMap::new();
    for (i, label) in labels.iter().enumerate() {
        by_class.entry(*label).or_default().push(i);
    }

    for label in Label::ALL {
        let count = by_class.get(&label).map_or(0, Vec::len);
        if count < 2 {
            anyhow::bail!(
                "Class {label} has {count} example(s); stratified splitting needs at least 2 per class"
            );
        }
    }

    let n = labels.len();
    // The epsilon keeps float noise (0.2 * n landing a hair above an integer)
    // from adding a row.
    let n_test = (test_size * n as f64 - 1e-9).ceil() as usize;
    let n_train = n - n_test;
    if n_test < by_class.len() || n_train < by_class.len() {
        anyhow::bail!(
            "A {n}-row dataset cannot be split into {n_train} train / {n_test} test rows with every class represented"
        );
    }

    // Proportional allocation: floor first, then hand out the remainder to the
    // classes with the largest fractional share (bigger class wins ties).
    let mut allocation: BTreeMap<Label, usize> = BTreeMap::new();
    let mut remainders: Vec<(Label, f64, usize)> = Vec::new();
    for (label, rows) in &by_class {
        let exact = n_test as f64 * rows.len() as f64 / n as f64;
        allocation.insert(*label, exact.floor() as usize);
        remainders.push((*label, exact - exact.floor(), rows.len()));
    }
    let allocated: usize = allocation.values().sum();
    remainders.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.2.cmp(&a.2))
            .then_with(|| a.0.cmp(&b.0))
    });
    for (label, _, _) in remainders.iter().take(n_test - allocated) {
        if let Some(slot) = allocation.get_mut(label) {
            *slot += 1;
        }
    }

    // A small class can round down to zero test rows. Give it one, taken from
    // the class with the largest test allocation.
    for label in Label::ALL {
        if allocation.get(&label).copied().unwrap_or(0) > 0 {
            continue;
        }
        let donor = allocation
            .iter()
            .filter(|(_, take)| **take > 1)
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(l, _)| *l);
        let Some(donor) = donor else {
            anyhow::bail!("test_size {test_size} leaves class {label} with no test examples");
        };
        if let Some(slot) = allocation.get_mut(&donor) {
            *slot -= 1;
        }
        allocation.insert(label, 1);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);

    for (label, mut rows) in by_class {
        let take = allocation.get(&label).copied().unwrap_or(0);
        if take >= rows.len() {
            anyhow::bail!(
                "test_size {test_size} would leave class {label} with no training examples"
            );
        }
        rows.shuffle(&mut rng);
        test.extend_from_slice(&rows[..take]);
        train.extend_from_slice(&rows[take..]);
    }

    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    Ok(Split { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(fake: usize, real: usize) -> Vec<Label> {
        let mut v = vec![Label::Fake; fake];
        v.extend(vec![Label::Real; real]);
        v
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let mut a: Vec<u32> = (0..50).collect();
        let mut b = a.clone();
        shuffle(&mut a, 42);
        shuffle(&mut b, 42);
        assert_eq!(a, b);
        assert_ne!(a, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_sample_without_replacement() {
        let items: Vec<u32> = (0..100).collect();
        let picked = sample(items.clone(), 10, 42);
        assert_eq!(picked.len(), 10);
        let mut dedup = picked.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), 10);
        assert_eq!(picked, sample(items, 10, 42));
    }

    #[test]
    fn test_sample_larger_than_population_keeps_all() {
        let picked = sample(vec![1, 2, 3], 10, 42);
        let mut sorted = picked.clone();
        sorted.sort();
        assert_eq!(sorted, vec![1, 2, 3]);
    }

    #[test]
    fn test_split_sizes_and_balance() {
        let labels = labels(60, 40);
        let split = stratified_split(&labels, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 20);
        assert_eq!(split.train.len(), 80);

        let test_fake = split.test.iter().filter(|&&i| labels[i] == Label::Fake).count();
        assert_eq!(test_fake, 12);
    }

    #[test]
    fn test_split_partitions_every_row_once() {
        let labels = labels(13, 8);
        let split = stratified_split(&labels, 0.2, 7).unwrap();
        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort();
        assert_eq!(all, (0..21).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_deterministic() {
        let labels = labels(30, 25);
        assert_eq!(
            stratified_split(&labels, 0.2, 42).unwrap(),
            stratified_split(&labels, 0.2, 42).unwrap()
        );
    }

    #[test]
    fn test_split_keeps_small_class_in_both_partitions() {
        let labels = labels(100, 2);
        let split = stratified_split(&labels, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 21);
        assert_eq!(split.train.len(), 81);

        for class in Label::ALL {
            let in_test = split.test.iter().filter(|&&i| labels[i] == class).count();
            let in_train = split.train.iter().filter(|&&i| labels[i] == class).count();
            assert!(in_test >= 1, "{class} missing from test");
            assert!(in_train >= 1, "{class} missing from train");
        }
    }

    #[test]
    fn test_split_requires_two_per_class() {
        assert!(stratified_split(&labels(10, 1), 0.2, 42).is_err());
        assert!(stratified_split(&labels(10, 0), 0.2, 42).is_err());
    }

    #[test]
    fn test_split_rejects_bad_test_size() {
        assert!(stratified_split(&labels(10, 10), 0.0, 42).is_err());
        assert!(stratified_split(&labels(10, 10), 1.0, 42).is_err());
    }
}
