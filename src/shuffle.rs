//! Key-order generators feeding the experiments.
//!
//! Every generator takes its random source explicitly, so a seeded
//! [`StdRng`](rand::rngs::StdRng) reproduces a run exactly.

use std::fmt;

use rand::Rng;

/// The keys `1..=n` in increasing order.
pub fn sequence(n: usize) -> Vec<i32> {
    (1..=n as i32).collect()
}

/// How the input keys are ordered before insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShuffleMethod {
    /// Keep the sorted order; builds a degenerate tree.
    NoShuffle,
    /// Backward Fisher-Yates.
    FisherYates,
    /// Forward Fisher-Yates, swapping `a[i]` with a random `a[i..]`.
    RandomizeInPlace,
    /// Sort by random priorities drawn from `1..=n³`.
    PermuteBySorting,
}

impl ShuffleMethod {
    pub const ALL: [ShuffleMethod; 4] = [
        ShuffleMethod::NoShuffle,
        ShuffleMethod::FisherYates,
        ShuffleMethod::RandomizeInPlace,
        ShuffleMethod::PermuteBySorting,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShuffleMethod::NoShuffle => "NoShuffle",
            ShuffleMethod::FisherYates => "FisherYates",
            ShuffleMethod::RandomizeInPlace => "RandomizeInPlace",
            ShuffleMethod::PermuteBySorting => "PermuteBySorting",
        }
    }

    pub fn is_random(self) -> bool {
        self != ShuffleMethod::NoShuffle
    }

    pub fn apply<T, R: Rng + ?Sized>(self, items: &mut [T], rng: &mut R) {
        match self {
            ShuffleMethod::NoShuffle => {}
            ShuffleMethod::FisherYates => fisher_yates(items, rng),
            ShuffleMethod::RandomizeInPlace => randomize_in_place(items, rng),
            ShuffleMethod::PermuteBySorting => permute_by_sorting(items, rng),
        }
    }
}

impl fmt::Display for ShuffleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

pub fn randomize_in_place<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    let n = items.len();
    for i in 0..n {
        let j = rng.gen_range(i..n);
        items.swap(i, j);
    }
}

pub fn permute_by_sorting<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    let n = items.len() as u64;
    if n < 2 {
        return;
    }
    // n³ keeps the chance of two equal priorities small
    let max_priority = n.saturating_mul(n).saturating_mul(n);
    let mut priorities: Vec<(u64, usize)> = (0..items.len())
        .map(|index| (rng.gen_range(1..=max_priority), index))
        .collect();
    priorities.sort_by_key(|&(priority, _)| priority);

    // apply the permutation in place by following cycles
    let mut target: Vec<usize> = vec![0; items.len()];
    for (position, &(_, index)) in priorities.iter().enumerate() {
        target[position] = index;
    }
    let mut placed = vec![false; items.len()];
    for start in 0..items.len() {
        if placed[start] {
            continue;
        }
        let mut position = start;
        loop {
            placed[position] = true;
            let source = target[position];
            if source == start {
                break;
            }
            items.swap(position, source);
            position = source;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn sorted(mut keys: Vec<i32>) -> Vec<i32> {
        keys.sort_unstable();
        keys
    }

    #[test]
    fn sequence_counts_from_one() {
        assert_eq!(sequence(5), vec![1, 2, 3, 4, 5]);
        assert!(sequence(0).is_empty());
    }

    #[test]
    fn every_method_permutes() {
        let mut rng = StdRng::seed_from_u64(7);
        for method in ShuffleMethod::ALL {
            for n in [0, 1, 2, 3, 10, 257] {
                let mut keys = sequence(n);
                method.apply(&mut keys, &mut rng);
                assert_eq!(sorted(keys), sequence(n), "{} with n = {}", method, n);
            }
        }
    }

    #[test]
    fn no_shuffle_is_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut keys = sequence(100);
        ShuffleMethod::NoShuffle.apply(&mut keys, &mut rng);
        assert_eq!(keys, sequence(100));
    }

    #[test]
    fn random_methods_move_keys() {
        for method in ShuffleMethod::ALL.into_iter().filter(|m| m.is_random()) {
            let mut rng = StdRng::seed_from_u64(42);
            let mut keys = sequence(1000);
            method.apply(&mut keys, &mut rng);
            assert_ne!(keys, sequence(1000), "{} left 1000 keys sorted", method);
        }
    }

    #[test]
    fn seeded_runs_repeat() {
        for method in ShuffleMethod::ALL {
            let mut a = sequence(64);
            let mut b = sequence(64);
            method.apply(&mut a, &mut StdRng::seed_from_u64(99));
            method.apply(&mut b, &mut StdRng::seed_from_u64(99));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn permute_by_sorting_follows_priorities() {
        // the element with the smallest priority must end up first
        let mut rng = StdRng::seed_from_u64(3);
        let mut probe = StdRng::seed_from_u64(3);
        let n = 8u64;
        let priorities: Vec<u64> = (0..n).map(|_| probe.gen_range(1..=n * n * n)).collect();
        let mut expected: Vec<(u64, i32)> = priorities.iter().copied().zip(1..).collect();
        expected.sort_by_key(|&(p, _)| p);

        let mut keys = sequence(n as usize);
        permute_by_sorting(&mut keys, &mut rng);
        assert_eq!(keys, expected.into_iter().map(|(_, k)| k).collect::<Vec<_>>());
    }
}
