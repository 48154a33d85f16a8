use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::{Arc, Mutex, PoisonError};

/// Source of randomness for picking the configs served to a subscriber.
pub trait Shuffler: Send + Sync {
    fn shuffle(&self, keys: &mut [String]);
}

/// Shuffles with the thread-local generator. Used unless a seed is configured.
pub struct ThreadRngShuffler;

impl Shuffler for ThreadRngShuffler {
    fn shuffle(&self, keys: &mut [String]) {
        keys.shuffle(&mut rand::thread_rng());
    }
}

/// Shuffles with a seeded generator so that the sequence of selections is
/// reproducible.
pub struct SeededShuffler {
    rng: Mutex<StdRng>,
}

impl SeededShuffler {
    pub fn new(seed: u64) -> Self {
        SeededShuffler {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Shuffler for SeededShuffler {
    fn shuffle(&self, keys: &mut [String]) {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        keys.shuffle(&mut *rng);
    }
}

pub fn shuffler_for_seed(seed: Option<u64>) -> Arc<dyn Shuffler> {
    match seed {
        Some(seed) => Arc::new(SeededShuffler::new(seed)),
        None => Arc::new(ThreadRngShuffler),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("config_{i:02}")).collect()
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        for shuffler in [shuffler_for_seed(None), shuffler_for_seed(Some(7))] {
            let mut shuffled = keys(30);
            shuffler.shuffle(&mut shuffled);
            shuffled.sort();
            assert_eq!(shuffled, keys(30));
        }
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let a = SeededShuffler::new(42);
        let b = SeededShuffler::new(42);

        for _ in 0..3 {
            let mut left = keys(20);
            let mut right = keys(20);
            a.shuffle(&mut left);
            b.shuffle(&mut right);
            assert_eq!(left, right);
        }
    }

    #[test]
    fn test_shuffle_empty_and_single() {
        let shuffler = ThreadRngShuffler;
        let mut empty: Vec<String> = vec![];
        shuffler.shuffle(&mut empty);
        assert!(empty.is_empty());

        let mut single = keys(1);
        shuffler.shuffle(&mut single);
        assert_eq!(single, keys(1));
    }
}
