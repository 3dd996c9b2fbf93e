//! Weighted-random choice.

use rand::rngs::StdRng;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("sum of choice weights exceeds the maximum")]
    WeightOverflow,

    #[error("zero choices with a positive weight")]
    NoValidChoices,
}

/// Selects among items with probability proportional to their weight.
///
/// Choices are sorted by weight and reduced to cumulative totals, so each
/// `select` is a draw plus a binary search. Zero-weight choices are
/// retained but can never be selected.
#[derive(Debug)]
pub struct WeightedRandom<T> {
    rng: StdRng,
    items: Vec<T>,
    totals: Vec<u64>,
    max: u64,
}

impl<T> WeightedRandom<T> {
    pub fn new(rng: StdRng, choices: Vec<(T, u64)>) -> Result<Self, SelectorError> {
        let mut choices = choices;
        choices.sort_by_key(|(_, weight)| *weight);

        let mut items = Vec::with_capacity(choices.len());
        let mut totals = Vec::with_capacity(choices.len());
        let mut running: u64 = 0;
        for (item, weight) in choices {
            if i64::MAX as u64 - running <= weight {
                return Err(SelectorError::WeightOverflow);
            }
            running += weight;
            items.push(item);
            totals.push(running);
        }

        if running < 1 {
            return Err(SelectorError::NoValidChoices);
        }

        Ok(Self {
            rng,
            items,
            totals,
            max: running,
        })
    }

    pub fn select(&mut self) -> &T {
        let draw = self.rng.gen_range(0..self.max) + 1;
        let idx = self.totals.partition_point(|&total| total < draw);
        &self.items[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    #[test]
    fn zero_weight_choices_are_never_selected() {
        let mut sel = WeightedRandom::new(
            rng(),
            vec![("a", 25), ("b", 25), ("c", 25), ("d", 25), ("never", 0)],
        )
        .unwrap();

        let mut counts: HashMap<&str, u32> = HashMap::new();
        for _ in 0..10_000 {
            *counts.entry(*sel.select()).or_default() += 1;
        }

        assert_eq!(counts.get("never"), None);
        // Each live choice should land within five percentage points of 25%.
        for name in ["a", "b", "c", "d"] {
            let share = f64::from(counts[name]) / 10_000.0;
            assert!(
                (0.20..=0.30).contains(&share),
                "{name} landed at {share}"
            );
        }
    }

    #[test]
    fn weight_overflow_is_rejected() {
        let err = WeightedRandom::new(rng(), vec![("a", u64::MAX / 2), ("b", u64::MAX / 2)])
            .unwrap_err();
        assert_eq!(err, SelectorError::WeightOverflow);
    }

    #[test]
    fn all_zero_weights_are_rejected() {
        let err = WeightedRandom::new(rng(), vec![("a", 0), ("b", 0)]).unwrap_err();
        assert_eq!(err, SelectorError::NoValidChoices);

        let err = WeightedRandom::<&str>::new(rng(), vec![]).unwrap_err();
        assert_eq!(err, SelectorError::NoValidChoices);
    }

    #[test]
    fn heavily_skewed_weights_respect_proportions() {
        let mut sel = WeightedRandom::new(rng(), vec![("rare", 1), ("common", 99)]).unwrap();
        let mut rare = 0u32;
        for _ in 0..10_000 {
            if *sel.select() == "rare" {
                rare += 1;
            }
        }
        assert!(rare < 500, "rare selected {rare} times");
        assert!(rare > 0, "rare never selected");
    }
}
