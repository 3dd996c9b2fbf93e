//! Disjoint key-space partitions for parallel writers.

use crate::error::GeneratorError;
use crate::generators::combined::{CombinedConfig, CombinedGenerator};

/// Configuration for [`ThreadDataGenerator`].
#[derive(Debug, Clone)]
pub struct ThreadDataConfig {
    pub prefix_length: usize,
    pub string_length: usize,
    pub row_count: u64,
    pub thread_count: usize,
}

/// Builds one [`CombinedGenerator`] per writer thread, with the
/// hexavigesimal counters partitioning `[0, row_count)` into contiguous
/// disjoint ranges, so parallel writers produce globally unique keys.
pub struct ThreadDataGenerator {
    generators: Vec<CombinedGenerator>,
}

impl ThreadDataGenerator {
    pub fn new(config: ThreadDataConfig) -> Result<Self, GeneratorError> {
        if config.row_count == 0 || config.thread_count == 0 {
            return Err(GeneratorError::InvalidPartition);
        }

        let rows_per_thread = config.row_count / config.thread_count as u64;
        let mut generators = Vec::with_capacity(config.thread_count);
        for thread in 0..config.thread_count as u64 {
            generators.push(CombinedGenerator::new(CombinedConfig {
                minimum: thread * rows_per_thread,
                maximum: (thread + 1) * rows_per_thread - 1,
                prefix_length: config.prefix_length,
                string_length: config.string_length,
                key_range: None,
                seed: None,
            })?);
        }

        Ok(Self { generators })
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Hand the per-thread generators to their workers.
    pub fn into_generators(self) -> Vec<CombinedGenerator> {
        self.generators
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Generator;
    use bench_core::Value;

    #[test]
    fn partitions_are_disjoint_and_wrap_within_their_range() {
        let partitioned = ThreadDataGenerator::new(ThreadDataConfig {
            prefix_length: 8,
            string_length: 64,
            row_count: 10,
            thread_count: 2,
        })
        .unwrap();
        let mut generators = partitioned.into_generators();
        assert_eq!(generators.len(), 2);

        let prefixes = |gen: &mut CombinedGenerator, n: usize| -> Vec<String> {
            (0..n)
                .map(|_| match gen.next_value() {
                    Value::String(s) => s[..8].to_string(),
                    other => panic!("unexpected value {other:?}"),
                })
                .collect()
        };

        // Thread 0 walks AAAAAAAA..AAAAAAAE, then wraps.
        let first = prefixes(&mut generators[0], 6);
        assert_eq!(
            first,
            vec!["AAAAAAAA", "AAAAAAAB", "AAAAAAAC", "AAAAAAAD", "AAAAAAAE", "AAAAAAAA"]
        );

        // Thread 1 walks AAAAAAAF..AAAAAAAJ, then wraps.
        let second = prefixes(&mut generators[1], 6);
        assert_eq!(
            second,
            vec!["AAAAAAAF", "AAAAAAAG", "AAAAAAAH", "AAAAAAAI", "AAAAAAAJ", "AAAAAAAF"]
        );

        let overlap = first.iter().any(|p| second.contains(p));
        assert!(!overlap, "partitions must not overlap");
    }

    #[test]
    fn zero_counts_are_rejected() {
        assert!(ThreadDataGenerator::new(ThreadDataConfig {
            prefix_length: 8,
            string_length: 64,
            row_count: 0,
            thread_count: 2,
        })
        .is_err());
    }
}
