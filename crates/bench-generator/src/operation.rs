//! Read/write operation selection.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::selector::{SelectorError, WeightedRandom};

/// The two operation kinds a RUN phase issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

/// Build the weighted selector that decides READ vs WRITE per operation.
///
/// The weights are relative, not counts; a zero weight disables that side
/// entirely.
pub fn operation_selector(
    read_weight: u64,
    write_weight: u64,
) -> Result<WeightedRandom<Operation>, SelectorError> {
    WeightedRandom::new(
        StdRng::from_entropy(),
        vec![
            (Operation::Read, read_weight),
            (Operation::Write, write_weight),
        ],
    )
}
