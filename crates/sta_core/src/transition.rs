//! Signal transition (rise/fall) indexing.

use serde::{Deserialize, Serialize};

/// A rise or fall signal transition, used to index per-transition slews,
/// arcs, and analysis values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum RiseFall {
    /// Rising edge, index 0.
    Rise,
    /// Falling edge, index 1.
    Fall,
}

impl RiseFall {
    /// The number of distinct transitions (always 2).
    pub const INDEX_COUNT: usize = 2;

    /// Both transitions, in index order.
    pub const ALL: [RiseFall; 2] = [RiseFall::Rise, RiseFall::Fall];

    /// The 0/1 index of this transition, used for array indexing.
    pub fn index(self) -> usize {
        match self {
            RiseFall::Rise => 0,
            RiseFall::Fall => 1,
        }
    }

    /// The opposite transition.
    pub fn opposite(self) -> RiseFall {
        match self {
            RiseFall::Rise => RiseFall::Fall,
            RiseFall::Fall => RiseFall::Rise,
        }
    }
}
