//! Min/max analysis mode used throughout path and analysis-point indexing.

use serde::{Deserialize, Serialize};

/// Selects whether a value is tracked for the early (min) or late (max)
/// analysis condition. Arrivals are tracked at `Max` for setup analysis and
/// at `Min` for hold analysis (and vice versa for requireds).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum MinMax {
    /// Early (hold-side) condition.
    Min,
    /// Late (setup-side) condition.
    Max,
}

impl MinMax {
    /// The number of min/max values (always 2).
    pub const INDEX_COUNT: usize = 2;

    /// Both values, in index order.
    pub const ALL: [MinMax; 2] = [MinMax::Min, MinMax::Max];

    /// The 0/1 index of this value, used for array indexing.
    pub fn index(self) -> usize {
        match self {
            MinMax::Min => 0,
            MinMax::Max => 1,
        }
    }

    /// The opposite mode: requireds propagate under the mode opposite their
    /// arrivals.
    pub fn opposite(self) -> MinMax {
        match self {
            MinMax::Min => MinMax::Max,
            MinMax::Max => MinMax::Min,
        }
    }

    /// Picks the "better" (i.e. winning-candidate) of two values for this
    /// analysis mode: the smaller value under `Min`, the larger under `Max`.
    pub fn better(self, a: f64, b: f64) -> f64 {
        match self {
            MinMax::Min => a.min(b),
            MinMax::Max => a.max(b),
        }
    }

    /// `true` if `a` improves on (is strictly better than) `b` under this mode.
    pub fn improves(self, a: f64, b: f64) -> bool {
        match self {
            MinMax::Min => a < b,
            MinMax::Max => a > b,
        }
    }

    /// The sentinel "nothing has propagated yet" initial value for an arrival
    /// tracked under this mode: `+inf` for max, `-inf` for min.
    pub fn init_arrival(self) -> f64 {
        match self {
            MinMax::Min => f64::NEG_INFINITY,
            MinMax::Max => f64::INFINITY,
        }
    }

    /// The sentinel initial value for a required time tracked under this
    /// mode: the opposite sentinel from `init_arrival`.
    pub fn init_required(self) -> f64 {
        self.opposite().init_arrival()
    }
}
