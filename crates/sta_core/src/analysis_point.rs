//! Analysis points: the corner × min/max fan-out that every timing value is
//! indexed by.

use crate::min_max::MinMax;
use serde::{Deserialize, Serialize};

/// A process/voltage/temperature condition under which delays are computed.
///
/// Corners are assigned a dense index by the enclosing analysis session;
/// the core itself treats a corner as an opaque index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Corner(u32);

impl Corner {
    /// Creates a corner from a raw, dense `u32` index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this corner.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// `(corner, min_max)` — the analysis point that parameterises arrival,
/// required, and slack values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct PathAnalysisPt {
    /// The corner this analysis point belongs to.
    pub corner: Corner,
    /// Whether this point tracks the early or late condition.
    pub min_max: MinMax,
}

impl PathAnalysisPt {
    /// Creates a new analysis point.
    pub fn new(corner: Corner, min_max: MinMax) -> Self {
        Self { corner, min_max }
    }

    /// Whether this point tracks the early or late condition. Alias kept
    /// for parity with the delay-calc framework's `pathMinMax()` accessor.
    pub fn path_min_max(self) -> MinMax {
        self.min_max
    }

    /// A dense index suitable for indexing flat per-analysis-point arrays,
    /// assuming a fixed number of min/max values per corner.
    pub fn index(self) -> usize {
        self.corner.as_raw() as usize * MinMax::INDEX_COUNT + self.min_max.index()
    }
}

/// The delay-calculation counterpart of a [`PathAnalysisPt`].
///
/// Distinct from `PathAnalysisPt` so that a delay-calculation pass (which
/// may fan out per-corner differently from the path-propagation pass that
/// consumes its results) can be keyed independently, even though in the
/// common case the two simply wrap the same `(corner, min_max)` pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DcalcAnalysisPt {
    /// The underlying analysis point.
    pub path_ap: PathAnalysisPt,
}

impl DcalcAnalysisPt {
    /// Creates a delay-calc analysis point wrapping a path analysis point.
    pub fn new(path_ap: PathAnalysisPt) -> Self {
        Self { path_ap }
    }

    /// The corner this analysis point belongs to.
    pub fn corner(self) -> Corner {
        self.path_ap.corner
    }

    /// Whether this point tracks the early or late condition.
    pub fn min_max(self) -> MinMax {
        self.path_ap.min_max
    }

    /// A dense index suitable for indexing flat per-analysis-point arrays.
    pub fn index(self) -> usize {
        self.path_ap.index()
    }
}

impl From<PathAnalysisPt> for DcalcAnalysisPt {
    fn from(path_ap: PathAnalysisPt) -> Self {
        DcalcAnalysisPt::new(path_ap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_ap_index_distinct() {
        let c0 = Corner::from_raw(0);
        let c1 = Corner::from_raw(1);
        let a = PathAnalysisPt::new(c0, MinMax::Min);
        let b = PathAnalysisPt::new(c0, MinMax::Max);
        let c = PathAnalysisPt::new(c1, MinMax::Min);
        assert_ne!(a.index(), b.index());
        assert_ne!(a.index(), c.index());
    }

    #[test]
    fn dcalc_ap_wraps_path_ap() {
        let pap = PathAnalysisPt::new(Corner::from_raw(2), MinMax::Max);
        let dap: DcalcAnalysisPt = pap.into();
        assert_eq!(dap.corner(), pap.corner);
        assert_eq!(dap.min_max(), pap.min_max);
        assert_eq!(dap.index(), pap.index());
    }

    #[test]
    fn path_min_max_alias() {
        let pap = PathAnalysisPt::new(Corner::from_raw(0), MinMax::Min);
        assert_eq!(pap.path_min_max(), MinMax::Min);
    }
}
