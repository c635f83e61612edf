//! "Fuzzy" floating point comparisons that allow some tolerance.
//!
//! Used throughout timing analysis to avoid spurious orderings from
//! floating-point round-off — two arrival times that differ by less than
//! the epsilon are considered equal rather than falsely ordered.

/// The relative tolerance applied by the fuzzy comparison functions.
///
/// Configurable since callers may want to tune how aggressively
/// near-equal timing values collapse. The default mirrors the 1e-6
/// relative tolerance used throughout the reference implementation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyEpsilon(pub f64);

impl Default for FuzzyEpsilon {
    fn default() -> Self {
        Self(1.0e-6)
    }
}

impl FuzzyEpsilon {
    /// Returns `true` if `v1` and `v2` are equal within this epsilon.
    pub fn equal(&self, v1: f64, v2: f64) -> bool {
        if v1 == v2 {
            true
        } else {
            let scale = v1.abs().max(v2.abs()).max(1.0);
            (v1 - v2).abs() <= self.0 * scale
        }
    }

    /// Returns `true` if `v` is zero within this epsilon.
    pub fn zero(&self, v: f64) -> bool {
        v.abs() <= self.0
    }

    /// Returns `true` if `v1` is less than `v2`, outside the fuzzy-equal band.
    pub fn less(&self, v1: f64, v2: f64) -> bool {
        !self.equal(v1, v2) && v1 < v2
    }

    /// Returns `true` if `v1` is less than or fuzzily equal to `v2`.
    pub fn less_equal(&self, v1: f64, v2: f64) -> bool {
        self.equal(v1, v2) || v1 < v2
    }

    /// Returns `true` if `v1` is greater than `v2`, outside the fuzzy-equal band.
    pub fn greater(&self, v1: f64, v2: f64) -> bool {
        !self.equal(v1, v2) && v1 > v2
    }

    /// Returns `true` if `v1` is greater than or fuzzily equal to `v2`.
    pub fn greater_equal(&self, v1: f64, v2: f64) -> bool {
        self.equal(v1, v2) || v1 > v2
    }
}

/// Returns `true` if `v` is `+inf` or `-inf`.
pub fn fuzzy_inf(v: f64) -> bool {
    v.is_infinite()
}

/// Fuzzy-equal using the default epsilon.
pub fn fuzzy_equal(v1: f64, v2: f64) -> bool {
    FuzzyEpsilon::default().equal(v1, v2)
}

/// Fuzzy-zero using the default epsilon.
pub fn fuzzy_zero(v: f64) -> bool {
    FuzzyEpsilon::default().zero(v)
}

/// Fuzzy-less using the default epsilon.
pub fn fuzzy_less(v1: f64, v2: f64) -> bool {
    FuzzyEpsilon::default().less(v1, v2)
}

/// Fuzzy-less-or-equal using the default epsilon.
pub fn fuzzy_less_equal(v1: f64, v2: f64) -> bool {
    FuzzyEpsilon::default().less_equal(v1, v2)
}

/// Fuzzy-greater using the default epsilon.
pub fn fuzzy_greater(v1: f64, v2: f64) -> bool {
    FuzzyEpsilon::default().greater(v1, v2)
}

/// Fuzzy-greater-or-equal using the default epsilon.
pub fn fuzzy_greater_equal(v1: f64, v2: f64) -> bool {
    FuzzyEpsilon::default().greater_equal(v1, v2)
}
