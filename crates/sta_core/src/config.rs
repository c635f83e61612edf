//! Analysis configuration: the small set of knobs that change core
//! propagation/delay-calc behavior, as opposed to the constraints
//! ([`crate::constraints::TimingConstraints`]) that describe the design
//! being analyzed.

use serde::{Deserialize, Serialize};

/// Fanout-length extrapolation mode used when a net carries no detailed
/// parasitic, only applied at that fallback point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireloadMode {
    /// A single wireload model applied to the whole design.
    Top,
    /// A wireload model chosen per enclosing hierarchical instance.
    Enclosed,
    /// A wireload model chosen per path segment.
    Segmented,
}

/// Top-level configuration for one analysis run.
///
/// Mirrors the core's recognized-options table: delay-calc selection,
/// which corners/min-max to propagate, the wireload fallback, and the
/// fuzzy-comparison tolerance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Name of the registered delay calculator to use
    /// (see [`crate::dcalc::DelayCalcRegistry`]).
    pub delay_calc_name: String,
    /// Min/max modes to propagate for this run.
    pub min_max_set: Vec<crate::min_max::MinMax>,
    /// Fanout-length extrapolation mode, used only when no detailed
    /// parasitic is attached to a net.
    pub wireload_mode: WireloadMode,
    /// Tolerance for `fuzzy_equal`/`fuzzy_less` float comparisons.
    pub fuzzy_epsilon: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            delay_calc_name: "dmp_ceff_elmore".to_string(),
            min_max_set: vec![crate::min_max::MinMax::Min, crate::min_max::MinMax::Max],
            wireload_mode: WireloadMode::Enclosed,
            fuzzy_epsilon: 1e-6,
        }
    }
}

impl AnalysisConfig {
    /// Creates a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if `min_max` is one of the modes this run propagates.
    pub fn propagates(&self, min_max: crate::min_max::MinMax) -> bool {
        self.min_max_set.contains(&min_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::min_max::MinMax;

    #[test]
    fn default_propagates_both_modes() {
        let cfg = AnalysisConfig::default();
        assert!(cfg.propagates(MinMax::Min));
        assert!(cfg.propagates(MinMax::Max));
    }

    #[test]
    fn default_delay_calc_is_registered_builtin() {
        let cfg = AnalysisConfig::default();
        let registry = crate::dcalc::DelayCalcRegistry::with_builtins();
        assert!(registry.is_name(&cfg.delay_calc_name));
    }

    #[test]
    fn restricting_min_max_set_excludes_mode() {
        let mut cfg = AnalysisConfig::default();
        cfg.min_max_set = vec![MinMax::Max];
        assert!(!cfg.propagates(MinMax::Min));
        assert!(cfg.propagates(MinMax::Max));
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = AnalysisConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let restored: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.delay_calc_name, cfg.delay_calc_name);
        assert_eq!(restored.fuzzy_epsilon, cfg.fuzzy_epsilon);
    }
}
