//! Lumped-capacitance calculator: gate delay from a load- and slew-dependent
//! linear model, standing in for a library table lookup. Wire delay is
//! always zero — the load's parasitics are collapsed into the driver's
//! total capacitance rather than modelled as a tree.

use super::{ArcDcalcArg, ArcDcalcResult, ArcDelayCalc, LoadPinIndexMap};
use crate::parasitics::ReductionKind;

/// The `lumped_cap` delay calculator.
///
/// `intrinsic_delay` is the delay at zero load and zero input slew;
/// `cap_coefficient`/`slew_coefficient` scale the load capacitance and
/// input slew contributions. All three are non-negative so that gate delay
/// is monotonically non-decreasing in both load and slew.
pub struct LumpedCapDelayCalc {
    intrinsic_delay: f64,
    cap_coefficient: f64,
    slew_coefficient: f64,
}

impl Default for LumpedCapDelayCalc {
    fn default() -> Self {
        Self {
            intrinsic_delay: 0.05,
            cap_coefficient: 8.0,
            slew_coefficient: 0.3,
        }
    }
}

impl LumpedCapDelayCalc {
    /// Creates a calculator with the default coefficients.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a calculator with caller-chosen coefficients, e.g. fitted
    /// from a particular cell library's table data.
    pub fn with_coefficients(intrinsic_delay: f64, cap_coefficient: f64, slew_coefficient: f64) -> Self {
        Self {
            intrinsic_delay,
            cap_coefficient,
            slew_coefficient,
        }
    }

    fn load_cap(&self, arg: &ArcDcalcArg) -> f64 {
        arg.parasitic()
            .map(|p| p.total_cap())
            .unwrap_or_else(|| arg.load_cap())
    }
}

impl ArcDelayCalc for LumpedCapDelayCalc {
    fn name(&self) -> &'static str {
        "lumped_cap"
    }

    fn reduction_kind(&self) -> Option<ReductionKind> {
        Some(ReductionKind::LumpedCap)
    }

    fn gate_delay(&self, arg: &ArcDcalcArg, load_pin_index_map: &LoadPinIndexMap) -> ArcDcalcResult {
        let load_cap = self.load_cap(arg);
        let gate_delay =
            self.intrinsic_delay + self.cap_coefficient * load_cap + self.slew_coefficient * arg.in_slew();
        let drvr_slew = arg.in_slew() + self.cap_coefficient * load_cap;

        let mut result = ArcDcalcResult::new(load_pin_index_map.len());
        result.set_gate_delay(gate_delay);
        result.set_drvr_slew(drvr_slew);
        for idx in 0..load_pin_index_map.len() {
            result.set_wire_delay(idx, 0.0);
            result.set_load_slew(idx, drvr_slew);
        }
        result
    }

    fn check_delay(&self, from_slew: f64, to_slew: f64, related_out_cap: f64) -> f64 {
        self.intrinsic_delay + self.cap_coefficient * related_out_cap * 0.1 + 0.5 * (from_slew + to_slew)
    }
}
