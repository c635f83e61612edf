//! Arnoldi reduced-order model: delay from the dominant pole of a
//! moment-matched reduction of the driver's RC network.

use super::{ArcDcalcArg, ArcDcalcResult, ArcDelayCalc, LoadPinIndexMap};
use crate::parasitics::{Parasitic, ReductionKind};

/// 50%-threshold delay of a single-pole exponential step response,
/// `ln(2) / |pole|`.
fn dominant_pole_delay(poles: &[f64]) -> f64 {
    poles
        .iter()
        .map(|p| std::f64::consts::LN_2 / p.abs().max(f64::EPSILON))
        .fold(0.0, f64::max)
}

/// The `arnoldi` delay calculator.
pub struct ArnoldiDelayCalc {
    intrinsic_delay: f64,
}

impl Default for ArnoldiDelayCalc {
    fn default() -> Self {
        Self { intrinsic_delay: 0.03 }
    }
}

impl ArnoldiDelayCalc {
    /// Creates a calculator with the default intrinsic delay.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArcDelayCalc for ArnoldiDelayCalc {
    fn name(&self) -> &'static str {
        "arnoldi"
    }

    fn reduction_kind(&self) -> Option<ReductionKind> {
        Some(ReductionKind::PoleResidue)
    }

    fn gate_delay(&self, arg: &ArcDcalcArg, load_pin_index_map: &LoadPinIndexMap) -> ArcDcalcResult {
        let (wire_delay, drvr_slew) = match arg.parasitic() {
            Some(Parasitic::PoleResidue { poles, .. }) => {
                let d = dominant_pole_delay(poles);
                (d, arg.in_slew() + d)
            }
            Some(other) => (0.0, arg.in_slew() + other.total_cap()),
            None => (0.0, arg.in_slew()),
        };
        let gate_delay = self.intrinsic_delay + 0.3 * arg.in_slew();

        let mut result = ArcDcalcResult::new(load_pin_index_map.len());
        result.set_gate_delay(gate_delay);
        result.set_drvr_slew(drvr_slew);
        for idx in 0..load_pin_index_map.len() {
            result.set_wire_delay(idx, wire_delay);
            result.set_load_slew(idx, drvr_slew);
        }
        result
    }

    fn check_delay(&self, from_slew: f64, to_slew: f64, related_out_cap: f64) -> f64 {
        self.intrinsic_delay + 0.1 * related_out_cap + 0.5 * (from_slew + to_slew)
    }
}
