//! Current-source cell model with an effective-capacitance driver: the
//! driver's output current waveform is taken as a fixed shape, scaled by
//! an effective capacitance, rather than the single delay/slew number the
//! lumped and DMP calculators use.

use super::{ArcDcalcArg, ArcDcalcResult, ArcDelayCalc, LoadPinIndexMap};
use crate::parasitics::{Parasitic, ReductionKind};

/// Current-source cells respond to capacitive load roughly as `sqrt(C)`
/// rather than linearly, since the driving current itself falls as the
/// output node charges.
fn current_source_delay(ceff: f64, in_slew: f64, intrinsic_delay: f64) -> f64 {
    intrinsic_delay + ceff.max(0.0).sqrt() * 4.0 + 0.2 * in_slew
}

/// The `ccs_ceff` delay calculator.
pub struct CcsCeffDelayCalc {
    intrinsic_delay: f64,
}

impl Default for CcsCeffDelayCalc {
    fn default() -> Self {
        Self { intrinsic_delay: 0.02 }
    }
}

impl CcsCeffDelayCalc {
    /// Creates a calculator with the default intrinsic delay.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArcDelayCalc for CcsCeffDelayCalc {
    fn name(&self) -> &'static str {
        "ccs_ceff"
    }

    fn reduction_kind(&self) -> Option<ReductionKind> {
        Some(ReductionKind::TwoPole)
    }

    fn gate_delay(&self, arg: &ArcDcalcArg, load_pin_index_map: &LoadPinIndexMap) -> ArcDcalcResult {
        let ceff = match arg.parasitic() {
            Some(Parasitic::PiModel { c_near, c_far, .. }) => c_near + c_far,
            Some(other) => other.total_cap(),
            None => arg.load_cap(),
        };
        let gate_delay = current_source_delay(ceff, arg.in_slew(), self.intrinsic_delay);
        let drvr_slew = arg.in_slew() + ceff.max(0.0).sqrt() * 4.0;
        let wire_delay = match arg.parasitic() {
            Some(Parasitic::PiModel { r, c_far, .. }) => r * c_far,
            _ => 0.0,
        };

        let mut result = ArcDcalcResult::new(load_pin_index_map.len());
        result.set_gate_delay(gate_delay);
        result.set_drvr_slew(drvr_slew);
        for idx in 0..load_pin_index_map.len() {
            result.set_wire_delay(idx, wire_delay);
            result.set_load_slew(idx, drvr_slew + wire_delay);
        }
        result
    }

    fn check_delay(&self, from_slew: f64, to_slew: f64, related_out_cap: f64) -> f64 {
        self.intrinsic_delay + related_out_cap.max(0.0).sqrt() * 2.0 + 0.5 * (from_slew + to_slew)
    }
}
