//! Passive reduced-order macromodelling (PRIMA): sum-of-exponentials delay
//! from a multi-pole moment-matched reduction, preserving passivity so the
//! step response never overshoots.

use super::{ArcDcalcArg, ArcDcalcResult, ArcDelayCalc, LoadPinIndexMap};
use crate::parasitics::{Parasitic, ReductionKind};

/// 50%-threshold delay of a sum-of-exponentials step response: the
/// residue-weighted sum of each pole's time constant.
fn multi_pole_delay(poles: &[f64], residues: &[f64]) -> f64 {
    let total: f64 = residues.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    poles
        .iter()
        .zip(residues)
        .map(|(pole, residue)| (residue / total) * std::f64::consts::LN_2 / pole.abs().max(f64::EPSILON))
        .sum()
}

/// The `prima` delay calculator.
pub struct PrimaDelayCalc {
    intrinsic_delay: f64,
}

impl Default for PrimaDelayCalc {
    fn default() -> Self {
        Self { intrinsic_delay: 0.03 }
    }
}

impl PrimaDelayCalc {
    /// Creates a calculator with the default intrinsic delay.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArcDelayCalc for PrimaDelayCalc {
    fn name(&self) -> &'static str {
        "prima"
    }

    fn reduction_kind(&self) -> Option<ReductionKind> {
        Some(ReductionKind::PoleResidue)
    }

    fn gate_delay(&self, arg: &ArcDcalcArg, load_pin_index_map: &LoadPinIndexMap) -> ArcDcalcResult {
        let wire_delay = match arg.parasitic() {
            Some(Parasitic::PoleResidue { poles, residues }) => multi_pole_delay(poles, residues),
            Some(other) => other.total_cap(),
            None => 0.0,
        };
        let gate_delay = self.intrinsic_delay + 0.3 * arg.in_slew();
        let drvr_slew = arg.in_slew() + wire_delay;

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{EdgeId, VertexId};
    use std::collections::HashMap;

    #[test]
    fn multi_pole_delay_zero_residue_is_zero() {
        assert_eq!(multi_pole_delay(&[-1.0, -2.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn multi_pole_delay_positive_for_positive_residues() {
        assert!(multi_pole_delay(&[-1.0, -4.0], &[0.7, 0.3]) > 0.0);
    }

    #[test]
    fn gate_delay_uses_multi_pole_wire_delay() {
        let calc = PrimaDelayCalc::new();
        let parasitic = Parasitic::PoleResidue {
            poles: vec![-2.0, -8.0],
            residues: vec![0.6, 0.4],
        };
        let arg = ArcDcalcArg::with_slew(
            VertexId::from_raw(0),
            VertexId::from_raw(1),
            EdgeId::from_raw(0),
            0,
            0.1,
            0.0,
            Some(parasitic),
        );
        let mut loads = HashMap::new();
        loads.insert(VertexId::from_raw(2), 0);
        let result = calc.gate_delay(&arg, &loads);
        assert!(result.wire_delay(0) > 0.0);
    }
}
