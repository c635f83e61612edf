//! Sentinel calculator: every gate delay is 1.0, slews pass through
//! unchanged, wire delays are zero. Used as a bring-up baseline before a
//! real library-driven calculator is wired in.

use super::{ArcDcalcArg, ArcDcalcResult, ArcDelayCalc, LoadPinIndexMap};
use crate::parasitics::ReductionKind;

/// The `unit` delay calculator.
#[derive(Default)]
pub struct UnitDelayCalc;

impl UnitDelayCalc {
    /// Creates a new unit delay calculator.
    pub fn new() -> Self {
        Self
    }
}

impl ArcDelayCalc for UnitDelayCalc {
    fn name(&self) -> &'static str {
        "unit"
    }

    fn reduction_kind(&self) -> Option<ReductionKind> {
        None
    }

    fn gate_delay(&self, arg: &ArcDcalcArg, load_pin_index_map: &LoadPinIndexMap) -> ArcDcalcResult {
        let mut result = ArcDcalcResult::new(load_pin_index_map.len());
        result.set_gate_delay(1.0);
        result.set_drvr_slew(arg.in_slew());
        for idx in 0..load_pin_index_map.len() {
            result.set_wire_delay(idx, 0.0);
            result.set_load_slew(idx, arg.in_slew());
        }
        result
    }

    fn check_delay(&self, _from_slew: f64, _to_slew: f64, _related_out_cap: f64) -> f64 {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{EdgeId, VertexId};
    use std::collections::HashMap;

    #[test]
    fn unit_calculator_fixed_point() {
        let calc = UnitDelayCalc::new();
        let arg = ArcDcalcArg::with_slew(
            VertexId::from_raw(0),
            VertexId::from_raw(1),
            EdgeId::from_raw(0),
            0,
            0.10,
            0.05,
            None,
        );
        let mut load_map = HashMap::new();
        load_map.insert(VertexId::from_raw(2), 0);
        let result = calc.gate_delay(&arg, &load_map);
        assert_eq!(result.gate_delay(), 1.0);
        assert_eq!(result.drvr_slew(), 0.10);
        assert_eq!(result.wire_delay(0), 0.0);
    }

    #[test]
    fn unit_never_reduces() {
        assert!(!UnitDelayCalc::new().reduce_supported());
    }
}
