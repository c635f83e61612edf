//! Pin/port directions and the composite predicates derived from them.

use serde::{Deserialize, Serialize};

/// The direction of a pin or port.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PortDirection {
    /// A driven input.
    Input,
    /// A driving output.
    Output,
    /// An output that can be put in a high-impedance state.
    Tristate,
    /// A pin that can act as either input or output.
    Bidirect,
    /// An internal (non-terminal) pin, e.g. an internal register node.
    Internal,
    /// A ground supply pin.
    Ground,
    /// A power supply pin.
    Power,
    /// Direction could not be determined.
    Unknown,
}

impl PortDirection {
    /// `true` for a plain input.
    pub fn is_input(self) -> bool {
        self == PortDirection::Input
    }

    /// `true` for input or bidirect — anything that can receive a driven
    /// signal.
    pub fn is_any_input(self) -> bool {
        matches!(self, PortDirection::Input | PortDirection::Bidirect)
    }

    /// `true` for a plain output.
    pub fn is_output(self) -> bool {
        self == PortDirection::Output
    }

    /// `true` for output, tristate, or bidirect — anything that can drive a
    /// signal.
    pub fn is_any_output(self) -> bool {
        matches!(
            self,
            PortDirection::Output | PortDirection::Tristate | PortDirection::Bidirect
        )
    }

    /// `true` for a tristate output.
    pub fn is_tristate(self) -> bool {
        self == PortDirection::Tristate
    }

    /// `true` for a bidirectional pin.
    pub fn is_bidirect(self) -> bool {
        self == PortDirection::Bidirect
    }

    /// `true` for bidirect or tristate — pins whose output can be disabled.
    pub fn is_any_tristate(self) -> bool {
        matches!(self, PortDirection::Bidirect | PortDirection::Tristate)
    }

    /// `true` for a ground supply pin.
    pub fn is_ground(self) -> bool {
        self == PortDirection::Ground
    }

    /// `true` for a power supply pin.
    pub fn is_power(self) -> bool {
        self == PortDirection::Power
    }

    /// `true` for ground or power — any supply pin.
    pub fn is_power_ground(self) -> bool {
        matches!(self, PortDirection::Ground | PortDirection::Power)
    }

    /// `true` for an internal pin.
    pub fn is_internal(self) -> bool {
        self == PortDirection::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_input() {
        assert!(PortDirection::Input.is_any_input());
        assert!(PortDirection::Bidirect.is_any_input());
        assert!(!PortDirection::Output.is_any_input());
    }

    #[test]
    fn any_output() {
        assert!(PortDirection::Output.is_any_output());
        assert!(PortDirection::Tristate.is_any_output());
        assert!(PortDirection::Bidirect.is_any_output());
        assert!(!PortDirection::Input.is_any_output());
    }

    #[test]
    fn any_tristate() {
        assert!(PortDirection::Tristate.is_any_tristate());
        assert!(PortDirection::Bidirect.is_any_tristate());
        assert!(!PortDirection::Output.is_any_tristate());
    }

    #[test]
    fn power_ground() {
        assert!(PortDirection::Ground.is_power_ground());
        assert!(PortDirection::Power.is_power_ground());
        assert!(!PortDirection::Input.is_power_ground());
    }

    #[test]
    fn exclusive_singletons() {
        assert!(PortDirection::Input.is_input());
        assert!(!PortDirection::Output.is_input());
        assert!(PortDirection::Internal.is_internal());
    }
}
