//! The catalog of timing relations an edge's arc set can carry.

use crate::min_max::MinMax;
use serde::{Deserialize, Serialize};

/// The timing relation carried by an edge's arc set.
///
/// Each role identifies both what kind of timing relation it is (a delay
/// arc vs. a setup/hold-style check) and, for checks, which side of the
/// check (`path_min_max`) is the data path being constrained.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TimingRole {
    /// A net (wire) connection with no active delay element.
    Wire,
    /// A combinational gate delay.
    Combinational,
    /// Tristate buffer enable delay.
    TristateEnable,
    /// Tristate buffer disable delay.
    TristateDisable,
    /// Register clock-to-Q delay.
    RegClkToQ,
    /// Register asynchronous set/clear delay.
    RegSetClr,
    /// Latch enable-to-Q delay.
    LatchEnToQ,
    /// Latch D-to-Q transparent delay.
    LatchDtoQ,
    /// Setup timing check.
    Setup,
    /// Hold timing check.
    Hold,
    /// Recovery timing check (asynchronous set/clear release vs. clock).
    Recovery,
    /// Removal timing check (asynchronous set/clear assertion vs. clock).
    Removal,
    /// Minimum pulse width check.
    Width,
    /// Minimum/maximum clock period check.
    Period,
    /// Clock skew check.
    Skew,
    /// No-change timing check (latch transparent-window data stability).
    NoChange,
    /// Output setup check (external output port vs. capture clock).
    OutputSetup,
    /// Output hold check.
    OutputHold,
    /// Gated-clock setup check.
    GatedClockSetup,
    /// Gated-clock hold check.
    GatedClockHold,
    /// Latch setup check (data arriving before the closing edge).
    LatchSetup,
    /// Latch hold check.
    LatchHold,
    /// Data-check setup (pin-to-pin setup unrelated to a clock edge).
    DataCheckSetup,
    /// Data-check hold.
    DataCheckHold,
    /// Non-sequential setup check.
    NonSeqSetup,
    /// Non-sequential hold check.
    NonSeqHold,
    /// Minimum clock tree insertion delay (for CRPR/skew bookkeeping).
    ClockTreePathMin,
    /// Maximum clock tree insertion delay.
    ClockTreePathMax,
}

impl TimingRole {
    /// `true` for the plain wire role.
    pub fn is_wire(self) -> bool {
        self == TimingRole::Wire
    }

    /// `true` for any timing-check role (setup/hold/recovery/removal/width/
    /// period/skew/nochange/output/gated-clock/latch/data-check/non-seq).
    pub fn is_timing_check(self) -> bool {
        !matches!(
            self,
            TimingRole::Wire
                | TimingRole::Combinational
                | TimingRole::TristateEnable
                | TimingRole::TristateDisable
                | TimingRole::RegClkToQ
                | TimingRole::RegSetClr
                | TimingRole::LatchEnToQ
                | TimingRole::LatchDtoQ
        )
    }

    /// `true` for a timing check that relates two distinct pins rather than
    /// a pin to its own clock (width and period checks are single-pin).
    pub fn is_timing_check_between(self) -> bool {
        self.is_timing_check() && !matches!(self, TimingRole::Width | TimingRole::Period)
    }

    /// `true` for a data-check role (setup or hold variant).
    pub fn is_data_check(self) -> bool {
        matches!(self, TimingRole::DataCheckSetup | TimingRole::DataCheckHold)
    }

    /// `true` for the latch D-to-Q transparent role, which bounds `cmpAll`
    /// path-comparison recursion at latch loop boundaries.
    pub fn is_latch_d_to_q(self) -> bool {
        self == TimingRole::LatchDtoQ
    }

    /// Which side of a timing check (early/late) constrains the data path.
    ///
    /// Setup-style checks constrain the late (max) data arrival; hold-style
    /// checks constrain the early (min) data arrival. Non-check roles have
    /// no intrinsic side and return `None`.
    pub fn path_min_max(self) -> Option<MinMax> {
        use TimingRole::*;
        match self {
            Setup | Recovery | Width | Period | Skew | OutputSetup | GatedClockSetup
            | LatchSetup | DataCheckSetup | NonSeqSetup | ClockTreePathMax => Some(MinMax::Max),
            Hold | Removal | NoChange | OutputHold | GatedClockHold | LatchHold
            | DataCheckHold | NonSeqHold | ClockTreePathMin => Some(MinMax::Min),
            Wire | Combinational | TristateEnable | TristateDisable | RegClkToQ | RegSetClr
            | LatchEnToQ | LatchDtoQ => None,
        }
    }
}
