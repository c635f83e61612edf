//! Timing constraint data model: clock definitions, I/O delays, and path
//! exceptions that drive the analysis.
//!
//! These types are the product of whatever front end builds them (an SDC
//! reader, a programmatic API, a test fixture); this module only defines
//! the shapes `sta_core::session` consumes, not how they're parsed.

use sta_common::Ident;
use serde::{Deserialize, Serialize};

/// A collection of timing constraints for a design.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingConstraints {
    /// Clock definitions (`create_clock`).
    pub clocks: Vec<ClockConstraint>,
    /// Input delay constraints (`set_input_delay`).
    pub input_delays: Vec<IoDelay>,
    /// Output delay constraints (`set_output_delay`).
    pub output_delays: Vec<IoDelay>,
    /// False path exceptions that exclude paths from analysis entirely.
    pub false_paths: Vec<FalsePath>,
    /// Multicycle path exceptions allowing more than one clock cycle.
    pub multicycle_paths: Vec<MulticyclePath>,
    /// Maximum delay constraints on specific paths.
    pub max_delay_paths: Vec<MaxDelayPath>,
}

impl TimingConstraints {
    /// Creates an empty set of timing constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the clock constraint with the given name, if any.
    pub fn find_clock(&self, name: Ident) -> Option<&ClockConstraint> {
        self.clocks.iter().find(|c| c.name == name)
    }

    /// Returns the number of defined clocks.
    pub fn clock_count(&self) -> usize {
        self.clocks.len()
    }
}

/// A clock constraint from a `create_clock` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConstraint {
    /// The name of the clock domain.
    pub name: Ident,
    /// Clock period in nanoseconds.
    pub period_ns: f64,
    /// The port or pin the clock is applied to.
    pub port: Ident,
    /// Optional waveform: `(rise_time_ns, fall_time_ns)`. `None` defaults
    /// to a 50% duty cycle: `(0, period / 2)`.
    pub waveform: Option<(f64, f64)>,
}

impl ClockConstraint {
    /// Target frequency in MHz.
    pub fn frequency_mhz(&self) -> f64 {
        if self.period_ns > 0.0 {
            1000.0 / self.period_ns
        } else {
            0.0
        }
    }

    /// Duty cycle as a fraction in `[0, 1]`.
    pub fn duty_cycle(&self) -> f64 {
        match self.waveform {
            Some((rise, fall)) => {
                if self.period_ns > 0.0 {
                    let high_time = if fall > rise {
                        fall - rise
                    } else {
                        self.period_ns - rise + fall
                    };
                    high_time / self.period_ns
                } else {
                    0.5
                }
            }
            None => 0.5,
        }
    }
}

/// An input or output delay constraint from `set_input_delay`/`set_output_delay`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoDelay {
    /// The port this delay applies to.
    pub port: Ident,
    /// The reference clock for this delay.
    pub clock: Ident,
    /// The delay value in nanoseconds.
    pub delay_ns: f64,
}

/// A false path exception from `set_false_path`: excludes paths from any
/// `from` endpoint to any `to` endpoint from timing analysis entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FalsePath {
    /// Source endpoints (clocks, ports, or pins).
    pub from: Vec<Ident>,
    /// Destination endpoints.
    pub to: Vec<Ident>,
}

/// A multicycle path exception from `set_multicycle_path`: allows the
/// specified paths `cycles` clock periods instead of one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MulticyclePath {
    /// Source endpoints.
    pub from: Vec<Ident>,
    /// Destination endpoints.
    pub to: Vec<Ident>,
    /// Number of clock cycles allowed for data propagation.
    pub cycles: u32,
}

/// A maximum delay constraint from `set_max_delay`, for paths that don't
/// belong to a regular clock domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxDelayPath {
    /// Source endpoints.
    pub from: Vec<Ident>,
    /// Destination endpoints.
    pub to: Vec<Ident>,
    /// Maximum allowed delay in nanoseconds.
    pub delay_ns: f64,
}
