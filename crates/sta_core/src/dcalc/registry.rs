//! Name → factory registry for delay calculators.
//!
//! Owned explicitly by the enclosing analysis session rather than held as
//! process-wide global state, so multiple sessions (or tests) never share
//! or race on registration.

use super::{
    ArcDelayCalc, ArnoldiDelayCalc, CcsCeffDelayCalc, DmpCeffElmoreDelayCalc, DmpCeffTwoPoleDelayCalc,
    LumpedCapDelayCalc, PrimaDelayCalc, UnitDelayCalc,
};
use std::collections::HashMap;

/// Constructs a boxed delay calculator instance.
pub type MakeArcDelayCalc = fn() -> Box<dyn ArcDelayCalc>;

/// A name-keyed registry of delay-calculator factories.
///
/// `register` on an already-registered name overwrites it (last writer
/// wins), matching the reference implementation's registration semantics.
#[derive(Default)]
pub struct DelayCalcRegistry {
    factories: HashMap<String, MakeArcDelayCalc>,
}

impl DelayCalcRegistry {
    /// Creates an empty registry with no builtins registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the seven builtin calculators registered
    /// under their standard names.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    /// Registers the seven builtin calculators, overwriting any existing
    /// registrations under the same names.
    pub fn register_builtins(&mut self) {
        self.register("unit", || Box::new(UnitDelayCalc::new()));
        self.register("lumped_cap", || Box::new(LumpedCapDelayCalc::new()));
        self.register("dmp_ceff_elmore", || Box::new(DmpCeffElmoreDelayCalc::new()));
        self.register("dmp_ceff_two_pole", || Box::new(DmpCeffTwoPoleDelayCalc::new()));
        self.register("arnoldi", || Box::new(ArnoldiDelayCalc::new()));
        self.register("ccs_ceff", || Box::new(CcsCeffDelayCalc::new()));
        self.register("prima", || Box::new(PrimaDelayCalc::new()));
    }

    /// Registers `factory` under `name`, for use with `set_delay_calc`.
    /// Overwrites any existing registration under the same name.
    pub fn register(&mut self, name: &str, factory: MakeArcDelayCalc) {
        self.factories.insert(name.to_string(), factory);
    }

    /// `true` if `name` has a registered factory.
    pub fn is_name(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// All registered names, sorted for stable reporting.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Unregisters every calculator.
    pub fn delete_all(&mut self) {
        self.factories.clear();
    }

    /// Constructs a registered calculator by name, or `None` if `name`
    /// isn't registered.
    pub fn make(&self, name: &str) -> Option<Box<dyn ArcDelayCalc>> {
        self.factories.get(name).map(|factory| factory())
    }
}
