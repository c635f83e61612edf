//! Pluggable arc delay-calculation algorithms: computing gate delay, driver
//! slew, and per-load wire delay/slew from an arc, an input slew, and a
//! load (capacitance or parasitic network).

mod arnoldi;
mod ccs_ceff;
mod dmp_ceff;
mod lumped_cap;
mod prima;
pub mod registry;
mod unit;

pub use arnoldi::ArnoldiDelayCalc;
pub use ccs_ceff::CcsCeffDelayCalc;
pub use dmp_ceff::{DmpCeffElmoreDelayCalc, DmpCeffTwoPoleDelayCalc};
pub use lumped_cap::LumpedCapDelayCalc;
pub use prima::PrimaDelayCalc;
pub use registry::DelayCalcRegistry;
pub use unit::UnitDelayCalc;

use crate::analysis_point::DcalcAnalysisPt;
use crate::bfs::{BfsIndex, BfsIterator};
use crate::graph::TimingGraph;
use crate::ids::{EdgeId, VertexId};
use crate::parasitics::{DetailedNetwork, Parasitic, ReductionKind};
use std::collections::HashMap;

/// Maps a load pin to its index within an [`ArcDcalcResult`]'s per-load
/// vectors.
pub type LoadPinIndexMap = HashMap<VertexId, usize>;

/// Arguments for computing delay/slew at one driver pin through one timing
/// arc at one delay-calc analysis point.
///
/// Either constructed with a known input slew and load (capacitance or
/// parasitic), or with an externally-supplied input delay for an
/// unmodelled driving port.
#[derive(Clone, Debug)]
pub struct ArcDcalcArg {
    in_pin: VertexId,
    drvr_pin: VertexId,
    edge: EdgeId,
    arc_index: usize,
    in_slew: f64,
    load_cap: f64,
    parasitic: Option<Parasitic>,
    input_delay: Option<f64>,
}

impl ArcDcalcArg {
    /// The slew+load form: a driven gate with a known input transition and
    /// load.
    pub fn with_slew(
        in_pin: VertexId,
        drvr_pin: VertexId,
        edge: EdgeId,
        arc_index: usize,
        in_slew: f64,
        load_cap: f64,
        parasitic: Option<Parasitic>,
    ) -> Self {
        Self {
            in_pin,
            drvr_pin,
            edge,
            arc_index,
            in_slew,
            load_cap,
            parasitic,
            input_delay: None,
        }
    }

    /// The input-delay form: an unmodelled driving port whose delay is
    /// supplied directly rather than computed.
    pub fn with_input_delay(
        in_pin: VertexId,
        drvr_pin: VertexId,
        edge: EdgeId,
        arc_index: usize,
        input_delay: f64,
    ) -> Self {
        Self {
            in_pin,
            drvr_pin,
            edge,
            arc_index,
            in_slew: 0.0,
            load_cap: 0.0,
            parasitic: None,
            input_delay: Some(input_delay),
        }
    }

    /// The arc's input pin.
    pub fn in_pin(&self) -> VertexId {
        self.in_pin
    }

    /// The arc's driver (output) pin.
    pub fn drvr_pin(&self) -> VertexId {
        self.drvr_pin
    }

    /// The edge this arc belongs to.
    pub fn edge(&self) -> EdgeId {
        self.edge
    }

    /// The arc's index within its edge's [`crate::graph::TimingArcSet`].
    pub fn arc_index(&self) -> usize {
        self.arc_index
    }

    /// The input transition's slew.
    pub fn in_slew(&self) -> f64 {
        self.in_slew
    }

    /// Sets the input slew, e.g. after it has been computed by an upstream
    /// driver.
    pub fn set_in_slew(&mut self, in_slew: f64) {
        self.in_slew = in_slew;
    }

    /// The lumped load capacitance, when no parasitic model is attached.
    pub fn load_cap(&self) -> f64 {
        self.load_cap
    }

    /// Sets the lumped load capacitance.
    pub fn set_load_cap(&mut self, load_cap: f64) {
        self.load_cap = load_cap;
    }

    /// The attached parasitic model, if any.
    pub fn parasitic(&self) -> Option<&Parasitic> {
        self.parasitic.as_ref()
    }

    /// Attaches a parasitic model.
    pub fn set_parasitic(&mut self, parasitic: Option<Parasitic>) {
        self.parasitic = parasitic;
    }

    /// The externally-supplied input delay, for the input-delay form.
    pub fn input_delay(&self) -> Option<f64> {
        self.input_delay
    }
}

/// The result of a single gate-delay calculation: gate delay, driver slew,
/// and a per-load-pin vector of wire delays and load slews.
#[derive(Clone, Debug, Default)]
pub struct ArcDcalcResult {
    gate_delay: f64,
    drvr_slew: f64,
    wire_delays: Vec<f64>,
    load_slews: Vec<f64>,
}

impl ArcDcalcResult {
    /// Creates a result sized for `load_count` loads, all delays/slews
    /// zeroed.
    pub fn new(load_count: usize) -> Self {
        Self {
            gate_delay: 0.0,
            drvr_slew: 0.0,
            wire_delays: vec![0.0; load_count],
            load_slews: vec![0.0; load_count],
        }
    }

    /// Resizes the per-load vectors to `load_count`, zero-filling any new
    /// entries.
    pub fn set_load_count(&mut self, load_count: usize) {
        self.wire_delays.resize(load_count, 0.0);
        self.load_slews.resize(load_count, 0.0);
    }

    /// The gate (driver) delay.
    pub fn gate_delay(&self) -> f64 {
        self.gate_delay
    }

    /// Sets the gate delay.
    pub fn set_gate_delay(&mut self, gate_delay: f64) {
        self.gate_delay = gate_delay;
    }

    /// The driver output slew.
    pub fn drvr_slew(&self) -> f64 {
        self.drvr_slew
    }

    /// Sets the driver output slew.
    pub fn set_drvr_slew(&mut self, drvr_slew: f64) {
        self.drvr_slew = drvr_slew;
    }

    /// The wire delay to load `load_idx`.
    pub fn wire_delay(&self, load_idx: usize) -> f64 {
        self.wire_delays[load_idx]
    }

    /// Sets the wire delay to load `load_idx`.
    pub fn set_wire_delay(&mut self, load_idx: usize, wire_delay: f64) {
        self.wire_delays[load_idx] = wire_delay;
    }

    /// The slew seen at load `load_idx`.
    pub fn load_slew(&self, load_idx: usize) -> f64 {
        self.load_slews[load_idx]
    }

    /// Sets the slew seen at load `load_idx`.
    pub fn set_load_slew(&mut self, load_idx: usize, load_slew: f64) {
        self.load_slews[load_idx] = load_slew;
    }
}

/// A pluggable arc delay-calculation algorithm.
///
/// Each implementation is a capability, not a subclass in a hierarchy:
/// concrete calculators are tagged alternatives behind this one trait, kept
/// in a name-keyed [`DelayCalcRegistry`] rather than a class tree.
pub trait ArcDelayCalc: Send + Sync {
    /// The registered name of this calculator (`"unit"`, `"lumped_cap"`, …).
    fn name(&self) -> &'static str;

    /// `true` if [`ArcDelayCalc::reduce_parasitic`] does meaningful work for
    /// this calculator. The `unit` calculator never reduces.
    fn reduce_supported(&self) -> bool {
        self.reduction_kind().is_some()
    }

    /// Which [`ReductionKind`] this calculator's parasitics should be
    /// reduced to, or `None` if it consumes only lumped capacitance.
    fn reduction_kind(&self) -> Option<ReductionKind>;

    /// Lowers a detailed parasitic network to this calculator's accepted
    /// form. A no-op identity mapping when [`ArcDelayCalc::reduce_supported`]
    /// is `false`.
    fn reduce_parasitic(&self, network: &DetailedNetwork) -> Option<Parasitic> {
        self.reduction_kind()
            .map(|kind| crate::parasitics::reduce(network, kind))
    }

    /// Populates `arg`'s slew and parasitic fields with the values the
    /// driver side has already computed, ahead of calling
    /// [`ArcDelayCalc::gate_delay`].
    fn set_dcalc_arg_parasitic_slew(&self, arg: &mut ArcDcalcArg, drvr_slew: f64, parasitic: Option<Parasitic>) {
        arg.set_in_slew(drvr_slew);
        arg.set_parasitic(parasitic);
    }

    /// Wire delay/slew for an input port with no driving cell — the input
    /// delay/parasitic model substitutes for an upstream driver.
    fn input_port_delay(
        &self,
        in_slew: f64,
        parasitic: Option<&Parasitic>,
        load_pin_index_map: &LoadPinIndexMap,
    ) -> ArcDcalcResult {
        let mut result = ArcDcalcResult::new(load_pin_index_map.len());
        result.set_drvr_slew(in_slew);
        for idx in 0..load_pin_index_map.len() {
            result.set_load_slew(idx, in_slew);
            let wire_delay = parasitic.map(|p| p.total_cap() * 0.0).unwrap_or(0.0);
            result.set_wire_delay(idx, wire_delay);
        }
        result
    }

    /// The core primitive: delay and slew for the arc driving `arg.drvr_pin()`.
    fn gate_delay(&self, arg: &ArcDcalcArg, load_pin_index_map: &LoadPinIndexMap) -> ArcDcalcResult;

    /// Parallel-drivers variant; result order matches `args`.
    fn gate_delays(&self, args: &[ArcDcalcArg], load_pin_index_map: &LoadPinIndexMap) -> Vec<ArcDcalcResult> {
        args.iter().map(|arg| self.gate_delay(arg, load_pin_index_map)).collect()
    }

    /// Setup/hold/recovery/removal margin for a timing check arc.
    fn check_delay(&self, from_slew: f64, to_slew: f64, related_out_cap: f64) -> f64;

    /// Textual trace of a gate-delay calculation, for debugging. No effect
    /// on any stored value.
    fn report_gate_delay(&self, arg: &ArcDcalcArg, result: &ArcDcalcResult) -> String {
        format!(
            "{}: in_slew={:.4} load_cap={:.4} -> gate_delay={:.4} drvr_slew={:.4}",
            self.name(),
            arg.in_slew(),
            arg.load_cap(),
            result.gate_delay(),
            result.drvr_slew()
        )
    }

    /// Textual trace of a check-delay calculation.
    fn report_check_delay(&self, from_slew: f64, to_slew: f64, margin: f64) -> String {
        format!(
            "{}: from_slew={:.4} to_slew={:.4} -> check_delay={:.4}",
            self.name(),
            from_slew,
            to_slew,
            margin
        )
    }

    /// Releases any per-driver caches after the driver's level completes.
    fn finish_drvr_pin(&self) {}
}

/// Collects the vertex visitation order for a forward traversal seeded at
/// every source vertex, draining a fresh [`BfsIterator`] under
/// [`BfsIndex::Dcalc`] so this pass doesn't collide with the arrival or
/// required-time traversals.
fn forward_order(graph: &TimingGraph) -> Vec<VertexId> {
    let bfs = BfsIterator::forward(graph, BfsIndex::Dcalc);
    for v in graph.source_vertices() {
        bfs.enqueue(v);
    }
    let mut order = Vec::with_capacity(graph.vertex_count());
    bfs.visit(None, |_, v| {
        order.push(v);
        bfs.enqueue_adjacent_vertices(v, None);
    });
    order
}

/// Drives `calc` over every non-feedback edge of `graph` in forward BFS
/// order, computing each arc's gate delay and caching it on the edge via
/// [`crate::graph::Edge::set_delay`] at `dcalc_ap`, ready for
/// [`crate::propagation::propagate_arrivals`]/
/// [`crate::propagation::propagate_requireds`] to consume.
///
/// Each edge is treated as driving a single load (its `to` pin); a vertex
/// with no slew computed yet — a primary input, or one whose driving edges
/// haven't run — is a `0.0` input slew. No parasitic network is attached at
/// this layer, so every arc's load capacitance is `0.0`; a calculator that
/// still contributes a wire delay for an unmodelled load has it folded into
/// the cached delay alongside the gate delay. The computed load slew is
/// cached on the downstream vertex via [`crate::graph::Vertex::set_slew`] so
/// the next level's arcs see it as their input slew.
///
/// Returns the number of vertices visited.
pub fn calculate_delays(graph: &mut TimingGraph, calc: &dyn ArcDelayCalc, dcalc_ap: DcalcAnalysisPt) -> usize {
    let order = forward_order(graph);
    for &v in &order {
        let out_edges = graph.out_edges(v).to_vec();
        for edge_id in out_edges {
            let edge = graph.edge(edge_id);
            if edge.is_feedback {
                continue;
            }
            let to = edge.to;
            let arcs = edge.arc_set.arcs.clone();

            let mut load_pins = LoadPinIndexMap::new();
            load_pins.insert(to, 0);

            for (arc_index, arc) in arcs.iter().enumerate() {
                let in_slew = graph.vertex(v).slew(arc.from_rf, dcalc_ap).unwrap_or(0.0);
                let arg = ArcDcalcArg::with_slew(v, to, edge_id, arc_index, in_slew, 0.0, None);
                let result = calc.gate_delay(&arg, &load_pins);
                let delay = result.gate_delay() + result.wire_delay(0);
                graph.edge_mut(edge_id).set_delay(arc_index, dcalc_ap, delay);
                graph.vertex_mut(to).set_slew(arc.to_rf, dcalc_ap, result.load_slew(0));
            }
        }
    }
    order.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_set_load_count_resizes_both_vectors() {
        let mut result = ArcDcalcResult::new(0);
        result.set_load_count(3);
        result.set_wire_delay(2, 1.5);
        result.set_load_slew(2, 0.3);
        assert_eq!(result.wire_delay(2), 1.5);
        assert_eq!(result.load_slew(2), 0.3);
    }

    #[test]
    fn arg_slew_form_has_no_input_delay() {
        let arg = ArcDcalcArg::with_slew(
            VertexId::from_raw(0),
            VertexId::from_raw(1),
            EdgeId::from_raw(0),
            0,
            0.1,
            0.05,
            None,
        );
        assert!(arg.input_delay().is_none());
        assert_eq!(arg.in_slew(), 0.1);
    }

    #[test]
    fn arg_input_delay_form_has_no_slew_load() {
        let arg = ArcDcalcArg::with_input_delay(
            VertexId::from_raw(0),
            VertexId::from_raw(1),
            EdgeId::from_raw(0),
            0,
            2.0,
        );
        assert_eq!(arg.input_delay(), Some(2.0));
    }

    #[test]
    fn calculate_delays_populates_every_arc_via_the_registered_calculator() {
        use crate::analysis_point::{Corner, PathAnalysisPt};
        use crate::graph::TimingArcSet;
        use crate::min_max::MinMax;
        use crate::port_direction::PortDirection;
        use crate::timing_role::TimingRole;
        use sta_common::Interner;

        let interner = Interner::new();
        let mut g = TimingGraph::new();
        let a = g.add_vertex(interner.get_or_intern("A"), PortDirection::Input);
        let b = g.add_vertex(interner.get_or_intern("B"), PortDirection::Internal);
        let c = g.add_vertex(interner.get_or_intern("C"), PortDirection::Output);
        let e1 = g.add_edge(a, b, TimingRole::Combinational, TimingArcSet::non_inverting());
        let e2 = g.add_edge(b, c, TimingRole::Combinational, TimingArcSet::non_inverting());
        g.levelize();

        let dcalc_ap = DcalcAnalysisPt::new(PathAnalysisPt::new(Corner::from_raw(0), MinMax::Max));
        let calc = UnitDelayCalc::new();
        let visited = calculate_delays(&mut g, &calc, dcalc_ap);

        assert_eq!(visited, g.vertex_count());
        assert_eq!(g.edge(e1).delay(0, dcalc_ap), Some(1.0));
        assert_eq!(g.edge(e2).delay(0, dcalc_ap), Some(1.0));
    }
}
