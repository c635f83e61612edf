//! The levelized timing graph: vertices (pins), edges (timing arc sets),
//! per-condition slews, and per-vertex path storage.

use crate::analysis_point::DcalcAnalysisPt;
use crate::ids::{EdgeId, VertexId};
use crate::path::Path;
use crate::port_direction::PortDirection;
use crate::timing_role::TimingRole;
use crate::transition::RiseFall;
use sta_common::Ident;
use std::collections::HashMap;

/// One `(from_transition, to_transition)` timing relation within an edge's
/// arc set, e.g. the rise-to-fall arc of an inverter.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimingArc {
    /// The transition at the edge's source (driver) pin.
    pub from_rf: RiseFall,
    /// The transition at the edge's destination (sink/check) pin.
    pub to_rf: RiseFall,
}

/// The set of arcs carried by one edge, distinguished by transition pair.
#[derive(Clone, Debug, Default)]
pub struct TimingArcSet {
    /// The individual transition-pair arcs in this set.
    pub arcs: Vec<TimingArc>,
}

impl TimingArcSet {
    /// Creates an arc set from an explicit list of transition pairs.
    pub fn new(arcs: Vec<TimingArc>) -> Self {
        Self { arcs }
    }

    /// A single-arc set where every rise/fall transition is non-inverting
    /// (rise→rise, fall→fall) — the common case for buffers, wires, and
    /// sequential clock-to-Q edges.
    pub fn non_inverting() -> Self {
        Self {
            arcs: vec![
                TimingArc {
                    from_rf: RiseFall::Rise,
                    to_rf: RiseFall::Rise,
                },
                TimingArc {
                    from_rf: RiseFall::Fall,
                    to_rf: RiseFall::Fall,
                },
            ],
        }
    }

    /// A two-arc set where every transition inverts (rise→fall, fall→rise)
    /// — the common case for a single-stage inverting gate.
    pub fn inverting() -> Self {
        Self {
            arcs: vec![
                TimingArc {
                    from_rf: RiseFall::Rise,
                    to_rf: RiseFall::Fall,
                },
                TimingArc {
                    from_rf: RiseFall::Fall,
                    to_rf: RiseFall::Rise,
                },
            ],
        }
    }

    /// Finds the index of the arc matching the given transition pair.
    pub fn find(&self, from_rf: RiseFall, to_rf: RiseFall) -> Option<usize> {
        self.arcs
            .iter()
            .position(|a| a.from_rf == from_rf && a.to_rf == to_rf)
    }
}

/// A vertex in the timing graph: exactly one per pin.
pub struct Vertex {
    /// This vertex's id.
    pub id: VertexId,
    /// The interned name of the pin this vertex represents.
    pub name: Ident,
    /// The pin's direction.
    pub direction: PortDirection,
    /// Topological level; sources are at level 0. Assigned once by
    /// [`TimingGraph::levelize`]; stale until that is called.
    pub level: u32,
    /// Per-`(transition, analysis-pt)` slew, keyed by `(rf, dcalc_ap index)`.
    pub slews: HashMap<(RiseFall, usize), f64>,
    /// This vertex's realized paths, one per live tag at this vertex. Dense
    /// per invariant: every `Path` here names a tag in this vertex's tag
    /// group and no tag appears twice.
    pub paths: Vec<Path>,
    /// BFS-in-queue flags, one bit per [`crate::bfs::BfsIndex`] class, so
    /// several BFS traversals can run over the same graph without flag
    /// collisions. Atomic because `visitParallel` mutates these
    /// concurrently while enqueuing fanout from multiple worker threads.
    pub(crate) bfs_flags: std::sync::atomic::AtomicU8,
}

impl Vertex {
    fn new(id: VertexId, name: Ident, direction: PortDirection) -> Self {
        Self {
            id,
            name,
            direction,
            level: 0,
            slews: HashMap::new(),
            paths: Vec::new(),
            bfs_flags: std::sync::atomic::AtomicU8::new(0),
        }
    }

    /// Returns the slew for `(rf, ap)`, if one has been computed.
    pub fn slew(&self, rf: RiseFall, ap: DcalcAnalysisPt) -> Option<f64> {
        self.slews.get(&(rf, ap.index())).copied()
    }

    /// Sets the slew for `(rf, ap)`.
    pub fn set_slew(&mut self, rf: RiseFall, ap: DcalcAnalysisPt, slew: f64) {
        self.slews.insert((rf, ap.index()), slew);
    }

    /// Returns the path for `tag_index` at this vertex, if one exists.
    pub fn path(&self, tag_index: crate::ids::TagIndex) -> Option<&Path> {
        self.paths.iter().find(|p| p.tag_index == tag_index)
    }

    /// Returns a mutable reference to the path for `tag_index`, inserting a
    /// fresh one (per invariant 4's `±∞` sentinels) if none exists yet.
    pub fn path_mut_or_init(
        &mut self,
        tag_index: crate::ids::TagIndex,
        init_arrival: f64,
        init_required: f64,
    ) -> &mut Path {
        if let Some(pos) = self.paths.iter().position(|p| p.tag_index == tag_index) {
            return &mut self.paths[pos];
        }
        self.paths.push(Path::new(
            self.id,
            tag_index,
            init_arrival,
            init_required,
        ));
        self.paths.last_mut().unwrap()
    }
}

/// A directed edge in the timing graph, carrying a [`TimingArcSet`] and a
/// [`TimingRole`] classifying the relation.
pub struct Edge {
    /// This edge's id.
    pub id: EdgeId,
    /// The source (driver) vertex.
    pub from: VertexId,
    /// The destination (sink or checked) vertex.
    pub to: VertexId,
    /// The timing relation this edge represents.
    pub role: TimingRole,
    /// The transition-pair arcs available on this edge.
    pub arc_set: TimingArcSet,
    /// `true` if this edge closes a combinational loop (e.g. a transparent
    /// latch's D-to-Q arc) and is excluded from forward BFS/levelization.
    pub is_feedback: bool,
    /// Cached per-`(arc index, dcalc-ap index)` gate/wire delay, populated
    /// by the delay-calculation pass and consumed by path propagation.
    delays: HashMap<(usize, usize), f64>,
}

impl Edge {
    fn new(id: EdgeId, from: VertexId, to: VertexId, role: TimingRole, arc_set: TimingArcSet) -> Self {
        Self {
            id,
            from,
            to,
            role,
            arc_set,
            is_feedback: false,
            delays: HashMap::new(),
        }
    }

    /// Returns the cached delay for `(arc_index, ap)`, if computed.
    pub fn delay(&self, arc_index: usize, ap: DcalcAnalysisPt) -> Option<f64> {
        self.delays.get(&(arc_index, ap.index())).copied()
    }

    /// Caches the delay for `(arc_index, ap)`.
    pub fn set_delay(&mut self, arc_index: usize, ap: DcalcAnalysisPt, delay: f64) {
        self.delays.insert((arc_index, ap.index()), delay);
    }
}

/// The levelized timing graph.
///
/// Vertices and edges are arena-allocated and addressed by dense
/// [`VertexId`]/[`EdgeId`]; once created they are never renumbered. An
/// `Edge` is looked up by `(driver_pin, driver_rf, sink_pin, sink_rf)` via
/// [`TimingGraph::find_arc`].
#[derive(Default)]
pub struct TimingGraph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    out_edges: Vec<Vec<EdgeId>>,
    in_edges: Vec<Vec<EdgeId>>,
    levelized: bool,
}

impl TimingGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            out_edges: Vec::new(),
            in_edges: Vec::new(),
            levelized: false,
        }
    }

    /// Adds a vertex (pin) to the graph and returns its id.
    pub fn add_vertex(&mut self, name: Ident, direction: PortDirection) -> VertexId {
        let id = VertexId::from_raw(self.vertices.len() as u32);
        self.vertices.push(Vertex::new(id, name, direction));
        self.out_edges.push(Vec::new());
        self.in_edges.push(Vec::new());
        self.levelized = false;
        id
    }

    /// Adds a directed edge between two existing vertices and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if either vertex id is out of range.
    pub fn add_edge(
        &mut self,
        from: VertexId,
        to: VertexId,
        role: TimingRole,
        arc_set: TimingArcSet,
    ) -> EdgeId {
        assert!((from.as_raw() as usize) < self.vertices.len());
        assert!((to.as_raw() as usize) < self.vertices.len());
        let id = EdgeId::from_raw(self.edges.len() as u32);
        self.edges.push(Edge::new(id, from, to, role, arc_set));
        self.out_edges[from.as_raw() as usize].push(id);
        self.in_edges[to.as_raw() as usize].push(id);
        self.levelized = false;
        id
    }

    /// Returns the vertex for `id`.
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the vertex for `id`.
    pub fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.as_raw() as usize]
    }

    /// Returns the edge for `id`.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the edge for `id`.
    pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id.as_raw() as usize]
    }

    /// Returns the ids of edges leaving `vertex`.
    pub fn out_edges(&self, vertex: VertexId) -> &[EdgeId] {
        &self.out_edges[vertex.as_raw() as usize]
    }

    /// Returns the ids of edges entering `vertex`.
    pub fn in_edges(&self, vertex: VertexId) -> &[EdgeId] {
        &self.in_edges[vertex.as_raw() as usize]
    }

    /// The number of vertices in the graph.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// The number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Vertices with no in-edges (graph sources).
    pub fn source_vertices(&self) -> Vec<VertexId> {
        (0..self.vertices.len())
            .map(|i| VertexId::from_raw(i as u32))
            .filter(|&v| self.in_edges(v).is_empty())
            .collect()
    }

    /// Vertices with no out-edges (graph sinks).
    pub fn sink_vertices(&self) -> Vec<VertexId> {
        (0..self.vertices.len())
            .map(|i| VertexId::from_raw(i as u32))
            .filter(|&v| self.out_edges(v).is_empty())
            .collect()
    }

    /// Looks up the edge and arc index between a driver pin/transition and a
    /// sink pin/transition.
    ///
    /// Returns `None` if no timing arc connects the two — callers surface
    /// this as a *no timing arc* warning rather than treating it as fatal.
    pub fn find_arc(
        &self,
        drvr_pin: VertexId,
        drvr_rf: RiseFall,
        in_pin: VertexId,
        in_rf: RiseFall,
    ) -> Option<(EdgeId, usize)> {
        for &edge_id in self.out_edges(drvr_pin) {
            let edge = self.edge(edge_id);
            if edge.to == in_pin {
                if let Some(arc_idx) = edge.arc_set.find(drvr_rf, in_rf) {
                    return Some((edge_id, arc_idx));
                }
            }
        }
        None
    }

    /// Assigns a topological `level` to every vertex and marks any edge that
    /// would close a cycle as `is_feedback`, excluding it from the DAG used
    /// for level assignment and forward/backward BFS.
    ///
    /// Levels are longest-path-from-a-source over non-feedback edges, so
    /// `level(to) > level(from)` holds for every non-feedback edge
    /// (invariant 1). Re-running after structural changes recomputes from
    /// scratch; any previously cached BFS queues must be discarded by the
    /// caller.
    pub fn levelize(&mut self) {
        let n = self.vertices.len();
        let mut color = vec![0u8; n]; // 0=white, 1=gray, 2=black
        let mut order = Vec::with_capacity(n);

        for i in 0..n {
            if color[i] == 0 {
                self.dfs_order(VertexId::from_raw(i as u32), &mut color, &mut order);
            }
        }
        order.reverse();

        for v in &mut self.vertices {
            v.level = 0;
        }
        for &from in &order {
            let from_idx = from.as_raw() as usize;
            let from_level = self.vertices[from_idx].level;
            let out = self.out_edges[from_idx].clone();
            for edge_id in out {
                if self.edges[edge_id.as_raw() as usize].is_feedback {
                    continue;
                }
                let to = self.edges[edge_id.as_raw() as usize].to;
                let to_idx = to.as_raw() as usize;
                if self.vertices[to_idx].level < from_level + 1 {
                    self.vertices[to_idx].level = from_level + 1;
                }
            }
        }
        self.levelized = true;
    }

    /// `true` once [`TimingGraph::levelize`] has run since the last
    /// structural change.
    pub fn is_levelized(&self) -> bool {
        self.levelized
    }

    /// Marks back edges found during DFS as feedback and returns a
    /// reverse-postorder traversal over the remaining (DAG) edges.
    fn dfs_order(&mut self, start: VertexId, color: &mut [u8], order: &mut Vec<VertexId>) {
        enum Frame {
            Enter(VertexId),
            Leave(VertexId),
        }
        let mut stack = vec![Frame::Enter(start)];
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(v) => {
                    let idx = v.as_raw() as usize;
                    if color[idx] != 0 {
                        continue;
                    }
                    color[idx] = 1;
                    stack.push(Frame::Leave(v));
                    let out = self.out_edges[idx].clone();
                    for edge_id in out {
                        let edge = &mut self.edges[edge_id.as_raw() as usize];
                        let to_idx = edge.to.as_raw() as usize;
                        match color[to_idx] {
                            1 => edge.is_feedback = true,
                            0 => stack.push(Frame::Enter(edge.to)),
                            _ => {}
                        }
                    }
                }
                Frame::Leave(v) => {
                    color[v.as_raw() as usize] = 2;
                    order.push(v);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sta_common::Interner;

    fn ident(interner: &Interner, s: &str) -> Ident {
        interner.get_or_intern(s)
    }

    #[test]
    fn add_vertex_and_edge() {
        let interner = Interner::new();
        let mut g = TimingGraph::new();
        let a = g.add_vertex(ident(&interner, "A"), PortDirection::Input);
        let b = g.add_vertex(ident(&interner, "B"), PortDirection::Output);
        let e = g.add_edge(a, b, TimingRole::Combinational, TimingArcSet::non_inverting());
        assert_eq!(g.edge(e).from, a);
        assert_eq!(g.edge(e).to, b);
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn levelize_simple_chain() {
        let interner = Interner::new();
        let mut g = TimingGraph::new();
        let a = g.add_vertex(ident(&interner, "A"), PortDirection::Input);
        let b = g.add_vertex(ident(&interner, "B"), PortDirection::Internal);
        let c = g.add_vertex(ident(&interner, "C"), PortDirection::Output);
        g.add_edge(a, b, TimingRole::Combinational, TimingArcSet::non_inverting());
        g.add_edge(b, c, TimingRole::Combinational, TimingArcSet::non_inverting());
        g.levelize();
        assert_eq!(g.vertex(a).level, 0);
        assert_eq!(g.vertex(b).level, 1);
        assert_eq!(g.vertex(c).level, 2);
    }

    #[test]
    fn levelize_reconverging_diamond() {
        let interner = Interner::new();
        let mut g = TimingGraph::new();
        let a = g.add_vertex(ident(&interner, "A"), PortDirection::Input);
        let b = g.add_vertex(ident(&interner, "B"), PortDirection::Internal);
        let c = g.add_vertex(ident(&interner, "C"), PortDirection::Internal);
        let d = g.add_vertex(ident(&interner, "D"), PortDirection::Output);
        g.add_edge(a, b, TimingRole::Combinational, TimingArcSet::non_inverting());
        g.add_edge(a, c, TimingRole::Combinational, TimingArcSet::non_inverting());
        g.add_edge(b, d, TimingRole::Combinational, TimingArcSet::non_inverting());
        g.add_edge(c, d, TimingRole::Combinational, TimingArcSet::non_inverting());
        g.levelize();
        assert_eq!(g.vertex(a).level, 0);
        assert_eq!(g.vertex(b).level, 1);
        assert_eq!(g.vertex(c).level, 1);
        assert_eq!(g.vertex(d).level, 2);
    }

    #[test]
    fn latch_loop_marks_feedback_and_still_levelizes() {
        let interner = Interner::new();
        let mut g = TimingGraph::new();
        let en = g.add_vertex(ident(&interner, "EN"), PortDirection::Input);
        let d = g.add_vertex(ident(&interner, "D"), PortDirection::Input);
        let q = g.add_vertex(ident(&interner, "Q"), PortDirection::Output);
        g.add_edge(en, q, TimingRole::LatchEnToQ, TimingArcSet::non_inverting());
        g.add_edge(d, q, TimingRole::LatchDtoQ, TimingArcSet::non_inverting());
        // Feedback edge closing a loop back to D (combinational loop through
        // the transparent window).
        let feedback = g.add_edge(q, d, TimingRole::Wire, TimingArcSet::non_inverting());
        g.levelize();
        assert!(g.edge(feedback).is_feedback);
        assert!(g.vertex(q).level > g.vertex(d).level);
    }

    #[test]
    fn find_arc_matches_transition_pair() {
        let interner = Interner::new();
        let mut g = TimingGraph::new();
        let a = g.add_vertex(ident(&interner, "A"), PortDirection::Input);
        let b = g.add_vertex(ident(&interner, "B"), PortDirection::Output);
        g.add_edge(a, b, TimingRole::Combinational, TimingArcSet::inverting());
        let found = g.find_arc(a, RiseFall::Rise, b, RiseFall::Fall);
        assert!(found.is_some());
        let missing = g.find_arc(a, RiseFall::Rise, b, RiseFall::Rise);
        assert!(missing.is_none());
    }

    #[test]
    fn find_arc_no_edge_returns_none() {
        let interner = Interner::new();
        let mut g = TimingGraph::new();
        let a = g.add_vertex(ident(&interner, "A"), PortDirection::Input);
        let b = g.add_vertex(ident(&interner, "B"), PortDirection::Output);
        let none = g.find_arc(a, RiseFall::Rise, b, RiseFall::Rise);
        assert!(none.is_none());
    }

    #[test]
    fn source_and_sink_vertices() {
        let interner = Interner::new();
        let mut g = TimingGraph::new();
        let a = g.add_vertex(ident(&interner, "A"), PortDirection::Input);
        let b = g.add_vertex(ident(&interner, "B"), PortDirection::Output);
        g.add_edge(a, b, TimingRole::Combinational, TimingArcSet::non_inverting());
        assert_eq!(g.source_vertices(), vec![a]);
        assert_eq!(g.sink_vertices(), vec![b]);
    }

    #[test]
    fn delay_cache_round_trip() {
        let interner = Interner::new();
        let mut g = TimingGraph::new();
        let a = g.add_vertex(ident(&interner, "A"), PortDirection::Input);
        let b = g.add_vertex(ident(&interner, "B"), PortDirection::Output);
        let e = g.add_edge(a, b, TimingRole::Combinational, TimingArcSet::non_inverting());
        let ap = DcalcAnalysisPt::new(crate::analysis_point::PathAnalysisPt::new(
            crate::analysis_point::Corner::from_raw(0),
            crate::min_max::MinMax::Max,
        ));
        assert!(g.edge(e).delay(0, ap).is_none());
        g.edge_mut(e).set_delay(0, ap, 1.23);
        assert_eq!(g.edge(e).delay(0, ap), Some(1.23));
    }
}
