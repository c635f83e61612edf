//! Forward arrival and backward required-time propagation over a levelized
//! [`TimingGraph`], driven by the [`BfsIterator`] traversal order.

use crate::analysis_point::{DcalcAnalysisPt, PathAnalysisPt};
use crate::bfs::{BfsIndex, BfsIterator};
use crate::graph::TimingGraph;
use crate::ids::{TagIndex, VertexId};
use crate::path::Path;
use crate::tag::TagInterner;
use sta_common::{fuzzy::fuzzy_equal, StaResult};

/// `true` if `candidate`, arriving via predecessor `candidate_pred`, beats
/// the value currently stored at `current_value` (read from whichever of
/// `Path::arrival`/`Path::required` the caller is merging).
///
/// `current_is_unset` must be driven off the *value itself* being at its
/// min/max sentinel, not off `Path::is_null`: a path's `arrival` and
/// `required` are populated by two independent passes sharing one record,
/// so by the time the backward pass visits a path the forward pass has
/// typically already cleared `is_null`, even though `required` is still at
/// its init value. Strict improvement (per `improves`) always wins over a
/// set value. A fuzzy tie is broken by the lexicographically smaller
/// predecessor `(vertex_id, tag_index)`, so merge outcomes are
/// deterministic regardless of in-edge visitation order.
fn candidate_wins(
    improves: impl Fn(f64, f64) -> bool,
    candidate: f64,
    candidate_pred: (VertexId, TagIndex),
    current_is_unset: bool,
    current_value: f64,
    current_pred: Option<(VertexId, TagIndex)>,
) -> bool {
    if current_is_unset {
        return true;
    }
    if improves(candidate, current_value) {
        return true;
    }
    if fuzzy_equal(candidate, current_value) {
        match current_pred {
            Some(current_pred) => candidate_pred < current_pred,
            None => true,
        }
    } else {
        false
    }
}

/// Collects the vertex visitation order for a forward traversal seeded at
/// every source vertex, draining a fresh [`BfsIterator`].
fn forward_order(graph: &TimingGraph) -> Vec<VertexId> {
    let bfs = BfsIterator::forward(graph, BfsIndex::Arrival);
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

/// Collects the vertex visitation order for a backward traversal seeded at
/// every sink vertex.
fn backward_order(graph: &TimingGraph) -> Vec<VertexId> {
    let bfs = BfsIterator::backward(graph, BfsIndex::Required);
    for v in graph.sink_vertices() {
        bfs.enqueue(v);
    }
    let mut order = Vec::with_capacity(graph.vertex_count());
    bfs.visit(None, |_, v| {
        order.push(v);
        bfs.enqueue_adjacent_vertices(v, None);
    });
    order
}

/// Propagates arrivals forward from every source vertex under `path_ap`,
/// consuming edge delays already cached (by a delay calculator) at
/// `dcalc_ap`.
///
/// For each vertex in level order: for each non-feedback in-edge, for each
/// live tag at the source matching `path_ap`, the candidate arrival is the
/// source's arrival plus the arc delay; it is merged into the destination's
/// path for the arc's to-transition under `path_ap.min_max`. Unreachable
/// vertices keep their `±∞` sentinel — propagation itself never fails.
///
/// Returns the number of vertices visited.
pub fn propagate_arrivals(
    graph: &mut TimingGraph,
    interner: &TagInterner,
    dcalc_ap: DcalcAnalysisPt,
    path_ap: PathAnalysisPt,
) -> StaResult<usize> {
    let order = forward_order(graph);
    let init_arrival = path_ap.min_max.init_arrival();
    let init_required = path_ap.min_max.init_required();

    for &v in &order {
        let in_edges = graph.in_edges(v).to_vec();
        for edge_id in in_edges {
            let edge = graph.edge(edge_id);
            if edge.is_feedback {
                continue;
            }
            let from = edge.from;
            let from_paths: Vec<Path> = graph.vertex(from).paths.clone();

            for src_path in from_paths {
                if src_path.is_null {
                    continue;
                }
                let src_fields = interner.resolve_tag(src_path.tag_index);
                if src_fields.path_ap != path_ap {
                    continue;
                }
                let edge = graph.edge(edge_id);
                for (arc_index, arc) in edge.arc_set.arcs.iter().enumerate() {
                    if arc.from_rf != src_fields.rf {
                        continue;
                    }
                    let delay = edge.delay(arc_index, dcalc_ap).unwrap_or(0.0);
                    let candidate = src_path.arrival + delay;
                    let mut dst_fields = src_fields.clone();
                    dst_fields.rf = arc.to_rf;
                    let dst_tag = interner.tag(dst_fields)?;
                    let candidate_pred = (from, src_path.tag_index);

                    let dest = graph.vertex_mut(v);
                    let dest_path = dest.path_mut_or_init(dst_tag, init_arrival, init_required);
                    let current_value = dest_path.arrival;
                    let current_is_unset = current_value == init_arrival;
                    let current_pred = dest_path.prev_path;
                    if candidate_wins(
                        |a, b| path_ap.min_max.improves(a, b),
                        candidate,
                        candidate_pred,
                        current_is_unset,
                        current_value,
                        current_pred,
                    ) {
                        dest_path.set_arrival(candidate, edge_id, arc_index, candidate_pred);
                    }
                }
            }
        }
    }
    Ok(order.len())
}

/// Propagates required times backward from every sink vertex under
/// `path_ap`, under the min/max opposite `path_ap.min_max` (requireds are
/// the tightest bound a vertex's fanout demands).
///
/// Returns the number of vertices visited.
pub fn propagate_requireds(
    graph: &mut TimingGraph,
    interner: &TagInterner,
    dcalc_ap: DcalcAnalysisPt,
    path_ap: PathAnalysisPt,
) -> StaResult<usize> {
    let order = backward_order(graph);
    let init_arrival = path_ap.min_max.init_arrival();
    let init_required = path_ap.min_max.init_required();
    let required_mode = path_ap.min_max.opposite();

    for &v in &order {
        let out_edges = graph.out_edges(v).to_vec();
        for edge_id in out_edges {
            let edge = graph.edge(edge_id);
            if edge.is_feedback {
                continue;
            }
            let to = edge.to;
            let to_paths: Vec<Path> = graph.vertex(to).paths.clone();

            for dst_path in to_paths {
                if dst_path.is_null {
                    continue;
                }
                let dst_fields = interner.resolve_tag(dst_path.tag_index);
                if dst_fields.path_ap != path_ap {
                    continue;
                }
                let edge = graph.edge(edge_id);
                for (arc_index, arc) in edge.arc_set.arcs.iter().enumerate() {
                    if arc.to_rf != dst_fields.rf {
                        continue;
                    }
                    let delay = edge.delay(arc_index, dcalc_ap).unwrap_or(0.0);
                    let candidate = dst_path.required - delay;
                    let mut src_fields = dst_fields.clone();
                    src_fields.rf = arc.from_rf;
                    let src_tag = interner.tag(src_fields)?;
                    let candidate_pred = (to, dst_path.tag_index);

                    let source = graph.vertex_mut(v);
                    let src_path = source.path_mut_or_init(src_tag, init_arrival, init_required);
                    let current_value = src_path.required;
                    let current_is_unset = current_value == init_required;
                    let current_pred = src_path.prev_path;
                    if candidate_wins(
                        |a, b| required_mode.improves(a, b),
                        candidate,
                        candidate_pred,
                        current_is_unset,
                        current_value,
                        current_pred,
                    ) {
                        src_path.set_required(candidate, edge_id, arc_index, candidate_pred);
                    }
                }
            }
        }
    }
    Ok(order.len())
}
