//! Realized arrival/required values at a vertex for one tag, plus the
//! comparison operators used to order and merge them during propagation.

use crate::analysis_point::PathAnalysisPt;
use crate::graph::TimingGraph;
use crate::ids::{EdgeId, TagIndex, VertexId};
use crate::min_max::MinMax;
use crate::tag::TagInterner;
use crate::timing_role::TimingRole;
use crate::transition::RiseFall;
use std::cmp::Ordering;

/// A realized arrival (forward pass) or required time (backward pass) at a
/// vertex for one tag.
///
/// Uniquely identified by `(vertex_id, tag_index)`. A fresh path created
/// before any propagation has reached it is `is_null`, holding only the
/// `±∞` sentinel values from invariant 4.
#[derive(Clone, Copy, Debug)]
pub struct Path {
    /// The vertex this path lives at.
    pub vertex_id: VertexId,
    /// The tag this path realizes.
    pub tag_index: TagIndex,
    /// The arrival time, or the `min_max`-appropriate `±∞` sentinel before
    /// any candidate has propagated here.
    pub arrival: f64,
    /// The required time, or the opposite sentinel before backward
    /// propagation reaches here.
    pub required: f64,
    /// The edge the winning candidate propagated across, if any.
    pub prev_edge: Option<EdgeId>,
    /// The arc index (within `prev_edge`'s arc set) the winning candidate
    /// used, if any.
    pub prev_arc_index: Option<usize>,
    /// The predecessor path the winning candidate extended, if any.
    pub prev_path: Option<(VertexId, TagIndex)>,
    /// `true` until the first candidate propagates to this path.
    pub is_null: bool,
}

impl Path {
    /// Creates a fresh, null path at `vertex_id` for `tag_index`.
    pub fn new(vertex_id: VertexId, tag_index: TagIndex, init_arrival: f64, init_required: f64) -> Self {
        Self {
            vertex_id,
            tag_index,
            arrival: init_arrival,
            required: init_required,
            prev_edge: None,
            prev_arc_index: None,
            prev_path: None,
            is_null: true,
        }
    }

    /// The slack of this path: `required − arrival` under `Max`,
    /// `arrival − required` under `Min`.
    pub fn slack(&self, min_max: MinMax) -> f64 {
        match min_max {
            MinMax::Max => self.required - self.arrival,
            MinMax::Min => self.arrival - self.required,
        }
    }

    /// Records a winning forward-propagation candidate.
    pub fn set_arrival(
        &mut self,
        arrival: f64,
        prev_edge: EdgeId,
        prev_arc_index: usize,
        prev_path: (VertexId, TagIndex),
    ) {
        self.arrival = arrival;
        self.prev_edge = Some(prev_edge);
        self.prev_arc_index = Some(prev_arc_index);
        self.prev_path = Some(prev_path);
        self.is_null = false;
    }

    /// Records a winning backward-propagation candidate.
    pub fn set_required(
        &mut self,
        required: f64,
        prev_edge: EdgeId,
        prev_arc_index: usize,
        prev_path: (VertexId, TagIndex),
    ) {
        self.required = required;
        self.prev_edge = Some(prev_edge);
        self.prev_arc_index = Some(prev_arc_index);
        self.prev_path = Some(prev_path);
        self.is_null = false;
    }
}

/// `true` if `p1` and `p2` are the same path: both null, or naming the same
/// `(vertex, tag)` (tag equality already implies transition and
/// analysis-point equality).
pub fn path_equal(p1: Option<&Path>, p2: Option<&Path>) -> bool {
    match (p1, p2) {
        (None, None) => true,
        (Some(a), None) | (None, Some(a)) => a.is_null,
        (Some(a), Some(b)) => {
            (a.is_null && b.is_null) || (a.vertex_id == b.vertex_id && a.tag_index == b.tag_index)
        }
    }
}

/// Lexicographic ordering on `(vertex_id, tag_index)`, nulls first.
pub fn path_cmp(p1: &Path, p2: &Path) -> Ordering {
    match (p1.is_null, p2.is_null) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => (p1.vertex_id, p1.tag_index).cmp(&(p2.vertex_id, p2.tag_index)),
    }
}

/// Vertex-id order, then CRPR-insensitive tag match ordering.
///
/// Two paths with match-equal tags (per [`TagInterner::tags_match`]) at the
/// same vertex compare equal even if their tag indices differ only in CRPR
/// state.
pub fn path_cmp_no_crpr(p1: &Path, p2: &Path, interner: &TagInterner) -> Ordering {
    match p1.vertex_id.cmp(&p2.vertex_id) {
        Ordering::Equal => {
            if interner.tags_match(p1.tag_index, p2.tag_index) {
                Ordering::Equal
            } else {
                p1.tag_index.cmp(&p2.tag_index)
            }
        }
        other => other,
    }
}

/// Outcome of [`path_cmp_all`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PathChainOrdering {
    /// The two chains compare equal (including the latch-loop and
    /// latch-D-to-Q termination cases).
    Equal,
    /// The two chains differ at the first point examined.
    NotEqual,
}

/// Walks back along `prev_path` from `p1` and `p2` in lockstep, comparing
/// node by node.
///
/// Terminates early (as [`PathChainOrdering::Equal`]) on either:
/// - encountering a previously-seen head vertex on both chains (a latch
///   loop), or
/// - crossing a [`TimingRole::LatchDtoQ`] arc on either chain (a loop
///   boundary).
pub fn path_cmp_all(p1: &Path, p2: &Path, graph: &TimingGraph) -> PathChainOrdering {
    let mut cur1 = Some(*p1);
    let mut cur2 = Some(*p2);
    let mut seen1 = std::collections::HashSet::new();
    let mut seen2 = std::collections::HashSet::new();

    loop {
        match (cur1, cur2) {
            (None, None) => return PathChainOrdering::Equal,
            (Some(a), Some(b)) => {
                if a.vertex_id != b.vertex_id || a.tag_index != b.tag_index {
                    return PathChainOrdering::NotEqual;
                }
                let key = (a.vertex_id, a.tag_index);
                if !seen1.insert(key) || !seen2.insert(key) {
                    // Revisited a head vertex: latch loop, treat as equal.
                    return PathChainOrdering::Equal;
                }
                if let Some(edge_id) = a.prev_edge {
                    if graph.edge(edge_id).role == TimingRole::LatchDtoQ {
                        return PathChainOrdering::Equal;
                    }
                }
                cur1 = a
                    .prev_path
                    .and_then(|(v, t)| graph.vertex(v).path(t).copied());
                cur2 = b
                    .prev_path
                    .and_then(|(v, t)| graph.vertex(v).path(t).copied());
            }
            _ => return PathChainOrdering::NotEqual,
        }
    }
}

/// Filters a vertex's `Path[]` by an optional `(RiseFall, PathAnalysisPt,
/// MinMax)` triple, resolved through a [`TagInterner`].
///
/// Iteration order matches storage order within the vertex's path array.
pub struct VertexPathIterator<'a> {
    paths: std::slice::Iter<'a, Path>,
    interner: &'a TagInterner,
    rf: Option<RiseFall>,
    path_ap: Option<PathAnalysisPt>,
    min_max: Option<MinMax>,
}

impl<'a> VertexPathIterator<'a> {
    /// Creates an iterator over `paths` filtered by the given optional
    /// constraints.
    pub fn new(
        paths: &'a [Path],
        interner: &'a TagInterner,
        rf: Option<RiseFall>,
        path_ap: Option<PathAnalysisPt>,
        min_max: Option<MinMax>,
    ) -> Self {
        Self {
            paths: paths.iter(),
            interner,
            rf,
            path_ap,
            min_max,
        }
    }
}

impl<'a> Iterator for VertexPathIterator<'a> {
    type Item = &'a Path;

    fn next(&mut self) -> Option<Self::Item> {
        for path in self.paths.by_ref() {
            let fields = self.interner.resolve_tag(path.tag_index);
            if let Some(rf) = self.rf {
                if fields.rf != rf {
                    continue;
                }
            }
            if let Some(ap) = self.path_ap {
                if fields.path_ap != ap {
                    continue;
                }
            }
            if let Some(mm) = self.min_max {
                if fields.path_ap.min_max != mm {
                    continue;
                }
            }
            return Some(path);
        }
        None
    }
}
