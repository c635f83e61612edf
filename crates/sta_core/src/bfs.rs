//! Levelized breadth-first traversal, forward and backward, with optional
//! parallel visiting of one level at a time.

use crate::graph::TimingGraph;
use crate::ids::VertexId;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::Ordering;
use std::sync::Mutex;

/// Identifies which concurrent BFS traversal a vertex's queued-flag bit
/// belongs to, so several BFS passes can run over the same graph without
/// interfering with each other's duplicate suppression.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BfsIndex {
    /// The delay-calculation pass.
    Dcalc,
    /// The forward arrival-propagation pass.
    Arrival,
    /// The backward required-time-propagation pass.
    Required,
    /// Any other caller-defined traversal.
    Other,
}

impl BfsIndex {
    fn bit(self) -> u8 {
        match self {
            BfsIndex::Dcalc => 0b0001,
            BfsIndex::Arrival => 0b0010,
            BfsIndex::Required => 0b0100,
            BfsIndex::Other => 0b1000,
        }
    }
}

/// The direction a [`BfsIterator`] walks the graph.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    /// Ascending level order, following out-edges.
    Forward,
    /// Descending level order, following in-edges.
    Backward,
}

/// A levelized forward or backward BFS traversal over a [`TimingGraph`].
///
/// The queue is a set of per-level buckets. `next()` drains the current
/// level's bucket before advancing; within a level, order is insertion
/// order in sequential use. A vertex already queued under this iterator's
/// [`BfsIndex`] is not enqueued twice — `enqueue` on an already-marked
/// vertex is a no-op.
pub struct BfsIterator<'g> {
    graph: &'g TimingGraph,
    bfs_index: BfsIndex,
    direction: Direction,
    queue: Mutex<BTreeMap<u32, VecDeque<VertexId>>>,
}

impl<'g> BfsIterator<'g> {
    /// Creates a new, empty forward BFS iterator using `bfs_index`'s flag
    /// bit for duplicate suppression.
    pub fn forward(graph: &'g TimingGraph, bfs_index: BfsIndex) -> Self {
        Self {
            graph,
            bfs_index,
            direction: Direction::Forward,
            queue: Mutex::new(BTreeMap::new()),
        }
    }

    /// Creates a new, empty backward BFS iterator.
    pub fn backward(graph: &'g TimingGraph, bfs_index: BfsIndex) -> Self {
        Self {
            graph,
            bfs_index,
            direction: Direction::Backward,
            queue: Mutex::new(BTreeMap::new()),
        }
    }

    fn level_of(&self, v: VertexId) -> u32 {
        self.graph.vertex(v).level
    }

    /// Resets to virgin state, clearing every vertex's queued flag for this
    /// iterator's `bfs_index`.
    pub fn clear(&self) {
        let mut queue = self.queue.lock().unwrap();
        for verts in queue.values() {
            for &v in verts {
                self.clear_flag(v);
            }
        }
        queue.clear();
    }

    /// `true` if no vertex is currently queued.
    pub fn empty(&self) -> bool {
        self.queue.lock().unwrap().values().all(|v| v.is_empty())
    }

    fn mark_flag(&self, v: VertexId) -> bool {
        let bit = self.bfs_index.bit();
        let prev = self.graph.vertex(v).bfs_flags.fetch_or(bit, Ordering::AcqRel);
        prev & bit == 0
    }

    fn clear_flag(&self, v: VertexId) {
        let bit = self.bfs_index.bit();
        self.graph.vertex(v).bfs_flags.fetch_and(!bit, Ordering::AcqRel);
    }

    /// `true` if `vertex` is currently marked as queued under this
    /// iterator's `bfs_index`.
    pub fn in_queue(&self, vertex: VertexId) -> bool {
        let bit = self.bfs_index.bit();
        self.graph.vertex(vertex).bfs_flags.load(Ordering::Acquire) & bit != 0
    }

    /// Enqueues `vertex` to search from. A no-op if it is already queued.
    pub fn enqueue(&self, vertex: VertexId) {
        if self.mark_flag(vertex) {
            let level = self.level_of(vertex);
            self.queue.lock().unwrap().entry(level).or_default().push_back(vertex);
        }
    }

    /// Enqueues the fanout of `vertex` (out-edges if forward, in-edges if
    /// backward), skipping feedback edges, optionally bounded to
    /// `to_level`.
    pub fn enqueue_adjacent_vertices(&self, vertex: VertexId, to_level: Option<u32>) {
        let edge_ids: Vec<_> = match self.direction {
            Direction::Forward => self.graph.out_edges(vertex).to_vec(),
            Direction::Backward => self.graph.in_edges(vertex).to_vec(),
        };
        for edge_id in edge_ids {
            let edge = self.graph.edge(edge_id);
            if edge.is_feedback {
                continue;
            }
            let next = match self.direction {
                Direction::Forward => edge.to,
                Direction::Backward => edge.from,
            };
            let level = self.level_of(next);
            let in_bound = match (to_level, self.direction) {
                (None, _) => true,
                (Some(limit), Direction::Forward) => level <= limit,
                (Some(limit), Direction::Backward) => level >= limit,
            };
            if in_bound {
                self.enqueue(next);
            }
        }
    }

    /// Notifies the iterator that `vertex` is about to be deleted from the
    /// graph, so its queued state is cleared first.
    pub fn delete_vertex_before(&self, vertex: VertexId) {
        self.remove(vertex);
    }

    /// Removes `vertex` from the queue if present.
    pub fn remove(&self, vertex: VertexId) {
        if self.in_queue(vertex) {
            let level = self.level_of(vertex);
            let mut queue = self.queue.lock().unwrap();
            if let Some(bucket) = queue.get_mut(&level) {
                bucket.retain(|&v| v != vertex);
            }
            drop(queue);
            self.clear_flag(vertex);
        }
    }

    fn next_level_key(&self, to_level: Option<u32>) -> Option<u32> {
        let queue = self.queue.lock().unwrap();
        let levels = queue.iter().filter(|(_, v)| !v.is_empty()).map(|(&l, _)| l);
        match (self.direction, to_level) {
            (Direction::Forward, None) => levels.min(),
            (Direction::Forward, Some(limit)) => levels.filter(|&l| l <= limit).min(),
            (Direction::Backward, None) => levels.max(),
            (Direction::Backward, Some(limit)) => levels.filter(|&l| l >= limit).max(),
        }
    }

    /// `true` if a next vertex exists, optionally bounded to `to_level`.
    pub fn has_next(&self, to_level: Option<u32>) -> bool {
        self.next_level_key(to_level).is_some()
    }

    /// Dequeues and returns the next vertex in level order, or `None` if
    /// the queue is exhausted.
    pub fn next(&self) -> Option<VertexId> {
        let level = self.next_level_key(None)?;
        let mut queue = self.queue.lock().unwrap();
        let bucket = queue.get_mut(&level)?;
        let vertex = bucket.pop_front()?;
        if bucket.is_empty() {
            queue.remove(&level);
        }
        drop(queue);
        self.clear_flag(vertex);
        Some(vertex)
    }

    /// Applies `visitor` to every queued vertex up to `to_level`, in level
    /// order, draining the queue as it goes. The visitor may enqueue
    /// further vertices (e.g. the fanout of the one just visited); they are
    /// visited in their turn if within `to_level`.
    ///
    /// Returns the number of distinct vertices visited.
    pub fn visit(&self, to_level: Option<u32>, mut visitor: impl FnMut(&TimingGraph, VertexId)) -> usize {
        let mut count = 0;
        while self.has_next(to_level) {
            let level = self.next_level_key(to_level).unwrap();
            let vertex = {
                let mut queue = self.queue.lock().unwrap();
                let bucket = queue.get_mut(&level).unwrap();
                let vertex = bucket.pop_front().unwrap();
                if bucket.is_empty() {
                    queue.remove(&level);
                }
                vertex
            };
            self.clear_flag(vertex);
            visitor(self.graph, vertex);
            count += 1;
        }
        count
    }

    /// Like [`BfsIterator::visit`], but each level's bucket is visited
    /// concurrently via a thread pool. `visitor` must be thread-safe:
    /// ordering *within* a level is unspecified, but every vertex of level
    /// `k` completes before any vertex of level `k±1` begins.
    ///
    /// Returns the number of distinct vertices visited.
    pub fn visit_parallel(
        &self,
        to_level: Option<u32>,
        visitor: impl Fn(&TimingGraph, VertexId) + Sync,
    ) -> usize {
        let mut count = 0;
        while let Some(level) = self.next_level_key(to_level) {
            let bucket = {
                let mut queue = self.queue.lock().unwrap();
                queue.remove(&level).unwrap_or_default()
            };
            for &v in &bucket {
                self.clear_flag(v);
            }
            count += bucket.len();
            use rayon::prelude::*;
            bucket.par_iter().for_each(|&v| visitor(self.graph, v));
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TimingArcSet;
    use crate::port_direction::PortDirection;
    use crate::timing_role::TimingRole;
    use sta_common::Interner;
    use std::sync::atomic::AtomicUsize;

    fn build_reconverging_graph() -> TimingGraph {
        // levels: 0 -> 1 -> 2 -> 1 (reconverging diamond collapsing back to
        // level 1 through a second level-0 source)
        let interner = Interner::new();
        let mut g = TimingGraph::new();
        let s0 = g.add_vertex(interner.get_or_intern("s0"), PortDirection::Input);
        let s1 = g.add_vertex(interner.get_or_intern("s1"), PortDirection::Input);
        let l1a = g.add_vertex(interner.get_or_intern("l1a"), PortDirection::Internal);
        let l1b = g.add_vertex(interner.get_or_intern("l1b"), PortDirection::Internal);
        let l2 = g.add_vertex(interner.get_or_intern("l2"), PortDirection::Output);
        g.add_edge(s0, l1a, TimingRole::Combinational, TimingArcSet::non_inverting());
        g.add_edge(s1, l1b, TimingRole::Combinational, TimingArcSet::non_inverting());
        g.add_edge(l1a, l2, TimingRole::Combinational, TimingArcSet::non_inverting());
        g.levelize();
        let _ = l1b;
        g
    }

    #[test]
    fn enqueue_is_idempotent() {
        let g = build_reconverging_graph();
        let bfs = BfsIterator::forward(&g, BfsIndex::Other);
        let v = g.source_vertices()[0];
        bfs.enqueue(v);
        bfs.enqueue(v);
        assert_eq!(bfs.visit(None, |_, _| {}), 1);
    }

    #[test]
    fn distinct_bfs_index_independent_flags() {
        let g = build_reconverging_graph();
        let v = g.source_vertices()[0];
        let a = BfsIterator::forward(&g, BfsIndex::Arrival);
        let b = BfsIterator::forward(&g, BfsIndex::Required);
        a.enqueue(v);
        assert!(a.in_queue(v));
        assert!(!b.in_queue(v));
    }

    #[test]
    fn level_order_forward() {
        let interner = Interner::new();
        let mut g = TimingGraph::new();
        let a = g.add_vertex(interner.get_or_intern("a"), PortDirection::Input);
        let b = g.add_vertex(interner.get_or_intern("b"), PortDirection::Internal);
        let c = g.add_vertex(interner.get_or_intern("c"), PortDirection::Output);
        g.add_edge(a, b, TimingRole::Combinational, TimingArcSet::non_inverting());
        g.add_edge(b, c, TimingRole::Combinational, TimingArcSet::non_inverting());
        g.levelize();

        let bfs = BfsIterator::forward(&g, BfsIndex::Arrival);
        bfs.enqueue(a);
        let mut order = Vec::new();
        bfs.visit(None, |graph, v| {
            order.push(v);
            bfs.enqueue_adjacent_vertices(v, None);
            let _ = graph;
        });
        assert_eq!(order, vec![a, b, c]);
    }

    #[test]
    fn same_level_vertices_visited_in_enqueue_order() {
        let interner = Interner::new();
        let mut g = TimingGraph::new();
        let s0 = g.add_vertex(interner.get_or_intern("s0"), PortDirection::Input);
        let s1 = g.add_vertex(interner.get_or_intern("s1"), PortDirection::Input);
        let s2 = g.add_vertex(interner.get_or_intern("s2"), PortDirection::Input);
        g.levelize();

        let bfs = BfsIterator::forward(&g, BfsIndex::Arrival);
        // All three share level 0; enqueue order must equal visit order.
        bfs.enqueue(s0);
        bfs.enqueue(s1);
        bfs.enqueue(s2);
        let mut order = Vec::new();
        bfs.visit(None, |_, v| order.push(v));
        assert_eq!(order, vec![s0, s1, s2]);
    }

    #[test]
    fn every_level_1_before_any_level_2() {
        let g = build_reconverging_graph();
        let bfs = BfsIterator::forward(&g, BfsIndex::Arrival);
        for s in g.source_vertices() {
            bfs.enqueue(s);
        }
        let mut levels_seen = Vec::new();
        bfs.visit(None, |graph, v| {
            levels_seen.push(graph.vertex(v).level);
            bfs.enqueue_adjacent_vertices(v, None);
        });
        // every level-1 entry appears before the single level-2 entry
        let first_level_2 = levels_seen.iter().position(|&l| l == 2).unwrap();
        assert!(levels_seen[..first_level_2].iter().all(|&l| l <= 1));
    }

    #[test]
    fn visit_count_equals_distinct_vertices() {
        let g = build_reconverging_graph();
        let bfs = BfsIterator::forward(&g, BfsIndex::Arrival);
        for s in g.source_vertices() {
            bfs.enqueue(s);
        }
        let count = bfs.visit(None, |_, v| {
            bfs.enqueue_adjacent_vertices(v, None);
        });
        assert_eq!(count, g.vertex_count());
    }

    #[test]
    fn remove_clears_flag_and_bucket() {
        let g = build_reconverging_graph();
        let bfs = BfsIterator::forward(&g, BfsIndex::Other);
        let v = g.source_vertices()[0];
        bfs.enqueue(v);
        assert!(bfs.in_queue(v));
        bfs.remove(v);
        assert!(!bfs.in_queue(v));
        assert_eq!(bfs.visit(None, |_, _| {}), 0);
    }

    #[test]
    fn parallel_visit_pool_size_one_matches_sequential() {
        let g = build_reconverging_graph();
        let sequential = BfsIterator::forward(&g, BfsIndex::Arrival);
        let parallel = BfsIterator::forward(&g, BfsIndex::Required);
        for s in g.source_vertices() {
            sequential.enqueue(s);
            parallel.enqueue(s);
        }

        let seq_counter = AtomicUsize::new(0);
        let seq_count = sequential.visit(None, |_, v| {
            seq_counter.fetch_add(1, Ordering::Relaxed);
            sequential.enqueue_adjacent_vertices(v, None);
        });

        let par_counter = AtomicUsize::new(0);
        let par_count = parallel.visit_parallel(None, |_, v| {
            par_counter.fetch_add(1, Ordering::Relaxed);
            parallel.enqueue_adjacent_vertices(v, None);
        });

        assert_eq!(seq_count, par_count);
        assert_eq!(
            seq_counter.load(Ordering::Relaxed),
            par_counter.load(Ordering::Relaxed)
        );
    }
}
