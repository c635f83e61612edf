//! Timing report types and the critical-path/clock-domain summaries built
//! from a propagated [`TimingGraph`].
//!
//! Unlike a flat arrival-array backtrack, critical paths here are recovered
//! by walking a [`Path`]'s `prev_path` chain — the same link path
//! propagation already maintains for invariant 4 verification.

use crate::analysis_point::PathAnalysisPt;
use crate::graph::TimingGraph;
use crate::ids::VertexId;
use crate::min_max::MinMax;
use crate::tag::TagInterner;
use sta_common::{Ident, Interner};

/// How many critical paths [`worst_paths`] collects per analysis point.
pub const MAX_CRITICAL_PATHS: usize = 10;

/// One endpoint (launch or capture pin) of a reported path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingEndpoint {
    /// The vertex this endpoint names.
    pub vertex: VertexId,
    /// The interned pin name.
    pub name: Ident,
}

/// One hop along a reported critical path, in launch-to-capture order.
#[derive(Debug, Clone)]
pub struct PathElement {
    /// The vertex visited at this hop.
    pub vertex: VertexId,
    /// The pin name, resolved for display.
    pub node_name: String,
    /// Delay contributed by the edge into this hop (0 at the launch point).
    pub incremental_ns: f64,
    /// Running arrival time at this hop.
    pub cumulative_ns: f64,
}

/// One worst-case path at a single analysis point.
#[derive(Debug, Clone)]
pub struct CriticalPath {
    /// The path's launch endpoint.
    pub from: TimingEndpoint,
    /// The path's capture endpoint.
    pub to: TimingEndpoint,
    /// Arrival time at the endpoint.
    pub arrival_ns: f64,
    /// Required time at the endpoint.
    pub required_ns: f64,
    /// Slack at the endpoint (`required - arrival` under `Max`, the reverse
    /// under `Min`).
    pub slack_ns: f64,
    /// The hop-by-hop breakdown, launch point first.
    pub elements: Vec<PathElement>,
}

/// Per-clock summary of the worst slack and endpoint/violation counts seen
/// among paths whose launch or capture pin name contains the clock's name.
///
/// The substring match is a coarse heuristic appropriate for a summary
/// view; it is not used to drive analysis itself.
#[derive(Debug, Clone)]
pub struct ClockDomainTiming {
    /// The clock's name.
    pub clock_name: Ident,
    /// The clock's period in nanoseconds.
    pub period_ns: f64,
    /// Worst (most negative) slack seen among this clock's paths.
    pub worst_slack_ns: f64,
    /// Number of critical paths attributed to this clock.
    pub critical_path_count: usize,
    /// Number of distinct endpoints attributed to this clock.
    pub endpoint_count: usize,
    /// `true` if no attributed path has negative slack.
    pub met: bool,
}

/// The full result of one analysis run at one analysis point.
#[derive(Debug, Clone)]
pub struct TimingReport {
    /// Per-clock summaries.
    pub clock_domains: Vec<ClockDomainTiming>,
    /// The worst paths found, worst slack first.
    pub critical_paths: Vec<CriticalPath>,
    /// The single worst slack across all reported paths.
    pub worst_slack_ns: f64,
    /// `true` if every reported path has non-negative slack.
    pub met: bool,
}

impl TimingReport {
    /// A report with nothing in it: no paths, vacuously met.
    pub fn empty() -> Self {
        Self {
            clock_domains: Vec::new(),
            critical_paths: Vec::new(),
            worst_slack_ns: f64::INFINITY,
            met: true,
        }
    }

    /// The number of reported paths with negative slack.
    pub fn violation_count(&self) -> usize {
        self.critical_paths.iter().filter(|p| p.slack_ns < 0.0).count()
    }
}

/// Walks `path`'s `prev_path` chain back to its launch point, building
/// hop-by-hop [`PathElement`]s in launch-to-capture order.
fn walk_path_elements(graph: &TimingGraph, interner: &Interner, endpoint: &crate::path::Path) -> Vec<PathElement> {
    let mut hops = Vec::new();
    let mut cur = Some(*endpoint);
    let mut seen = std::collections::HashSet::new();
    while let Some(p) = cur {
        let key = (p.vertex_id, p.tag_index);
        if !seen.insert(key) {
            break;
        }
        let name = graph.vertex(p.vertex_id).name;
        let incremental = match p.prev_path.and_then(|(v, t)| graph.vertex(v).path(t).copied()) {
            Some(prev) => p.arrival - prev.arrival,
            None => 0.0,
        };
        hops.push(PathElement {
            vertex: p.vertex_id,
            node_name: interner.resolve(name).to_string(),
            incremental_ns: incremental,
            cumulative_ns: p.arrival,
        });
        cur = p
            .prev_path
            .and_then(|(v, t)| graph.vertex(v).path(t).copied());
    }
    hops.reverse();
    hops
}

/// Collects up to `max_paths` worst-slack endpoints at `path_ap`, building
/// a [`CriticalPath`] for each.
///
/// Candidates are drawn only from graph sinks: the vertices a required time
/// is externally anchored at (a register data input, a primary output).
/// Interior vertices always have a required time too (propagation reaches
/// every vertex reachable backward from a sink), but reporting a "critical
/// path" that both starts and ends at the same interior vertex isn't a
/// meaningful report entry.
pub fn worst_paths(
    graph: &TimingGraph,
    interner: &Interner,
    tag_interner: &TagInterner,
    path_ap: PathAnalysisPt,
    max_paths: usize,
) -> Vec<CriticalPath> {
    let mut candidates: Vec<(f64, VertexId, crate::path::Path)> = Vec::new();
    for vertex_id in graph.sink_vertices() {
        for path in &graph.vertex(vertex_id).paths {
            if path.is_null {
                continue;
            }
            let fields = tag_interner.resolve_tag(path.tag_index);
            if fields.path_ap != path_ap {
                continue;
            }
            if !path.arrival.is_finite() || !path.required.is_finite() {
                continue;
            }
            candidates.push((path.slack(path_ap.min_max), vertex_id, *path));
        }
    }
    candidates.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    candidates
        .into_iter()
        .take(max_paths)
        .map(|(slack, vertex_id, path)| {
            let elements = walk_path_elements(graph, interner, &path);
            let from = elements
                .first()
                .map(|e| TimingEndpoint {
                    vertex: e.vertex,
                    name: graph.vertex(e.vertex).name,
                })
                .unwrap_or(TimingEndpoint {
                    vertex: vertex_id,
                    name: graph.vertex(vertex_id).name,
                });
            CriticalPath {
                from,
                to: TimingEndpoint {
                    vertex: vertex_id,
                    name: graph.vertex(vertex_id).name,
                },
                arrival_ns: path.arrival,
                required_ns: path.required,
                slack_ns: slack,
                elements,
            }
        })
        .collect()
}

/// Groups `critical_paths` by clock, attributing a path to a clock whose
/// name appears as a substring of either endpoint's resolved name.
pub fn clock_domain_summaries(
    interner: &Interner,
    clocks: &[(Ident, f64)],
    critical_paths: &[CriticalPath],
) -> Vec<ClockDomainTiming> {
    clocks
        .iter()
        .map(|&(clock_name, period_ns)| {
            let clock_str = interner.resolve(clock_name);
            let attributed: Vec<&CriticalPath> = critical_paths
                .iter()
                .filter(|p| {
                    interner.resolve(p.from.name).contains(clock_str)
                        || interner.resolve(p.to.name).contains(clock_str)
                })
                .collect();
            let worst_slack_ns = attributed
                .iter()
                .map(|p| p.slack_ns)
                .fold(f64::INFINITY, f64::min);
            let mut endpoints = std::collections::HashSet::new();
            for p in &attributed {
                endpoints.insert(p.to.vertex);
            }
            ClockDomainTiming {
                clock_name,
                period_ns,
                worst_slack_ns,
                critical_path_count: attributed.len(),
                endpoint_count: endpoints.len(),
                met: attributed.iter().all(|p| p.slack_ns >= 0.0),
            }
        })
        .collect()
}
