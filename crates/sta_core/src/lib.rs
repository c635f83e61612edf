//! Static timing analysis core: a levelized timing graph, tag-indexed path
//! propagation, pluggable arc delay calculation, and parasitic reduction.
//!
//! This crate implements the analysis kernel only: it does not parse
//! netlists, Liberty, or SPEF, and it carries no scripting or report-text
//! formatting surface. Callers build a [`graph::TimingGraph`] and a
//! [`constraints::TimingConstraints`] from whatever front end they have,
//! then hand both to [`session::analyze`].
//!
//! # Usage
//!
//! ```ignore
//! use sta_core::{analyze, AnalysisConfig, TimingConstraints, TimingGraph};
//! use sta_common::Interner;
//! use sta_diagnostics::DiagnosticSink;
//!
//! let interner = Interner::new();
//! let tag_interner = sta_core::TagInterner::new();
//! let mut graph = TimingGraph::new();
//! // ... populate graph with vertices/edges, compute and cache edge delays ...
//! let constraints = TimingConstraints::new();
//! let config = AnalysisConfig::new();
//! let sink = DiagnosticSink::new();
//! let report = analyze(&mut graph, &tag_interner, &interner, &constraints, &config, &sink)?;
//! println!("met: {}, worst slack: {:.3}ns", report.met, report.worst_slack_ns);
//! # Ok::<(), sta_common::InternalError>(())
//! ```
//!
//! # Architecture
//!
//! - [`graph`] — the levelized timing graph: vertices, edges, arc sets
//! - [`tag`] — tag/`ClkInfo` interning that distinguishes otherwise-identical paths
//! - [`analysis_point`] — corner × min/max analysis-point indexing
//! - [`bfs`] — levelized forward/backward traversal, optionally parallel per level
//! - [`parasitics`] — distributed-RC parasitic models and reduction
//! - [`dcalc`] — pluggable arc delay-calculation algorithms and their registry
//! - [`propagation`] — forward arrival / backward required-time propagation
//! - [`path`] — realized arrival/required values and path comparison
//! - [`constraints`] — clock/I-O-delay/exception constraint data model
//! - [`config`] — analysis configuration (delay-calc choice, corners, fuzzy epsilon)
//! - [`report`] — critical-path and clock-domain summaries
//! - [`session`] — top-level orchestration entry point
//! - [`pattern_match`], [`spef_names`] — name-matching and SPEF-name-translation utilities

#![warn(missing_docs)]

pub mod analysis_point;
pub mod bfs;
pub mod config;
pub mod constraints;
pub mod dcalc;
pub mod graph;
pub mod ids;
pub mod min_max;
pub mod parasitics;
pub mod pattern_match;
pub mod path;
pub mod port_direction;
pub mod propagation;
pub mod report;
pub mod session;
pub mod spef_names;
pub mod tag;
pub mod timing_role;
pub mod transition;

pub use analysis_point::{Corner, DcalcAnalysisPt, PathAnalysisPt};
pub use config::{AnalysisConfig, WireloadMode};
pub use constraints::{ClockConstraint, FalsePath, IoDelay, MaxDelayPath, MulticyclePath, TimingConstraints};
pub use dcalc::{ArcDcalcArg, ArcDcalcResult, ArcDelayCalc, DelayCalcRegistry};
pub use graph::{Edge, TimingArc, TimingArcSet, TimingGraph, Vertex};
pub use ids::{ClkInfoIndex, EdgeId, TagIndex, VertexId};
pub use min_max::MinMax;
pub use parasitics::{DetailedNetwork, Parasitic, ReductionKind};
pub use pattern_match::{pattern_has_wildcards, pattern_match, pattern_match_no_case, PatternMatch};
pub use path::Path;
pub use port_direction::PortDirection;
pub use report::{ClockDomainTiming, CriticalPath, PathElement, TimingEndpoint, TimingReport};
pub use session::analyze;
pub use spef_names::{spef_to_sta, sta_to_spef};
pub use tag::{ClkInfo, TagFields, TagInterner};
pub use timing_role::TimingRole;
pub use transition::RiseFall;
