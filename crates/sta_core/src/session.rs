//! Top-level analysis entry point: ties the graph, constraints, delay-calc
//! registry, BFS-driven propagation, and report builder together into one
//! call.

use crate::analysis_point::{Corner, PathAnalysisPt};
use crate::config::AnalysisConfig;
use crate::constraints::TimingConstraints;
use crate::graph::TimingGraph;
use crate::ids::VertexId;
use crate::min_max::MinMax;
use crate::propagation::{propagate_arrivals, propagate_requireds};
use crate::report::{self, ClockDomainTiming, CriticalPath, TimingReport, MAX_CRITICAL_PATHS};
use crate::tag::{ClkInfo, TagFields, TagInterner};
use crate::transition::RiseFall;
use sta_common::{Ident, Interner, StaResult};
use sta_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use sta_source::Span;

/// `T100`: reported once per negative-slack endpoint found in the final
/// report.
const CODE_TIMING_VIOLATION: u16 = 100;
/// `W100`: the configured delay-calc name isn't registered; `unit` was
/// substituted.
const CODE_UNKNOWN_DELAY_CALC: u16 = 100;

/// Runs one full analysis pass: levelizes the graph if needed, resolves
/// `config`'s delay calculator and drives it over every arc, seeds
/// arrivals/requireds from `constraints`, propagates forward then backward
/// at every analysis point `config` selects, and builds a [`TimingReport`].
///
/// Diagnoses a timing violation (`T100`) per negative-slack endpoint found,
/// and a fallback-substitution warning (`W100`) if `config`'s delay-calc
/// name isn't registered (the analysis itself still runs, against `unit`).
/// Propagation-level errors (tag-space exhaustion) are the only way this
/// returns `Err`; everything else degrades to a diagnostic and a best-effort
/// report.
pub fn analyze(
    graph: &mut TimingGraph,
    tag_interner: &TagInterner,
    interner: &Interner,
    constraints: &TimingConstraints,
    config: &AnalysisConfig,
    sink: &DiagnosticSink,
) -> StaResult<TimingReport> {
    if graph.vertex_count() == 0 {
        return Ok(TimingReport::empty());
    }
    if !graph.is_levelized() {
        graph.levelize();
    }

    let registry = crate::dcalc::DelayCalcRegistry::with_builtins();
    if !registry.is_name(&config.delay_calc_name) {
        sink.emit(Diagnostic::warning(
            DiagnosticCode::new(Category::Warning, CODE_UNKNOWN_DELAY_CALC),
            format!(
                "unknown delay-calc '{}', falling back to 'unit'",
                config.delay_calc_name
            ),
            Span::DUMMY,
        ));
    }
    let calc = registry
        .make(&config.delay_calc_name)
        .or_else(|| registry.make("unit"))
        .expect("'unit' delay calculator is always registered");

    let corner = Corner::from_raw(0);
    let mut all_critical_paths: Vec<CriticalPath> = Vec::new();

    for &min_max in &config.min_max_set {
        let path_ap = PathAnalysisPt::new(corner, min_max);
        let dcalc_ap = crate::analysis_point::DcalcAnalysisPt::new(path_ap);

        crate::dcalc::calculate_delays(graph, calc.as_ref(), dcalc_ap);

        seed_source_arrivals(graph, tag_interner, interner, constraints, path_ap)?;
        seed_sink_requireds(graph, tag_interner, interner, constraints, path_ap)?;

        propagate_arrivals(graph, tag_interner, dcalc_ap, path_ap)?;
        propagate_requireds(graph, tag_interner, dcalc_ap, path_ap)?;

        let mut paths = report::worst_paths(graph, interner, tag_interner, path_ap, MAX_CRITICAL_PATHS);
        all_critical_paths.append(&mut paths);
    }

    all_critical_paths.sort_by(|a, b| a.slack_ns.partial_cmp(&b.slack_ns).unwrap_or(std::cmp::Ordering::Equal));
    all_critical_paths.truncate(MAX_CRITICAL_PATHS);

    for path in &all_critical_paths {
        if path.slack_ns < 0.0 {
            sink.emit(Diagnostic::warning(
                DiagnosticCode::new(Category::Timing, CODE_TIMING_VIOLATION),
                format!(
                    "timing violation: {} -> {} slack {:.3}ns",
                    interner.resolve(path.from.name),
                    interner.resolve(path.to.name),
                    path.slack_ns
                ),
                Span::DUMMY,
            ));
        }
    }

    let clocks: Vec<(Ident, f64)> = constraints
        .clocks
        .iter()
        .map(|c| (c.name, c.period_ns))
        .collect();
    let clock_domains: Vec<ClockDomainTiming> =
        report::clock_domain_summaries(interner, &clocks, &all_critical_paths);

    let worst_slack_ns = all_critical_paths
        .iter()
        .map(|p| p.slack_ns)
        .fold(f64::INFINITY, f64::min);
    let met = all_critical_paths.iter().all(|p| p.slack_ns >= 0.0);

    Ok(TimingReport {
        clock_domains,
        critical_paths: all_critical_paths,
        worst_slack_ns,
        met,
    })
}

/// Seeds every source vertex's arrival at `path_ap`: a matching
/// `set_input_delay` constraint supplies the seed value, otherwise the
/// source seeds at `0.0` (an unconstrained primary input).
fn seed_source_arrivals(
    graph: &mut TimingGraph,
    tag_interner: &TagInterner,
    interner: &Interner,
    constraints: &TimingConstraints,
    path_ap: PathAnalysisPt,
) -> StaResult<()> {
    let init_arrival = path_ap.min_max.init_arrival();
    let init_required = path_ap.min_max.init_required();
    for v in graph.source_vertices() {
        let name = graph.vertex(v).name;
        let arrival = input_delay_for(interner, constraints, name).unwrap_or(0.0);
        seed_vertex(graph, tag_interner, v, path_ap, init_arrival, init_required, Some(arrival), None)?;
    }
    Ok(())
}

/// Seeds every sink vertex's required time at `path_ap`: a matching
/// `set_output_delay`/clock constraint supplies `period - delay`, otherwise
/// the sink is left at its sentinel (unconstrained, excluded from
/// reporting).
fn seed_sink_requireds(
    graph: &mut TimingGraph,
    tag_interner: &TagInterner,
    interner: &Interner,
    constraints: &TimingConstraints,
    path_ap: PathAnalysisPt,
) -> StaResult<()> {
    let init_arrival = path_ap.min_max.init_arrival();
    let init_required = path_ap.min_max.init_required();
    for v in graph.sink_vertices() {
        let name = graph.vertex(v).name;
        let Some((output_delay, clock)) = output_delay_for(interner, constraints, name) else {
            continue;
        };
        let required = constraints
            .find_clock(clock)
            .map(|c| c.period_ns - output_delay)
            .unwrap_or(-output_delay);
        seed_vertex(graph, tag_interner, v, path_ap, init_arrival, init_required, None, Some(required))?;
    }
    Ok(())
}

fn input_delay_for(interner: &Interner, constraints: &TimingConstraints, port: Ident) -> Option<f64> {
    let _ = interner;
    constraints
        .input_delays
        .iter()
        .find(|d| d.port == port)
        .map(|d| d.delay_ns)
}

fn output_delay_for(interner: &Interner, constraints: &TimingConstraints, port: Ident) -> Option<(f64, Ident)> {
    let _ = interner;
    constraints
        .output_delays
        .iter()
        .find(|d| d.port == port)
        .map(|d| (d.delay_ns, d.clock))
}

/// Seeds one vertex's arrival and/or required value at every rise/fall tag,
/// interning a fresh unclocked tag for each.
#[allow(clippy::too_many_arguments)]
fn seed_vertex(
    graph: &mut TimingGraph,
    tag_interner: &TagInterner,
    vertex: VertexId,
    path_ap: PathAnalysisPt,
    init_arrival: f64,
    init_required: f64,
    arrival: Option<f64>,
    required: Option<f64>,
) -> StaResult<()> {
    let clk_info = tag_interner.clk_info(ClkInfo {
        clock: None,
        clock_edge: RiseFall::Rise,
        crpr_pin: None,
        generated_state: None,
        pll_state: None,
        path_ap,
    });
    for rf in RiseFall::ALL {
        let tag = tag_interner.tag(TagFields {
            rf,
            path_ap,
            clk_info,
            is_clock: false,
            exception_states: vec![],
        })?;
        let path = graph
            .vertex_mut(vertex)
            .path_mut_or_init(tag, init_arrival, init_required);
        if let Some(arrival) = arrival {
            path.arrival = arrival;
            path.is_null = false;
        }
        if let Some(required) = required {
            path.required = required;
            path.is_null = false;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{ClockConstraint, IoDelay};
    use crate::graph::TimingArcSet;
    use crate::port_direction::PortDirection;
    use crate::timing_role::TimingRole;

    /// Two combinational edges, A->B->Q; `analyze` drives the default `unit`
    /// delay calculator over them (1.0ns gate delay per arc), so no delay is
    /// poked in directly here.
    fn simple_chain(interner: &Interner) -> TimingGraph {
        let mut g = TimingGraph::new();
        let a = g.add_vertex(interner.get_or_intern("A"), PortDirection::Input);
        let b = g.add_vertex(interner.get_or_intern("B"), PortDirection::Internal);
        let c = g.add_vertex(interner.get_or_intern("Q"), PortDirection::Output);
        g.add_edge(a, b, TimingRole::Combinational, TimingArcSet::non_inverting());
        g.add_edge(b, c, TimingRole::Combinational, TimingArcSet::non_inverting());
        g.levelize();
        g
    }

    #[test]
    fn empty_graph_produces_empty_report() {
        let interner = Interner::new();
        let tag_interner = TagInterner::new();
        let mut g = TimingGraph::new();
        let constraints = TimingConstraints::new();
        let config = AnalysisConfig::new();
        let sink = DiagnosticSink::new();
        let report = analyze(&mut g, &tag_interner, &interner, &constraints, &config, &sink).unwrap();
        assert!(report.met);
        assert!(report.critical_paths.is_empty());
    }

    #[test]
    fn unconstrained_design_has_no_reported_violations() {
        let interner = Interner::new();
        let tag_interner = TagInterner::new();
        let mut g = simple_chain(&interner);
        let constraints = TimingConstraints::new();
        let config = AnalysisConfig {
            delay_calc_name: "unit".to_string(),
            min_max_set: vec![MinMax::Max],
            ..AnalysisConfig::new()
        };
        let sink = DiagnosticSink::new();
        let report = analyze(&mut g, &tag_interner, &interner, &constraints, &config, &sink).unwrap();
        // no output_delay constraint means the sink's required time is never
        // seeded, so no critical path gets reported
        assert!(report.critical_paths.is_empty());
    }

    #[test]
    fn output_delay_constraint_drives_violation_report() {
        let interner = Interner::new();
        let tag_interner = TagInterner::new();
        let mut g = simple_chain(&interner);
        let mut constraints = TimingConstraints::new();
        constraints.clocks.push(ClockConstraint {
            name: interner.get_or_intern("clk"),
            // Two unit-calc arcs arrive at 2.0ns; a 1.0ns period forces a
            // violation without hand-poking a delay value.
            period_ns: 1.0,
            port: interner.get_or_intern("clk_port"),
            waveform: None,
        });
        constraints.output_delays.push(IoDelay {
            port: interner.get_or_intern("Q"),
            clock: interner.get_or_intern("clk"),
            delay_ns: 0.0,
        });
        let config = AnalysisConfig {
            delay_calc_name: "unit".to_string(),
            min_max_set: vec![MinMax::Max],
            ..AnalysisConfig::new()
        };
        let sink = DiagnosticSink::new();
        let report = analyze(&mut g, &tag_interner, &interner, &constraints, &config, &sink).unwrap();
        assert!(!report.critical_paths.is_empty());
        assert!(!report.met);
        assert!(sink.diagnostics().iter().any(|d| d.code.category == Category::Timing));
    }

    #[test]
    fn unknown_delay_calc_emits_fallback_warning() {
        let interner = Interner::new();
        let tag_interner = TagInterner::new();
        let mut g = simple_chain(&interner);
        let constraints = TimingConstraints::new();
        let config = AnalysisConfig {
            delay_calc_name: "does_not_exist".to_string(),
            min_max_set: vec![MinMax::Max],
            ..AnalysisConfig::new()
        };
        let sink = DiagnosticSink::new();
        analyze(&mut g, &tag_interner, &interner, &constraints, &config, &sink).unwrap();
        assert!(sink
            .diagnostics()
            .iter()
            .any(|d| d.code.category == Category::Warning));
    }
}
