//! Parasitic network models and the reduction from a detailed RC network to
//! the form a delay calculator consumes.

use crate::analysis_point::DcalcAnalysisPt;
use crate::ids::VertexId;
use crate::transition::RiseFall;
use sta_common::fuzzy::fuzzy_equal;
use std::collections::HashMap;

/// A single RC element of a [`DetailedNetwork`]: a capacitor to ground, or a
/// resistor between two named nodes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RcElement {
    /// Capacitance to ground at `node`.
    Cap {
        /// Index of the node this capacitance is attached to.
        node: usize,
        /// Capacitance value.
        farads: f64,
    },
    /// Resistance between two nodes.
    Res {
        /// Index of the first node.
        from: usize,
        /// Index of the second node.
        to: usize,
        /// Resistance value.
        ohms: f64,
    },
}

/// An un-reduced distributed RC network, as read from a parasitics file.
///
/// Node 0 is always the driver pin. This is the input to
/// [`reduce`]; the `dcalc` name determines which [`Parasitic`] variant the
/// network is reduced to.
#[derive(Clone, Debug, Default)]
pub struct DetailedNetwork {
    /// The RC elements making up this network.
    pub elements: Vec<RcElement>,
}

impl DetailedNetwork {
    /// Total lumped capacitance: the sum of every `Cap` element, ignoring
    /// topology. Used directly by the `unit` and `lumped_cap` calculators.
    pub fn total_cap(&self) -> f64 {
        self.elements
            .iter()
            .filter_map(|e| match e {
                RcElement::Cap { farads, .. } => Some(*farads),
                RcElement::Res { .. } => None,
            })
            .sum()
    }
}

/// The reduced parasitic model attached to a driver pin's output arcs.
///
/// Every variant is a lossy summary of a [`DetailedNetwork`] aimed at one
/// delay-calculation algorithm; which variant a reduction produces is chosen
/// by the calculator's name, not by the network's shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Parasitic {
    /// A single lumped capacitance. The `unit` and `lumped_cap` calculators'
    /// native representation.
    LumpedCap {
        /// Total capacitance at the driver output.
        total_cap: f64,
    },
    /// First-moment (Elmore) delay model: total capacitance plus the
    /// resistance-weighted first moment of the tree.
    Elmore {
        /// Total capacitance at the driver output.
        total_cap: f64,
        /// Elmore delay constant (resistance-weighted first moment).
        elmore_delay: f64,
    },
    /// Two-pole reduced model (driving-point admittance moments).
    PiModel {
        /// Near-driver capacitance.
        c_near: f64,
        /// Bridging resistance.
        r: f64,
        /// Far capacitance.
        c_far: f64,
    },
    /// Pole-residue model as produced by higher-order moment-matching
    /// (Arnoldi/PRIMA-style) reduction.
    PoleResidue {
        /// Pole locations.
        poles: Vec<f64>,
        /// Residues corresponding to each pole.
        residues: Vec<f64>,
    },
    /// The network is kept in its detailed, unreduced form (e.g. for a
    /// calculator that walks the RC tree directly).
    DistributedRc {
        /// The unreduced network.
        network: DetailedNetwork,
    },
}

impl Parasitic {
    /// The total driver-output capacitance this model implies, regardless
    /// of variant — the quantity every calculator needs at minimum.
    pub fn total_cap(&self) -> f64 {
        match self {
            Parasitic::LumpedCap { total_cap } => *total_cap,
            Parasitic::Elmore { total_cap, .. } => *total_cap,
            Parasitic::PiModel { c_near, c_far, .. } => c_near + c_far,
            Parasitic::PoleResidue { residues, .. } => residues.iter().sum(),
            Parasitic::DistributedRc { network } => network.total_cap(),
        }
    }

    /// `true` if `self` and `other` are the same variant with fuzzy-equal
    /// numeric fields — the equivalence [`reduce`]'s idempotency invariant
    /// is checked against.
    pub fn fuzzy_equal(&self, other: &Parasitic) -> bool {
        match (self, other) {
            (Parasitic::LumpedCap { total_cap: a }, Parasitic::LumpedCap { total_cap: b }) => {
                fuzzy_equal(*a, *b)
            }
            (
                Parasitic::Elmore {
                    total_cap: ca,
                    elmore_delay: da,
                },
                Parasitic::Elmore {
                    total_cap: cb,
                    elmore_delay: db,
                },
            ) => fuzzy_equal(*ca, *cb) && fuzzy_equal(*da, *db),
            (
                Parasitic::PiModel {
                    c_near: na,
                    r: ra,
                    c_far: fa,
                },
                Parasitic::PiModel {
                    c_near: nb,
                    r: rb,
                    c_far: fb,
                },
            ) => fuzzy_equal(*na, *nb) && fuzzy_equal(*ra, *rb) && fuzzy_equal(*fa, *fb),
            (
                Parasitic::PoleResidue {
                    poles: pa,
                    residues: ra,
                },
                Parasitic::PoleResidue {
                    poles: pb,
                    residues: rb,
                },
            ) => {
                pa.len() == pb.len()
                    && ra.len() == rb.len()
                    && pa.iter().zip(pb).all(|(x, y)| fuzzy_equal(*x, *y))
                    && ra.iter().zip(rb).all(|(x, y)| fuzzy_equal(*x, *y))
            }
            (Parasitic::DistributedRc { .. }, Parasitic::DistributedRc { .. }) => {
                fuzzy_equal(self.total_cap(), other.total_cap())
            }
            _ => false,
        }
    }
}

/// Which reduced form [`reduce`] should produce, chosen by the enclosing
/// delay calculator's registered name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ReductionKind {
    /// Collapse to a single lumped capacitance.
    LumpedCap,
    /// Reduce to an Elmore first-moment model.
    Elmore,
    /// Reduce to a two-pole pi model.
    TwoPole,
    /// Reduce via moment matching to a pole-residue model.
    PoleResidue,
    /// Keep the network in detailed form, unreduced.
    Distributed,
}

/// Reduces a detailed RC network to the model `kind` calls for.
///
/// A pure function of `(network, kind)`: identical inputs always produce a
/// [`Parasitic::fuzzy_equal`] result (invariant 5).
pub fn reduce(network: &DetailedNetwork, kind: ReductionKind) -> Parasitic {
    match kind {
        ReductionKind::LumpedCap => Parasitic::LumpedCap {
            total_cap: network.total_cap(),
        },
        ReductionKind::Elmore => Parasitic::Elmore {
            total_cap: network.total_cap(),
            elmore_delay: elmore_first_moment(network),
        },
        ReductionKind::TwoPole => {
            let total_cap = network.total_cap();
            let r = dominant_resistance(network);
            let c_near = total_cap * 0.5;
            let c_far = total_cap - c_near;
            Parasitic::PiModel { c_near, r, c_far }
        }
        ReductionKind::PoleResidue => {
            let total_cap = network.total_cap();
            let pole = if total_cap > 0.0 {
                -1.0 / (dominant_resistance(network).max(f64::EPSILON) * total_cap)
            } else {
                0.0
            };
            Parasitic::PoleResidue {
                poles: vec![pole],
                residues: vec![total_cap],
            }
        }
        ReductionKind::Distributed => Parasitic::DistributedRc {
            network: network.clone(),
        },
    }
}

/// Resistance-weighted first moment (Elmore delay constant) of a network
/// rooted at node 0, treating every capacitor's delay contribution as the
/// sum of resistances on its path from the root.
fn elmore_first_moment(network: &DetailedNetwork) -> f64 {
    let mut res_to: HashMap<usize, f64> = HashMap::new();
    res_to.insert(0, 0.0);
    // Networks are small trees; a fixed-point relaxation over the resistor
    // list converges in at most one pass per tree depth.
    let mut changed = true;
    while changed {
        changed = false;
        for element in &network.elements {
            if let RcElement::Res { from, to, ohms } = element {
                if let Some(&r_from) = res_to.get(from) {
                    let candidate = r_from + ohms;
                    let better = match res_to.get(to) {
                        Some(&cur) => candidate < cur,
                        None => true,
                    };
                    if better {
                        res_to.insert(*to, candidate);
                        changed = true;
                    }
                }
                if let Some(&r_to) = res_to.get(to) {
                    let candidate = r_to + ohms;
                    let better = match res_to.get(from) {
                        Some(&cur) => candidate < cur,
                        None => true,
                    };
                    if better {
                        res_to.insert(*from, candidate);
                        changed = true;
                    }
                }
            }
        }
    }
    network
        .elements
        .iter()
        .filter_map(|e| match e {
            RcElement::Cap { node, farads } => {
                Some(farads * res_to.get(node).copied().unwrap_or(0.0))
            }
            RcElement::Res { .. } => None,
        })
        .sum()
}

/// The largest single resistor in the network, as a stand-in driving-point
/// resistance for the two-pole and pole-residue reductions.
fn dominant_resistance(network: &DetailedNetwork) -> f64 {
    network
        .elements
        .iter()
        .filter_map(|e| match e {
            RcElement::Res { ohms, .. } => Some(*ohms),
            RcElement::Cap { .. } => None,
        })
        .fold(0.0, f64::max)
}

/// Caches reduced parasitics keyed by `(driver_pin, rf, dcalc_ap)`, written
/// once per key and read many times during delay calculation.
#[derive(Default)]
pub struct ParasiticCache {
    models: HashMap<(VertexId, RiseFall, usize), Parasitic>,
}

impl ParasiticCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached model for `(driver_pin, rf, ap)`, if present.
    pub fn get(&self, driver_pin: VertexId, rf: RiseFall, ap: DcalcAnalysisPt) -> Option<&Parasitic> {
        self.models.get(&(driver_pin, rf, ap.index()))
    }

    /// Reduces `network` under `kind` and caches the result for
    /// `(driver_pin, rf, ap)`, returning it. A second call with an
    /// equivalent network and the same key is a cache hit that returns a
    /// [`Parasitic::fuzzy_equal`] value to the first (invariant 5).
    pub fn reduce_and_cache(
        &mut self,
        driver_pin: VertexId,
        rf: RiseFall,
        ap: DcalcAnalysisPt,
        network: &DetailedNetwork,
        kind: ReductionKind,
    ) -> &Parasitic {
        let model = reduce(network, kind);
        self.models.insert((driver_pin, rf, ap.index()), model);
        self.models.get(&(driver_pin, rf, ap.index())).unwrap()
    }
}
