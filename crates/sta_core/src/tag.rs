//! Tag and `ClkInfo` interning.
//!
//! Tags distinguish otherwise-identical paths at a vertex (different clocks,
//! different exception states, …) while fitting in a compact 24-bit index so
//! that `Path` arrays can be addressed densely.

use crate::analysis_point::PathAnalysisPt;
use crate::ids::{ClkInfoIndex, TagIndex};
use crate::transition::RiseFall;
use sta_common::{Ident, InternalError, StaResult};
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

/// 16,777,215 live tags — matches the 24-bit packed index used throughout
/// the reference implementation.
pub const TAG_GROUP_INDEX_BITS: u32 = 24;
/// The total number of live tags that may be interned at once, `(1 << 24) -
/// 1`. Allocating the `TAG_GROUP_INDEX_MAX`th tag still succeeds; one more
/// is a fatal [`InternalError`].
pub const TAG_GROUP_INDEX_MAX: u32 = (1 << TAG_GROUP_INDEX_BITS) - 1;

/// Interned clock-network attributes attached to a [`Tag`].
///
/// `generated_state` and `pll_state` are opaque interned identifiers
/// describing the generated-clock or PLL propagation state, when
/// applicable; `None` means "not a generated/PLL clock" respectively.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ClkInfo {
    /// The clock this path is associated with, if any.
    pub clock: Option<Ident>,
    /// Which transition of the clock launches/captures this path.
    pub clock_edge: RiseFall,
    /// The vertex at which clock-reconvergence-pessimism is removed for
    /// this path, if CRPR applies.
    pub crpr_pin: Option<crate::ids::VertexId>,
    /// Generated-clock propagation state, if this clock is generated.
    pub generated_state: Option<Ident>,
    /// PLL propagation state, if this clock passes through a PLL.
    pub pll_state: Option<Ident>,
    /// The path analysis point this clock info was derived under.
    pub path_ap: PathAnalysisPt,
}

/// The fields that distinguish one path-propagation tag from another.
///
/// Two tags compare match-equal (CRPR-insensitive) when every field except
/// `clk_info.crpr_pin` agrees; see [`TagInterner::tags_match`].
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct TagFields {
    /// The transition this tag applies to.
    pub rf: RiseFall,
    /// The path analysis point this tag applies to.
    pub path_ap: PathAnalysisPt,
    /// The interned clock info for this tag.
    pub clk_info: ClkInfoIndex,
    /// `true` if this tag is on a clock (rather than data) path.
    pub is_clock: bool,
    /// Sorted, deduplicated identifiers of the exception states (false
    /// path / multicycle / case suppressions) active on this tag.
    pub exception_states: Vec<u32>,
}

/// Thread-safe interner for [`ClkInfo`] records and [`TagFields`] tuples.
///
/// `tag(fields)` is total and referentially transparent: identical field
/// tuples always map to the same [`TagIndex`]. The live-tag count is capped
/// at [`TAG_GROUP_INDEX_MAX`]; exceeding it is a fatal [`InternalError`]
/// rather than a silent wraparound.
pub struct TagInterner {
    clk_infos: RwLock<Vec<ClkInfo>>,
    clk_info_index: Mutex<HashMap<ClkInfo, ClkInfoIndex>>,
    tags: RwLock<Vec<TagFields>>,
    tag_index: Mutex<HashMap<TagFields, TagIndex>>,
    max_index: u32,
}

impl TagInterner {
    /// Creates a new, empty interner with the default 24-bit tag capacity.
    pub fn new() -> Self {
        Self::with_max_index(TAG_GROUP_INDEX_MAX)
    }

    /// Creates a new, empty interner with a caller-chosen tag capacity.
    ///
    /// Exposed so tests can exercise the overflow boundary without
    /// allocating `2^24` tags.
    pub fn with_max_index(max_index: u32) -> Self {
        Self {
            clk_infos: RwLock::new(Vec::new()),
            clk_info_index: Mutex::new(HashMap::new()),
            tags: RwLock::new(Vec::new()),
            tag_index: Mutex::new(HashMap::new()),
            max_index,
        }
    }

    /// Interns a `ClkInfo`, returning its index. Identical records share an
    /// index.
    pub fn clk_info(&self, info: ClkInfo) -> ClkInfoIndex {
        let mut by_fields = self.clk_info_index.lock().unwrap();
        if let Some(&idx) = by_fields.get(&info) {
            return idx;
        }
        let mut infos = self.clk_infos.write().unwrap();
        let idx = ClkInfoIndex::from_raw(infos.len() as u32);
        infos.push(info);
        by_fields.insert(info, idx);
        idx
    }

    /// Resolves a `ClkInfoIndex` back to its `ClkInfo`.
    pub fn resolve_clk_info(&self, index: ClkInfoIndex) -> ClkInfo {
        self.clk_infos.read().unwrap()[index.as_raw() as usize]
    }

    /// Interns a tag field tuple, returning its index.
    ///
    /// Total and referentially transparent: calling this twice with equal
    /// `fields` returns the same `TagIndex`.
    ///
    /// # Errors
    ///
    /// Returns an [`InternalError`] if allocating a new tag would exceed
    /// [`TAG_GROUP_INDEX_MAX`] live tags.
    pub fn tag(&self, mut fields: TagFields) -> StaResult<TagIndex> {
        fields.exception_states.sort_unstable();
        fields.exception_states.dedup();

        let mut by_fields = self.tag_index.lock().unwrap();
        if let Some(&idx) = by_fields.get(&fields) {
            return Ok(idx);
        }
        let mut tags = self.tags.write().unwrap();
        if tags.len() as u32 >= self.max_index {
            return Err(InternalError::new(format!(
                "tag index space exhausted: allocating one more tag would exceed the limit of {} live tags",
                self.max_index
            )));
        }
        let idx = TagIndex::from_raw(tags.len() as u32);
        tags.push(fields.clone());
        by_fields.insert(fields, idx);
        Ok(idx)
    }

    /// Resolves a `TagIndex` back to its field tuple.
    pub fn resolve_tag(&self, index: TagIndex) -> TagFields {
        self.tags.read().unwrap()[index.as_raw() as usize].clone()
    }

    /// The number of distinct tags interned so far.
    pub fn tag_count(&self) -> usize {
        self.tags.read().unwrap().len()
    }

    /// Match-equality (CRPR-insensitive) between two tags: `true` when every
    /// field except `clk_info.crpr_pin` agrees. Equivalent to the original's
    /// `tagMatchCmp(t1, t2, /*crpr=*/false) == 0`.
    pub fn tags_match(&self, a: TagIndex, b: TagIndex) -> bool {
        if a == b {
            return true;
        }
        let fa = self.resolve_tag(a);
        let fb = self.resolve_tag(b);
        if fa.rf != fb.rf
            || fa.path_ap != fb.path_ap
            || fa.is_clock != fb.is_clock
            || fa.exception_states != fb.exception_states
        {
            return false;
        }
        let ca = self.resolve_clk_info(fa.clk_info);
        let cb = self.resolve_clk_info(fb.clk_info);
        ca.clock == cb.clock
            && ca.clock_edge == cb.clock_edge
            && ca.generated_state == cb.generated_state
            && ca.pll_state == cb.pll_state
            && ca.path_ap == cb.path_ap
    }
}

impl Default for TagInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis_point::Corner;
    use crate::min_max::MinMax;

    fn ap() -> PathAnalysisPt {
        PathAnalysisPt::new(Corner::from_raw(0), MinMax::Max)
    }

    fn fields(exceptions: Vec<u32>) -> TagFields {
        TagFields {
            rf: RiseFall::Rise,
            path_ap: ap(),
            clk_info: ClkInfoIndex::from_raw(0),
            is_clock: false,
            exception_states: exceptions,
        }
    }

    #[test]
    fn intern_is_referentially_transparent() {
        let interner = TagInterner::new();
        let a = interner.tag(fields(vec![1, 2])).unwrap();
        let b = interner.tag(fields(vec![1, 2])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_fields_distinct_index() {
        let interner = TagInterner::new();
        let a = interner.tag(fields(vec![1])).unwrap();
        let b = interner.tag(fields(vec![2])).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn exception_states_normalized_before_compare() {
        let interner = TagInterner::new();
        let a = interner.tag(fields(vec![2, 1, 1])).unwrap();
        let b = interner.tag(fields(vec![1, 2])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ten_tuples_give_ten_indices_over_a_thousand_calls() {
        let interner = TagInterner::new();
        let mut seen = std::collections::HashSet::new();
        for i in 0..1000u32 {
            let idx = interner.tag(fields(vec![i % 10])).unwrap();
            seen.insert(idx);
        }
        assert_eq!(seen.len(), 10);
        assert_eq!(interner.tag_count(), 10);
    }

    #[test]
    fn tags_match_is_reflexive() {
        let interner = TagInterner::new();
        let a = interner.tag(fields(vec![])).unwrap();
        assert!(interner.tags_match(a, a));
    }

    #[test]
    fn tags_match_ignores_crpr_pin() {
        let interner = TagInterner::new();
        let info_a = ClkInfo {
            clock: None,
            clock_edge: RiseFall::Rise,
            crpr_pin: Some(crate::ids::VertexId::from_raw(1)),
            generated_state: None,
            pll_state: None,
            path_ap: ap(),
        };
        let info_b = ClkInfo {
            crpr_pin: Some(crate::ids::VertexId::from_raw(2)),
            ..info_a
        };
        let ci_a = interner.clk_info(info_a);
        let ci_b = interner.clk_info(info_b);
        assert_ne!(ci_a, ci_b, "different crpr pins intern distinctly");

        let a = interner
            .tag(TagFields {
                clk_info: ci_a,
                ..fields(vec![])
            })
            .unwrap();
        let b = interner
            .tag(TagFields {
                clk_info: ci_b,
                ..fields(vec![])
            })
            .unwrap();
        assert_ne!(a, b, "distinct clk_info interns to distinct tag index");
        assert!(
            interner.tags_match(a, b),
            "match-equality must ignore crpr_pin"
        );
    }

    #[test]
    fn tag_overflow_is_fatal_not_a_wrap() {
        // Use a small cap so the boundary can be exercised directly rather
        // than allocating 2^24 real tags. `max_index` is the total live-tag
        // cap itself: allocating up to it must succeed, one more must fail.
        let max = 4u32;
        let interner = TagInterner::with_max_index(max);
        for i in 0..max {
            interner.tag(fields(vec![i])).unwrap();
        }
        assert_eq!(interner.tag_count() as u32, max);
        let overflow = interner.tag(fields(vec![max]));
        assert!(overflow.is_err());
    }

    #[test]
    fn clk_info_interning_dedupes() {
        let interner = TagInterner::new();
        let info = ClkInfo {
            clock: None,
            clock_edge: RiseFall::Rise,
            crpr_pin: None,
            generated_state: None,
            pll_state: None,
            path_ap: ap(),
        };
        let a = interner.clk_info(info);
        let b = interner.clk_info(info);
        assert_eq!(a, b);
    }
}
