//! Opaque ID newtypes for timing graph entities.
//!
//! [`VertexId`] and [`EdgeId`] are thin `u32` wrappers used as arena indices
//! into the [`TimingGraph`](crate::graph::TimingGraph). They are `Copy`,
//! `Hash`, and `Serialize`/`Deserialize`.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a vertex (pin) in the timing graph.
    VertexId
);

define_id!(
    /// Opaque, copyable ID for an edge (timing arc set) in the timing graph.
    EdgeId
);

define_id!(
    /// Opaque, copyable 24-bit-range index for an interned [`Tag`](crate::tag::Tag).
    TagIndex
);

define_id!(
    /// Opaque, copyable index for an interned [`ClkInfo`](crate::tag::ClkInfo).
    ClkInfoIndex
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn vertex_id_roundtrip() {
        let id = VertexId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
    }

    #[test]
    fn edge_id_roundtrip() {
        let id = EdgeId::from_raw(99);
        assert_eq!(id.as_raw(), 99);
    }

    #[test]
    fn vertex_id_equality() {
        let a = VertexId::from_raw(7);
        let b = VertexId::from_raw(7);
        let c = VertexId::from_raw(8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn vertex_id_ordering() {
        let a = VertexId::from_raw(1);
        let b = VertexId::from_raw(2);
        assert!(a < b);
    }

    #[test]
    fn vertex_id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(VertexId::from_raw(1));
        set.insert(VertexId::from_raw(2));
        set.insert(VertexId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn vertex_id_serde_roundtrip() {
        let id = VertexId::from_raw(99);
        let json = serde_json::to_string(&id).unwrap();
        let restored: VertexId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }

    #[test]
    fn tag_index_serde_roundtrip() {
        let id = TagIndex::from_raw(55);
        let json = serde_json::to_string(&id).unwrap();
        let restored: TagIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }

    #[test]
    fn id_zero_and_max() {
        let zero = VertexId::from_raw(0);
        let max = VertexId::from_raw(u32::MAX);
        assert_eq!(zero.as_raw(), 0);
        assert_eq!(max.as_raw(), u32::MAX);
        assert_ne!(zero, max);
    }
}
