//! Shared foundational types used across the static timing analysis core.
//!
//! This crate provides interned identifiers, content hashing, frequency
//! values, fuzzy floating-point comparison, and the common result type.

#![warn(missing_docs)]

pub mod frequency;
pub mod fuzzy;
pub mod hash;
pub mod ident;
pub mod result;

pub use frequency::{Frequency, ParseFrequencyError};
pub use fuzzy::FuzzyEpsilon;
pub use hash::ContentHash;
pub use ident::{Ident, Interner};
pub use result::{InternalError, StaResult};
