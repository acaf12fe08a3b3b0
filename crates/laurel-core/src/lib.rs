//! Core data model shared across the Laurel front-end.
//!
//! This crate has no compiler logic. It holds the pieces every stage needs
//! to agree on: source positions and spans, the surface-language type
//! lattice, declaration modifiers, and small string utilities used by
//! diagnostics.

pub mod span;
pub mod types;
pub mod utils;

#[cfg(test)]
mod types_tests;
#[cfg(test)]
mod utils_tests;

pub use span::{LineIndex, SourcePos, Span};
pub use types::{LangType, Modifier, ModifierSet, Primitive};
pub use utils::{edit_distance, similar_names};
