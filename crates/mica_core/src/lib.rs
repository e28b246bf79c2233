//! mica_core: Core utilities for the mica compiler front end.
//!
//! Provides source spans and string interning shared by the syntax tree,
//! the binder and the diagnostics.

pub mod intern;
pub mod text;

pub use intern::{InternedString, StringInterner};
pub use text::TextSpan;
