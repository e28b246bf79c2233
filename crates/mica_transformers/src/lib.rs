//! mica_transformers: Bound tree transformations.
//!
//! The only transformation so far is [`lowering`], which turns structured
//! control flow into labels and gotos before the tree reaches the flow
//! checker or a backend.

pub mod lowering;

pub use lowering::{lower, lower_function, Lowerer};
