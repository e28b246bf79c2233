//! The bound tree: the typed, resolved program representation.

mod operators;
mod printer;
mod rewriter;
mod tree;

pub use operators::{BoundBinaryOperator, BoundUnaryOperator};
pub use printer::BoundTreePrinter;
pub use rewriter::BoundTreeRewriter;
pub use tree::*;
