//! mica_syntax: The syntax tree handed to the binder.
//!
//! Lexing and parsing live outside this workspace; what crosses the boundary
//! is the immutable tree defined here. [`SyntaxFactory`] builds trees
//! programmatically for embedders and tests.

pub mod factory;
pub mod node;
pub mod syntax_kind;

pub use factory::SyntaxFactory;
pub use node::*;
pub use syntax_kind::SyntaxKind;
