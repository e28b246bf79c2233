//! mica_binder: Name resolution, type checking and bound tree construction.
//!
//! The binder walks the syntax tree, resolves names against a chain of
//! scopes, checks and converts types, folds constants and produces the
//! typed bound tree. It runs at two levels: once over all top-level members
//! of a submission ([`Binder::bind_global_scope`]) and once per declared
//! function body ([`Binder::bind_function_body`]).

mod binder;
pub mod bound;
mod builtins;
mod conversion;
mod global_scope;
mod scope;
mod symbol;
mod types;

pub use binder::Binder;
pub use builtins::{builtin_functions, INPUT, PRINT, RND};
pub use conversion::{classify, Conversion};
pub use global_scope::BoundGlobalScope;
pub use scope::{Scope, ScopeArena, ScopeId, ScopeKind};
pub use symbol::{
    FunctionDeclarationRef, FunctionKind, FunctionSymbol, Symbol, SymbolId, VariableKind,
    VariableSymbol,
};
pub use types::TypeSymbol;
