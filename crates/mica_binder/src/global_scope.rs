//! The result of binding one submission's top-level members.

use crate::bound::BoundStatement;
use crate::symbol::{FunctionSymbol, VariableSymbol};
use mica_diagnostics::DiagnosticCollection;
use std::sync::Arc;

/// Everything a submission declared at top level, plus its global
/// statements. Function bodies are not bound yet.
#[derive(Debug)]
pub struct BoundGlobalScope {
    /// The global scope of the submission before this one.
    pub previous: Option<Arc<BoundGlobalScope>>,
    /// This submission's diagnostics, preceded by those of every earlier
    /// submission.
    pub diagnostics: DiagnosticCollection,
    /// Declared functions, in declaration order.
    pub functions: Vec<Arc<FunctionSymbol>>,
    /// Global variables, in declaration order.
    pub variables: Vec<Arc<VariableSymbol>>,
    pub statements: Vec<BoundStatement>,
}

impl BoundGlobalScope {
    /// Walk this scope and its predecessors, newest first.
    pub fn chain(&self) -> impl Iterator<Item = &BoundGlobalScope> {
        std::iter::successors(Some(self), |s| s.previous.as_deref())
    }
}
