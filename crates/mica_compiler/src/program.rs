//! Binding and lowering every function body of a submission.

use indexmap::IndexMap;
use mica_binder::bound::{BoundBlockStatement, BoundStatement};
use mica_binder::{Binder, BoundGlobalScope, FunctionSymbol, TypeSymbol};
use mica_checker::{all_paths_return, FlowError};
use mica_core::intern::StringInterner;
use mica_core::text::TextSpan;
use mica_diagnostics::{messages, Diagnostic, DiagnosticCollection};
use mica_transformers::{lower, lower_function};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Internal failures of the pipeline. These are never user errors: they
/// mean the binder and a later stage disagree about the shape of the tree.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("function '{function}' has no declaration to bind")]
    MissingBody { function: String },
    #[error("flow analysis of '{function}' failed")]
    Flow {
        function: String,
        #[source]
        source: FlowError,
    },
}

/// A fully bound and lowered submission, ready for an interpreter or an
/// emitter. Only run it when `diagnostics` is empty.
#[derive(Debug)]
pub struct BoundProgram {
    pub previous: Option<Arc<BoundProgram>>,
    pub diagnostics: DiagnosticCollection,
    /// Lowered body of every function this submission declared.
    pub functions: IndexMap<Arc<FunctionSymbol>, BoundBlockStatement>,
    /// The lowered global statements.
    pub statement: BoundBlockStatement,
}

impl BoundProgram {
    /// Find a function body here or in an earlier submission.
    pub fn function_body(&self, function: &FunctionSymbol) -> Option<&BoundBlockStatement> {
        std::iter::successors(Some(self), |p| p.previous.as_deref()).find_map(|p| p.functions.get(function))
    }
}

/// Bind and lower the bodies of the functions declared in `global_scope`,
/// and lower its global statements.
#[tracing::instrument(skip_all, fields(functions = global_scope.functions.len()))]
pub fn bind_program(
    interner: &StringInterner,
    is_script: bool,
    previous: Option<Arc<BoundProgram>>,
    global_scope: &BoundGlobalScope,
) -> Result<BoundProgram, CompileError> {
    // The global scope carries only the global diagnostics of earlier
    // submissions; the previous program also has their function bodies.
    let mut diagnostics = DiagnosticCollection::new();
    let own_global = match &previous {
        Some(program) => {
            diagnostics.extend_from_slice(program.diagnostics.diagnostics());
            let inherited = global_scope.previous.as_ref().map_or(0, |p| p.diagnostics.len());
            global_scope.diagnostics.diagnostics().get(inherited..).unwrap_or_default()
        }
        None => global_scope.diagnostics.diagnostics(),
    };
    diagnostics.extend_from_slice(own_global);

    let mut functions = IndexMap::with_capacity(global_scope.functions.len());
    for function in &global_scope.functions {
        let (body, body_diagnostics) = Binder::bind_function_body(interner, is_script, global_scope, function)
            .ok_or_else(|| CompileError::MissingBody {
                function: function.name.clone(),
            })?;
        diagnostics.extend(body_diagnostics);
        let body = lower_function(function, body);

        if function.return_type != TypeSymbol::Void && !function.return_type.is_error() {
            let returns = all_paths_return(&body).map_err(|source| CompileError::Flow {
                function: function.name.clone(),
                source,
            })?;
            if !returns {
                if let Some(declaration) = &function.declaration {
                    diagnostics.add(Diagnostic::with_location(
                        declaration.file_name.to_string(),
                        declaration.syntax.identifier.span(),
                        &messages::ALL_PATHS_MUST_RETURN,
                        &[],
                    ));
                }
            }
        }

        functions.insert(function.clone(), body);
    }

    let statement = lower(BoundBlockStatement {
        span: statements_span(&global_scope.statements),
        statements: global_scope.statements.clone(),
    });

    if diagnostics.is_empty() {
        debug!(functions = functions.len(), "program accepted");
    } else {
        debug!(diagnostics = diagnostics.len(), "program rejected");
    }

    Ok(BoundProgram {
        previous,
        diagnostics,
        functions,
        statement,
    })
}

fn statements_span(statements: &[BoundStatement]) -> TextSpan {
    match (statements.first(), statements.last()) {
        (Some(first), Some(last)) => first.span().union(&last.span()),
        _ => TextSpan::empty(0),
    }
}
