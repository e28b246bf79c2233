//! mica_compiler: Compiler orchestration.
//!
//! A [`Compilation`] owns the syntax trees of one submission and a link to
//! the submission before it. Binding the global scope happens at most once
//! per compilation; [`Compilation::program`] then binds, lowers and checks
//! every function body and hands back a [`BoundProgram`].
//!
//! ```text
//! syntax trees -> global scope -> function bodies -> lowering -> flow check
//! ```

mod program;

pub use program::{bind_program, BoundProgram, CompileError};

use mica_binder::{Binder, BoundGlobalScope, Symbol};
use mica_core::intern::StringInterner;
use mica_syntax::SyntaxTree;
use rustc_hash::FxHashSet;
use std::sync::{Arc, OnceLock};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompilationOptions {
    /// Script (REPL) mode: bare expressions are allowed as global
    /// statements.
    pub is_script: bool,
}

/// One submission.
pub struct Compilation {
    pub options: CompilationOptions,
    pub previous: Option<Arc<Compilation>>,
    pub syntax_trees: Vec<Arc<SyntaxTree>>,
    /// Must be the interner the trees were built with.
    interner: StringInterner,
    global_scope: OnceLock<Arc<BoundGlobalScope>>,
}

impl Compilation {
    /// A regular compilation of one or more trees.
    pub fn new(interner: StringInterner, syntax_trees: Vec<Arc<SyntaxTree>>) -> Self {
        Self {
            options: CompilationOptions::default(),
            previous: None,
            syntax_trees,
            interner,
            global_scope: OnceLock::new(),
        }
    }

    /// A script submission following `previous`.
    pub fn create_script(
        previous: Option<Arc<Compilation>>,
        interner: StringInterner,
        syntax_tree: Arc<SyntaxTree>,
    ) -> Self {
        Self {
            options: CompilationOptions { is_script: true },
            previous,
            syntax_trees: vec![syntax_tree],
            interner,
            global_scope: OnceLock::new(),
        }
    }

    pub fn is_script(&self) -> bool {
        self.options.is_script
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// The bound global scope, computed on first use.
    pub fn global_scope(&self) -> Arc<BoundGlobalScope> {
        self.global_scope
            .get_or_init(|| {
                let previous = self.previous.as_ref().map(|p| p.global_scope());
                debug!(trees = self.syntax_trees.len(), "binding global scope");
                Arc::new(Binder::bind_global_scope(
                    &self.interner,
                    self.options.is_script,
                    previous,
                    &self.syntax_trees,
                ))
            })
            .clone()
    }

    /// Bind, lower and check everything in this submission.
    pub fn program(&self) -> Result<BoundProgram, CompileError> {
        let previous = match &self.previous {
            Some(p) => Some(Arc::new(p.program()?)),
            None => None,
        };
        bind_program(&self.interner, self.options.is_script, previous, &self.global_scope())
    }

    /// Every function and global variable visible to this submission, newest
    /// first. A name redeclared in a later submission hides the older one.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut seen = FxHashSet::default();
        let mut symbols = Vec::new();
        let mut current = Some(self);
        while let Some(compilation) = current {
            let scope = compilation.global_scope();
            let declared = scope
                .functions
                .iter()
                .map(|f| Symbol::Function(f.clone()))
                .chain(scope.variables.iter().map(|v| Symbol::Variable(v.clone())));
            for symbol in declared {
                if seen.insert(symbol.name().to_string()) {
                    symbols.push(symbol);
                }
            }
            current = compilation.previous.as_deref();
        }
        symbols
    }
}
