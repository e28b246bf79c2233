//! Scope management for the binder.
//!
//! Scopes live in an arena and refer to their parent by index. The binder
//! keeps a cursor into the arena; entering a block pushes a new scope whose
//! parent is the cursor, leaving it moves the cursor back to the parent.
//! Scopes are never freed while the binder runs.

use crate::symbol::{FunctionSymbol, Symbol, VariableSymbol};
use indexmap::IndexMap;
use mica_core::intern::InternedString;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Holds the built-in functions.
    Root,
    /// Holds the globals of one earlier submission.
    Submission,
    /// The globals of the submission being bound.
    Global,
    /// The parameters of the function being bound.
    Function,
    Block,
}

#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// Declaration order is preserved.
    pub symbols: IndexMap<InternedString, Symbol>,
}

#[derive(Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            parent,
            symbols: IndexMap::new(),
        });
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.get(id).parent
    }

    /// Declare `symbol` in `scope`. Fails when the same scope already has a
    /// symbol with that name; the existing one is kept.
    pub fn try_declare(&mut self, scope: ScopeId, name: InternedString, symbol: Symbol) -> bool {
        let symbols = &mut self.scopes[scope.index()].symbols;
        if symbols.contains_key(&name) {
            return false;
        }
        symbols.insert(name, symbol);
        true
    }

    /// Resolve `name` from `scope` outwards, nearest declaration first.
    pub fn lookup(&self, scope: ScopeId, name: InternedString) -> Option<&Symbol> {
        self.ancestors(scope)
            .find_map(|s| self.get(s).symbols.get(&name))
    }

    /// True when `name` is declared by any earlier submission visible from
    /// `scope`.
    pub fn declared_in_submission(&self, scope: ScopeId, name: InternedString) -> bool {
        self.ancestors(scope)
            .map(|s| self.get(s))
            .any(|s| s.kind == ScopeKind::Submission && s.symbols.contains_key(&name))
    }

    pub fn variables(&self, scope: ScopeId) -> Vec<Arc<VariableSymbol>> {
        self.get(scope)
            .symbols
            .values()
            .filter_map(|s| match s {
                Symbol::Variable(v) => Some(v.clone()),
                Symbol::Function(_) => None,
            })
            .collect()
    }

    pub fn functions(&self, scope: ScopeId) -> Vec<Arc<FunctionSymbol>> {
        self.get(scope)
            .symbols
            .values()
            .filter_map(|s| match s {
                Symbol::Function(f) => Some(f.clone()),
                Symbol::Variable(_) => None,
            })
            .collect()
    }

    fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |s| self.parent(*s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::VariableKind;
    use crate::types::TypeSymbol;
    use mica_core::intern::StringInterner;

    fn variable(name: &str, ty: TypeSymbol) -> Symbol {
        Symbol::Variable(Arc::new(VariableSymbol::new(name, VariableKind::Local, false, ty, None)))
    }

    #[test]
    fn test_child_scope_shadows_parent() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut arena = ScopeArena::new();
        let parent = arena.push(ScopeKind::Global, None);
        let outer = variable("x", TypeSymbol::Int);
        assert!(arena.try_declare(parent, x, outer.clone()));

        let child = arena.push(ScopeKind::Block, Some(parent));
        let inner = variable("x", TypeSymbol::String);
        assert!(arena.try_declare(child, x, inner.clone()));
        assert_eq!(arena.lookup(child, x), Some(&inner));

        // Leaving the child: lookups go through the parent again.
        let after = arena.parent(child).unwrap();
        assert_eq!(arena.lookup(after, x), Some(&outer));
    }

    #[test]
    fn test_duplicate_in_same_scope_keeps_first() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut arena = ScopeArena::new();
        let scope = arena.push(ScopeKind::Block, None);
        let first = variable("x", TypeSymbol::Int);
        assert!(arena.try_declare(scope, x, first.clone()));
        assert!(!arena.try_declare(scope, x, variable("x", TypeSymbol::Bool)));
        assert_eq!(arena.lookup(scope, x), Some(&first));
    }

    #[test]
    fn test_lookup_misses_unknown_names() {
        let interner = StringInterner::new();
        let mut arena = ScopeArena::new();
        let scope = arena.push(ScopeKind::Root, None);
        assert!(arena.lookup(scope, interner.intern("nothing")).is_none());
    }

    #[test]
    fn test_submission_declarations_are_visible() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut arena = ScopeArena::new();
        let root = arena.push(ScopeKind::Root, None);
        let submission = arena.push(ScopeKind::Submission, Some(root));
        arena.try_declare(submission, x, variable("x", TypeSymbol::Int));
        let global = arena.push(ScopeKind::Global, Some(submission));
        assert!(arena.declared_in_submission(global, x));
        assert!(!arena.declared_in_submission(global, interner.intern("y")));
        assert_eq!(arena.variables(submission).len(), 1);
        assert!(arena.functions(submission).is_empty());
    }
}
