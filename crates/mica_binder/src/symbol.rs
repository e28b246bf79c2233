//! Variable and function symbols.

use crate::types::TypeSymbol;
use mica_evaluator::ConstantValue;
use mica_syntax::FunctionDeclaration;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

static NEXT_SYMBOL_ID: AtomicU32 = AtomicU32::new(0);

/// Identity of a symbol. Symbols are compared by identity, never by name,
/// so two submissions declaring `x` produce two distinct symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub fn fresh() -> Self {
        SymbolId(NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Global,
    Local,
    Parameter,
}

#[derive(Debug)]
pub struct VariableSymbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: VariableKind,
    /// Declared with `let`, or a parameter, or a `for` loop variable.
    pub is_read_only: bool,
    pub ty: TypeSymbol,
    /// Only ever set on read-only variables with a constant initializer.
    pub constant: Option<ConstantValue>,
}

impl VariableSymbol {
    pub fn new(
        name: impl Into<String>,
        kind: VariableKind,
        is_read_only: bool,
        ty: TypeSymbol,
        constant: Option<ConstantValue>,
    ) -> Self {
        Self {
            id: SymbolId::fresh(),
            name: name.into(),
            kind,
            is_read_only,
            ty,
            constant: constant.filter(|_| is_read_only),
        }
    }

    pub fn parameter(name: impl Into<String>, ty: TypeSymbol) -> Self {
        Self::new(name, VariableKind::Parameter, true, ty, None)
    }
}

impl PartialEq for VariableSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for VariableSymbol {}

impl Hash for VariableSymbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for VariableSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Declared,
    BuiltIn,
}

/// The syntax a declared function was bound from, kept alive so the body
/// can be bound in a later pass.
#[derive(Debug, Clone)]
pub struct FunctionDeclarationRef {
    pub file_name: Arc<str>,
    pub syntax: Arc<FunctionDeclaration>,
}

#[derive(Debug)]
pub struct FunctionSymbol {
    pub id: SymbolId,
    pub name: String,
    pub parameters: Vec<Arc<VariableSymbol>>,
    pub return_type: TypeSymbol,
    pub kind: FunctionKind,
    /// Absent for built-in functions.
    pub declaration: Option<FunctionDeclarationRef>,
}

impl FunctionSymbol {
    pub fn builtin(name: &str, parameters: Vec<Arc<VariableSymbol>>, return_type: TypeSymbol) -> Self {
        Self {
            id: SymbolId::fresh(),
            name: name.to_string(),
            parameters,
            return_type,
            kind: FunctionKind::BuiltIn,
            declaration: None,
        }
    }

    pub fn declared(
        name: impl Into<String>,
        parameters: Vec<Arc<VariableSymbol>>,
        return_type: TypeSymbol,
        declaration: FunctionDeclarationRef,
    ) -> Self {
        Self {
            id: SymbolId::fresh(),
            name: name.into(),
            parameters,
            return_type,
            kind: FunctionKind::Declared,
            declaration: Some(declaration),
        }
    }
}

impl PartialEq for FunctionSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FunctionSymbol {}

impl Hash for FunctionSymbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for FunctionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function {}(", self.name)?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", parameter)?;
        }
        write!(f, "): {}", self.return_type)
    }
}

/// Anything a name can resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    Variable(Arc<VariableSymbol>),
    Function(Arc<FunctionSymbol>),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable(v) => &v.name,
            Symbol::Function(f) => &f.name,
        }
    }

    pub fn id(&self) -> SymbolId {
        match self {
            Symbol::Variable(v) => v.id,
            Symbol::Function(f) => f.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_compare_by_identity() {
        let a = VariableSymbol::new("x", VariableKind::Global, false, TypeSymbol::Int, None);
        let b = VariableSymbol::new("x", VariableKind::Global, false, TypeSymbol::Int, None);
        assert_ne!(a, b);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_constant_dropped_for_mutable_variables() {
        let var = VariableSymbol::new("x", VariableKind::Local, false, TypeSymbol::Int, Some(1.into()));
        assert_eq!(var.constant, None);
        let let_ = VariableSymbol::new("y", VariableKind::Local, true, TypeSymbol::Int, Some(1.into()));
        assert_eq!(let_.constant, Some(ConstantValue::Int(1)));
    }

    #[test]
    fn test_function_display() {
        let f = FunctionSymbol::builtin(
            "pow",
            vec![
                Arc::new(VariableSymbol::parameter("base", TypeSymbol::Int)),
                Arc::new(VariableSymbol::parameter("exp", TypeSymbol::Int)),
            ],
            TypeSymbol::Int,
        );
        assert_eq!(f.to_string(), "function pow(base: int, exp: int): int");
        assert_eq!(f.kind, FunctionKind::BuiltIn);
    }
}
