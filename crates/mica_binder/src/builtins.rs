//! Built-in functions, visible from the root scope of every binder.

use crate::symbol::{FunctionSymbol, VariableSymbol};
use crate::types::TypeSymbol;
use lazy_static::lazy_static;
use std::sync::Arc;

lazy_static! {
    /// `print(text: any): void`
    pub static ref PRINT: Arc<FunctionSymbol> = Arc::new(FunctionSymbol::builtin(
        "print",
        vec![Arc::new(VariableSymbol::parameter("text", TypeSymbol::Any))],
        TypeSymbol::Void,
    ));

    /// `input(): string`
    pub static ref INPUT: Arc<FunctionSymbol> =
        Arc::new(FunctionSymbol::builtin("input", Vec::new(), TypeSymbol::String));

    /// `rnd(max: int): int`
    pub static ref RND: Arc<FunctionSymbol> = Arc::new(FunctionSymbol::builtin(
        "rnd",
        vec![Arc::new(VariableSymbol::parameter("max", TypeSymbol::Int))],
        TypeSymbol::Int,
    ));
}

pub fn builtin_functions() -> [Arc<FunctionSymbol>; 3] {
    [PRINT.clone(), INPUT.clone(), RND.clone()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_stable() {
        assert_eq!(PRINT.id, builtin_functions()[0].id);
        assert_eq!(RND.parameters[0].ty, TypeSymbol::Int);
        assert_eq!(INPUT.return_type, TypeSymbol::String);
        assert!(PRINT.declaration.is_none());
    }
}
