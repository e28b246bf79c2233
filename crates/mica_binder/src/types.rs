//! The closed set of mica types.

use mica_evaluator::ConstantValue;
use std::fmt;

/// A mica type.
///
/// `Error` is the poison type: an expression of type `Error` has already
/// been diagnosed, and nothing that consumes it reports again. `Void` is the
/// result of calls that produce no value and is rejected wherever a value is
/// required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSymbol {
    Error,
    Any,
    Bool,
    Int,
    String,
    Void,
}

impl TypeSymbol {
    pub const ALL: [TypeSymbol; 6] = [
        TypeSymbol::Error,
        TypeSymbol::Any,
        TypeSymbol::Bool,
        TypeSymbol::Int,
        TypeSymbol::String,
        TypeSymbol::Void,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TypeSymbol::Error => "?",
            TypeSymbol::Any => "any",
            TypeSymbol::Bool => "bool",
            TypeSymbol::Int => "int",
            TypeSymbol::String => "string",
            TypeSymbol::Void => "void",
        }
    }

    /// Resolve a type name written in source. `void` cannot be named.
    pub fn lookup(name: &str) -> Option<TypeSymbol> {
        match name {
            "any" => Some(TypeSymbol::Any),
            "bool" => Some(TypeSymbol::Bool),
            "int" => Some(TypeSymbol::Int),
            "string" => Some(TypeSymbol::String),
            _ => None,
        }
    }

    pub fn of_constant(value: &ConstantValue) -> TypeSymbol {
        match value {
            ConstantValue::Bool(_) => TypeSymbol::Bool,
            ConstantValue::Int(_) => TypeSymbol::Int,
            ConstantValue::String(_) => TypeSymbol::String,
        }
    }

    #[inline]
    pub fn is_error(self) -> bool {
        self == TypeSymbol::Error
    }
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_round_trips_names() {
        for ty in [TypeSymbol::Any, TypeSymbol::Bool, TypeSymbol::Int, TypeSymbol::String] {
            assert_eq!(TypeSymbol::lookup(ty.name()), Some(ty));
        }
        assert_eq!(TypeSymbol::lookup("void"), None);
        assert_eq!(TypeSymbol::lookup("?"), None);
        assert_eq!(TypeSymbol::lookup("float"), None);
    }

    #[test]
    fn test_constant_types() {
        assert_eq!(TypeSymbol::of_constant(&ConstantValue::Int(1)), TypeSymbol::Int);
        assert_eq!(TypeSymbol::of_constant(&ConstantValue::from("s")), TypeSymbol::String);
        assert_eq!(TypeSymbol::of_constant(&ConstantValue::Bool(true)), TypeSymbol::Bool);
    }
}
