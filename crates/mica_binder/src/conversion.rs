//! Conversion classification between types.

use crate::types::TypeSymbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    None,
    Identity,
    Implicit,
    Explicit,
}

impl Conversion {
    pub fn exists(self) -> bool {
        self != Conversion::None
    }

    pub fn is_identity(self) -> bool {
        self == Conversion::Identity
    }

    pub fn is_implicit(self) -> bool {
        matches!(self, Conversion::Identity | Conversion::Implicit)
    }

    pub fn is_explicit(self) -> bool {
        self == Conversion::Explicit
    }
}

/// Classify the conversion from `from` to `to`.
///
/// The table:
/// - equal types convert by identity;
/// - every value type converts implicitly to `any`, and `any` converts
///   explicitly back to every value type;
/// - `bool` and `int` convert explicitly to `string`, and `string`
///   converts explicitly to `bool` and `int`.
///
/// Everything else has no conversion. `Error` gets no special treatment
/// here; the binder is what keeps it from being diagnosed.
pub fn classify(from: TypeSymbol, to: TypeSymbol) -> Conversion {
    use TypeSymbol::*;

    if from == to {
        return Conversion::Identity;
    }
    match (from, to) {
        (Void, _) | (_, Void) => Conversion::None,
        (_, Any) => Conversion::Implicit,
        (Any, _) => Conversion::Explicit,
        (Bool | Int, String) => Conversion::Explicit,
        (String, Bool | Int) => Conversion::Explicit,
        _ => Conversion::None,
    }
}
