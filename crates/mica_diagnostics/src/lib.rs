//! mica_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Every user-facing problem found by the binder, the lowering pass or the
//! return-path check is a [`Diagnostic`]: a source span, a numeric code, a
//! category and the formatted message text. The catalog lives in
//! [`messages`].

use mica_core::text::TextSpan;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Message => write!(f, "message"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file the span points into, when the unit came from a named tree.
    pub file: Option<String>,
    pub span: TextSpan,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    pub fn new(span: TextSpan, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    pub fn with_location(
        file: String,
        span: TextSpan,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            file: Some(file),
            ..Self::new(span, message, args)
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}({}): ", file, self.span.start)?;
        }
        write!(f, "{} MC{}: {}", self.category, self.code, self.message_text)
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// An ordered list of diagnostics accumulated while binding one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn extend_from_slice(&mut self, diagnostics: &[Diagnostic]) {
        self.diagnostics.extend_from_slice(diagnostics);
    }

    /// Insert `earlier` ahead of everything collected so far.
    pub fn prepend(&mut self, earlier: &[Diagnostic]) {
        if earlier.is_empty() {
            return;
        }
        let mut merged = Vec::with_capacity(earlier.len() + self.diagnostics.len());
        merged.extend_from_slice(earlier);
        merged.append(&mut self.diagnostics);
        self.diagnostics = merged;
    }

    pub fn codes(&self) -> Vec<u32> {
        self.diagnostics.iter().map(|d| d.code).collect()
    }
}

impl<'a> IntoIterator for &'a DiagnosticCollection {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

impl FromIterator<Diagnostic> for DiagnosticCollection {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self {
            diagnostics: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Name resolution (3001-3009)
    // ========================================================================
    pub const UNDEFINED_VARIABLE: DiagnosticMessage = diag!(3001, Error, "Variable '{0}' doesn't exist.");
    pub const UNDEFINED_FUNCTION: DiagnosticMessage = diag!(3002, Error, "Function '{0}' doesn't exist.");
    pub const UNDEFINED_TYPE: DiagnosticMessage = diag!(3003, Error, "Type '{0}' doesn't exist.");
    pub const NOT_A_VARIABLE: DiagnosticMessage = diag!(3004, Error, "'{0}' is not a variable.");
    pub const NOT_A_FUNCTION: DiagnosticMessage = diag!(3005, Error, "'{0}' is not a function.");
    pub const SYMBOL_ALREADY_DECLARED: DiagnosticMessage = diag!(3006, Error, "'{0}' is already declared.");
    pub const PARAMETER_ALREADY_DECLARED: DiagnosticMessage = diag!(3007, Error, "A parameter with the name '{0}' already exists.");

    // ========================================================================
    // Calls, operators and conversions (3008-3015)
    // ========================================================================
    pub const WRONG_ARGUMENT_COUNT: DiagnosticMessage = diag!(3008, Error, "Function '{0}' requires {1} arguments but was given {2}.");
    pub const WRONG_ARGUMENT_TYPE: DiagnosticMessage = diag!(3009, Error, "Parameter '{0}' requires a value of type '{1}' but was given a value of type '{2}'.");
    pub const UNDEFINED_UNARY_OPERATOR: DiagnosticMessage = diag!(3010, Error, "Unary operator '{0}' is not defined for type '{1}'.");
    pub const UNDEFINED_BINARY_OPERATOR: DiagnosticMessage = diag!(3011, Error, "Binary operator '{0}' is not defined for types '{1}' and '{2}'.");
    pub const CANNOT_ASSIGN: DiagnosticMessage = diag!(3012, Error, "Variable '{0}' is read-only and cannot be assigned to.");
    pub const CANNOT_CONVERT: DiagnosticMessage = diag!(3013, Error, "Cannot convert type '{0}' to '{1}'.");
    pub const CANNOT_CONVERT_IMPLICITLY: DiagnosticMessage = diag!(3014, Error, "Cannot convert type '{0}' to '{1}'. An explicit conversion exists (are you missing a cast?)");
    pub const EXPRESSION_MUST_HAVE_VALUE: DiagnosticMessage = diag!(3015, Error, "Expression must have a value.");

    // ========================================================================
    // Control flow (3016-3020)
    // ========================================================================
    pub const INVALID_BREAK_OR_CONTINUE: DiagnosticMessage = diag!(3016, Error, "The keyword '{0}' can only be used inside of loops.");
    pub const INVALID_RETURN: DiagnosticMessage = diag!(3017, Error, "The 'return' keyword can only be used inside of functions.");
    pub const INVALID_RETURN_EXPRESSION: DiagnosticMessage = diag!(3018, Error, "Since the function '{0}' does not return a value the 'return' keyword cannot be followed by an expression.");
    pub const MISSING_RETURN_EXPRESSION: DiagnosticMessage = diag!(3019, Error, "An expression of type '{0}' is expected.");
    pub const ALL_PATHS_MUST_RETURN: DiagnosticMessage = diag!(3020, Error, "Not all code paths return a value.");

    // ========================================================================
    // Match and statements (3021-3024)
    // ========================================================================
    pub const MULTIPLE_MATCH_ANY_PATTERN: DiagnosticMessage = diag!(3021, Error, "A match can have at most one wildcard pattern.");
    pub const INVALID_EXPRESSION_STATEMENT: DiagnosticMessage = diag!(3022, Error, "Only assignment, call and match expressions can be used as a statement.");
    pub const MATCH_REQUIRES_SECTIONS: DiagnosticMessage = diag!(3023, Error, "A match must have at least one pattern section.");
    pub const DIVISION_BY_ZERO: DiagnosticMessage = diag!(3024, Error, "Division by zero in constant expression.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let msg = format_message("Cannot convert type '{0}' to '{1}'.", &["int", "bool"]);
        assert_eq!(msg, "Cannot convert type 'int' to 'bool'.");
    }

    #[test]
    fn test_format_message_no_args() {
        let msg = format_message("Expression must have a value.", &[]);
        assert_eq!(msg, "Expression must have a value.");
    }

    #[test]
    fn test_format_message_three_args() {
        let msg = format_message(
            messages::UNDEFINED_BINARY_OPERATOR.message,
            &["+", "bool", "int"],
        );
        assert_eq!(msg, "Binary operator '+' is not defined for types 'bool' and 'int'.");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::with_location(
            "main.mc".to_string(),
            TextSpan::new(10, 5),
            &messages::UNDEFINED_VARIABLE,
            &["foo"],
        );
        let display = format!("{}", diag);
        assert_eq!(display, "main.mc(10): error MC3001: Variable 'foo' doesn't exist.");
    }

    #[test]
    fn test_diagnostic_collection() {
        let mut collection = DiagnosticCollection::new();
        assert!(collection.is_empty());

        collection.add(Diagnostic::new(TextSpan::empty(0), &messages::INVALID_RETURN, &[]));
        assert!(collection.has_errors());
        assert_eq!(collection.error_count(), 1);
        assert_eq!(collection.codes(), vec![3017]);
    }

    #[test]
    fn test_prepend_keeps_earlier_first() {
        let earlier = vec![Diagnostic::new(TextSpan::empty(1), &messages::INVALID_RETURN, &[])];
        let mut collection = DiagnosticCollection::new();
        collection.add(Diagnostic::new(TextSpan::empty(2), &messages::ALL_PATHS_MUST_RETURN, &[]));
        collection.prepend(&earlier);
        assert_eq!(collection.codes(), vec![3017, 3020]);
    }
}
