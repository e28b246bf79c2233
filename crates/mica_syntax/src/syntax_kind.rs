//! SyntaxKind enum - all token and node kinds of the mica syntax tree.

use std::fmt;

/// The kind of a syntax token or node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    BadToken,
    EndOfFileToken,
    NumberToken,
    StringToken,
    IdentifierToken,

    // Punctuation
    PlusToken,
    MinusToken,
    StarToken,
    SlashToken,
    BangToken,
    TildeToken,
    HatToken,
    AmpersandToken,
    AmpersandAmpersandToken,
    PipeToken,
    PipePipeToken,
    EqualsToken,
    EqualsEqualsToken,
    BangEqualsToken,
    LessToken,
    LessOrEqualsToken,
    GreaterToken,
    GreaterOrEqualsToken,
    OpenParenthesisToken,
    CloseParenthesisToken,
    OpenBraceToken,
    CloseBraceToken,
    ColonToken,
    CommaToken,
    FatArrowToken,
    UnderscoreToken,

    // Keywords
    BreakKeyword,
    ContinueKeyword,
    DeferKeyword,
    DoKeyword,
    ElseKeyword,
    FalseKeyword,
    ForKeyword,
    FunctionKeyword,
    IfKeyword,
    LetKeyword,
    MatchKeyword,
    ReturnKeyword,
    ToKeyword,
    TrueKeyword,
    VarKeyword,
    WhileKeyword,

    // ========================================================================
    // Nodes
    // ========================================================================
    CompilationUnit,
    FunctionDeclaration,
    GlobalStatement,
    Parameter,
    TypeClause,
    ElseClause,

    // Statements
    BlockStatement,
    VariableDeclaration,
    IfStatement,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    ExpressionStatement,
    DeferStatement,
    MatchStatement,

    // Expressions
    LiteralExpression,
    NameExpression,
    AssignmentExpression,
    UnaryExpression,
    BinaryExpression,
    ParenthesizedExpression,
    CallExpression,
    MatchExpression,

    // Patterns
    PatternSection,
    ConstantPattern,
    MatchAnyPattern,
}

impl SyntaxKind {
    /// The fixed source text of a punctuation or keyword token.
    pub fn text(self) -> Option<&'static str> {
        use SyntaxKind::*;
        let text = match self {
            PlusToken => "+",
            MinusToken => "-",
            StarToken => "*",
            SlashToken => "/",
            BangToken => "!",
            TildeToken => "~",
            HatToken => "^",
            AmpersandToken => "&",
            AmpersandAmpersandToken => "&&",
            PipeToken => "|",
            PipePipeToken => "||",
            EqualsToken => "=",
            EqualsEqualsToken => "==",
            BangEqualsToken => "!=",
            LessToken => "<",
            LessOrEqualsToken => "<=",
            GreaterToken => ">",
            GreaterOrEqualsToken => ">=",
            OpenParenthesisToken => "(",
            CloseParenthesisToken => ")",
            OpenBraceToken => "{",
            CloseBraceToken => "}",
            ColonToken => ":",
            CommaToken => ",",
            FatArrowToken => "=>",
            UnderscoreToken => "_",
            BreakKeyword => "break",
            ContinueKeyword => "continue",
            DeferKeyword => "defer",
            DoKeyword => "do",
            ElseKeyword => "else",
            FalseKeyword => "false",
            ForKeyword => "for",
            FunctionKeyword => "function",
            IfKeyword => "if",
            LetKeyword => "let",
            MatchKeyword => "match",
            ReturnKeyword => "return",
            ToKeyword => "to",
            TrueKeyword => "true",
            VarKeyword => "var",
            WhileKeyword => "while",
            _ => return None,
        };
        Some(text)
    }

    pub fn is_keyword(self) -> bool {
        self >= SyntaxKind::BreakKeyword && self <= SyntaxKind::WhileKeyword
    }

    pub fn is_token(self) -> bool {
        self < SyntaxKind::CompilationUnit
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text() {
            Some(text) => f.write_str(text),
            None => write!(f, "{:?}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_text() {
        assert_eq!(SyntaxKind::AmpersandAmpersandToken.text(), Some("&&"));
        assert_eq!(SyntaxKind::LessOrEqualsToken.to_string(), "<=");
        assert_eq!(SyntaxKind::BinaryExpression.text(), None);
    }

    #[test]
    fn test_classification() {
        assert!(SyntaxKind::DeferKeyword.is_keyword());
        assert!(!SyntaxKind::PlusToken.is_keyword());
        assert!(SyntaxKind::PlusToken.is_token());
        assert!(!SyntaxKind::MatchStatement.is_token());
    }
}
