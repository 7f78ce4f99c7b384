//! Token types for the XCL lexer.
//!
//! Tokens are produced once by [`crate::lexer::Lexer`] and never mutated
//! afterwards. Every token carries the 1-based line/column of its first
//! character and the literal text it was built from (string literals keep
//! their delimiting quotes; use [`Token::string_value`] to strip them).

use crate::diagnostics::XclError;

/// Reserved words of the language.
///
/// An identifier whose spelling exactly matches one of these is reclassified
/// as [`TokenKind::Keyword`] when its buffer closes.
pub const KEYWORDS: &[&str] = &["import", "section", "default", "required", "enum", "list"];

/// Check whether an identifier spelling is a reserved word.
pub fn is_keyword(spelling: &str) -> bool {
    KEYWORDS.contains(&spelling)
}

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    NewLine,
    Keyword,
    StringLiteral,
    NumberLiteral,
    Identifier,
    Operator,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::NewLine => "new_line",
            TokenKind::Keyword => "keyword",
            TokenKind::StringLiteral => "string_literal",
            TokenKind::NumberLiteral => "number_literal",
            TokenKind::Identifier => "identifier",
            TokenKind::Operator => "operator_symbol",
        };
        write!(f, "{name}")
    }
}

/// A token with its kind, source position, and literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize, text: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            column,
            text: text.into(),
        }
    }

    /// The contents of a string-literal token with the delimiting quotes
    /// stripped. No escape processing is performed.
    ///
    /// ## Errors
    /// [`XclError::UnexpectedToken`] if this token is not a string literal.
    pub fn string_value(&self) -> Result<&str, XclError> {
        if self.kind != TokenKind::StringLiteral {
            return Err(XclError::unexpected_token(self));
        }
        let inner = self.text.strip_prefix('"').unwrap_or(&self.text);
        // A literal flushed at end of input may lack its closing quote.
        Ok(inner.strip_suffix('"').unwrap_or(inner))
    }
}
