//! Error taxonomy for XCL.
//!
//! Every lexing, activation, and parsing failure is one of the variants
//! below, and every failure is fatal to the parse in progress: callers
//! propagate with `?` and a host receiving an error must discard the
//! in-progress document entirely.

use thiserror::Error;

use crate::lexer::tokens::Token;

/// Any failure produced while tokenizing, parsing, or building a document.
///
/// Variants carry enough structured data to format a location- or
/// identity-specific message; the `Display` impl is the user-facing text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum XclError {
    /// Generic failure: duplicate type/required registration, missing
    /// required value at end of parse, misuse of an imported document.
    #[error("{0}")]
    Runtime(String),

    /// Unknown enumeration value or section field.
    #[error("The member `{member}` not found in type `{scope}`.")]
    MemberNotFound { member: String, scope: String },

    /// A section body closed without a mandatory field.
    #[error("The required field `{field}` is not set in section of type `{section}`.")]
    RequiredFieldNotSet { field: String, section: String },

    /// An unregistered type was referenced.
    #[error("The type `{0}` not found.")]
    TypeNotFound(String),

    /// The lexer could not classify a character.
    #[error("The character `{0}` is invalid.")]
    InvalidCharacter(char),

    /// A token violated the grammar.
    #[error("Unexpected token `{text}` found at {line}:{column}.", text = .token.text, line = .token.line, column = .token.column)]
    UnexpectedToken { token: Token },

    /// The input ended in the middle of a construct. Carries the last token
    /// that was seen.
    #[error("Unexpected end with token `{text}` at {line}:{column}.", text = .token.text, line = .token.line, column = .token.column)]
    UnexpectedEndOfTokens { token: Token },

    /// A value or type was used where an incompatible one was required.
    #[error("The type `{given}` is given, while type `{expected}` was supported.")]
    TypeMismatch { given: String, expected: String },
}

impl XclError {
    pub fn runtime(message: impl Into<String>) -> Self {
        XclError::Runtime(message.into())
    }

    pub fn member_not_found(member: impl Into<String>, scope: impl Into<String>) -> Self {
        XclError::MemberNotFound {
            member: member.into(),
            scope: scope.into(),
        }
    }

    pub fn unexpected_token(token: &Token) -> Self {
        XclError::UnexpectedToken {
            token: token.clone(),
        }
    }

    pub fn unexpected_end(token: &Token) -> Self {
        XclError::UnexpectedEndOfTokens {
            token: token.clone(),
        }
    }

    pub fn type_mismatch(given: impl Into<String>, expected: impl Into<String>) -> Self {
        XclError::TypeMismatch {
            given: given.into(),
            expected: expected.into(),
        }
    }

    /// The source position the error points at, when it carries one.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            XclError::UnexpectedToken { token } | XclError::UnexpectedEndOfTokens { token } => {
                Some((token.line, token.column))
            }
            _ => None,
        }
    }
}
