//! Lexer for XCL source text.
//!
//! Handles tokenization including:
//! - Reserved words (`import`, `section`, `default`, `required`, `enum`, `list`)
//! - Identifiers and literals (number, quoted string)
//! - Operator symbols (`{`, `}`, `=`, `,`)
//! - Whitespace and newline tokens (the parser skips them; newlines
//!   terminate scalar assignments, `import`, and `required` statements)
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (`TokenKind`, `Token`) and the reserved-word table

pub mod tokens;

pub use tokens::{KEYWORDS, Token, TokenKind};

use crate::diagnostics::XclError;

/// Classification of a single character, used to grow or close the
/// current token buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Whitespace,
    NewLine,
    Identifier,
    Number,
    StringDelimiter,
    Operator,
}

/// Classify one character, or `None` for characters the language does not
/// know (those are only legal inside string literals).
fn classify(c: char) -> Option<CharClass> {
    match c {
        ' ' | '\t' | '\r' => Some(CharClass::Whitespace),
        '\n' => Some(CharClass::NewLine),
        'a'..='z' | 'A'..='Z' => Some(CharClass::Identifier),
        '0'..='9' => Some(CharClass::Number),
        '"' => Some(CharClass::StringDelimiter),
        '{' | '}' | '=' | ',' => Some(CharClass::Operator),
        _ => None,
    }
}

/// Lexer for XCL source text.
///
/// Single pass, fully materialized: the whole input is consumed and the
/// complete token sequence is returned. A buffer grows while consecutive
/// characters keep its class; any class change closes it and emits a token.
pub struct Lexer<'a> {
    source: &'a str,
    line: usize,
    column: usize,
    buf: String,
    buf_kind: Option<TokenKind>,
    // Position of the first character of the buffered token.
    buf_line: usize,
    buf_column: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            line: 1,
            column: 1,
            buf: String::new(),
            buf_kind: None,
            buf_line: 1,
            buf_column: 1,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire source text.
    ///
    /// ## Errors
    /// [`XclError::InvalidCharacter`] on the first character that cannot be
    /// classified (outside a string literal); tokenization stops immediately.
    pub fn tokenize(mut self) -> Result<Vec<Token>, XclError> {
        for c in self.source.chars() {
            self.scan_char(c)?;
        }
        // End of input flushes any non-empty trailing buffer.
        self.flush();
        Ok(self.tokens)
    }

    fn scan_char(&mut self, c: char) -> Result<(), XclError> {
        // Inside a string literal every character is accepted verbatim until
        // the closing quote; no escape processing.
        if self.buf_kind == Some(TokenKind::StringLiteral) {
            self.buf.push(c);
            self.column += 1;
            if c == '"' {
                self.flush();
            }
            return Ok(());
        }

        let class = classify(c).ok_or(XclError::InvalidCharacter(c))?;

        if let Some(kind) = self.buf_kind {
            if continues(kind, class) {
                self.buf.push(c);
                self.column += 1;
                return Ok(());
            }
            self.flush();
        }

        self.start_token(c, class);
        Ok(())
    }

    /// Begin a new buffer with `c`, or emit immediately for newlines.
    fn start_token(&mut self, c: char, class: CharClass) {
        self.buf_line = self.line;
        self.buf_column = self.column;
        match class {
            CharClass::NewLine => {
                self.tokens
                    .push(Token::new(TokenKind::NewLine, self.line, self.column, "\n"));
                self.line += 1;
                self.column = 1;
            }
            _ => {
                self.buf_kind = Some(match class {
                    CharClass::Whitespace => TokenKind::Whitespace,
                    CharClass::Identifier => TokenKind::Identifier,
                    CharClass::Number => TokenKind::NumberLiteral,
                    CharClass::StringDelimiter => TokenKind::StringLiteral,
                    CharClass::Operator => TokenKind::Operator,
                    CharClass::NewLine => unreachable!("handled above"),
                });
                self.buf.push(c);
                self.column += 1;
            }
        }
    }

    /// Emit the buffered token, reclassifying identifiers that spell a
    /// reserved word.
    fn flush(&mut self) {
        let Some(mut kind) = self.buf_kind.take() else {
            return;
        };
        if kind == TokenKind::Identifier && tokens::is_keyword(&self.buf) {
            kind = TokenKind::Keyword;
        }
        let text = std::mem::take(&mut self.buf);
        self.tokens
            .push(Token::new(kind, self.buf_line, self.buf_column, text));
    }
}

/// Whether a character of class `class` extends a buffer of kind `kind`.
fn continues(kind: TokenKind, class: CharClass) -> bool {
    match kind {
        TokenKind::Whitespace => class == CharClass::Whitespace,
        // Identifiers absorb digits after their first character.
        TokenKind::Identifier => matches!(class, CharClass::Identifier | CharClass::Number),
        TokenKind::NumberLiteral => class == CharClass::Number,
        TokenKind::Operator => class == CharClass::Operator,
        // String literals are handled before classification.
        TokenKind::StringLiteral | TokenKind::NewLine | TokenKind::Keyword => false,
    }
}

/// Convenience function to tokenize a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn tokenize(source: &str) -> Result<Vec<Token>, XclError> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn classifies_each_kind() {
        let tokens = tokenize("list Names { string }\n").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Keyword,
                TokenKind::Whitespace,
                TokenKind::Identifier,
                TokenKind::Whitespace,
                TokenKind::Operator,
                TokenKind::Whitespace,
                TokenKind::Identifier,
                TokenKind::Whitespace,
                TokenKind::Operator,
                TokenKind::NewLine,
            ]
        );
        assert_eq!(
            texts(&tokens),
            vec!["list", " ", "Names", " ", "{", " ", "string", " ", "}", "\n"]
        );
    }

    #[test]
    fn reclassifies_every_reserved_word() {
        for keyword in KEYWORDS {
            let tokens = tokenize(keyword).unwrap();
            assert_eq!(tokens.len(), 1);
            assert_eq!(tokens[0].kind, TokenKind::Keyword);
            assert_eq!(tokens[0].text, *keyword);
        }
        // A longer identifier containing a reserved word stays an identifier.
        let tokens = tokenize("lists").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
    }

    #[test]
    fn string_literal_keeps_quotes() {
        let tokens = tokenize("\"hello world\"").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].text, "\"hello world\"");
        assert_eq!(tokens[0].string_value().unwrap(), "hello world");
    }

    #[test]
    fn string_literal_accepts_unclassifiable_characters() {
        let tokens = tokenize("\"a-b.c:d\"").unwrap();
        assert_eq!(tokens[0].string_value().unwrap(), "a-b.c:d");
    }

    #[test]
    fn unterminated_string_is_flushed_at_end_of_input() {
        let tokens = tokenize("\"open").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].text, "\"open");
    }

    #[test]
    fn identifiers_absorb_digits() {
        let tokens = tokenize("value2 = 10").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].text, "value2");
        assert_eq!(tokens[4].kind, TokenKind::NumberLiteral);
        assert_eq!(tokens[4].text, "10");
    }

    #[test]
    fn number_cannot_start_identifier() {
        let tokens = tokenize("2x").unwrap();
        assert_eq!(kinds(&tokens), vec![TokenKind::NumberLiteral, TokenKind::Identifier]);
    }

    #[test]
    fn operator_runs_accumulate() {
        // Adjacent operator characters form a single token, which the
        // parser then rejects; separators are required in source.
        let tokens = tokenize("{}").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "{}");
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let tokens = tokenize("a = 1\nbb = 22").unwrap();
        let a = &tokens[0];
        assert_eq!((a.line, a.column), (1, 1));
        let one = &tokens[4];
        assert_eq!((one.line, one.column, one.text.as_str()), (1, 5, "1"));
        let newline = &tokens[5];
        assert_eq!((newline.kind, newline.line), (TokenKind::NewLine, 1));
        let bb = &tokens[6];
        assert_eq!((bb.line, bb.column), (2, 1));
        let twenty_two = &tokens[10];
        assert_eq!((twenty_two.line, twenty_two.column), (2, 6));
    }

    #[test]
    fn invalid_character_aborts() {
        let err = tokenize("a = $").unwrap_err();
        assert_eq!(err, XclError::InvalidCharacter('$'));
    }

    #[test]
    fn underscore_is_not_an_identifier_character() {
        let err = tokenize("app_name").unwrap_err();
        assert_eq!(err, XclError::InvalidCharacter('_'));
    }

    #[test]
    fn empty_input_produces_no_tokens() {
        assert!(tokenize("").unwrap().is_empty());
    }
}
