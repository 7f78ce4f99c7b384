//! Recursive-descent parser for XCL documents.
//!
//! Consumes the token sequence produced by [`crate::lexer`] with a single
//! shared cursor (one token of lookahead, no backtracking) and builds a
//! validated [`Document`]. Every handler raises on the first violated
//! expectation; there is no error recovery, and a caller receiving an error
//! must discard the in-progress document.
//!
//! Import statements synchronously invoke a host-supplied
//! [`ImportResolver`], which is expected to run a full lex+parse cycle on
//! the imported source. Import cycles are not detected and will recurse
//! without bound; hosts that care must break cycles themselves.

use crate::diagnostics::XclError;
use crate::document::Document;
use crate::lexer::tokens::{Token, TokenKind};
use crate::types::{Enumeration, List, Section, Type};
use crate::values::{ListValue, SectionValue, Value};

/// Host-supplied hook mapping an import name (the unquoted text of the
/// string literal following `import`) to a fully parsed document marked as
/// imported. The core performs no file or resource access itself.
pub trait ImportResolver {
    fn resolve(&self, name: &str) -> Result<Document, XclError>;
}

impl<F> ImportResolver for F
where
    F: Fn(&str) -> Result<Document, XclError>,
{
    fn resolve(&self, name: &str) -> Result<Document, XclError> {
        self(name)
    }
}

/// Resolver for hosts that do not support imports: every `import` statement
/// fails with a runtime error naming the import.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImports;

impl ImportResolver for NoImports {
    fn resolve(&self, name: &str) -> Result<Document, XclError> {
        Err(XclError::runtime(format!(
            "The import `{name}` can not be resolved."
        )))
    }
}

/// Parser front: holds the import resolver and parses token sequences into
/// documents.
pub struct DocumentParser<R> {
    resolver: R,
}

impl<R: ImportResolver> DocumentParser<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Parse a full token sequence into a document.
    ///
    /// `imported` marks the result as produced by an import resolver:
    /// imported documents skip the end-of-parse completeness check and
    /// reject incremental [`Document::add_data`] use.
    #[tracing::instrument(skip_all, fields(token_count = tokens.len(), imported))]
    pub fn parse(&self, tokens: &[Token], imported: bool) -> Result<Document, XclError> {
        Parser {
            tokens,
            pos: 0,
            resolver: &self.resolver,
        }
        .parse(imported)
    }
}

/// Tokenize and parse a source string that uses no imports.
pub fn parse_source(source: &str) -> Result<Document, XclError> {
    let tokens = crate::lexer::tokenize(source)?;
    DocumentParser::new(NoImports).parse(&tokens, false)
}

/// Cursor state for one parse pass.
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    resolver: &'a dyn ImportResolver,
}

impl<'a> Parser<'a> {
    fn parse(mut self, imported: bool) -> Result<Document, XclError> {
        let mut doc = Document::new(imported);

        while let Some(token) = self.current() {
            match token.kind {
                TokenKind::Keyword => self.parse_keyword(&mut doc, token)?,
                TokenKind::Identifier => self.parse_assignment(&mut doc, token)?,
                TokenKind::Whitespace | TokenKind::NewLine => self.advance(),
                TokenKind::StringLiteral | TokenKind::NumberLiteral | TokenKind::Operator => {
                    return Err(XclError::unexpected_token(token));
                }
            }
        }

        // Only root documents are checked for completeness; an imported
        // document's pending names are satisfied by its importer.
        if !imported {
            for name in doc.required_definitions().keys() {
                if doc.get(name).is_none() {
                    return Err(XclError::runtime(format!(
                        "The required value `{name}` is not defined."
                    )));
                }
            }
        }

        Ok(doc)
    }

    // ========================================================================
    // Cursor helpers
    // ========================================================================

    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn end_error(&self) -> XclError {
        match self.tokens.last() {
            Some(token) => XclError::unexpected_end(token),
            None => XclError::unexpected_end(&Token::new(TokenKind::NewLine, 1, 1, "")),
        }
    }

    /// Skip whitespace and return the next meaningful token without
    /// consuming it. Newlines are *not* skipped.
    fn expect(&mut self) -> Result<&'a Token, XclError> {
        while matches!(self.current(), Some(t) if t.kind == TokenKind::Whitespace) {
            self.advance();
        }
        self.current().ok_or_else(|| self.end_error())
    }

    /// Skip whitespace and newlines and return the next meaningful token
    /// without consuming it.
    fn expect_skip_newlines(&mut self) -> Result<&'a Token, XclError> {
        while matches!(
            self.current(),
            Some(t) if t.kind == TokenKind::Whitespace || t.kind == TokenKind::NewLine
        ) {
            self.advance();
        }
        self.current().ok_or_else(|| self.end_error())
    }

    /// Position on the next token of the expected kind, skipping newlines
    /// unless a newline itself is expected.
    fn expect_kind(&mut self, expected: TokenKind) -> Result<&'a Token, XclError> {
        let token = if expected == TokenKind::NewLine {
            self.expect()?
        } else {
            self.expect_skip_newlines()?
        };
        if token.kind != expected {
            return Err(XclError::unexpected_token(token));
        }
        Ok(token)
    }

    /// Consume an operator token with the exact given spelling.
    fn eat_operator(&mut self, symbol: &str) -> Result<(), XclError> {
        let token = self.expect_kind(TokenKind::Operator)?;
        if token.text != symbol {
            return Err(XclError::unexpected_token(token));
        }
        self.advance();
        Ok(())
    }

    /// Whether `token` closes a `{ ... }` body.
    fn closes_body(token: &Token) -> bool {
        token.kind == TokenKind::Operator && token.text == "}"
    }

    // ========================================================================
    // Statement dispatch
    // ========================================================================

    fn parse_keyword(&mut self, doc: &mut Document, token: &'a Token) -> Result<(), XclError> {
        match token.text.as_str() {
            "import" => self.parse_import(doc),
            "section" => self.parse_section_decl(doc),
            "enum" => self.parse_enum_decl(doc),
            "list" => self.parse_list_decl(doc),
            "required" => self.parse_required_decl(doc),
            // `default` is reserved but has no top-level statement.
            _ => Err(XclError::unexpected_token(token)),
        }
    }

    /// `assignment := IDENT ( sectionBody | listBody | "=" LITERAL NEWLINE )`
    ///
    /// The leading identifier is checked against pending required
    /// declarations first; a match means the identifier *is* the binding
    /// name and its declared type governs the value shape. Otherwise the
    /// identifier is a type name and the binding name follows.
    fn parse_assignment(&mut self, doc: &mut Document, token: &'a Token) -> Result<(), XclError> {
        if let Some(required_type) = doc.resolve_required_definition(&token.text) {
            let name = token.text.clone();
            let type_name = required_type.to_string();
            self.advance();
            return self.parse_binding(doc, name, &type_name);
        }

        let type_name = doc.resolve_type(&token.text)?.name().to_string();
        self.advance();

        let token = self.expect_kind(TokenKind::Identifier)?;
        let name = token.text.clone();
        self.advance();

        // A binding that was independently declared required must use the
        // declared type; fail before any value is consumed.
        if let Some(required_type) = doc.resolve_required_definition(&name) {
            if required_type != type_name {
                return Err(XclError::type_mismatch(&type_name, required_type));
            }
        }

        self.parse_binding(doc, name, &type_name)
    }

    /// Parse the value for one top-level binding, keyed by the resolved
    /// type's variant.
    fn parse_binding(
        &mut self,
        doc: &mut Document,
        name: String,
        type_name: &str,
    ) -> Result<(), XclError> {
        let ty = doc.resolve_type(type_name)?.clone();
        match ty {
            Type::Section(section) => {
                let value = self.parse_section_body(doc, &section)?;
                doc.add_data(name, Value::Section(value))
            }
            Type::List(list) => {
                let value = self.parse_list_body(doc, &list)?;
                doc.add_data(name, Value::List(value))
            }
            scalar => {
                self.eat_operator("=")?;
                let literal = self.expect()?;
                let value = scalar.activate(literal)?;
                self.advance();
                // Scalar assignments demand a terminating newline.
                self.expect_kind(TokenKind::NewLine)?;
                self.advance();
                doc.add_data(name, value)
            }
        }
    }

    // ========================================================================
    // Value bodies
    // ========================================================================

    /// `sectionBody := "{" (IDENT "=" LITERAL ","?)* "}"`
    fn parse_section_body(
        &mut self,
        doc: &Document,
        ty: &Section,
    ) -> Result<SectionValue, XclError> {
        self.eat_operator("{")?;
        let mut value = ty.activate_empty();
        let mut seen: Vec<String> = Vec::new();

        loop {
            let token = self.expect_skip_newlines()?;
            if Self::closes_body(token) {
                self.advance();
                break;
            }

            let token = self.expect_kind(TokenKind::Identifier)?;
            let field = ty.resolve_field(&token.text)?;
            self.advance();

            self.eat_operator("=")?;
            let literal = self.expect()?;
            let field_value = doc.resolve_type(&field.type_name)?.activate(literal)?;
            self.advance();

            value.set(field.name.clone(), field_value);
            seen.push(field.name.clone());

            let token = self.expect_kind(TokenKind::Operator)?;
            match token.text.as_str() {
                "," => self.advance(),
                "}" => {
                    self.advance();
                    break;
                }
                _ => return Err(XclError::unexpected_token(token)),
            }
        }

        // Every field lacking a default must have been set exactly once.
        for field in ty.fields() {
            if field.default.is_none() && seen.iter().filter(|name| **name == field.name).count() != 1
            {
                return Err(XclError::RequiredFieldNotSet {
                    field: field.name.clone(),
                    section: ty.name().to_string(),
                });
            }
        }

        Ok(value)
    }

    /// `listBody := "{" (LITERAL ","?)* "}"`
    fn parse_list_body(&mut self, doc: &Document, ty: &List) -> Result<ListValue, XclError> {
        self.eat_operator("{")?;
        let element = doc.resolve_type(ty.element())?;
        let mut value = ty.activate_empty();

        loop {
            let token = self.expect_skip_newlines()?;
            if Self::closes_body(token) {
                self.advance();
                break;
            }

            value.push(element.activate(token)?)?;
            self.advance();

            let token = self.expect_kind(TokenKind::Operator)?;
            match token.text.as_str() {
                "," => self.advance(),
                "}" => {
                    self.advance();
                    break;
                }
                _ => return Err(XclError::unexpected_token(token)),
            }
        }

        Ok(value)
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// `importStmt := "import" STRING NEWLINE`
    fn parse_import(&mut self, doc: &mut Document) -> Result<(), XclError> {
        self.advance();

        let token = self.expect_kind(TokenKind::StringLiteral)?;
        let name = token.string_value()?;
        tracing::debug!(import = %name, "resolving import");
        let imported = self.resolver.resolve(name)?;
        doc.import_document(&imported)?;
        self.advance();

        self.expect_kind(TokenKind::NewLine)?;
        self.advance();
        Ok(())
    }

    /// `sectionDecl := "section" IDENT "{" field* "}"`
    fn parse_section_decl(&mut self, doc: &mut Document) -> Result<(), XclError> {
        self.advance();

        let token = self.expect_kind(TokenKind::Identifier)?;
        let mut section = Section::new(token.text.clone());
        self.advance();

        self.eat_operator("{")?;
        loop {
            let token = self.expect_skip_newlines()?;
            if Self::closes_body(token) {
                self.advance();
                break;
            }
            self.parse_field_decl(doc, &mut section)?;
        }

        doc.register_type(Type::Section(section))
    }

    /// `field := IDENT IDENT ( "default" LITERAL | "required" ) ","`
    fn parse_field_decl(&mut self, doc: &Document, section: &mut Section) -> Result<(), XclError> {
        let token = self.expect_kind(TokenKind::Identifier)?;
        let ty = doc.resolve_type(&token.text)?;
        // Sections nested in sections are unsupported; surfaced as an
        // unknown type, matching the declaration-time contract.
        if matches!(ty, Type::Section(_)) {
            return Err(XclError::TypeNotFound(ty.name().to_string()));
        }
        let type_name = ty.name().to_string();
        self.advance();

        let token = self.expect_kind(TokenKind::Identifier)?;
        let field_name = token.text.clone();
        self.advance();

        let token = self.expect_kind(TokenKind::Keyword)?;
        match token.text.as_str() {
            "default" => {
                self.advance();
                let literal = self.expect()?;
                let default = doc.resolve_type(&type_name)?.activate(literal)?;
                self.advance();
                self.eat_operator(",")?;
                section.add_field(field_name, type_name, Some(default));
            }
            "required" => {
                self.advance();
                self.eat_operator(",")?;
                section.add_field(field_name, type_name, None);
            }
            _ => return Err(XclError::unexpected_token(token)),
        }
        Ok(())
    }

    /// `enumDecl := "enum" IDENT "{" (IDENT ",")* "}"`
    fn parse_enum_decl(&mut self, doc: &mut Document) -> Result<(), XclError> {
        self.advance();

        let token = self.expect_kind(TokenKind::Identifier)?;
        let mut enumeration = Enumeration::new(token.text.clone());
        self.advance();

        self.eat_operator("{")?;
        loop {
            let token = self.expect_skip_newlines()?;
            if Self::closes_body(token) {
                self.advance();
                break;
            }

            let token = self.expect_kind(TokenKind::Identifier)?;
            enumeration.add_value(token.text.clone());
            self.advance();

            let token = self.expect_kind(TokenKind::Operator)?;
            match token.text.as_str() {
                "," => self.advance(),
                "}" => {
                    self.advance();
                    break;
                }
                _ => return Err(XclError::unexpected_token(token)),
            }
        }

        doc.register_type(Type::Enumeration(enumeration))
    }

    /// `listDecl := "list" IDENT "{" IDENT "}"`
    fn parse_list_decl(&mut self, doc: &mut Document) -> Result<(), XclError> {
        self.advance();

        let token = self.expect_kind(TokenKind::Identifier)?;
        let name = token.text.clone();
        self.advance();

        self.eat_operator("{")?;
        let token = self.expect_kind(TokenKind::Identifier)?;
        // The element type is resolved at declaration time; forward
        // references are not supported.
        let element = doc.resolve_type(&token.text)?.name().to_string();
        self.advance();
        self.eat_operator("}")?;

        doc.register_type(Type::List(List::new(name, element)))
    }

    /// `requiredDecl := "required" IDENT IDENT NEWLINE`
    fn parse_required_decl(&mut self, doc: &mut Document) -> Result<(), XclError> {
        self.advance();

        let token = self.expect_kind(TokenKind::Identifier)?;
        let type_name = doc.resolve_type(&token.text)?.name().to_string();
        self.advance();

        let token = self.expect_kind(TokenKind::Identifier)?;
        let name = token.text.clone();
        self.advance();

        doc.add_required_definition(name, type_name)?;
        self.expect_kind(TokenKind::NewLine)?;
        self.advance();
        Ok(())
    }
}
