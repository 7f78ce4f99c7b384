//! The XCL type system.
//!
//! A [`Type`] is a named classification able to turn a literal token into a
//! [`Value`] (activation). The three primitive types are stateless; custom
//! types (enumeration, list, section) are declared per document and live in
//! that document's registry, which is their sole owner. Lists and sections
//! refer to other types by registry *name*, never by reference, so imported
//! copies remain valid in the importing document.

use crate::diagnostics::XclError;
use crate::lexer::tokens::{Token, TokenKind};
use crate::values::{EnumerationValue, ListValue, SectionValue, Value};

/// Registry name of the primitive boolean type.
pub const BOOL: &str = "bool";
/// Registry name of the primitive integer type.
pub const INT: &str = "int";
/// Registry name of the primitive string type.
pub const STRING: &str = "string";

/// A named classification, primitive or custom.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Boolean,
    Integer,
    String,
    Enumeration(Enumeration),
    List(List),
    Section(Section),
}

impl Type {
    pub fn name(&self) -> &str {
        match self {
            Type::Boolean => BOOL,
            Type::Integer => INT,
            Type::String => STRING,
            Type::Enumeration(e) => &e.name,
            Type::List(l) => &l.name,
            Type::Section(s) => &s.name,
        }
    }

    /// Whether this type was declared by a document (as opposed to a
    /// built-in primitive). Gates which types are re-registered when one
    /// document imports another.
    pub fn is_custom(&self) -> bool {
        !matches!(self, Type::Boolean | Type::Integer | Type::String)
    }

    /// Turn a literal token into a value of this type.
    ///
    /// List and section types ignore the token and produce a fresh empty
    /// container; dedicated parser routines populate it.
    ///
    /// ## Errors
    /// [`XclError::UnexpectedToken`] if the token's kind or spelling does
    /// not fit, [`XclError::MemberNotFound`] for an unknown enumeration
    /// value name.
    pub fn activate(&self, token: &Token) -> Result<Value, XclError> {
        match self {
            Type::Boolean => {
                if token.kind != TokenKind::Identifier {
                    return Err(XclError::unexpected_token(token));
                }
                match token.text.as_str() {
                    "true" | "True" => Ok(Value::Boolean(true)),
                    "false" | "False" => Ok(Value::Boolean(false)),
                    _ => Err(XclError::unexpected_token(token)),
                }
            }
            Type::Integer => {
                if token.kind != TokenKind::NumberLiteral {
                    return Err(XclError::unexpected_token(token));
                }
                // The lexer never classifies `-` as part of a number, so
                // only non-negative base-10 literals reach this point.
                token
                    .text
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|_| XclError::unexpected_token(token))
            }
            Type::String => Ok(Value::String(token.string_value()?.to_string())),
            Type::Enumeration(e) => {
                if token.kind != TokenKind::Identifier {
                    return Err(XclError::unexpected_token(token));
                }
                e.activate_name(&token.text)
            }
            Type::List(l) => Ok(Value::List(l.activate_empty())),
            Type::Section(s) => Ok(Value::Section(s.activate_empty())),
        }
    }
}

/// A user-declared enumeration: ordered value names, each assigned the
/// integer index of its declaration position.
#[derive(Debug, Clone, PartialEq)]
pub struct Enumeration {
    name: String,
    values: Vec<String>,
}

impl Enumeration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Declare the next value. Duplicate names are not rejected; activation
    /// by name finds the first declared match.
    pub fn add_value(&mut self, name: impl Into<String>) {
        self.values.push(name.into());
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Activate by value name (exact text match).
    pub fn activate_name(&self, name: &str) -> Result<Value, XclError> {
        let index = self
            .values
            .iter()
            .position(|value| value == name)
            .ok_or_else(|| XclError::member_not_found(name, &self.name))?;
        Ok(Value::Enumeration(EnumerationValue {
            type_name: self.name.clone(),
            name: name.to_string(),
            index,
        }))
    }
}

/// A user-declared homogeneous list type. The element type is referenced by
/// registry name and must already exist when the list is declared.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    name: String,
    element: String,
}

impl List {
    pub fn new(name: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            element: element.into(),
        }
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn activate_empty(&self) -> ListValue {
        ListValue::new(&self.name, &self.element)
    }
}

/// One declared field of a section type.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub type_name: String,
    /// `None` marks the field as required in every literal body.
    pub default: Option<Value>,
}

/// A user-declared structured type: an ordered sequence of typed fields,
/// each either defaulted or required.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    name: String,
    fields: Vec<Field>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        default: Option<Value>,
    ) {
        self.fields.push(Field {
            name: name.into(),
            type_name: type_name.into(),
            default,
        });
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn resolve_field(&self, name: &str) -> Result<&Field, XclError> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| XclError::member_not_found(name, &self.name))
    }

    pub fn activate_empty(&self) -> SectionValue {
        SectionValue::new(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identifier(text: &str) -> Token {
        Token::new(TokenKind::Identifier, 1, 1, text)
    }

    fn number(text: &str) -> Token {
        Token::new(TokenKind::NumberLiteral, 1, 1, text)
    }

    #[test]
    fn boolean_activation() {
        for (text, expected) in [("true", true), ("True", true), ("false", false), ("False", false)] {
            let value = Type::Boolean.activate(&identifier(text)).unwrap();
            assert_eq!(value.as_boolean(), Some(expected));
        }
        assert!(matches!(
            Type::Boolean.activate(&identifier("yes")),
            Err(XclError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            Type::Boolean.activate(&number("1")),
            Err(XclError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn integer_activation() {
        let value = Type::Integer.activate(&number("12345")).unwrap();
        assert_eq!(value.as_integer(), Some(12345));
        assert!(matches!(
            Type::Integer.activate(&identifier("ten")),
            Err(XclError::UnexpectedToken { .. })
        ));
        // Overflowing i64 is a token-level failure, not a panic.
        assert!(matches!(
            Type::Integer.activate(&number("99999999999999999999")),
            Err(XclError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn string_activation_strips_quotes() {
        let token = Token::new(TokenKind::StringLiteral, 1, 1, "\"Alice\"");
        let value = Type::String.activate(&token).unwrap();
        assert_eq!(value.as_string(), Some("Alice"));
        assert!(matches!(
            Type::String.activate(&identifier("Alice")),
            Err(XclError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn enumeration_indices_follow_declaration_order() {
        let mut colors = Enumeration::new("Color");
        colors.add_value("red");
        colors.add_value("green");
        colors.add_value("blue");

        for (name, index) in [("red", 0), ("green", 1), ("blue", 2)] {
            let value = Type::Enumeration(colors.clone()).activate(&identifier(name)).unwrap();
            match value {
                Value::Enumeration(v) => {
                    assert_eq!(v.index, index);
                    assert_eq!(v.type_name, "Color");
                }
                other => panic!("expected enumeration value, got {other:?}"),
            }
        }

        assert_eq!(
            Type::Enumeration(colors).activate(&identifier("magenta")).unwrap_err(),
            XclError::member_not_found("magenta", "Color")
        );
    }

    #[test]
    fn duplicate_enum_values_resolve_to_first_index() {
        let mut e = Enumeration::new("E");
        e.add_value("a");
        e.add_value("a");
        match e.activate_name("a").unwrap() {
            Value::Enumeration(v) => assert_eq!(v.index, 0),
            other => panic!("expected enumeration value, got {other:?}"),
        }
    }

    #[test]
    fn containers_activate_empty() {
        let list = Type::List(List::new("Names", "string"));
        match list.activate(&identifier("ignored")).unwrap() {
            Value::List(v) => {
                assert!(v.values().is_empty());
                assert_eq!(v.element_type(), "string");
            }
            other => panic!("expected list value, got {other:?}"),
        }

        let section = Type::Section(Section::new("Person"));
        match section.activate(&identifier("ignored")).unwrap() {
            Value::Section(v) => assert!(v.iter().next().is_none()),
            other => panic!("expected section value, got {other:?}"),
        }
    }

    #[test]
    fn custom_flag_gates_primitives() {
        assert!(!Type::Boolean.is_custom());
        assert!(!Type::Integer.is_custom());
        assert!(!Type::String.is_custom());
        assert!(Type::Enumeration(Enumeration::new("E")).is_custom());
        assert!(Type::List(List::new("L", INT)).is_custom());
        assert!(Type::Section(Section::new("S")).is_custom());
    }
}
