//! Runtime values of XCL documents.
//!
//! A [`Value`] is an instance of some [`crate::types::Type`]: one variant per
//! concrete type kind. Values are owned, deep-cloneable, and stringifiable.
//! They refer back to their type by *name* only; the owning
//! [`crate::document::Document`]'s registry is the sole owner of every type.

use std::collections::BTreeMap;
use std::fmt;

use crate::diagnostics::XclError;
use crate::types::Section;

/// A runtime instance of some XCL type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    String(String),
    Enumeration(EnumerationValue),
    List(ListValue),
    Section(SectionValue),
}

impl Value {
    /// The name of this value's type (`bool`, `int`, `string`, or the
    /// declared name of a custom type).
    pub fn type_name(&self) -> &str {
        match self {
            Value::Boolean(_) => "bool",
            Value::Integer(_) => "int",
            Value::String(_) => "string",
            Value::Enumeration(v) => &v.type_name,
            Value::List(v) => &v.type_name,
            Value::Section(v) => &v.type_name,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListValue> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_section(&self) -> Option<&SectionValue> {
        match self {
            Value::Section(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(true) => write!(f, "True"),
            Value::Boolean(false) => write!(f, "False"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Enumeration(v) => write!(f, "{}", v.name),
            Value::List(v) => {
                write!(f, "[ ")?;
                for value in &v.values {
                    write!(f, "{value}, ")?;
                }
                write!(f, "]")
            }
            Value::Section(v) => {
                write!(f, "{{ ")?;
                for (name, value) in &v.values {
                    write!(f, "{name} = {value}, ")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// One declared value of an enumeration type: its spelling plus the integer
/// index it was assigned at declaration (0-based declaration order).
#[derive(Debug, Clone, PartialEq)]
pub struct EnumerationValue {
    pub type_name: String,
    pub name: String,
    pub index: usize,
}

/// An ordered sequence of owned values, all sharing the list type's declared
/// element type.
#[derive(Debug, Clone, PartialEq)]
pub struct ListValue {
    type_name: String,
    element_type: String,
    values: Vec<Value>,
}

impl ListValue {
    pub fn new(type_name: impl Into<String>, element_type: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            element_type: element_type.into(),
            values: Vec::new(),
        }
    }

    /// Append a value, enforcing homogeneity against the declared element
    /// type.
    ///
    /// ## Errors
    /// [`XclError::TypeMismatch`] if the value's type name differs from the
    /// declared element type name.
    pub fn push(&mut self, value: Value) -> Result<(), XclError> {
        if value.type_name() != self.element_type {
            return Err(XclError::type_mismatch(value.type_name(), &self.element_type));
        }
        self.values.push(value);
        Ok(())
    }

    pub fn element_type(&self) -> &str {
        &self.element_type
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// A mapping from field name to owned value for one section instance.
///
/// A field absent from the mapping falls back at read time to the default
/// declared on the section type; pass that type to [`SectionValue::get`].
#[derive(Debug, Clone, PartialEq)]
pub struct SectionValue {
    type_name: String,
    values: BTreeMap<String, Value>,
}

impl SectionValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Set a field. Later writes overwrite earlier ones.
    pub fn set(&mut self, field_name: impl Into<String>, value: Value) {
        self.values.insert(field_name.into(), value);
    }

    /// A field's value as explicitly set in this instance, if any.
    pub fn explicit(&self, field_name: &str) -> Option<&Value> {
        self.values.get(field_name)
    }

    /// Read a field, falling back to the default declared on the section
    /// type when the field was never explicitly set.
    ///
    /// ## Errors
    /// [`XclError::MemberNotFound`] if the type declares no such field,
    /// [`XclError::RequiredFieldNotSet`] if the field has neither an explicit
    /// value nor a declared default.
    pub fn get<'a>(&'a self, ty: &'a Section, field_name: &str) -> Result<&'a Value, XclError> {
        if let Some(value) = self.values.get(field_name) {
            return Ok(value);
        }
        let field = ty.resolve_field(field_name)?;
        field.default.as_ref().ok_or_else(|| XclError::RequiredFieldNotSet {
            field: field_name.to_string(),
            section: ty.name().to_string(),
        })
    }

    /// Explicitly set fields, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}
