//! The product of one parse pass: registered types, top-level values, and
//! pending required declarations.
//!
//! A document is created either as the *root* document being parsed or as an
//! *imported* one produced by an import resolver. Only root documents
//! undergo the end-of-parse completeness check, and only non-imported
//! documents accept values through [`Document::add_data`]; import merging
//! transplants an already-validated document's values wholesale instead.

use std::collections::BTreeMap;

use crate::diagnostics::XclError;
use crate::types::Type;
use crate::values::Value;

/// A named registry of types, top-level values, and required declarations.
///
/// The registry is the sole owner of every [`Type`]; values and other types
/// refer to types by name only.
#[derive(Debug, Clone)]
pub struct Document {
    types: BTreeMap<String, Type>,
    data: BTreeMap<String, Value>,
    // Required name -> name of its declared type.
    required: BTreeMap<String, String>,
    imported: bool,
}

impl Document {
    /// Create an empty document pre-seeded with the three primitive types.
    pub fn new(imported: bool) -> Self {
        let mut types = BTreeMap::new();
        for primitive in [Type::Boolean, Type::Integer, Type::String] {
            types.insert(primitive.name().to_string(), primitive);
        }
        Self {
            types,
            data: BTreeMap::new(),
            required: BTreeMap::new(),
            imported,
        }
    }

    pub fn is_imported(&self) -> bool {
        self.imported
    }

    /// Register a type under its declared name.
    ///
    /// ## Errors
    /// [`XclError::Runtime`] if the name is already registered.
    pub fn register_type(&mut self, ty: Type) -> Result<(), XclError> {
        let name = ty.name();
        if self.types.contains_key(name) {
            return Err(XclError::runtime(format!(
                "A data type with name `{name}` is already registered."
            )));
        }
        self.types.insert(name.to_string(), ty);
        Ok(())
    }

    /// Bind a top-level value.
    ///
    /// ## Errors
    /// [`XclError::Runtime`] if this document was produced as an import: an
    /// imported document's content is acquired wholesale via
    /// [`Document::import_document`], never incrementally.
    pub fn add_data(&mut self, name: impl Into<String>, value: Value) -> Result<(), XclError> {
        if self.imported {
            return Err(XclError::runtime(
                "Values can not be added to an imported document.",
            ));
        }
        self.data.insert(name.into(), value);
        Ok(())
    }

    /// Declare that `name` must be bound to a value of the named type before
    /// the (root) document is complete.
    ///
    /// ## Errors
    /// [`XclError::Runtime`] if `name` is already declared required.
    pub fn add_required_definition(
        &mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Result<(), XclError> {
        let name = name.into();
        if self.required.contains_key(&name) {
            return Err(XclError::runtime(format!(
                "The required name `{name}` is already defined."
            )));
        }
        self.required.insert(name, type_name.into());
        Ok(())
    }

    /// The declared type name of a pending required declaration, if any.
    /// Non-failing; used by the parser to decide assignment dispatch.
    pub fn resolve_required_definition(&self, name: &str) -> Option<&str> {
        self.required.get(name).map(String::as_str)
    }

    /// Merge another document into this one: its custom types are
    /// re-registered (a name collision is a duplicate-type error), its
    /// values are deep-cloned into this document's data (bypassing the
    /// imported-document guard of [`Document::add_data`] by design), and its
    /// required declarations are re-declared here.
    pub fn import_document(&mut self, source: &Document) -> Result<(), XclError> {
        for ty in source.types.values() {
            if ty.is_custom() {
                self.register_type(ty.clone())?;
            }
        }
        for (name, value) in &source.data {
            self.data.insert(name.clone(), value.clone());
        }
        for (name, type_name) in &source.required {
            self.add_required_definition(name.clone(), type_name.clone())?;
        }
        Ok(())
    }

    /// Look up a registered type.
    ///
    /// ## Errors
    /// [`XclError::TypeNotFound`] if no type of that name is registered.
    pub fn resolve_type(&self, name: &str) -> Result<&Type, XclError> {
        self.types
            .get(name)
            .ok_or_else(|| XclError::TypeNotFound(name.to_string()))
    }

    /// Top-level bindings, in name order.
    pub fn data(&self) -> &BTreeMap<String, Value> {
        &self.data
    }

    /// A single top-level binding.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// All registered types (primitives included), in name order.
    pub fn types(&self) -> &BTreeMap<String, Type> {
        &self.types
    }

    /// Pending required declarations (name -> type name). Empty for a
    /// successfully completed root document.
    pub fn required_definitions(&self) -> &BTreeMap<String, String> {
        &self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Enumeration, List, Section};

    #[test]
    fn new_document_carries_the_primitives() {
        let doc = Document::new(false);
        assert!(doc.resolve_type("bool").is_ok());
        assert!(doc.resolve_type("int").is_ok());
        assert!(doc.resolve_type("string").is_ok());
        assert_eq!(
            doc.resolve_type("Person").unwrap_err(),
            XclError::TypeNotFound("Person".to_string())
        );
    }

    #[test]
    fn duplicate_type_registration_fails() {
        let mut doc = Document::new(false);
        doc.register_type(Type::Enumeration(Enumeration::new("Color"))).unwrap();
        let err = doc
            .register_type(Type::Section(Section::new("Color")))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "A data type with name `Color` is already registered."
        );
    }

    #[test]
    fn imported_documents_reject_direct_data() {
        let mut doc = Document::new(true);
        let err = doc.add_data("x", Value::Integer(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Values can not be added to an imported document."
        );
    }

    #[test]
    fn duplicate_required_declaration_fails() {
        let mut doc = Document::new(false);
        doc.add_required_definition("port", "int").unwrap();
        assert_eq!(doc.resolve_required_definition("port"), Some("int"));
        let err = doc.add_required_definition("port", "string").unwrap_err();
        assert_eq!(err.to_string(), "The required name `port` is already defined.");
    }

    #[test]
    fn import_merges_custom_types_values_and_requireds() {
        let mut imported = Document::new(true);
        imported
            .register_type(Type::List(List::new("Names", "string")))
            .unwrap();
        imported
            .data
            .insert("greeting".to_string(), Value::String("hi".to_string()));
        imported.add_required_definition("port", "int").unwrap();

        let mut root = Document::new(false);
        root.import_document(&imported).unwrap();

        // Primitives never collide: they are simply not copied.
        assert!(root.resolve_type("Names").is_ok());
        assert_eq!(root.get("greeting").and_then(Value::as_string), Some("hi"));
        assert_eq!(root.resolve_required_definition("port"), Some("int"));
    }

    #[test]
    fn import_collision_on_custom_type_fails() {
        let mut imported = Document::new(true);
        imported
            .register_type(Type::Enumeration(Enumeration::new("Color")))
            .unwrap();

        let mut root = Document::new(false);
        root.register_type(Type::Enumeration(Enumeration::new("Color"))).unwrap();
        let err = root.import_document(&imported).unwrap_err();
        assert_eq!(
            err.to_string(),
            "A data type with name `Color` is already registered."
        );
    }

    #[test]
    fn import_merge_bypasses_the_imported_guard() {
        // An imported document importing another still receives the values;
        // only the incremental add_data path is guarded.
        let mut inner = Document::new(true);
        inner.data.insert("x".to_string(), Value::Integer(1));

        let mut outer = Document::new(true);
        outer.import_document(&inner).unwrap();
        assert_eq!(outer.get("x").and_then(Value::as_integer), Some(1));
    }
}
