//! Typed field descriptors for node inputs and outputs.
//!
//! Every node declares its inputs and outputs as ordered lists of
//! [`FieldDescriptor`]s. The declared [`FieldType`] is checked structurally
//! against the current JSON value by the validator (invalid-field-type
//! findings), and the `required` flag drives missing-required-field
//! findings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The closed set of declarable field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// No declared type; only a null/absent value conforms.
    #[default]
    Empty,
    String,
    Number,
    Boolean,
    Object,
    Array,
    Map,
    Dynamic,
}

impl FieldType {
    /// Returns `true` if `value` structurally conforms to this type.
    ///
    /// `Null` is always accepted: an unset value is a missing-required-field
    /// concern, not a type mismatch.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        match self {
            FieldType::Empty => false,
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Object | FieldType::Map => value.is_object(),
            FieldType::Array => value.is_array(),
            FieldType::Dynamic => true,
        }
    }
}

/// A single input or output declaration on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
    /// Default or current value. `Null` means unset.
    #[serde(default)]
    pub value: Value,
    /// Child descriptors for structured (object/map) fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FieldDescriptor>,
}

impl FieldDescriptor {
    /// Creates a descriptor with no value and no children.
    pub fn new(name: impl Into<String>, field_type: FieldType, required: bool) -> Self {
        FieldDescriptor {
            name: name.into(),
            field_type,
            required,
            description: String::new(),
            value: Value::Null,
            children: Vec::new(),
        }
    }

    /// Builder-style value assignment.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }

    /// Returns `true` if `value` counts as unset: null or an empty string.
    pub fn value_is_empty(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Explicit structural clone, including children.
    ///
    /// Template instantiation and node copy go through this rather than a
    /// serialize/deserialize round trip, so ownership of the produced tree
    /// is unambiguous and non-JSON-represented state can never be dropped
    /// silently.
    pub fn deep_clone(&self) -> FieldDescriptor {
        FieldDescriptor {
            name: self.name.clone(),
            field_type: self.field_type,
            required: self.required,
            description: self.description.clone(),
            value: self.value.clone(),
            children: self.children.iter().map(FieldDescriptor::deep_clone).collect(),
        }
    }
}
