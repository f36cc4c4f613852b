//! Core descriptor types.
//!
//! A [`FieldDescriptor`] is the normalized, declarative specification of one
//! control. Descriptors are produced fresh from raw entries on every build and
//! are not mutated by the engine afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::property::Property;

/// The type tag of a descriptor.
///
/// Two tags are built in. Every other tag is caller-defined and its property
/// bag is produced by the fallback resolver supplied at build time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ControlType {
    /// Generic control; the property's `controlType` picks leaf, group or array.
    #[default]
    Custom,
    /// Contributes a descriptor but never a control.
    Placeholder,
    /// Caller-defined tag.
    Other(String),
}

impl ControlType {
    pub const CUSTOM: &'static str = "custom";
    pub const PLACEHOLDER: &'static str = "placeholder";

    pub fn as_str(&self) -> &str {
        match self {
            ControlType::Custom => Self::CUSTOM,
            ControlType::Placeholder => Self::PLACEHOLDER,
            ControlType::Other(tag) => tag,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ControlType::Custom)
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ControlType::Placeholder)
    }
}

impl From<&str> for ControlType {
    fn from(tag: &str) -> Self {
        match tag {
            Self::CUSTOM => ControlType::Custom,
            Self::PLACEHOLDER => ControlType::Placeholder,
            other => ControlType::Other(other.to_string()),
        }
    }
}

impl From<String> for ControlType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            Self::CUSTOM => ControlType::Custom,
            Self::PLACEHOLDER => ControlType::Placeholder,
            _ => ControlType::Other(tag),
        }
    }
}

impl From<ControlType> for String {
    fn from(control_type: ControlType) -> Self {
        match control_type {
            ControlType::Other(tag) => tag,
            builtin => builtin.as_str().to_string(),
        }
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative validation rules attached to a descriptor.
///
/// Every field is optional; absence means "no rule".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

impl ValidationSpec {
    /// Read a spec from raw JSON without failing.
    ///
    /// Fields of the wrong JSON type are treated as absent, so a malformed
    /// rule set degrades to fewer rules instead of an error.
    pub fn from_value(raw: &Value) -> Self {
        Self {
            required: raw.get("required").and_then(Value::as_bool),
            email: raw.get("email").and_then(Value::as_bool),
            min_length: raw.get("minLength").and_then(Value::as_f64),
            max_length: raw.get("maxLength").and_then(Value::as_f64),
            min: raw.get("min").and_then(Value::as_f64),
            max: raw.get("max").and_then(Value::as_f64),
            regex: raw.get("regex").and_then(Value::as_str).map(str::to_string),
        }
    }
}

/// Normalized specification for one control.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub label: String,
    /// Identity key; the control is registered under this name.
    pub control_name: String,
    pub id: String,
    #[serde(rename = "type")]
    pub control_type: ControlType,
    pub control_style: String,
    pub layout_style: String,
    pub placeholder: String,
    pub value: Value,
    pub validation: Option<ValidationSpec>,
    pub property: Option<Property>,
}

impl FieldDescriptor {
    /// A descriptor with every optional field at its default.
    pub fn new(control_name: impl Into<String>, control_type: ControlType) -> Self {
        let control_name = control_name.into();
        Self {
            label: String::new(),
            id: control_name.clone(),
            control_name,
            control_type,
            control_style: String::new(),
            layout_style: String::new(),
            placeholder: String::new(),
            value: Value::Null,
            validation: None,
            property: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }

    pub fn with_validation(mut self, validation: ValidationSpec) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.property = Some(property);
        self
    }
}
