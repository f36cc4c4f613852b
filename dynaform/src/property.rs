//! Property bags and their resolution from raw payloads.
//!
//! Built-in control types resolve to a typed bag here; any other type is handed
//! to the caller's fallback resolver, whose result is trusted as-is.
//!
//! Resolving a built-in bag uses two separate copy rules:
//!
//! 1. **truthy-copy** for known fields (`appendTo`, `helpText`, and for the
//!    custom variant `controlType`, `fieldType`): a falsy raw value leaves the
//!    default in place.
//! 2. **extras merge** for every other key: copied verbatim whenever the key is
//!    present, even when its value is `0`, `false` or `""`. Known attribute
//!    names are never overwritten by this step.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::truthy::{is_truthy, truthy_text};
use crate::types::ControlType;

/// Attribute names every property bag owns.
pub const BASE_ATTRIBUTES: &[&str] = &["onChange", "onBlur", "onFocus", "helpText", "appendTo"];

/// Attribute names the custom bag owns in addition to [`BASE_ATTRIBUTES`].
pub const CUSTOM_ATTRIBUTES: &[&str] = &["controlType", "fieldType"];

/// Default `controlType` of a custom bag.
pub const DEFAULT_CONTROL_TYPE: &str = "control";

type HandlerFn = dyn Fn(&Value) + Send + Sync;

/// A callback slot on a property bag.
///
/// Slots start out empty, which behaves as a no-op. Callers attach handlers
/// after normalization; raw data can't carry functions.
#[derive(Clone, Default)]
pub struct EventHandler(Option<Arc<HandlerFn>>);

impl EventHandler {
    pub fn new(handler: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        Self(Some(Arc::new(handler)))
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub fn invoke(&self, event: &Value) {
        if let Some(handler) = &self.0 {
            handler(event);
        }
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("EventHandler(set)"),
            None => f.write_str("EventHandler(noop)"),
        }
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Display and behavior attributes shared by every control.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseProperty {
    #[serde(skip)]
    pub on_change: EventHandler,
    #[serde(skip)]
    pub on_blur: EventHandler,
    #[serde(skip)]
    pub on_focus: EventHandler,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub append_to: Option<String>,
    /// Pass-through attributes copied from the raw payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Property bag of a `custom` control.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomProperty {
    #[serde(flatten)]
    pub base: BaseProperty,
    /// `"array"`, `"group"`, or anything else for a plain control.
    pub control_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
}

impl Default for CustomProperty {
    fn default() -> Self {
        Self {
            base: BaseProperty::default(),
            control_type: DEFAULT_CONTROL_TYPE.to_string(),
            field_type: None,
        }
    }
}

/// A resolved property bag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Property {
    /// Shared attributes only; what `placeholder` descriptors carry.
    Base(BaseProperty),
    Custom(CustomProperty),
    /// Free-form bag built by a caller's fallback resolver.
    Extension(Map<String, Value>),
}

impl Property {
    /// Shared attributes, when this bag has them.
    pub fn base(&self) -> Option<&BaseProperty> {
        match self {
            Property::Base(base) => Some(base),
            Property::Custom(custom) => Some(&custom.base),
            Property::Extension(_) => None,
        }
    }

    pub fn base_mut(&mut self) -> Option<&mut BaseProperty> {
        match self {
            Property::Base(base) => Some(base),
            Property::Custom(custom) => Some(&mut custom.base),
            Property::Extension(_) => None,
        }
    }

    pub fn as_custom(&self) -> Option<&CustomProperty> {
        match self {
            Property::Custom(custom) => Some(custom),
            _ => None,
        }
    }

    /// The `controlType` attribute, wherever this bag keeps it.
    ///
    /// Non-custom bags may still carry one as a pass-through attribute.
    pub fn control_type(&self) -> Option<&str> {
        match self {
            Property::Custom(custom) => Some(custom.control_type.as_str()),
            Property::Base(base) => base.extra.get("controlType").and_then(Value::as_str),
            Property::Extension(map) => map.get("controlType").and_then(Value::as_str),
        }
    }

    /// Read any attribute by its raw (camelCase) name.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        match self {
            Property::Extension(map) => map.get(name).cloned(),
            Property::Custom(custom) => match name {
                "controlType" => Some(Value::String(custom.control_type.clone())),
                "fieldType" => custom.field_type.clone().map(Value::String),
                _ => base_attribute(&custom.base, name),
            },
            Property::Base(base) => base_attribute(base, name),
        }
    }
}

fn base_attribute(base: &BaseProperty, name: &str) -> Option<Value> {
    match name {
        "helpText" => base.help_text.clone().map(Value::String),
        "appendTo" => base.append_to.clone().map(Value::String),
        _ => base.extra.get(name).cloned(),
    }
}

/// Resolver for caller-defined types: `(type tag, raw payload) -> bag`.
///
/// [`no_fallback`] is the resolver for callers with no custom types.
pub fn no_fallback(_control_type: &str, _raw: Option<&Value>) -> Option<Property> {
    None
}

/// Resolve the property bag for `control_type` from its raw payload.
///
/// `custom` and `placeholder` build a typed bag; every other type returns
/// whatever `fallback` produces, unchanged.
pub fn resolve<F>(control_type: &ControlType, raw: Option<&Value>, fallback: F) -> Option<Property>
where
    F: Fn(&str, Option<&Value>) -> Option<Property>,
{
    match control_type {
        ControlType::Custom => Some(Property::Custom(custom_property(raw))),
        ControlType::Placeholder => Some(Property::Base(base_property(raw))),
        ControlType::Other(tag) => fallback(tag, raw),
    }
}

fn custom_property(raw: Option<&Value>) -> CustomProperty {
    let mut model = CustomProperty::default();
    let Some(raw) = raw.filter(|v| is_truthy(v)) else {
        return model;
    };
    copy_shared(&mut model.base, raw);
    if let Some(control_type) = truthy_text(raw, "controlType") {
        model.control_type = control_type;
    }
    if let Some(field_type) = truthy_text(raw, "fieldType") {
        model.field_type = Some(field_type);
    }
    merge_extras(&mut model.base.extra, raw, &[BASE_ATTRIBUTES, CUSTOM_ATTRIBUTES]);
    model
}

fn base_property(raw: Option<&Value>) -> BaseProperty {
    let mut model = BaseProperty::default();
    let Some(raw) = raw.filter(|v| is_truthy(v)) else {
        return model;
    };
    copy_shared(&mut model, raw);
    merge_extras(&mut model.extra, raw, &[BASE_ATTRIBUTES]);
    model
}

/// Truthy-copy of the fields every bag shares.
fn copy_shared(model: &mut BaseProperty, raw: &Value) {
    if let Some(append_to) = truthy_text(raw, "appendTo") {
        model.append_to = Some(append_to);
    }
    if let Some(help_text) = truthy_text(raw, "helpText") {
        model.help_text = Some(help_text);
    }
}

/// Existence-copy of every raw key the model doesn't own.
fn merge_extras(extra: &mut Map<String, Value>, raw: &Value, owned: &[&[&str]]) {
    let Some(map) = raw.as_object() else {
        return;
    };
    for (key, value) in map {
        let is_owned = owned.iter().any(|names| names.contains(&key.as_str()));
        if !is_owned {
            extra.insert(key.clone(), value.clone());
        }
    }
}
