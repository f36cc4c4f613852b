//! Raw entry normalization.
//!
//! Every field of a raw entry falls back to a default when it is falsy, except
//! `value`, which keeps any explicitly present value (`0`, `false`, `""`,
//! `null`) and only defaults to `null` when the key is missing.

use serde_json::Value;
use tracing::debug;

use crate::property::{resolve, Property};
use crate::truthy::{as_text, has_key, truthy_field, truthy_text};
use crate::types::{ControlType, FieldDescriptor, ValidationSpec};

/// Normalize raw entries into descriptors, one per entry, in input order.
///
/// `fallback` resolves the property bag of every entry whose type is not
/// built in.
pub fn normalize<F>(raw_entries: Option<&[Value]>, fallback: F) -> Vec<FieldDescriptor>
where
    F: Fn(&str, Option<&Value>) -> Option<Property>,
{
    let Some(raw_entries) = raw_entries else {
        return Vec::new();
    };
    let descriptors: Vec<FieldDescriptor> = raw_entries
        .iter()
        .map(|entry| normalize_entry(entry, &fallback))
        .collect();
    debug!(count = descriptors.len(), "normalized descriptors");
    descriptors
}

fn normalize_entry<F>(entry: &Value, fallback: &F) -> FieldDescriptor
where
    F: Fn(&str, Option<&Value>) -> Option<Property>,
{
    let control_name = entry
        .get("controlName")
        .filter(|v| !v.is_null())
        .map(as_text)
        .unwrap_or_default();
    let control_type = truthy_text(entry, "type")
        .map(ControlType::from)
        .unwrap_or_default();
    let property = resolve(&control_type, truthy_field(entry, "property"), fallback);

    FieldDescriptor {
        label: truthy_text(entry, "label").unwrap_or_default(),
        id: truthy_text(entry, "id").unwrap_or_else(|| control_name.clone()),
        placeholder: truthy_text(entry, "placeholder").unwrap_or_default(),
        control_style: truthy_text(entry, "controlStyle").unwrap_or_default(),
        layout_style: truthy_text(entry, "layoutStyle").unwrap_or_default(),
        value: if has_key(entry, "value") {
            entry["value"].clone()
        } else {
            Value::Null
        },
        validation: truthy_field(entry, "validation").map(ValidationSpec::from_value),
        control_type,
        control_name,
        property,
    }
}
