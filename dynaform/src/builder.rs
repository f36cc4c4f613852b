//! Top-level entry points.
//!
//! These compose normalization and tree building into the operations callers
//! use: build everything from raw entries, build a tree from descriptors they
//! already hold, repopulate an existing tree, and look up property bags.

use serde_json::Value;
use tracing::debug;

use crate::normalize::normalize;
use crate::property::{CustomProperty, Property};
use crate::tree::{create_fresh, rebuild_into, ControlTree};
use crate::types::FieldDescriptor;

/// A built tree together with the descriptors it was built from.
#[derive(Debug)]
pub struct FormBuildResult<T> {
    pub tree: T,
    pub descriptors: Vec<FieldDescriptor>,
}

/// Normalize `raw_entries` and build a fresh tree from them.
///
/// Returns `None` when there are no entries.
pub fn prepare<T, F>(raw_entries: Option<&[Value]>, fallback: F) -> Option<FormBuildResult<T>>
where
    T: ControlTree + Default,
    F: Fn(&str, Option<&Value>) -> Option<Property>,
{
    let raw_entries = raw_entries.filter(|entries| !entries.is_empty())?;
    let descriptors = normalize(Some(raw_entries), fallback);
    let tree = create_fresh(&descriptors);
    Some(FormBuildResult { tree, descriptors })
}

/// Build a fresh tree from already-normalized descriptors.
pub fn create_controls_only<T>(descriptors: &[FieldDescriptor]) -> T
where
    T: ControlTree + Default,
{
    create_fresh(descriptors)
}

/// Repopulate `tree` in place from `descriptors`.
pub fn refresh<T: ControlTree>(tree: &mut T, descriptors: &[FieldDescriptor]) {
    rebuild_into(tree, descriptors);
}

/// Property bag of the first descriptor whose control name matches `name`,
/// ignoring case.
pub fn property_by_control_name<'a>(
    name: &str,
    descriptors: &'a [FieldDescriptor],
) -> Option<&'a Property> {
    let wanted = name.to_lowercase();
    let found = descriptors
        .iter()
        .find(|d| d.control_name.to_lowercase() == wanted);
    if found.is_none() {
        debug!(control = name, "no descriptor with this control name");
    }
    found.and_then(|d| d.property.as_ref())
}

/// Like [`property_by_control_name`], narrowed to the custom bag.
pub fn custom_property_by_control_name<'a>(
    name: &str,
    descriptors: &'a [FieldDescriptor],
) -> Option<&'a CustomProperty> {
    property_by_control_name(name, descriptors).and_then(Property::as_custom)
}
