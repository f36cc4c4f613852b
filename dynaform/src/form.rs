//! In-memory control tree.
//!
//! [`FormGroup`] is a ready-made [`ControlTree`] for callers that don't bring
//! their own forms host. Groups keep children in registration order; arrays
//! keep them by index; leaves hold a value. Every node carries its own
//! validators, evaluated against the node's aggregate value.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::tree::ControlTree;
use crate::validation::{run, ValidationErrors, Validator};

/// A single node of the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Leaf(FormControl),
    Group(FormGroup),
    Array(FormArray),
}

impl Control {
    /// `"control"`, `"group"` or `"array"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Control::Leaf(_) => "control",
            Control::Group(_) => "group",
            Control::Array(_) => "array",
        }
    }

    pub fn value(&self) -> Value {
        match self {
            Control::Leaf(leaf) => leaf.value().clone(),
            Control::Group(group) => group.value(),
            Control::Array(array) => array.value(),
        }
    }

    pub fn validators(&self) -> &[Validator] {
        match self {
            Control::Leaf(leaf) => &leaf.validators,
            Control::Group(group) => &group.validators,
            Control::Array(array) => &array.validators,
        }
    }

    /// Errors of this node's own validators.
    pub fn errors(&self) -> ValidationErrors {
        run(self.validators(), &self.value())
    }

    /// No errors on this node or anywhere beneath it.
    pub fn is_valid(&self) -> bool {
        match self {
            Control::Leaf(leaf) => leaf.is_valid(),
            Control::Group(group) => group.is_valid(),
            Control::Array(array) => array.is_valid(),
        }
    }

    pub fn as_leaf(&self) -> Option<&FormControl> {
        match self {
            Control::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut FormControl> {
        match self {
            Control::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&FormGroup> {
        match self {
            Control::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut FormGroup> {
        match self {
            Control::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&FormArray> {
        match self {
            Control::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut FormArray> {
        match self {
            Control::Array(array) => Some(array),
            _ => None,
        }
    }
}

/// A leaf holding a single value.
#[derive(Debug, Clone, PartialEq)]
pub struct FormControl {
    value: Value,
    validators: Vec<Validator>,
}

impl FormControl {
    pub fn new(value: Value, validators: Vec<Validator>) -> Self {
        Self { value, validators }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    pub fn errors(&self) -> ValidationErrors {
        run(&self.validators, &self.value)
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }
}

/// Named children in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormGroup {
    controls: IndexMap<String, Control>,
    validators: Vec<Validator>,
}

impl FormGroup {
    pub fn new(validators: Vec<Validator>) -> Self {
        Self {
            controls: IndexMap::new(),
            validators,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Control> {
        self.controls.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.controls.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.controls.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn controls(&self) -> impl Iterator<Item = (&str, &Control)> {
        self.controls.iter().map(|(name, control)| (name.as_str(), control))
    }

    /// Set the value of the leaf registered under `name`.
    ///
    /// Returns `false` when there is no such leaf.
    pub fn set_value(&mut self, name: &str, value: Value) -> bool {
        match self.controls.get_mut(name).and_then(Control::as_leaf_mut) {
            Some(leaf) => {
                leaf.set_value(value);
                true
            }
            None => false,
        }
    }

    /// Object of child values keyed by name.
    pub fn value(&self) -> Value {
        let map: Map<String, Value> = self
            .controls
            .iter()
            .map(|(name, control)| (name.clone(), control.value()))
            .collect();
        Value::Object(map)
    }

    pub fn errors(&self) -> ValidationErrors {
        run(&self.validators, &self.value())
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty() && self.controls.values().all(Control::is_valid)
    }

    /// Names of direct children that are not valid.
    pub fn invalid_controls(&self) -> Vec<&str> {
        self.controls
            .iter()
            .filter(|(_, control)| !control.is_valid())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl ControlTree for FormGroup {
    type Node = Control;

    fn create_leaf(value: Value, validators: Vec<Validator>) -> Control {
        Control::Leaf(FormControl::new(value, validators))
    }

    fn create_array_node(validators: Vec<Validator>) -> Control {
        Control::Array(FormArray::new(validators))
    }

    fn create_group_node(validators: Vec<Validator>) -> Control {
        Control::Group(FormGroup::new(validators))
    }

    fn add_child(&mut self, name: &str, node: Control) {
        // insert keeps the original position of a replaced name
        self.controls.insert(name.to_string(), node);
    }

    fn remove_child(&mut self, name: &str) {
        self.controls.shift_remove(name);
    }

    fn child_names(&self) -> Vec<String> {
        self.controls.keys().cloned().collect()
    }
}

/// Indexed children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormArray {
    controls: Vec<Control>,
    validators: Vec<Validator>,
}

impl FormArray {
    pub fn new(validators: Vec<Validator>) -> Self {
        Self {
            controls: Vec::new(),
            validators,
        }
    }

    pub fn push(&mut self, control: Control) {
        self.controls.push(control);
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Control> {
        (index < self.controls.len()).then(|| self.controls.remove(index))
    }

    pub fn at(&self, index: usize) -> Option<&Control> {
        self.controls.get(index)
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn value(&self) -> Value {
        Value::Array(self.controls.iter().map(Control::value).collect())
    }

    pub fn errors(&self) -> ValidationErrors {
        run(&self.validators, &self.value())
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty() && self.controls.iter().all(Control::is_valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn leaf(value: Value, validators: Vec<Validator>) -> Control {
        FormGroup::create_leaf(value, validators)
    }

    #[test]
    fn add_child_overwrites_in_place() {
        let mut group = FormGroup::default();
        group.add_child("a", leaf(json!(1), vec![]));
        group.add_child("b", leaf(json!(2), vec![]));
        group.add_child("a", leaf(json!(3), vec![]));
        assert_eq!(group.child_names(), vec!["a", "b"]);
        assert_eq!(group.value(), json!({"a": 3, "b": 2}));
    }

    #[test]
    fn remove_child_preserves_order_of_rest() {
        let mut group = FormGroup::default();
        for name in ["a", "b", "c"] {
            group.add_child(name, leaf(Value::Null, vec![]));
        }
        group.remove_child("b");
        group.remove_child("missing");
        assert_eq!(group.child_names(), vec!["a", "c"]);
    }

    #[test]
    fn validity_rolls_up_from_children() {
        let mut group = FormGroup::default();
        group.add_child("name", leaf(Value::Null, vec![Validator::Required]));
        group.add_child("age", leaf(json!(30), vec![Validator::Max(120.0)]));
        assert!(!group.is_valid());
        assert_eq!(group.invalid_controls(), vec!["name"]);

        assert!(group.set_value("name", json!("Ada")));
        assert!(group.is_valid());
        assert!(group.invalid_controls().is_empty());
    }

    #[test]
    fn set_value_only_targets_leaves() {
        let mut group = FormGroup::default();
        group.add_child("tags", FormGroup::create_array_node(vec![]));
        assert!(!group.set_value("tags", json!(["x"])));
        assert!(!group.set_value("missing", json!(1)));
    }

    #[test]
    fn array_value_and_validators() {
        let mut array = FormArray::new(vec![Validator::Required, Validator::MaxLength(1)]);
        assert_eq!(array.errors().keys().collect::<Vec<_>>(), vec!["required"]);

        array.push(leaf(json!("a"), vec![]));
        array.push(leaf(json!("b"), vec![]));
        assert_eq!(array.value(), json!(["a", "b"]));
        assert_eq!(array.errors().keys().collect::<Vec<_>>(), vec!["maxlength"]);

        assert!(array.remove_at(1).is_some());
        assert!(array.remove_at(5).is_none());
        assert!(array.is_valid());
    }

    #[test]
    fn nested_group_invalid_child_invalidates_parent() {
        let mut address = FormGroup::new(vec![]);
        address.add_child("zip", leaf(json!("12"), vec![Validator::MinLength(5)]));
        let mut root = FormGroup::default();
        root.add_child("address", Control::Group(address));
        assert!(!root.is_valid());
        assert_eq!(root.value(), json!({"address": {"zip": "12"}}));

        let zip = root
            .get_mut("address")
            .and_then(Control::as_group_mut)
            .and_then(|g| g.get_mut("zip"))
            .and_then(Control::as_leaf_mut)
            .unwrap();
        zip.set_value(json!("12345"));
        assert!(root.is_valid());
    }

    #[test]
    fn control_kind_names() {
        assert_eq!(leaf(Value::Null, vec![]).kind(), "control");
        assert_eq!(FormGroup::create_group_node(vec![]).kind(), "group");
        assert_eq!(FormGroup::create_array_node(vec![]).kind(), "array");
    }
}
