//! Control tree contract and the builder that populates it.
//!
//! The engine talks to a control tree only through [`ControlTree`]: node
//! factories, add, remove, and enumerate. Any forms host can implement it;
//! [`crate::form::FormGroup`] is the in-memory one.

use serde_json::Value;
use tracing::{debug, trace};

use crate::types::{ControlType, FieldDescriptor};
use crate::validation::{compile, Validator};

/// `controlType` of a custom property that materializes a [`ControlTree::create_array_node`].
pub const ARRAY_CONTROL: &str = "array";
/// `controlType` of a custom property that materializes a [`ControlTree::create_group_node`].
pub const GROUP_CONTROL: &str = "group";

/// A named container of controls supplied by a forms host.
pub trait ControlTree {
    type Node;

    fn create_leaf(value: Value, validators: Vec<Validator>) -> Self::Node;

    fn create_array_node(validators: Vec<Validator>) -> Self::Node;

    fn create_group_node(validators: Vec<Validator>) -> Self::Node;

    /// Register `node` under `name`, replacing any existing registration.
    fn add_child(&mut self, name: &str, node: Self::Node);

    fn remove_child(&mut self, name: &str);

    fn child_names(&self) -> Vec<String>;
}

/// Clear every registration on `tree`, then repopulate it from `descriptors`.
pub fn rebuild_into<T: ControlTree>(tree: &mut T, descriptors: &[FieldDescriptor]) {
    let names = tree.child_names();
    debug!(cleared = names.len(), "clearing control tree");
    // last to first, so ordered hosts never shift their remaining entries
    for name in names.iter().rev() {
        tree.remove_child(name);
    }
    build_into(tree, descriptors);
}

/// A new tree populated from `descriptors`.
pub fn create_fresh<T: ControlTree + Default>(descriptors: &[FieldDescriptor]) -> T {
    let mut tree = T::default();
    build_into(&mut tree, descriptors);
    tree
}

/// Register one control per descriptor on `tree`.
///
/// Placeholder descriptors are skipped. A custom descriptor without a
/// property registers nothing. Duplicate control names overwrite earlier
/// registrations.
pub fn build_into<T: ControlTree>(tree: &mut T, descriptors: &[FieldDescriptor]) {
    let mut registered = 0usize;
    for descriptor in descriptors {
        if descriptor.control_type.is_placeholder() {
            continue;
        }
        let validators = compile(descriptor.validation.as_ref());
        match materialize::<T>(descriptor, validators) {
            Some(node) => {
                trace!(
                    control = %descriptor.control_name,
                    control_type = %descriptor.control_type,
                    "registering control"
                );
                tree.add_child(&descriptor.control_name, node);
                registered += 1;
            }
            None => {
                debug!(
                    control = %descriptor.control_name,
                    "custom descriptor has no property, no control registered"
                );
            }
        }
    }
    debug!(
        descriptors = descriptors.len(),
        registered,
        "control tree built"
    );
}

fn materialize<T: ControlTree>(
    descriptor: &FieldDescriptor,
    validators: Vec<Validator>,
) -> Option<T::Node> {
    match &descriptor.control_type {
        ControlType::Custom => {
            let property = descriptor.property.as_ref()?;
            let node = match property.control_type() {
                Some(ARRAY_CONTROL) => T::create_array_node(validators),
                Some(GROUP_CONTROL) => T::create_group_node(validators),
                _ => T::create_leaf(descriptor.value.clone(), validators),
            };
            Some(node)
        }
        _ => Some(T::create_leaf(descriptor.value.clone(), validators)),
    }
}
