//! Data-driven form controls
//!
//! `dynaform` turns a declarative list of field descriptors (plain data, e.g.
//! parsed JSON) into a live tree of input controls. Each control carries its
//! resolved display/behavior properties and a compiled list of validators.
//!
//! # Architecture
//!
//! - **Normalize**: raw entries become [`FieldDescriptor`]s with documented defaults
//! - **Resolve**: each descriptor's type picks a [`Property`] bag; unknown types
//!   go to a caller-supplied fallback resolver
//! - **Compile**: a [`ValidationSpec`] becomes an ordered list of [`Validator`]s
//! - **Build**: descriptors populate any [`ControlTree`]; [`FormGroup`] is the
//!   in-memory one
//!
//! ```
//! use dynaform::{prepare, no_fallback, FormGroup};
//! use serde_json::json;
//!
//! let raw = [json!({
//!     "controlName": "age",
//!     "value": 0,
//!     "validation": {"min": 0, "max": 120}
//! })];
//! let result = prepare::<FormGroup, _>(Some(&raw[..]), no_fallback).unwrap();
//! assert!(result.tree.contains("age"));
//! ```

pub mod builder;
pub mod error;
pub mod form;
pub mod input;
pub mod normalize;
pub mod property;
pub mod tree;
pub mod truthy;
pub mod types;
pub mod validation;

pub use builder::{
    create_controls_only, custom_property_by_control_name, prepare, property_by_control_name,
    refresh, FormBuildResult,
};
pub use error::{FormError, Result};
pub use form::{Control, FormArray, FormControl, FormGroup};
pub use normalize::normalize;
pub use property::{no_fallback, resolve, BaseProperty, CustomProperty, EventHandler, Property};
pub use tree::{build_into, create_fresh, rebuild_into, ControlTree};
pub use types::{ControlType, FieldDescriptor, ValidationSpec};
pub use validation::{compile, PatternRule, ValidationErrors, Validator};
