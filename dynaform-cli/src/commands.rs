//! Command handlers. Each returns the process exit code.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dynaform::input::load_entries;
use dynaform::{
    no_fallback, prepare, property_by_control_name, resolve, Control, ControlType,
    FieldDescriptor, FormBuildResult, FormGroup, Property, ValidationErrors,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::{CliConfig, OutputFormat, UnknownTypePolicy};

/// Exit code returned when the form does not validate.
pub const INVALID_FORM_EXIT_CODE: i32 = 2;

type Fallback = fn(&str, Option<&Value>) -> Option<Property>;

/// Caller-defined types get a placeholder-style bag: shared fields and extras.
fn base_fallback(_control_type: &str, raw: Option<&Value>) -> Option<Property> {
    resolve(&ControlType::Placeholder, raw, no_fallback)
}

fn fallback_for(policy: UnknownTypePolicy) -> Fallback {
    match policy {
        UnknownTypePolicy::Base => base_fallback,
        UnknownTypePolicy::Empty => no_fallback,
    }
}

#[derive(Debug, Serialize)]
struct ControlSummary<'a> {
    name: &'a str,
    kind: &'static str,
    value: Value,
    validators: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct BuildReport<'a> {
    descriptors: &'a [FieldDescriptor],
    controls: Vec<ControlSummary<'a>>,
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    valid: bool,
    errors: Map<String, Value>,
}

/// Read descriptors and build the tree. An empty file yields an empty form.
fn build_form(file: &Path, config: &CliConfig) -> Result<FormBuildResult<FormGroup>> {
    let entries = load_entries(file)
        .with_context(|| format!("loading descriptors from {}", file.display()))?;
    let fallback = fallback_for(config.unknown_types);
    let result = prepare(Some(entries.as_slice()), fallback).unwrap_or_else(|| {
        warn!(file = %file.display(), "descriptor file has no entries");
        FormBuildResult {
            tree: FormGroup::default(),
            descriptors: Vec::new(),
        }
    });
    Ok(result)
}

fn summarize(tree: &FormGroup) -> Vec<ControlSummary<'_>> {
    tree.controls()
        .map(|(name, control)| ControlSummary {
            name,
            kind: control.kind(),
            value: control.value(),
            validators: control.validators().iter().map(|v| v.key()).collect(),
        })
        .collect()
}

fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml_ng::to_string(value)?,
    };
    Ok(text)
}

pub fn run_build(file: &Path, config: &CliConfig) -> Result<i32> {
    let result = build_form(file, config)?;
    let report = BuildReport {
        descriptors: &result.descriptors,
        controls: summarize(&result.tree),
    };
    println!("{}", render(&report, config.output)?);
    Ok(0)
}

pub fn run_validate(file: &Path, values: &Path, config: &CliConfig) -> Result<i32> {
    let mut result = build_form(file, config)?;
    let values = read_values(values)?;

    for (name, value) in values {
        if !result.tree.set_value(&name, value) {
            warn!(control = %name, "no leaf control with this name, value ignored");
        }
    }

    let report = validation_report(&result.tree);
    debug!(valid = report.valid, failing = report.errors.len(), "validation finished");
    println!("{}", render(&report, config.output)?);
    Ok(if report.valid { 0 } else { INVALID_FORM_EXIT_CODE })
}

pub fn run_property(file: &Path, name: &str, config: &CliConfig) -> Result<i32> {
    let result = build_form(file, config)?;
    match property_by_control_name(name, &result.descriptors) {
        Some(property) => {
            println!("{}", render(property, config.output)?);
            Ok(0)
        }
        None => {
            eprintln!("No property found for control '{}'", name);
            Ok(1)
        }
    }
}

fn read_values(path: &Path) -> Result<Map<String, Value>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading values from {}", path.display()))?;
    let document: Value = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml_ng::from_str(&text)?,
        _ => serde_json::from_str(&text)?,
    };
    match document {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => anyhow::bail!("values file {} must hold an object", path.display()),
    }
}

fn validation_report(tree: &FormGroup) -> ValidationReport {
    let mut errors = Map::new();
    for (name, control) in tree.controls() {
        let own = control_errors(control);
        if !own.is_empty() {
            errors.insert(name.to_string(), Value::Object(own));
        }
    }
    ValidationReport {
        valid: tree.is_valid() && errors.is_empty(),
        errors,
    }
}

fn control_errors(control: &Control) -> ValidationErrors {
    let mut errors = control.errors();
    if errors.is_empty() && !control.is_valid() {
        // a nested child fails; its parent reports it without a key of its own
        errors.insert("children".to_string(), Value::Bool(true));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn base_policy_resolves_unknown_types() {
        let config = CliConfig::default();
        let dir = TempDir::new().unwrap();
        let file = write(
            &dir,
            "form.json",
            r#"[{"controlName": "dob", "type": "date", "property": {"helpText": "YYYY-MM-DD", "format": "iso"}}]"#,
        );
        let result = build_form(&file, &config).unwrap();
        let property = result.descriptors[0].property.as_ref().unwrap();
        assert_eq!(property.attribute("helpText"), Some(json!("YYYY-MM-DD")));
        assert_eq!(property.attribute("format"), Some(json!("iso")));
    }

    #[test]
    fn empty_policy_leaves_unknown_types_bare() {
        let config = CliConfig {
            unknown_types: UnknownTypePolicy::Empty,
            ..CliConfig::default()
        };
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "form.yaml", "- controlName: dob\n  type: date\n");
        let result = build_form(&file, &config).unwrap();
        assert!(result.descriptors[0].property.is_none());
        assert!(result.tree.contains("dob"));
    }

    #[test]
    fn empty_file_builds_empty_form() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "form.json", "[]");
        let result = build_form(&file, &CliConfig::default()).unwrap();
        assert!(result.tree.is_empty());
        assert!(result.descriptors.is_empty());
    }

    #[test]
    fn validate_exit_code_reflects_validity() {
        let dir = TempDir::new().unwrap();
        let form = write(
            &dir,
            "form.json",
            r#"[{"controlName": "email", "validation": {"required": true, "email": true}}]"#,
        );
        let bad = write(&dir, "bad.json", r#"{"email": "nope"}"#);
        let good = write(&dir, "good.json", r#"{"email": "ada@example.com", "extra": 1}"#);
        let config = CliConfig::default();

        assert_eq!(run_validate(&form, &bad, &config).unwrap(), INVALID_FORM_EXIT_CODE);
        assert_eq!(run_validate(&form, &good, &config).unwrap(), 0);
    }

    #[test]
    fn report_lists_failing_controls() {
        let dir = TempDir::new().unwrap();
        let form = write(
            &dir,
            "form.json",
            r#"[{"controlName": "age", "value": 130, "validation": {"max": 120}},
                {"controlName": "name", "value": "Ada"}]"#,
        );
        let result = build_form(&form, &CliConfig::default()).unwrap();
        let report = validation_report(&result.tree);
        assert!(!report.valid);
        assert_eq!(
            Value::Object(report.errors),
            json!({"age": {"max": {"max": 120.0, "actual": 130}}})
        );
    }

    #[test]
    fn values_must_be_an_object() {
        let dir = TempDir::new().unwrap();
        let values = write(&dir, "values.json", "[1, 2]");
        assert!(read_values(&values).is_err());
    }

    #[test]
    fn property_lookup_exit_codes() {
        let dir = TempDir::new().unwrap();
        let form = write(&dir, "form.json", r#"[{"controlName": "Name"}]"#);
        let config = CliConfig::default();
        assert_eq!(run_property(&form, "name", &config).unwrap(), 0);
        assert_eq!(run_property(&form, "missing", &config).unwrap(), 1);
    }

    #[test]
    fn summary_names_validators() {
        let dir = TempDir::new().unwrap();
        let form = write(
            &dir,
            "form.json",
            r#"[{"controlName": "tags", "property": {"controlType": "array"}, "validation": {"required": true, "maxLength": 3}}]"#,
        );
        let result = build_form(&form, &CliConfig::default()).unwrap();
        let summary = summarize(&result.tree);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].kind, "array");
        assert_eq!(summary[0].validators, vec!["required", "maxlength"]);
        assert_eq!(summary[0].value, json!([]));
    }
}
