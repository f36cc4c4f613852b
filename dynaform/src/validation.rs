//! Validator compilation and evaluation.
//!
//! [`compile`] turns a [`ValidationSpec`] into an ordered list of
//! [`Validator`]s. Each validator checks a JSON value and reports an error
//! entry keyed the way form hosts key their error maps (`required`, `email`,
//! `minlength`, `maxlength`, `min`, `max`, `pattern`).

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::truthy::as_text;
use crate::types::ValidationSpec;

/// Error map of a control: validator key -> error detail.
pub type ValidationErrors = Map<String, Value>;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

static FLOAT_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("float prefix pattern is valid")
});

const EMAIL_MAX_LENGTH: usize = 254;
const EMAIL_LOCAL_MAX_LENGTH: usize = 64;

/// An anchored regular expression rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    source: String,
    regex: Option<Regex>,
}

impl PatternRule {
    /// Anchor `pattern` with `^`/`$` where missing and compile it.
    ///
    /// A pattern that fails to compile still yields a rule; it rejects every
    /// non-empty value.
    pub fn new(pattern: &str) -> Self {
        let mut source = String::with_capacity(pattern.len() + 2);
        if !pattern.starts_with('^') {
            source.push('^');
        }
        source.push_str(pattern);
        if !pattern.ends_with('$') {
            source.push('$');
        }
        let regex = match Regex::new(&source) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!(
                    pattern = %source,
                    error = %e,
                    "pattern does not compile, rule rejects all input"
                );
                None
            }
        };
        Self { source, regex }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_compiled(&self) -> bool {
        self.regex.is_some()
    }

    fn matches(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(text))
    }
}

impl PartialEq for PatternRule {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// A single executable rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    Required,
    Email,
    MinLength(usize),
    MaxLength(usize),
    Min(f64),
    Max(f64),
    Pattern(PatternRule),
}

impl Validator {
    /// Key of this validator in an error map.
    pub fn key(&self) -> &'static str {
        match self {
            Validator::Required => "required",
            Validator::Email => "email",
            Validator::MinLength(_) => "minlength",
            Validator::MaxLength(_) => "maxlength",
            Validator::Min(_) => "min",
            Validator::Max(_) => "max",
            Validator::Pattern(_) => "pattern",
        }
    }

    /// Check `value`; `None` when it passes, the error detail otherwise.
    pub fn validate(&self, value: &Value) -> Option<Value> {
        match self {
            Validator::Required => is_empty_input(value).then(|| json!(true)),
            Validator::Email => {
                if is_empty_input(value) || is_email(&as_text(value)) {
                    None
                } else {
                    Some(json!(true))
                }
            }
            Validator::MinLength(required) => {
                if is_empty_input(value) {
                    return None;
                }
                let actual = length_of(value)?;
                (actual < *required).then(|| {
                    json!({"requiredLength": required, "actualLength": actual})
                })
            }
            Validator::MaxLength(required) => {
                let actual = length_of(value)?;
                (actual > *required).then(|| {
                    json!({"requiredLength": required, "actualLength": actual})
                })
            }
            Validator::Min(min) => {
                let actual = numeric_of(value)?;
                (actual < *min).then(|| json!({"min": min, "actual": value}))
            }
            Validator::Max(max) => {
                let actual = numeric_of(value)?;
                (actual > *max).then(|| json!({"max": max, "actual": value}))
            }
            Validator::Pattern(rule) => {
                if is_empty_input(value) || rule.matches(&as_text(value)) {
                    None
                } else {
                    Some(json!({"requiredPattern": rule.source(), "actualValue": value}))
                }
            }
        }
    }
}

/// Run every validator against `value` and collect the failures.
pub fn run(validators: &[Validator], value: &Value) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for validator in validators {
        if let Some(detail) = validator.validate(value) {
            errors.insert(validator.key().to_string(), detail);
        }
    }
    errors
}

/// Compile a validation spec into validators.
///
/// Emission order is fixed: required, email, minLength, maxLength, min, max,
/// regex. Flags must be exactly `true`; numeric bounds must be greater than
/// zero, so a bound of `0` is dropped; the regex must be non-empty.
pub fn compile(spec: Option<&ValidationSpec>) -> Vec<Validator> {
    let Some(spec) = spec else {
        return Vec::new();
    };
    let mut validators = Vec::new();

    if spec.required == Some(true) {
        validators.push(Validator::Required);
    }
    if spec.email == Some(true) {
        validators.push(Validator::Email);
    }
    if let Some(n) = positive(spec.min_length, "minLength") {
        // length < n  <=>  length < ceil(n) for integer lengths
        validators.push(Validator::MinLength(n.ceil() as usize));
    }
    if let Some(n) = positive(spec.max_length, "maxLength") {
        validators.push(Validator::MaxLength(n.floor() as usize));
    }
    if let Some(n) = positive(spec.min, "min") {
        validators.push(Validator::Min(n));
    }
    if let Some(n) = positive(spec.max, "max") {
        validators.push(Validator::Max(n));
    }
    if let Some(pattern) = spec.regex.as_deref().filter(|p| !p.is_empty()) {
        validators.push(Validator::Pattern(PatternRule::new(pattern)));
    }

    validators
}

fn positive(bound: Option<f64>, name: &str) -> Option<f64> {
    match bound {
        Some(n) if n > 0.0 => Some(n),
        Some(n) => {
            debug!(rule = name, bound = n, "non-positive bound dropped");
            None
        }
        None => None,
    }
}

fn is_empty_input(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Numeric reading of a value the way a text input reports it: numbers as-is,
/// strings by their leading decimal prefix. Empty and non-numeric values give
/// `None` and pass bound checks.
fn numeric_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim_start();
            let prefix = FLOAT_PREFIX_RE.find(trimmed)?.as_str();
            prefix.parse::<f64>().ok().or_else(|| match prefix {
                "Infinity" | "+Infinity" => Some(f64::INFINITY),
                "-Infinity" => Some(f64::NEG_INFINITY),
                _ => None,
            })
        }
        _ => None,
    }
}

fn is_email(text: &str) -> bool {
    let Some((local, _)) = text.split_once('@') else {
        return false;
    };
    text.chars().count() <= EMAIL_MAX_LENGTH
        && local.chars().count() <= EMAIL_LOCAL_MAX_LENGTH
        && EMAIL_RE.is_match(text)
}
