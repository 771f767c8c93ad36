//! Canonical feature schema for tissue-sample measurements.
//!
//! The fitted scaler and classifier index their parameters by position, so the
//! order of [`FEATURE_NAMES`] must match the column order used at fit time. A
//! reordering here does not error anywhere; it silently changes predictions.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// Number of measurements in a feature vector.
pub const FEATURE_COUNT: usize = 30;

/// Field names in canonical vector order: 10 means, 10 standard errors, 10 worst values.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "radius_mean",
    "texture_mean",
    "perimeter_mean",
    "area_mean",
    "smoothness_mean",
    "compactness_mean",
    "concavity_mean",
    "concave_points_mean",
    "symmetry_mean",
    "fractal_dimension_mean",
    "radius_se",
    "texture_se",
    "perimeter_se",
    "area_se",
    "smoothness_se",
    "compactness_se",
    "concavity_se",
    "concave_points_se",
    "symmetry_se",
    "fractal_dimension_se",
    "radius_worst",
    "texture_worst",
    "perimeter_worst",
    "area_worst",
    "smoothness_worst",
    "compactness_worst",
    "concavity_worst",
    "concave_points_worst",
    "symmetry_worst",
    "fractal_dimension_worst",
];

/// Position of a field in the canonical order.
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|candidate| *candidate == name)
}

/// Ordered, validated measurements for one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Wrap values that are already in canonical order.
    ///
    /// Used for transform outputs; callers holding named input should go
    /// through [`FeatureVector::from_json`] or [`FeatureVector::from_named`].
    pub fn from_ordered(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Validate a parsed JSON payload and assemble the vector by field name.
    ///
    /// Every offending field is reported, in canonical order. Fields outside
    /// the schema are ignored.
    pub fn from_json(payload: &Value) -> Result<Self, ValidationError> {
        let Value::Object(fields) = payload else {
            return Err(ValidationError::NotAnObject {
                found: json_type_name(payload),
            });
        };
        Self::from_json_map(fields)
    }

    /// Validate a JSON object and assemble the vector by field name.
    pub fn from_json_map(fields: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut values = [0.0f64; FEATURE_COUNT];
        let mut issues = Vec::new();
        for (idx, name) in FEATURE_NAMES.iter().enumerate() {
            match fields.get(*name) {
                None => issues.push(FieldIssue::new(name, IssueKind::Missing)),
                // serde_json only yields finite numbers unless built with arbitrary_precision.
                Some(Value::Number(number)) => match number.as_f64() {
                    Some(value) if value.is_finite() => values[idx] = value,
                    _ => issues.push(FieldIssue::new(name, IssueKind::NonFinite)),
                },
                Some(other) => issues.push(FieldIssue::new(
                    name,
                    IssueKind::WrongType {
                        found: json_type_name(other),
                    },
                )),
            }
        }
        let unknown = fields
            .keys()
            .filter(|key| feature_index(key).is_none())
            .count();
        if unknown > 0 {
            tracing::debug!(unknown, "Ignoring fields outside the feature schema");
        }
        if issues.is_empty() {
            Ok(Self(values))
        } else {
            Err(ValidationError::Fields(issues))
        }
    }

    /// Assemble the vector from `(name, value)` pairs supplied in any order.
    ///
    /// Later duplicates overwrite earlier ones; unknown names are ignored.
    pub fn from_named<'a, I>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut slots: [Option<f64>; FEATURE_COUNT] = [None; FEATURE_COUNT];
        for (name, value) in pairs {
            if let Some(idx) = feature_index(name) {
                slots[idx] = Some(value);
            }
        }
        let mut values = [0.0f64; FEATURE_COUNT];
        let mut issues = Vec::new();
        for (idx, slot) in slots.iter().enumerate() {
            match slot {
                None => issues.push(FieldIssue::new(FEATURE_NAMES[idx], IssueKind::Missing)),
                Some(value) if !value.is_finite() => {
                    issues.push(FieldIssue::new(FEATURE_NAMES[idx], IssueKind::NonFinite))
                }
                Some(value) => values[idx] = *value,
            }
        }
        if issues.is_empty() {
            Ok(Self(values))
        } else {
            Err(ValidationError::Fields(issues))
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Value of a named field.
    pub fn get(&self, name: &str) -> Option<f64> {
        feature_index(name).map(|idx| self.0[idx])
    }
}

/// Why an input payload could not be turned into a feature vector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The payload was not a JSON object.
    #[error("Expected a JSON object of feature values, got {found}")]
    NotAnObject { found: &'static str },
    /// The payload body was not valid JSON.
    #[error("Malformed JSON payload: {0}")]
    Malformed(String),
    /// One or more schema fields were missing or unusable.
    #[error("Invalid feature fields: {}", summarize(.0))]
    Fields(Vec<FieldIssue>),
}

impl ValidationError {
    /// Per-field problems, empty for payload-level failures.
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            Self::Fields(issues) => issues,
            _ => &[],
        }
    }

    /// Whether the given field is named by this error.
    pub fn mentions(&self, field: &str) -> bool {
        self.issues().iter().any(|issue| issue.field == field)
    }
}

/// A single offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub kind: IssueKind,
}

impl FieldIssue {
    fn new(field: &str, kind: IssueKind) -> Self {
        Self {
            field: field.to_string(),
            kind,
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.field, self.kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Missing,
    WrongType { found: &'static str },
    NonFinite,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("missing"),
            Self::WrongType { found } => write!(f, "expected a number, got {found}"),
            Self::NonFinite => f.write_str("not a finite number"),
        }
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
