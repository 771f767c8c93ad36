use std::path::{Path, PathBuf};

use oncoserve::{ClassifierParameters, FEATURE_NAMES, ScalingParameters};
use serde_json::{Map, Value, json};

/// A plausible benign-looking sample, in canonical order.
pub const SAMPLE_VALUES: [f64; 30] = [
    13.54, 14.36, 87.46, 566.3, 0.09779, 0.08129, 0.06664, 0.04781, 0.1885, 0.05766, 0.2699,
    0.7886, 2.058, 23.56, 0.008462, 0.0146, 0.02387, 0.01315, 0.0198, 0.0023, 15.11, 19.26,
    99.7, 711.2, 0.144, 0.1773, 0.239, 0.1288, 0.2977, 0.07259,
];

pub fn sample_map() -> Map<String, Value> {
    FEATURE_NAMES
        .iter()
        .zip(SAMPLE_VALUES)
        .map(|(name, value)| (name.to_string(), json!(value)))
        .collect()
}

pub fn sample_payload() -> Value {
    Value::Object(sample_map())
}

pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create artifact parent dirs");
    }
    let bytes = serde_json::to_vec_pretty(value).expect("serialize artifact");
    std::fs::write(path, bytes).expect("write artifact");
}

/// Write an identity scaler and a constant-score classifier into `dir`.
pub fn write_constant_artifacts(dir: &Path, intercept: f64) -> (PathBuf, PathBuf) {
    let scaler_path = dir.join("breast_cancer_scaler.json");
    let model_path = dir.join("breast_cancer_model.json");
    write_json(&scaler_path, &ScalingParameters::identity());
    write_json(&model_path, &ClassifierParameters::constant(intercept));
    (scaler_path, model_path)
}
