//! Binary logistic regression over standardized feature vectors.

use serde::{Deserialize, Serialize};

use crate::ml::ComputeError;
use crate::ml::features::{FEATURE_COUNT, FeatureVector};

/// Class decided by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Diagnosis {
    Benign,
    Malignant,
}

impl Diagnosis {
    /// Label used at fit time: 1 for malignant, 0 for benign.
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(Self::Benign),
            1 => Some(Self::Malignant),
            _ => None,
        }
    }

    pub fn label(self) -> u8 {
        match self {
            Self::Benign => 0,
            Self::Malignant => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Benign => "Benign",
            Self::Malignant => "Malignant",
        }
    }
}

/// Fitted coefficients and intercept of the linear decision function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierParameters {
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default = "default_model_version")]
    pub model_version: i64,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

fn default_model_version() -> i64 {
    1
}

impl ClassifierParameters {
    /// Classifier with zero coefficients, so every input scores `intercept`.
    pub fn constant(intercept: f64) -> Self {
        Self {
            model_id: None,
            model_version: default_model_version(),
            coefficients: vec![0.0; FEATURE_COUNT],
            intercept,
            feature_names: None,
        }
    }

    /// Validate the model dimensions and numeric sanity.
    pub fn validate(&self) -> Result<(), String> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(format!(
                "coefficients has {} entries (expected {FEATURE_COUNT})",
                self.coefficients.len()
            ));
        }
        if let Some(idx) = self.coefficients.iter().position(|v| !v.is_finite()) {
            return Err(format!("coefficients[{idx}] is not finite"));
        }
        if !self.intercept.is_finite() {
            return Err("intercept is not finite".to_string());
        }
        Ok(())
    }

    /// Raw decision score `dot(x, coefficients) + intercept`.
    ///
    /// Zero coefficients contribute nothing, even against an infinite input.
    pub fn decision_score(&self, vector: &FeatureVector) -> Result<f64, ComputeError> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(ComputeError::DimensionMismatch {
                what: "classifier",
                expected: FEATURE_COUNT,
                found: self.coefficients.len(),
            });
        }
        let mut sum = self.intercept;
        for (w, x) in self.coefficients.iter().zip(vector.as_slice()) {
            if *w != 0.0 {
                sum += w * x;
            }
        }
        if sum.is_nan() {
            return Err(ComputeError::UndefinedScore(sum));
        }
        Ok(sum)
    }

    /// Decide the class; a score of exactly 0 counts as malignant.
    pub fn classify(&self, vector: &FeatureVector) -> Result<Diagnosis, ComputeError> {
        self.decision_score(vector).map(decide)
    }
}

/// Threshold a decision score at 0 (logistic probability 0.5).
pub fn decide(score: f64) -> Diagnosis {
    if score >= 0.0 {
        Diagnosis::Malignant
    } else {
        Diagnosis::Benign
    }
}

/// Logistic link mapping a score to the malignant-class probability.
pub fn probability(score: f64) -> f64 {
    if score >= 0.0 {
        1.0 / (1.0 + (-score).exp())
    } else {
        let e = score.exp();
        e / (1.0 + e)
    }
}
