//! Per-feature standardization fitted offline.

use serde::{Deserialize, Serialize};

use crate::ml::ComputeError;
use crate::ml::features::{FEATURE_COUNT, FeatureVector};

/// Fitted mean and scale for each feature, indexed like [`FeatureVector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingParameters {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    /// Column names recorded at fit time, when the exporter kept them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl ScalingParameters {
    /// Scaling that leaves every value unchanged.
    pub fn identity() -> Self {
        Self {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
            feature_names: None,
        }
    }

    /// Check dimensions and numeric sanity of the fitted values.
    pub fn validate(&self) -> Result<(), String> {
        if self.mean.len() != FEATURE_COUNT {
            return Err(format!(
                "mean has {} entries (expected {FEATURE_COUNT})",
                self.mean.len()
            ));
        }
        if self.scale.len() != FEATURE_COUNT {
            return Err(format!(
                "scale has {} entries (expected {FEATURE_COUNT})",
                self.scale.len()
            ));
        }
        if let Some(idx) = self.mean.iter().position(|v| !v.is_finite()) {
            return Err(format!("mean[{idx}] is not finite"));
        }
        if let Some(idx) = self.scale.iter().position(|v| !v.is_finite() || *v < 0.0) {
            return Err(format!("scale[{idx}] must be finite and >= 0"));
        }
        Ok(())
    }

    /// Standardize a raw vector: `(x - mean) / scale` per feature.
    ///
    /// A zero scale (constant feature at fit time) maps that feature to 0.
    /// Results that overflow saturate at `±f64::MAX`.
    pub fn standardize(&self, vector: &FeatureVector) -> Result<FeatureVector, ComputeError> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(ComputeError::DimensionMismatch {
                what: "scaler",
                expected: FEATURE_COUNT,
                found: self.mean.len().min(self.scale.len()),
            });
        }
        let mut out = [0.0f64; FEATURE_COUNT];
        for (i, &x) in vector.as_slice().iter().enumerate() {
            let scale = self.scale[i];
            out[i] = if scale == 0.0 {
                0.0
            } else {
                ((x - self.mean[i]) / scale).clamp(-f64::MAX, f64::MAX)
            };
        }
        Ok(FeatureVector::from_ordered(out))
    }
}
