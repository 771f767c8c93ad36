//! End-to-end prediction: availability gate, validation, scaling, decision.

use serde_json::Value;
use thiserror::Error;

use crate::ml::ComputeError;
use crate::ml::features::{FeatureVector, ValidationError};
use crate::ml::logreg::{self, Diagnosis};
use crate::registry::{ModelHandle, PipelineState};

/// Outcome of a successful prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub diagnosis: Diagnosis,
    /// Raw decision score before thresholding.
    pub score: f64,
    /// Logistic probability of the malignant class.
    pub probability: f64,
}

impl Prediction {
    pub fn label(&self) -> &'static str {
        self.diagnosis.as_str()
    }
}

/// Coarse error category, for callers that branch on the failure type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    ModelUnavailable,
    Unexpected,
}

/// Why a prediction could not be produced.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Input was missing a field or held a non-numeric value.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Artifacts were never loaded or failed to load.
    #[error("Model or scaler not loaded: {reason}")]
    ModelUnavailable { reason: String },
    /// Scaling or classification failed on validated input.
    #[error("Error during prediction: {0}")]
    Unexpected(#[from] ComputeError),
}

impl PredictError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::ModelUnavailable { .. } => ErrorKind::ModelUnavailable,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Detail safe to hand back to callers; operators get `Display`.
    pub fn public_detail(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::ModelUnavailable { .. } => {
                "Model or scaler not loaded. Please check the server logs.".to_string()
            }
            Self::Unexpected(_) => "Error during prediction".to_string(),
        }
    }
}

/// Prediction entry point shared by every request.
///
/// Cloning is cheap; all clones share the same read-only artifacts.
#[derive(Debug, Clone)]
pub struct InferencePipeline {
    state: PipelineState,
}

impl InferencePipeline {
    pub fn new(state: PipelineState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Predict from a parsed JSON object of named measurements.
    pub fn predict(&self, payload: &Value) -> Result<Prediction, PredictError> {
        let model = self.model()?;
        if let Value::Object(fields) = payload {
            tracing::debug!(fields = fields.len(), "Received prediction input");
        }
        let vector = FeatureVector::from_json(payload).inspect_err(|err| {
            tracing::warn!("Rejected prediction input: {err}");
        })?;
        Self::run(&model, &vector)
    }

    /// Predict from an already validated vector in canonical order.
    pub fn predict_vector(&self, vector: &FeatureVector) -> Result<Prediction, PredictError> {
        let model = self.model()?;
        Self::run(&model, vector)
    }

    fn model(&self) -> Result<ModelHandle, PredictError> {
        match &self.state {
            PipelineState::Ready(model) => Ok(model.clone()),
            PipelineState::Unavailable(info) => {
                tracing::error!("Model or scaler not loaded: {}", info.reason);
                Err(PredictError::ModelUnavailable {
                    reason: info.reason.clone(),
                })
            }
        }
    }

    fn run(model: &ModelHandle, vector: &FeatureVector) -> Result<Prediction, PredictError> {
        let outcome = model
            .scaler
            .standardize(vector)
            .and_then(|scaled| model.classifier.decision_score(&scaled));
        let score = outcome.inspect_err(|err| {
            tracing::error!("Error during prediction: {err}");
        })?;
        let diagnosis = logreg::decide(score);
        tracing::info!(
            score,
            label = diagnosis.label(),
            "Final prediction: {}",
            diagnosis.as_str()
        );
        Ok(Prediction {
            diagnosis,
            score,
            probability: logreg::probability(score),
        })
    }
}
