//! Inference core for a tissue-sample malignancy classifier.
//!
//! A request flows through [`pipeline::InferencePipeline`]: availability
//! gate, schema validation, standardization, linear decision. The fitted
//! artifacts are loaded once by [`registry::ModelRegistry`] and shared
//! read-only afterwards.
/// Application directory resolution.
pub mod app_dirs;
/// Service configuration.
pub mod config;
/// Tracing subscriber setup.
pub mod logging;
/// Feature schema, scaler, classifier and metrics.
pub mod ml;
/// Request orchestration and typed prediction errors.
pub mod pipeline;
/// Artifact loading and pipeline state.
pub mod registry;
/// Status code and JSON body mapping.
pub mod transport;

pub use ml::features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector, ValidationError};
pub use ml::logreg::{ClassifierParameters, Diagnosis};
pub use ml::scaler::ScalingParameters;
pub use pipeline::{ErrorKind, InferencePipeline, PredictError, Prediction};
pub use registry::{ArtifactSource, FsArtifactSource, ModelRegistry, PipelineState};
