//! Loading the fitted artifacts and publishing the pipeline state.
//!
//! Artifacts are loaded once at startup. The resulting [`PipelineState`] is
//! terminal for the process: a failed load stays unavailable until restart.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::ml::features::FEATURE_NAMES;
use crate::ml::logreg::ClassifierParameters;
use crate::ml::scaler::ScalingParameters;

/// Errors raised while reading or checking an artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The artifact file does not exist.
    #[error("Artifact not found at {path}")]
    NotFound { path: PathBuf },
    /// The artifact file could not be read.
    #[error("Failed to read artifact {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The artifact is not valid JSON for its type.
    #[error("Invalid artifact JSON at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The artifact parsed but its contents are unusable.
    #[error("Invalid {kind} artifact: {reason}")]
    Invalid { kind: ArtifactKind, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Scaler,
    Classifier,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Scaler => "scaler",
            Self::Classifier => "classifier",
        })
    }
}

/// Supplier of the two fitted artifacts.
pub trait ArtifactSource {
    fn load_scaler(&self) -> Result<ScalingParameters, ArtifactError>;
    fn load_classifier(&self) -> Result<ClassifierParameters, ArtifactError>;
}

/// Reads both artifacts from JSON files on disk.
#[derive(Debug, Clone)]
pub struct FsArtifactSource {
    pub scaler_path: PathBuf,
    pub model_path: PathBuf,
}

impl FsArtifactSource {
    pub fn new(scaler_path: impl Into<PathBuf>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            scaler_path: scaler_path.into(),
            model_path: model_path.into(),
        }
    }
}

impl ArtifactSource for FsArtifactSource {
    fn load_scaler(&self) -> Result<ScalingParameters, ArtifactError> {
        tracing::info!("Attempting to load scaler from {}", self.scaler_path.display());
        let params: ScalingParameters = read_json(&self.scaler_path)?;
        check_scaler(&params)?;
        Ok(params)
    }

    fn load_classifier(&self) -> Result<ClassifierParameters, ArtifactError> {
        tracing::info!("Attempting to load model from {}", self.model_path.display());
        let params: ClassifierParameters = read_json(&self.model_path)?;
        check_classifier(&params)?;
        Ok(params)
    }
}

/// Artifacts held in memory, for tests and embedders that already have parameters.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtifactSource {
    pub scaler: Option<ScalingParameters>,
    pub classifier: Option<ClassifierParameters>,
}

impl ArtifactSource for InMemoryArtifactSource {
    fn load_scaler(&self) -> Result<ScalingParameters, ArtifactError> {
        let params = self.scaler.clone().ok_or_else(|| ArtifactError::Invalid {
            kind: ArtifactKind::Scaler,
            reason: "not provided".to_string(),
        })?;
        check_scaler(&params)?;
        Ok(params)
    }

    fn load_classifier(&self) -> Result<ClassifierParameters, ArtifactError> {
        let params = self.classifier.clone().ok_or_else(|| ArtifactError::Invalid {
            kind: ArtifactKind::Classifier,
            reason: "not provided".to_string(),
        })?;
        check_classifier(&params)?;
        Ok(params)
    }
}

/// Both fitted artifacts, shared read-only across requests.
#[derive(Debug)]
pub struct LoadedModel {
    pub scaler: ScalingParameters,
    pub classifier: ClassifierParameters,
}

/// Read-only handle to the loaded artifacts.
pub type ModelHandle = Arc<LoadedModel>;

/// Whether predictions can be served for the lifetime of the process.
#[derive(Debug, Clone)]
pub enum PipelineState {
    Ready(ModelHandle),
    Unavailable(Unavailable),
}

/// Why the pipeline is unavailable, and which artifacts did load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Unavailable {
    pub scaler_loaded: bool,
    pub model_loaded: bool,
    pub reason: String,
}

impl PipelineState {
    /// State before any load has been attempted.
    pub fn not_loaded() -> Self {
        Self::Unavailable(Unavailable {
            reason: "Artifacts have not been loaded".to_string(),
            ..Unavailable::default()
        })
    }

    /// State with both artifacts supplied directly.
    ///
    /// Parameters are checked the same way the registry checks loaded files.
    pub fn ready(
        scaler: ScalingParameters,
        classifier: ClassifierParameters,
    ) -> Result<Self, ArtifactError> {
        check_scaler(&scaler)?;
        check_classifier(&classifier)?;
        Ok(Self::Ready(Arc::new(LoadedModel { scaler, classifier })))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn scaler_loaded(&self) -> bool {
        match self {
            Self::Ready(_) => true,
            Self::Unavailable(info) => info.scaler_loaded,
        }
    }

    pub fn model_loaded(&self) -> bool {
        match self {
            Self::Ready(_) => true,
            Self::Unavailable(info) => info.model_loaded,
        }
    }
}

/// One-shot loader that decides the process-wide [`PipelineState`].
pub struct ModelRegistry;

impl ModelRegistry {
    /// Attempt to load both artifacts once.
    ///
    /// Both loads are attempted even if the first fails, so the liveness
    /// report can tell which artifact is missing. Failures are logged and
    /// folded into [`PipelineState::Unavailable`].
    pub fn initialize(source: &dyn ArtifactSource) -> PipelineState {
        let scaler = source.load_scaler();
        match &scaler {
            Ok(_) => tracing::info!("Scaler loaded successfully"),
            Err(err) => tracing::error!("Error loading scaler: {err}"),
        }
        let classifier = source.load_classifier();
        match &classifier {
            Ok(params) => tracing::info!(
                model_id = params.model_id.as_deref().unwrap_or("unnamed"),
                model_version = params.model_version,
                "Model loaded successfully"
            ),
            Err(err) => tracing::error!("Error loading model: {err}"),
        }

        match (scaler, classifier) {
            (Ok(scaler), Ok(classifier)) => {
                PipelineState::Ready(Arc::new(LoadedModel { scaler, classifier }))
            }
            (scaler, classifier) => {
                let reason = [scaler.as_ref().err(), classifier.as_ref().err()]
                    .into_iter()
                    .flatten()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                PipelineState::Unavailable(Unavailable {
                    scaler_loaded: scaler.is_ok(),
                    model_loaded: classifier.is_ok(),
                    reason,
                })
            }
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn check_scaler(params: &ScalingParameters) -> Result<(), ArtifactError> {
    let invalid = |reason| ArtifactError::Invalid {
        kind: ArtifactKind::Scaler,
        reason,
    };
    params.validate().map_err(invalid)?;
    check_feature_names(params.feature_names.as_deref()).map_err(invalid)
}

fn check_classifier(params: &ClassifierParameters) -> Result<(), ArtifactError> {
    let invalid = |reason| ArtifactError::Invalid {
        kind: ArtifactKind::Classifier,
        reason,
    };
    params.validate().map_err(invalid)?;
    check_feature_names(params.feature_names.as_deref()).map_err(invalid)
}

fn check_feature_names(names: Option<&[String]>) -> Result<(), String> {
    let Some(names) = names else {
        return Ok(());
    };
    if names.len() != FEATURE_NAMES.len() {
        return Err(format!(
            "feature_names has {} entries (expected {})",
            names.len(),
            FEATURE_NAMES.len()
        ));
    }
    for (idx, (found, expected)) in names.iter().zip(FEATURE_NAMES).enumerate() {
        if found != expected {
            return Err(format!(
                "feature_names[{idx}] is {found} (expected {expected})"
            ));
        }
    }
    Ok(())
}
