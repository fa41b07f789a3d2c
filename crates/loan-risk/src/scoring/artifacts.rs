use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use super::encoder::FEATURE_COUNT;
use super::model::{LinearSvm, LogisticRegression, RiskClassifier};
use super::scaler::StandardScaler;

const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Debug)]
pub enum ArtifactError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    Invalid {
        path: PathBuf,
        reason: String,
    },
}

impl std::fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactError::Io { path, source } => {
                write!(f, "failed to read artifact {}: {}", path.display(), source)
            }
            ArtifactError::Json { path, source } => {
                write!(f, "artifact {} is not valid JSON: {}", path.display(), source)
            }
            ArtifactError::Invalid { path, reason } => {
                write!(f, "artifact {} is unusable: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for ArtifactError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArtifactError::Io { source, .. } => Some(source),
            ArtifactError::Json { source, .. } => Some(source),
            ArtifactError::Invalid { .. } => None,
        }
    }
}

/// Serialized classifier, tagged by the estimator family that produced it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    LinearSvm {
        coefficients: Vec<f64>,
        intercept: f64,
    },
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl ModelArtifact {
    fn validate(&self) -> Result<(), String> {
        let (coefficients, intercept) = match self {
            ModelArtifact::LogisticRegression {
                coefficients,
                intercept,
                threshold,
            } => {
                if !(threshold.is_finite() && *threshold > 0.0 && *threshold < 1.0) {
                    return Err(format!("threshold {threshold} must lie strictly between 0 and 1"));
                }
                (coefficients, intercept)
            }
            ModelArtifact::LinearSvm {
                coefficients,
                intercept,
            } => (coefficients, intercept),
        };

        if coefficients.len() != FEATURE_COUNT {
            return Err(format!(
                "expected {FEATURE_COUNT} coefficients, found {}",
                coefficients.len()
            ));
        }
        if !intercept.is_finite() || coefficients.iter().any(|value| !value.is_finite()) {
            return Err("weights must be finite numbers".to_string());
        }
        Ok(())
    }

    pub fn into_classifier(self) -> Arc<dyn RiskClassifier> {
        match self {
            ModelArtifact::LogisticRegression {
                coefficients,
                intercept,
                threshold,
            } => Arc::new(LogisticRegression::new(coefficients, intercept, threshold)),
            ModelArtifact::LinearSvm {
                coefficients,
                intercept,
            } => Arc::new(LinearSvm::new(coefficients, intercept)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScalerArtifact {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Arc<dyn RiskClassifier>, ArtifactError> {
    let path = path.as_ref();
    let file = open(path)?;
    let classifier = read_model(BufReader::new(file), path)?;
    info!(path = %path.display(), "classifier artifact loaded");
    Ok(classifier)
}

/// `source` only labels errors; the artifact is read from `reader`.
pub fn read_model<R: Read>(
    reader: R,
    source: &Path,
) -> Result<Arc<dyn RiskClassifier>, ArtifactError> {
    let artifact: ModelArtifact =
        serde_json::from_reader(reader).map_err(|err| ArtifactError::Json {
            path: source.to_path_buf(),
            source: err,
        })?;
    artifact.validate().map_err(|reason| ArtifactError::Invalid {
        path: source.to_path_buf(),
        reason,
    })?;
    Ok(artifact.into_classifier())
}

pub fn load_scaler<P: AsRef<Path>>(path: P) -> Result<StandardScaler, ArtifactError> {
    let path = path.as_ref();
    let file = open(path)?;
    let scaler = read_scaler(BufReader::new(file), path)?;
    info!(path = %path.display(), features = scaler.feature_count(), "scaler artifact loaded");
    Ok(scaler)
}

pub fn read_scaler<R: Read>(reader: R, source: &Path) -> Result<StandardScaler, ArtifactError> {
    let artifact: ScalerArtifact =
        serde_json::from_reader(reader).map_err(|err| ArtifactError::Json {
            path: source.to_path_buf(),
            source: err,
        })?;
    let scaler =
        StandardScaler::new(artifact.mean, artifact.scale).ok_or_else(|| ArtifactError::Invalid {
            path: source.to_path_buf(),
            reason: "mean and scale must be non-empty, equally sized and finite".to_string(),
        })?;

    if scaler.feature_count() != FEATURE_COUNT {
        warn!(
            path = %source.display(),
            features = scaler.feature_count(),
            expected = FEATURE_COUNT,
            "scaler shape disagrees with the encoder; every assessment will fail at scaling"
        );
    }
    Ok(scaler)
}

fn open(path: &Path) -> Result<File, ArtifactError> {
    File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}
