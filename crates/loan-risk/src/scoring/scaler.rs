use serde::{Deserialize, Serialize};

/// Per-feature affine transform frozen at training time.
///
/// The scaler never refits; it only replays `(x - mean) / scale`. Features whose
/// training variance was zero carry a scale of 0 in some exports and are passed
/// through centered but unscaled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScalingError {
    #[error("scaler was fit on {expected} features but received {found}")]
    ShapeMismatch { expected: usize, found: usize },
}

impl StandardScaler {
    /// Returns `None` when the parameter vectors are empty, differ in length, or
    /// contain non-finite values.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Option<Self> {
        let valid = !mean.is_empty()
            && mean.len() == scale.len()
            && mean.iter().chain(scale.iter()).all(|value| value.is_finite());
        valid.then_some(Self { mean, scale })
    }

    pub fn feature_count(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ScalingError> {
        if features.len() != self.mean.len() {
            return Err(ScalingError::ShapeMismatch {
                expected: self.mean.len(),
                found: features.len(),
            });
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(value, (mean, scale))| {
                let divisor = if *scale == 0.0 { 1.0 } else { *scale };
                (value - mean) / divisor
            })
            .collect())
    }
}
