use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::domain::{ApplicantForm, ApplicantProfile};
use super::encoder::{encode, EncodingError, FeatureVector};
use super::model::{ClassProbabilities, InferenceError, RiskClass, RiskClassifier};
use super::scaler::{ScalingError, StandardScaler};

/// Stage at which an assessment failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Encoding,
    Scaling,
    Inference,
}

impl PipelineStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Encoding => "encoding",
            Self::Scaling => "scaling",
            Self::Inference => "inference",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("encoding stage failed: {0}")]
    Encoding(#[from] EncodingError),
    #[error("scaling stage failed: {0}")]
    Scaling(#[from] ScalingError),
    #[error("inference stage failed: {0}")]
    Inference(#[from] InferenceError),
}

impl PipelineError {
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::Encoding(_) => PipelineStage::Encoding,
            PipelineError::Scaling(_) => PipelineStage::Scaling,
            PipelineError::Inference(_) => PipelineStage::Inference,
        }
    }
}

/// Output of one pass through encoder, scaler and classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub features: FeatureVector,
    pub class: RiskClass,
    pub class_label: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<ClassProbabilities>,
}

impl RiskAssessment {
    /// Probability of the predicted class, when the classifier exposes one.
    pub fn confidence(&self) -> Option<f64> {
        self.probabilities
            .as_ref()
            .map(|probabilities| probabilities.of(self.class))
    }
}

/// Encode → optional scale → infer, over artifacts loaded once at startup.
#[derive(Clone)]
pub struct RiskPipeline {
    classifier: Arc<dyn RiskClassifier>,
    scaler: Option<Arc<StandardScaler>>,
}

impl RiskPipeline {
    pub fn new(classifier: Arc<dyn RiskClassifier>, scaler: Option<StandardScaler>) -> Self {
        Self {
            classifier,
            scaler: scaler.map(Arc::new),
        }
    }

    pub fn is_scaled(&self) -> bool {
        self.scaler.is_some()
    }

    pub fn assess(&self, profile: &ApplicantProfile) -> Result<RiskAssessment, PipelineError> {
        let features = encode(profile);
        debug!(features = ?features.as_slice(), "profile encoded");

        let model_input = match &self.scaler {
            Some(scaler) => {
                let scaled = scaler.transform(features.as_slice())?;
                debug!(scaled = ?scaled, "features scaled");
                scaled
            }
            None => features.as_slice().to_vec(),
        };

        let class = self.classifier.predict(&model_input)?;
        let probabilities = self.classifier.predict_probability(&model_input)?;

        info!(
            class = class.label(),
            high_risk_probability = probabilities.map(|p| p.high_risk),
            "assessment complete"
        );

        Ok(RiskAssessment {
            features,
            class,
            class_label: class.label_value(),
            probabilities,
        })
    }

    pub fn assess_form(
        &self,
        form: &ApplicantForm,
    ) -> Result<(ApplicantProfile, RiskAssessment), PipelineError> {
        let profile = ApplicantProfile::try_from(form)?;
        let assessment = self.assess(&profile)?;
        Ok((profile, assessment))
    }
}

impl std::fmt::Debug for RiskPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskPipeline")
            .field("scaled", &self.is_scaled())
            .finish_non_exhaustive()
    }
}
