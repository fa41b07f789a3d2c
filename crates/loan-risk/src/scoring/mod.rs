//! Applicant feature encoding and default-risk inference.
//!
//! A submission flows through [`encoder`] into an optional [`scaler`] and finally a
//! [`model::RiskClassifier`]; [`pipeline::RiskPipeline`] composes the stages over
//! artifacts loaded once by [`artifacts`].

pub mod artifacts;
pub mod batch;
pub mod domain;
pub mod encoder;
pub mod model;
pub mod pipeline;
pub mod router;
pub mod scaler;

#[cfg(test)]
mod tests;

pub use artifacts::{load_model, load_scaler, ArtifactError, ModelArtifact};
pub use batch::{score_path, score_reader, write_results, BatchError, BatchOutcome};
pub use domain::{
    ApplicantForm, ApplicantProfile, Categorical, CreditHistory, Dependents, Education, Gender,
    Married, PropertyArea, SelfEmployed,
};
pub use encoder::{encode, encode_form, EncodingError, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use model::{
    ClassProbabilities, InferenceError, LinearSvm, LogisticRegression, RiskClass, RiskClassifier,
};
pub use pipeline::{PipelineError, PipelineStage, RiskAssessment, RiskPipeline};
pub use router::{assessment_router, AssessmentState};
pub use scaler::{ScalingError, StandardScaler};
