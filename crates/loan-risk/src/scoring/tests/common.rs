use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::report::ReportSettings;
use crate::scoring::artifacts::{read_model, read_scaler};
use crate::scoring::domain::{
    ApplicantForm, ApplicantProfile, CreditHistory, Dependents, Education, Gender, Married,
    PropertyArea, SelfEmployed,
};
use crate::scoring::model::{ClassProbabilities, InferenceError, RiskClass, RiskClassifier};
use crate::scoring::pipeline::RiskPipeline;
use crate::scoring::router::AssessmentState;
use crate::scoring::scaler::StandardScaler;

pub(super) const MODEL_JSON: &str = include_str!("../../../../../artifacts/model.json");
pub(super) const SCALER_JSON: &str = include_str!("../../../../../artifacts/scaler.json");
pub(super) const APPLICANTS_CSV: &str = include_str!("../../../../../artifacts/applicants.csv");

/// Profile from the reference walkthrough: salaried married graduate, urban property.
pub(super) fn reference_profile() -> ApplicantProfile {
    ApplicantProfile {
        gender: Gender::Male,
        married: Married::Yes,
        dependents: Dependents::Zero,
        education: Education::Graduate,
        self_employed: SelfEmployed::No,
        applicant_income: 5000.0,
        coapplicant_income: 0.0,
        loan_amount: 100.0,
        loan_amount_term: 360,
        credit_history: CreditHistory::Good,
        property_area: PropertyArea::Urban,
    }
}

pub(super) fn reference_form() -> ApplicantForm {
    ApplicantForm {
        gender: "Male".to_string(),
        married: "Yes".to_string(),
        dependents: "0".to_string(),
        education: "Graduate".to_string(),
        self_employed: "No".to_string(),
        applicant_income: 5000.0,
        coapplicant_income: 0.0,
        loan_amount: 100.0,
        loan_amount_term: 360.0,
        credit_history: "Good (1)".to_string(),
        property_area: "Urban".to_string(),
    }
}

pub(super) fn shipped_pipeline() -> RiskPipeline {
    let classifier =
        read_model(MODEL_JSON.as_bytes(), Path::new("model.json")).expect("model artifact");
    let scaler =
        read_scaler(SCALER_JSON.as_bytes(), Path::new("scaler.json")).expect("scaler artifact");
    RiskPipeline::new(classifier, Some(scaler))
}

pub(super) fn assessment_state() -> Arc<AssessmentState> {
    Arc::new(AssessmentState {
        pipeline: Arc::new(shipped_pipeline()),
        report: ReportSettings::default(),
    })
}

pub(super) fn identity_scaler(features: usize) -> StandardScaler {
    StandardScaler::new(vec![0.0; features], vec![1.0; features]).expect("valid scaler")
}

/// Classifier double that records the vector it was handed.
#[derive(Default)]
pub(super) struct RecordingClassifier {
    pub(super) seen: Mutex<Vec<Vec<f64>>>,
}

impl RiskClassifier for RecordingClassifier {
    fn predict(&self, features: &[f64]) -> Result<RiskClass, InferenceError> {
        self.seen.lock().expect("lock").push(features.to_vec());
        Ok(RiskClass::LowRisk)
    }

    fn predict_probability(
        &self,
        _features: &[f64],
    ) -> Result<Option<ClassProbabilities>, InferenceError> {
        Ok(Some(ClassProbabilities::from_high_risk(0.25)))
    }
}
