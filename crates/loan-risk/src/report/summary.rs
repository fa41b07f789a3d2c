use serde::Serialize;

use crate::scoring::{RiskAssessment, RiskClass};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskSummary {
    pub class: RiskClass,
    pub headline: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_probability: Option<f64>,
}

impl RiskSummary {
    pub fn from_assessment(assessment: &RiskAssessment) -> Self {
        let message = match assessment.class {
            RiskClass::HighRisk => "Loan Likely to Default.",
            RiskClass::LowRisk => "Loan Likely to be Approved.",
        };

        Self {
            class: assessment.class,
            headline: assessment.class.label(),
            message,
            default_probability: assessment.probabilities.map(|p| p.high_risk),
        }
    }

    /// Single line suitable for terminals and log output.
    pub fn line(&self) -> String {
        match self.default_probability {
            Some(probability) => format!(
                "{}: {} (default probability {:.1}%)",
                self.headline,
                self.message,
                probability * 100.0
            ),
            None => format!("{}: {}", self.headline, self.message),
        }
    }
}
