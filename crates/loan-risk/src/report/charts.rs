use serde::Serialize;

use crate::scoring::{ApplicantProfile, RiskAssessment, RiskClass};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: &'static str,
    pub value: f64,
}

/// Chart-ready tabular data; rendering is left to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub input_title: &'static str,
    pub input_breakdown: Vec<ChartPoint>,
    pub outcome_title: &'static str,
    pub outcome: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn build(profile: &ApplicantProfile, assessment: &RiskAssessment) -> Self {
        let input_breakdown = vec![
            ChartPoint {
                label: "Applicant Income",
                value: profile.applicant_income,
            },
            ChartPoint {
                label: "Coapplicant Income",
                value: profile.coapplicant_income,
            },
            ChartPoint {
                label: "Loan Amount",
                value: profile.loan_amount,
            },
            ChartPoint {
                label: "Loan Term",
                value: f64::from(profile.loan_amount_term),
            },
        ];

        // Without probabilities the pie collapses onto the predicted class.
        let (low, high) = match assessment.probabilities {
            Some(probabilities) => (probabilities.low_risk, probabilities.high_risk),
            None if assessment.class == RiskClass::HighRisk => (0.0, 1.0),
            None => (1.0, 0.0),
        };

        Self {
            input_title: "User Feature Breakdown",
            input_breakdown,
            outcome_title: "Prediction Status",
            outcome: vec![
                ChartPoint {
                    label: RiskClass::LowRisk.label(),
                    value: low,
                },
                ChartPoint {
                    label: RiskClass::HighRisk.label(),
                    value: high,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{
        encode, ClassProbabilities, CreditHistory, Dependents, Education, Gender, Married,
        PropertyArea, SelfEmployed,
    };

    fn profile() -> ApplicantProfile {
        ApplicantProfile {
            gender: Gender::Female,
            married: Married::No,
            dependents: Dependents::One,
            education: Education::Graduate,
            self_employed: SelfEmployed::Yes,
            applicant_income: 4200.0,
            coapplicant_income: 1300.0,
            loan_amount: 120.0,
            loan_amount_term: 240,
            credit_history: CreditHistory::Good,
            property_area: PropertyArea::Semiurban,
        }
    }

    #[test]
    fn outcome_series_uses_probabilities_when_available() {
        let assessment = RiskAssessment {
            features: encode(&profile()),
            class: RiskClass::LowRisk,
            class_label: 0,
            probabilities: Some(ClassProbabilities::from_high_risk(0.3)),
        };

        let charts = ChartSeries::build(&profile(), &assessment);

        assert_eq!(charts.input_breakdown.len(), 4);
        assert_eq!(charts.input_breakdown[3].value, 240.0);
        assert!((charts.outcome[0].value - 0.7).abs() < 1e-12);
        assert!((charts.outcome[1].value - 0.3).abs() < 1e-12);
    }

    #[test]
    fn outcome_series_collapses_onto_class_without_probabilities() {
        let assessment = RiskAssessment {
            features: encode(&profile()),
            class: RiskClass::HighRisk,
            class_label: 1,
            probabilities: None,
        };

        let charts = ChartSeries::build(&profile(), &assessment);

        assert_eq!(charts.outcome[0].value, 0.0);
        assert_eq!(charts.outcome[1].value, 1.0);
        assert_eq!(charts.outcome[1].label, "High Risk");
    }
}
