//! End-to-end scenarios over the shipped artifacts, exercised only through the public
//! crate surface: artifact loading, pipeline assessment, presentation and batch scoring.

mod common {
    use std::path::PathBuf;

    use loan_risk::scoring::{load_model, load_scaler, ApplicantForm, RiskPipeline};

    pub(super) fn artifact(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../artifacts")
            .join(name)
    }

    pub(super) fn pipeline() -> RiskPipeline {
        let classifier = load_model(artifact("model.json")).expect("model loads");
        let scaler = load_scaler(artifact("scaler.json")).expect("scaler loads");
        RiskPipeline::new(classifier, Some(scaler))
    }

    pub(super) fn form() -> ApplicantForm {
        ApplicantForm {
            gender: "Female".to_string(),
            married: "No".to_string(),
            dependents: "2".to_string(),
            education: "Not Graduate".to_string(),
            self_employed: "No".to_string(),
            applicant_income: 3200.0,
            coapplicant_income: 1800.0,
            loan_amount: 110.0,
            loan_amount_term: 360.0,
            credit_history: "Good (1)".to_string(),
            property_area: "Semiurban".to_string(),
        }
    }
}

mod assessment {
    use super::common::*;
    use chrono::{TimeZone, Utc};
    use loan_risk::report::{present, PresentationStyle, ReportSettings};
    use loan_risk::scoring::{PipelineStage, RiskClass, FEATURE_NAMES};

    #[test]
    fn form_submission_produces_labelled_assessment() {
        let pipeline = pipeline();

        let (profile, assessment) = pipeline.assess_form(&form()).expect("assessment");

        assert!(pipeline.is_scaled());
        assert_eq!(assessment.features.as_slice().len(), FEATURE_NAMES.len());
        assert_eq!(
            assessment.features.as_slice(),
            &[0.0, 0.0, 2.0, 1.0, 0.0, 3200.0, 1800.0, 110.0, 360.0, 1.0, 1.0]
        );
        assert_eq!(assessment.class, RiskClass::LowRisk);
        assert_eq!(profile.loan_amount_term, 360);
    }

    #[test]
    fn presentation_bundles_summary_charts_and_document() {
        let pipeline = pipeline();
        let (profile, assessment) = pipeline.assess_form(&form()).expect("assessment");
        let settings = ReportSettings {
            style: PresentationStyle::Markdown,
            title: "Loan Default Risk Report".to_string(),
        };
        let generated_at = Utc
            .with_ymd_and_hms(2026, 10, 18, 8, 0, 0)
            .single()
            .expect("timestamp");

        let presentation = present(&profile, &assessment, &settings, generated_at);

        assert_eq!(presentation.summary.headline, "Low Risk");
        assert_eq!(presentation.summary.message, "Loan Likely to be Approved.");
        let outcome_total: f64 = presentation
            .charts
            .outcome
            .iter()
            .map(|point| point.value)
            .sum();
        assert!((outcome_total - 1.0).abs() < 1e-9);

        let rendered = presentation.document.render();
        assert!(rendered.contains("| Dependents | 2 |"));
        assert!(rendered.contains("| Property Area | Semiurban |"));
        assert!(rendered.contains("| Education | Not Graduate |"));
    }

    #[test]
    fn bad_credit_is_reported_as_default_risk() {
        let pipeline = pipeline();
        let mut form = form();
        form.credit_history = "Bad (0)".to_string();

        let (_, assessment) = pipeline.assess_form(&form).expect("assessment");

        assert_eq!(assessment.class, RiskClass::HighRisk);
        assert_eq!(assessment.features.get("credit_history"), Some(0.0));
    }

    #[test]
    fn unknown_selection_names_the_failing_stage() {
        let pipeline = pipeline();
        let mut form = form();
        form.self_employed = "Sometimes".to_string();

        let err = pipeline.assess_form(&form).expect_err("rejected");

        assert_eq!(err.stage(), PipelineStage::Encoding);
        assert_eq!(
            err.to_string(),
            "encoding stage failed: self_employed value 'Sometimes' is outside the accepted options"
        );
    }
}

mod artifacts {
    use super::common::*;
    use loan_risk::scoring::{load_model, ArtifactError};

    #[test]
    fn missing_model_is_fatal_and_names_the_path() {
        let err = load_model(artifact("absent-model.json"))
            .err()
            .expect("missing model");

        assert!(matches!(err, ArtifactError::Io { .. }));
        assert!(err.to_string().contains("absent-model.json"));
    }

    #[test]
    fn csv_is_not_a_model_artifact() {
        let err = load_model(artifact("applicants.csv"))
            .err()
            .expect("not json");

        assert!(matches!(err, ArtifactError::Json { .. }));
    }
}

mod batch {
    use super::common::*;
    use loan_risk::scoring::{score_path, write_results, RiskClass};

    #[test]
    fn sample_applicants_file_scores_end_to_end() {
        let pipeline = pipeline();

        let outcomes = score_path(artifact("applicants.csv"), &pipeline).expect("batch");

        let classes: Vec<RiskClass> = outcomes
            .iter()
            .map(|outcome| outcome.result.as_ref().expect("scored").1.class)
            .collect();
        assert_eq!(
            classes,
            vec![
                RiskClass::LowRisk,
                RiskClass::LowRisk,
                RiskClass::HighRisk,
                RiskClass::LowRisk,
                RiskClass::HighRisk,
            ]
        );

        let mut buffer = Vec::new();
        write_results(&outcomes, &mut buffer).expect("written");
        let written = String::from_utf8(buffer).expect("utf8");
        assert_eq!(written.lines().count(), 6);
        assert!(written.contains("LP001005,High Risk,1,"));
    }
}
