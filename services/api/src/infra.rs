use crate::cli::ArtifactArgs;
use loan_risk::config::ArtifactConfig;
use loan_risk::scoring::{load_model, load_scaler, ArtifactError, RiskPipeline};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Fold command-line overrides into the environment-derived artifact locations.
pub(crate) fn apply_artifact_overrides(config: &mut ArtifactConfig, args: ArtifactArgs) {
    if let Some(model) = args.model {
        config.model_path = model;
    }
    if args.no_scaler {
        config.scaler_path = None;
    } else if let Some(scaler) = args.scaler {
        config.scaler_path = Some(scaler);
    }
}

/// Load the classifier and optional scaler once; any failure aborts startup.
pub(crate) fn load_pipeline(config: &ArtifactConfig) -> Result<RiskPipeline, ArtifactError> {
    let classifier = load_model(&config.model_path)?;
    let scaler = config.scaler_path.as_ref().map(load_scaler).transpose()?;

    if scaler.is_none() {
        info!("no scaler configured; classifier receives raw encoded features");
    }

    Ok(RiskPipeline::new(classifier, scaler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_risk::config::AppConfig;
    use loan_risk::scoring::{ApplicantForm, RiskClass};
    use std::path::PathBuf;

    fn config() -> ArtifactConfig {
        ArtifactConfig {
            model_path: PathBuf::from("artifacts/model.json"),
            scaler_path: Some(PathBuf::from("artifacts/scaler.json")),
        }
    }

    #[test]
    fn no_scaler_flag_clears_configured_scaler() {
        let mut config = config();
        apply_artifact_overrides(
            &mut config,
            ArtifactArgs {
                model: Some(PathBuf::from("models/svm.json")),
                scaler: None,
                no_scaler: true,
            },
        );
        assert_eq!(config.model_path, PathBuf::from("models/svm.json"));
        assert!(config.scaler_path.is_none());
    }

    #[test]
    fn scaler_override_replaces_configured_path() {
        let mut config = config();
        apply_artifact_overrides(
            &mut config,
            ArtifactArgs {
                model: None,
                scaler: Some(PathBuf::from("models/scaler-v2.json")),
                no_scaler: false,
            },
        );
        assert_eq!(config.model_path, PathBuf::from("artifacts/model.json"));
        assert_eq!(
            config.scaler_path,
            Some(PathBuf::from("models/scaler-v2.json"))
        );
    }

    #[test]
    fn missing_model_aborts_pipeline_load() {
        let config = ArtifactConfig {
            model_path: PathBuf::from("missing/model.json"),
            scaler_path: None,
        };
        assert!(matches!(
            load_pipeline(&config),
            Err(ArtifactError::Io { .. })
        ));
    }

    #[test]
    fn default_configuration_scales_before_scoring() {
        for key in ["LOAN_MODEL_PATH", "LOAN_SCALER_PATH"] {
            std::env::remove_var(key);
        }
        let config = AppConfig::load().expect("default config");
        let workspace = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..");
        let artifacts = ArtifactConfig {
            model_path: workspace.join(&config.artifacts.model_path),
            scaler_path: config
                .artifacts
                .scaler_path
                .as_ref()
                .map(|path| workspace.join(path)),
        };

        let pipeline = load_pipeline(&artifacts).expect("shipped artifacts load");
        let form = ApplicantForm {
            gender: "Male".to_string(),
            married: "Yes".to_string(),
            dependents: "0".to_string(),
            education: "Graduate".to_string(),
            self_employed: "No".to_string(),
            applicant_income: 5000.0,
            coapplicant_income: 0.0,
            loan_amount: 100.0,
            loan_amount_term: 360.0,
            credit_history: "Bad (0)".to_string(),
            property_area: "Urban".to_string(),
        };
        let (_, assessment) = pipeline.assess_form(&form).expect("assessment");

        assert!(pipeline.is_scaled());
        assert_eq!(assessment.class, RiskClass::HighRisk);
    }
}
