use crate::cli::ArtifactArgs;
use crate::infra::{apply_artifact_overrides, load_pipeline};
use chrono::Utc;
use clap::Args;
use loan_risk::config::AppConfig;
use loan_risk::error::AppError;
use loan_risk::report::{present, Presentation};
use loan_risk::scoring::{
    score_path, write_results, ApplicantForm, ApplicantProfile, BatchOutcome, Categorical,
    RiskAssessment,
};
use loan_risk::telemetry;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Male or Female
    #[arg(long)]
    pub(crate) gender: String,
    /// Yes or No
    #[arg(long)]
    pub(crate) married: String,
    /// 0, 1, 2 or 3+
    #[arg(long, default_value = "0")]
    pub(crate) dependents: String,
    /// Graduate or "Not Graduate"
    #[arg(long)]
    pub(crate) education: String,
    /// Yes or No
    #[arg(long)]
    pub(crate) self_employed: String,
    /// Applicant monthly income
    #[arg(long)]
    pub(crate) applicant_income: f64,
    /// Co-applicant monthly income
    #[arg(long, default_value_t = 0.0)]
    pub(crate) coapplicant_income: f64,
    /// Requested loan amount, in thousands
    #[arg(long)]
    pub(crate) loan_amount: f64,
    /// Loan term in months
    #[arg(long, default_value_t = 360.0)]
    pub(crate) loan_amount_term: f64,
    /// Good or Bad
    #[arg(long)]
    pub(crate) credit_history: String,
    /// Urban, Semiurban or Rural
    #[arg(long)]
    pub(crate) property_area: String,
    /// Write the report document to this path
    #[arg(long)]
    pub(crate) report: Option<PathBuf>,
    /// Print the assessment as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

impl AssessArgs {
    fn form(&self) -> ApplicantForm {
        ApplicantForm {
            gender: self.gender.clone(),
            married: self.married.clone(),
            dependents: self.dependents.clone(),
            education: self.education.clone(),
            self_employed: self.self_employed.clone(),
            applicant_income: self.applicant_income,
            coapplicant_income: self.coapplicant_income,
            loan_amount: self.loan_amount,
            loan_amount_term: self.loan_amount_term,
            credit_history: self.credit_history.clone(),
            property_area: self.property_area.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// Applicant CSV using the public loan dataset headers
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Write per-row results as CSV instead of printing them
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let form = args.form();
    let AssessArgs {
        report,
        json,
        artifacts,
        ..
    } = args;
    apply_artifact_overrides(&mut config.artifacts, artifacts);

    let pipeline = load_pipeline(&config.artifacts)?;
    let (profile, assessment) = pipeline.assess_form(&form)?;
    let presentation = present(&profile, &assessment, &config.report, Utc::now());

    if json {
        let payload = serde_json::json!({
            "profile": profile,
            "assessment": assessment,
            "summary": presentation.summary,
            "charts": presentation.charts,
        });
        match serde_json::to_string_pretty(&payload) {
            Ok(text) => println!("{text}"),
            Err(err) => println!("Assessment payload unavailable: {err}"),
        }
    } else {
        render_assessment(&profile, &assessment, &presentation);
    }

    if let Some(path) = report {
        std::fs::write(&path, presentation.document.render())?;
        println!("\nReport written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    apply_artifact_overrides(&mut config.artifacts, args.artifacts);

    let pipeline = load_pipeline(&config.artifacts)?;
    let outcomes = score_path(&args.input, &pipeline)?;

    match args.output {
        Some(path) => {
            let file = File::create(&path)?;
            write_results(&outcomes, BufWriter::new(file))?;
            println!(
                "Scored {} of {} applicants; results written to {}",
                scored_count(&outcomes),
                outcomes.len(),
                path.display()
            );
        }
        None => render_batch(&outcomes),
    }

    Ok(())
}

fn scored_count(outcomes: &[BatchOutcome]) -> usize {
    outcomes.iter().filter(|outcome| outcome.is_scored()).count()
}

fn render_assessment(
    profile: &ApplicantProfile,
    assessment: &RiskAssessment,
    presentation: &Presentation,
) {
    println!("Loan default risk assessment");
    println!("\nApplicant");
    println!(
        "- {} | married {} | {} dependents | {} | self employed {}",
        profile.gender.label(),
        profile.married.label(),
        profile.dependents.label(),
        profile.education.label(),
        profile.self_employed.label()
    );
    println!(
        "- income {:.0} (co-applicant {:.0}) | loan {:.0}k over {} months",
        profile.applicant_income,
        profile.coapplicant_income,
        profile.loan_amount,
        profile.loan_amount_term
    );
    println!(
        "- credit history {} | {} property",
        profile.credit_history.label(),
        profile.property_area.label()
    );

    println!("\nEncoded features");
    for (name, value) in assessment.features.named() {
        println!("- {name}: {value}");
    }

    println!("\n{}", presentation.summary.line());

    println!("\n{}", presentation.charts.outcome_title);
    for point in &presentation.charts.outcome {
        println!("- {}: {:.0}%", point.label, point.value * 100.0);
    }
}

fn render_batch(outcomes: &[BatchOutcome]) {
    println!(
        "Batch assessment: {} of {} applicants scored",
        scored_count(outcomes),
        outcomes.len()
    );

    for outcome in outcomes {
        let id = outcome
            .loan_id
            .clone()
            .unwrap_or_else(|| format!("row {}", outcome.row));
        match &outcome.result {
            Ok((_, assessment)) => match assessment.probabilities {
                Some(probabilities) => println!(
                    "- {}: {} ({:.1}% default probability)",
                    id,
                    assessment.class.label(),
                    probabilities.high_risk * 100.0
                ),
                None => println!("- {}: {}", id, assessment.class.label()),
            },
            Err(err) => println!("- {}: not scored ({})", id, err),
        }
    }
}
