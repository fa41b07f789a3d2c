use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use super::domain::{
    non_negative, ApplicantForm, ApplicantProfile, Categorical, CreditHistory, Dependents,
    Education, Gender, Married, PropertyArea, SelfEmployed,
};
use super::encoder::EncodingError;
use super::pipeline::{PipelineError, RiskAssessment, RiskPipeline};

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("applicant file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid applicant CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Result for one CSV row. `row` is 1-based and excludes the header.
#[derive(Debug)]
pub struct BatchOutcome {
    pub row: usize,
    pub loan_id: Option<String>,
    pub result: Result<(ApplicantProfile, RiskAssessment), PipelineError>,
}

impl BatchOutcome {
    pub fn is_scored(&self) -> bool {
        self.result.is_ok()
    }
}

/// Column layout of the public loan prediction dataset. Blank cells are treated as missing.
#[derive(Debug, Deserialize)]
struct ApplicantRow {
    #[serde(rename = "Loan_ID", default, deserialize_with = "empty_string_as_none")]
    loan_id: Option<String>,
    #[serde(rename = "Gender", default, deserialize_with = "empty_string_as_none")]
    gender: Option<String>,
    #[serde(rename = "Married", default, deserialize_with = "empty_string_as_none")]
    married: Option<String>,
    #[serde(rename = "Dependents", default, deserialize_with = "empty_string_as_none")]
    dependents: Option<String>,
    #[serde(rename = "Education", default, deserialize_with = "empty_string_as_none")]
    education: Option<String>,
    #[serde(
        rename = "Self_Employed",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    self_employed: Option<String>,
    #[serde(
        rename = "ApplicantIncome",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    applicant_income: Option<String>,
    #[serde(
        rename = "CoapplicantIncome",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    coapplicant_income: Option<String>,
    #[serde(rename = "LoanAmount", default, deserialize_with = "empty_string_as_none")]
    loan_amount: Option<String>,
    #[serde(
        rename = "Loan_Amount_Term",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    loan_amount_term: Option<String>,
    #[serde(
        rename = "Credit_History",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    credit_history: Option<String>,
    #[serde(
        rename = "Property_Area",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    property_area: Option<String>,
}

impl ApplicantRow {
    fn into_form(self) -> Result<ApplicantForm, EncodingError> {
        Ok(ApplicantForm {
            gender: required(self.gender, Gender::FIELD)?,
            married: required(self.married, Married::FIELD)?,
            dependents: required(self.dependents, Dependents::FIELD)?,
            education: required(self.education, Education::FIELD)?,
            self_employed: required(self.self_employed, SelfEmployed::FIELD)?,
            applicant_income: number(self.applicant_income, "applicant_income")?,
            coapplicant_income: number(self.coapplicant_income, "coapplicant_income")?,
            loan_amount: number(self.loan_amount, "loan_amount")?,
            loan_amount_term: number(self.loan_amount_term, "loan_amount_term")?,
            credit_history: required(self.credit_history, CreditHistory::FIELD)?,
            property_area: required(self.property_area, PropertyArea::FIELD)?,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, EncodingError> {
    value.ok_or(EncodingError::Missing { field })
}

fn number(value: Option<String>, field: &'static str) -> Result<f64, EncodingError> {
    let raw = required(value, field)?;
    let parsed = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| EncodingError::OutOfDomain {
            field,
            value: raw.clone(),
        })?;
    non_negative(field, parsed)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("na") {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

/// Score every row of an applicant CSV. Row-level failures are reported per row;
/// only unreadable CSV aborts the batch.
pub fn score_reader<R: Read>(
    reader: R,
    pipeline: &RiskPipeline,
) -> Result<Vec<BatchOutcome>, BatchError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut outcomes = Vec::new();

    for (index, record) in csv_reader.deserialize::<ApplicantRow>().enumerate() {
        let mut row = record?;
        let loan_id = row.loan_id.take();
        let result = row
            .into_form()
            .map_err(PipelineError::from)
            .and_then(|form| pipeline.assess_form(&form));

        if let Err(err) = &result {
            warn!(row = index + 1, loan_id = ?loan_id, error = %err, "row not scored");
        }

        outcomes.push(BatchOutcome {
            row: index + 1,
            loan_id,
            result,
        });
    }

    let scored = outcomes.iter().filter(|outcome| outcome.is_scored()).count();
    info!(rows = outcomes.len(), scored, "batch scoring finished");
    Ok(outcomes)
}

pub fn score_path<P: AsRef<Path>>(
    path: P,
    pipeline: &RiskPipeline,
) -> Result<Vec<BatchOutcome>, BatchError> {
    let file = std::fs::File::open(path)?;
    score_reader(file, pipeline)
}

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    row: usize,
    loan_id: &'a str,
    risk: &'a str,
    class_label: Option<u8>,
    high_risk_probability: Option<f64>,
    error: &'a str,
}

/// Write one CSV line per outcome, keeping failed rows with their error message.
pub fn write_results<W: Write>(outcomes: &[BatchOutcome], writer: W) -> Result<(), BatchError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for outcome in outcomes {
        let loan_id = outcome.loan_id.as_deref().unwrap_or("");
        let message;
        let row = match &outcome.result {
            Ok((_, assessment)) => ResultRow {
                row: outcome.row,
                loan_id,
                risk: assessment.class.label(),
                class_label: Some(assessment.class_label),
                high_risk_probability: assessment.probabilities.map(|p| p.high_risk),
                error: "",
            },
            Err(err) => {
                message = err.to_string();
                ResultRow {
                    row: outcome.row,
                    loan_id,
                    risk: "",
                    class_label: None,
                    high_risk_probability: None,
                    error: &message,
                }
            }
        };
        csv_writer.serialize(row)?;
    }

    csv_writer.flush()?;
    Ok(())
}
