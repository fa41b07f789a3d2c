use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::summary::RiskSummary;
use super::{PresentationStyle, ReportSettings};
use crate::scoring::{
    Categorical, CreditHistory, Dependents, Education, FeatureVector, Gender, Married,
    PropertyArea, SelfEmployed,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub field: &'static str,
    pub value: String,
}

/// Downloadable record of one assessment: decoded inputs plus the risk outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub style: PresentationStyle,
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<ReportRow>,
    pub outcome: String,
}

impl ReportDocument {
    /// Rows are decoded from the encoded vector, so the report shows exactly what the
    /// classifier saw.
    pub fn build(
        features: &FeatureVector,
        summary: &RiskSummary,
        settings: &ReportSettings,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let value = |name: &str| features.get(name).unwrap_or(f64::NAN);

        let rows = vec![
            row("Gender", decode::<Gender>(value("gender"))),
            row("Married", decode::<Married>(value("married"))),
            row("Dependents", decode::<Dependents>(value("dependents"))),
            row("Education", decode::<Education>(value("education"))),
            row("Self Employed", decode::<SelfEmployed>(value("self_employed"))),
            row("Applicant Income", amount(value("applicant_income"))),
            row("Coapplicant Income", amount(value("coapplicant_income"))),
            row("Loan Amount (thousands)", amount(value("loan_amount"))),
            row("Loan Amount Term (months)", amount(value("loan_amount_term"))),
            row(
                "Credit History",
                decode::<CreditHistory>(value("credit_history")),
            ),
            row(
                "Property Area",
                decode::<PropertyArea>(value("property_area")),
            ),
        ];

        Self {
            title: settings.title.clone(),
            style: settings.style,
            generated_at,
            rows,
            outcome: summary.line(),
        }
    }

    pub fn file_name(&self) -> String {
        format!(
            "loan-risk-report-{}.{}",
            self.generated_at.format("%Y%m%dT%H%M%SZ"),
            self.style.extension()
        )
    }

    pub fn render(&self) -> String {
        match self.style {
            PresentationStyle::Plain => self.render_plain(),
            PresentationStyle::Markdown => self.render_markdown(),
        }
    }

    fn render_plain(&self) -> String {
        let width = self
            .rows
            .iter()
            .map(|row| row.field.len())
            .max()
            .unwrap_or(0);
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "{}", "=".repeat(self.title.len()));
        let _ = writeln!(out, "Generated: {}", self.generated_stamp());
        let _ = writeln!(out);
        for row in &self.rows {
            let _ = writeln!(out, "{:<width$}  {}", row.field, row.value, width = width);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Prediction: {}", self.outcome);
        out
    }

    fn render_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {}", self.title);
        let _ = writeln!(out);
        let _ = writeln!(out, "_Generated {}_", self.generated_stamp());
        let _ = writeln!(out);
        let _ = writeln!(out, "| Field | Value |");
        let _ = writeln!(out, "|---|---|");
        for row in &self.rows {
            let _ = writeln!(out, "| {} | {} |", row.field, row.value);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "**Prediction:** {}", self.outcome);
        out
    }

    fn generated_stamp(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }
}

fn row(field: &'static str, value: String) -> ReportRow {
    ReportRow { field, value }
}

fn decode<C: Categorical>(code: f64) -> String {
    let decoded = (code.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&code))
        .then(|| C::from_code(code as u8))
        .flatten();
    match decoded {
        Some(value) => value.label().to_string(),
        None => format!("unrecognised code {code}"),
    }
}

fn amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{ClassProbabilities, RiskAssessment, RiskClass};
    use chrono::TimeZone;

    fn features() -> FeatureVector {
        FeatureVector::from([0.0, 0.0, 3.0, 1.0, 1.0, 2500.5, 0.0, 90.0, 180.0, 0.0, 0.0])
    }

    fn summary() -> RiskSummary {
        RiskSummary::from_assessment(&RiskAssessment {
            features: features(),
            class: RiskClass::HighRisk,
            class_label: 1,
            probabilities: Some(ClassProbabilities::from_high_risk(0.8)),
        })
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn rows_decode_codes_back_to_labels() {
        let document =
            ReportDocument::build(&features(), &summary(), &ReportSettings::default(), stamp());

        let value = |field: &str| {
            document
                .rows
                .iter()
                .find(|row| row.field == field)
                .map(|row| row.value.clone())
                .expect("row present")
        };
        assert_eq!(value("Gender"), "Female");
        assert_eq!(value("Dependents"), "3+");
        assert_eq!(value("Education"), "Not Graduate");
        assert_eq!(value("Credit History"), "Bad");
        assert_eq!(value("Property Area"), "Rural");
        assert_eq!(value("Applicant Income"), "2500.50");
        assert_eq!(value("Loan Amount Term (months)"), "180");
    }

    #[test]
    fn plain_render_lists_inputs_and_outcome() {
        let document =
            ReportDocument::build(&features(), &summary(), &ReportSettings::default(), stamp());

        let text = document.render();

        assert!(text.starts_with("Loan Default Risk Report\n========================\n"));
        assert!(text.contains("Generated: 2026-03-14 09:30:00 UTC"));
        assert!(text.contains(
            "Prediction: High Risk: Loan Likely to Default. (default probability 80.0%)"
        ));
        assert_eq!(document.file_name(), "loan-risk-report-20260314T093000Z.txt");
    }

    #[test]
    fn markdown_render_uses_table_layout() {
        let settings = ReportSettings {
            style: PresentationStyle::Markdown,
            title: "Branch 12 Risk Review".to_string(),
        };
        let document = ReportDocument::build(&features(), &summary(), &settings, stamp());

        let text = document.render();

        assert!(text.starts_with("# Branch 12 Risk Review\n"));
        assert!(text.contains("| Property Area | Rural |"));
        assert!(text.contains("**Prediction:** High Risk"));
        assert!(document.file_name().ends_with(".md"));
    }

    #[test]
    fn unknown_codes_are_flagged_rather_than_guessed() {
        assert_eq!(decode::<PropertyArea>(7.0), "unrecognised code 7");
        assert_eq!(decode::<PropertyArea>(1.5), "unrecognised code 1.5");
    }
}
