mod charts;
mod document;
mod summary;

pub use charts::{ChartPoint, ChartSeries};
pub use document::{ReportDocument, ReportRow};
pub use summary::RiskSummary;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::scoring::{ApplicantProfile, RiskAssessment};

/// Output flavour of the downloadable report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationStyle {
    #[default]
    Plain,
    Markdown,
}

impl PresentationStyle {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" | "txt" => Some(Self::Plain),
            "markdown" | "md" => Some(Self::Markdown),
            _ => None,
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Plain => "txt",
            Self::Markdown => "md",
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Plain => "text/plain; charset=utf-8",
            Self::Markdown => "text/markdown; charset=utf-8",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub style: PresentationStyle,
    pub title: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            style: PresentationStyle::default(),
            title: "Loan Default Risk Report".to_string(),
        }
    }
}

/// Everything rendered back to the officer after one submission.
#[derive(Debug, Clone, Serialize)]
pub struct Presentation {
    pub summary: RiskSummary,
    pub charts: ChartSeries,
    #[serde(skip)]
    pub document: ReportDocument,
}

pub fn present(
    profile: &ApplicantProfile,
    assessment: &RiskAssessment,
    settings: &ReportSettings,
    generated_at: DateTime<Utc>,
) -> Presentation {
    let summary = RiskSummary::from_assessment(assessment);
    Presentation {
        charts: ChartSeries::build(profile, assessment),
        document: ReportDocument::build(&assessment.features, &summary, settings, generated_at),
        summary,
    }
}
