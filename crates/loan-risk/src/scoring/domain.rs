use serde::{Deserialize, Serialize};

use super::encoder::EncodingError;

/// Closed enumeration collected from a single form selection.
///
/// Every variant owns exactly one numeric code; `from_code` is the inverse used when
/// rendering encoded inputs back into report rows.
pub trait Categorical: Sized + Copy + PartialEq + 'static {
    /// Field name as it appears in error messages and reports.
    const FIELD: &'static str;
    /// Every selectable value, in form order.
    const ALL: &'static [Self];

    fn code(self) -> u8;
    fn label(self) -> &'static str;

    /// Alternate spellings accepted from forms and dataset exports.
    fn aliases(self) -> &'static [&'static str] {
        &[]
    }

    fn from_code(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|value| value.code() == code)
    }

    /// Exact match against the label or one of the aliases.
    fn parse(raw: &str) -> Result<Self, EncodingError> {
        Self::ALL
            .iter()
            .copied()
            .find(|value| {
                value.label() == raw || value.aliases().iter().any(|alias| *alias == raw)
            })
            .ok_or_else(|| EncodingError::OutOfDomain {
                field: Self::FIELD,
                value: raw.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Categorical for Gender {
    const FIELD: &'static str = "gender";
    const ALL: &'static [Self] = &[Self::Male, Self::Female];

    fn code(self) -> u8 {
        match self {
            Self::Male => 1,
            Self::Female => 0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Married {
    Yes,
    No,
}

impl Categorical for Married {
    const FIELD: &'static str = "married";
    const ALL: &'static [Self] = &[Self::Yes, Self::No];

    fn code(self) -> u8 {
        match self {
            Self::Yes => 1,
            Self::No => 0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dependents {
    Zero,
    One,
    Two,
    ThreeOrMore,
}

impl Categorical for Dependents {
    const FIELD: &'static str = "dependents";
    const ALL: &'static [Self] = &[Self::Zero, Self::One, Self::Two, Self::ThreeOrMore];

    fn code(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::ThreeOrMore => 3,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::Two => "2",
            Self::ThreeOrMore => "3+",
        }
    }
}

/// Graduate encodes to 0. Some historical form variants used the opposite polarity;
/// the shipped model was fit on this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Education {
    Graduate,
    NotGraduate,
}

impl Categorical for Education {
    const FIELD: &'static str = "education";
    const ALL: &'static [Self] = &[Self::Graduate, Self::NotGraduate];

    fn code(self) -> u8 {
        match self {
            Self::Graduate => 0,
            Self::NotGraduate => 1,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Graduate => "Graduate",
            Self::NotGraduate => "Not Graduate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfEmployed {
    Yes,
    No,
}

impl Categorical for SelfEmployed {
    const FIELD: &'static str = "self_employed";
    const ALL: &'static [Self] = &[Self::Yes, Self::No];

    fn code(self) -> u8 {
        match self {
            Self::Yes => 1,
            Self::No => 0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditHistory {
    Good,
    Bad,
}

impl Categorical for CreditHistory {
    const FIELD: &'static str = "credit_history";
    const ALL: &'static [Self] = &[Self::Good, Self::Bad];

    fn code(self) -> u8 {
        match self {
            Self::Good => 1,
            Self::Bad => 0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Bad => "Bad",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Good => &["Good (1)", "1", "1.0"],
            Self::Bad => &["Bad (0)", "0", "0.0"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyArea {
    Urban,
    Semiurban,
    Rural,
}

impl Categorical for PropertyArea {
    const FIELD: &'static str = "property_area";
    const ALL: &'static [Self] = &[Self::Urban, Self::Semiurban, Self::Rural];

    fn code(self) -> u8 {
        match self {
            Self::Urban => 2,
            Self::Semiurban => 1,
            Self::Rural => 0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Urban => "Urban",
            Self::Semiurban => "Semiurban",
            Self::Rural => "Rural",
        }
    }
}

/// Raw selections exactly as a form or API client submits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantForm {
    pub gender: String,
    pub married: String,
    pub dependents: String,
    pub education: String,
    pub self_employed: String,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    pub loan_amount: f64,
    pub loan_amount_term: f64,
    pub credit_history: String,
    pub property_area: String,
}

/// Validated description of one loan applicant, built fresh for every submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApplicantProfile {
    pub gender: Gender,
    pub married: Married,
    pub dependents: Dependents,
    pub education: Education,
    pub self_employed: SelfEmployed,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    /// Requested amount, in thousands.
    pub loan_amount: f64,
    /// Term in months.
    pub loan_amount_term: u32,
    pub credit_history: CreditHistory,
    pub property_area: PropertyArea,
}

impl TryFrom<&ApplicantForm> for ApplicantProfile {
    type Error = EncodingError;

    fn try_from(form: &ApplicantForm) -> Result<Self, Self::Error> {
        Ok(Self {
            gender: Gender::parse(&form.gender)?,
            married: Married::parse(&form.married)?,
            dependents: Dependents::parse(&form.dependents)?,
            education: Education::parse(&form.education)?,
            self_employed: SelfEmployed::parse(&form.self_employed)?,
            applicant_income: non_negative("applicant_income", form.applicant_income)?,
            coapplicant_income: non_negative("coapplicant_income", form.coapplicant_income)?,
            loan_amount: non_negative("loan_amount", form.loan_amount)?,
            loan_amount_term: whole_months(form.loan_amount_term)?,
            credit_history: CreditHistory::parse(&form.credit_history)?,
            property_area: PropertyArea::parse(&form.property_area)?,
        })
    }
}

impl From<&ApplicantProfile> for ApplicantForm {
    fn from(profile: &ApplicantProfile) -> Self {
        Self {
            gender: profile.gender.label().to_string(),
            married: profile.married.label().to_string(),
            dependents: profile.dependents.label().to_string(),
            education: profile.education.label().to_string(),
            self_employed: profile.self_employed.label().to_string(),
            applicant_income: profile.applicant_income,
            coapplicant_income: profile.coapplicant_income,
            loan_amount: profile.loan_amount,
            loan_amount_term: f64::from(profile.loan_amount_term),
            credit_history: profile.credit_history.label().to_string(),
            property_area: profile.property_area.label().to_string(),
        }
    }
}

pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<f64, EncodingError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(EncodingError::InvalidNumber { field, value })
    }
}

fn whole_months(value: f64) -> Result<u32, EncodingError> {
    let value = non_negative("loan_amount_term", value)?;
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(EncodingError::InvalidNumber {
            field: "loan_amount_term",
            value,
        });
    }
    Ok(value as u32)
}
