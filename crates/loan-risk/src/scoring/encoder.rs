use serde::Serialize;

use super::domain::{ApplicantForm, ApplicantProfile, Categorical};

/// Number of features the classifier was fit on.
pub const FEATURE_COUNT: usize = 11;

/// Column order of the training matrix. Reordering silently corrupts predictions.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "gender",
    "married",
    "dependents",
    "education",
    "self_employed",
    "applicant_income",
    "coapplicant_income",
    "loan_amount",
    "loan_amount_term",
    "credit_history",
    "property_area",
];

/// Raised when a submission cannot be mapped onto the feature schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodingError {
    #[error("{field} value '{value}' is outside the accepted options")]
    OutOfDomain { field: &'static str, value: String },
    #[error("{field} must be a non-negative number (found {value})")]
    InvalidNumber { field: &'static str, value: f64 },
    #[error("{field} is missing")]
    Missing { field: &'static str },
}

impl EncodingError {
    pub fn field(&self) -> &'static str {
        match self {
            EncodingError::OutOfDomain { field, .. }
            | EncodingError::InvalidNumber { field, .. }
            | EncodingError::Missing { field } => field,
        }
    }
}

/// Ordered numeric row in the exact layout of [`FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|index| self.0[index])
    }

    /// Pairs each value with its column name, in model order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

pub fn encode(profile: &ApplicantProfile) -> FeatureVector {
    FeatureVector([
        code(profile.gender),
        code(profile.married),
        code(profile.dependents),
        code(profile.education),
        code(profile.self_employed),
        profile.applicant_income,
        profile.coapplicant_income,
        profile.loan_amount,
        f64::from(profile.loan_amount_term),
        code(profile.credit_history),
        code(profile.property_area),
    ])
}

pub fn encode_form(form: &ApplicantForm) -> Result<FeatureVector, EncodingError> {
    let profile = ApplicantProfile::try_from(form)?;
    Ok(encode(&profile))
}

fn code<C: Categorical>(value: C) -> f64 {
    f64::from(value.code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::PropertyArea;

    #[test]
    fn feature_names_match_feature_count() {
        let mut names = FEATURE_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FEATURE_COUNT);
    }

    #[test]
    fn get_looks_up_columns_by_name() {
        let vector = FeatureVector::from([0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        assert_eq!(vector.get("property_area"), Some(10.0));
        assert_eq!(vector.get("gender"), Some(0.0));
        assert_eq!(vector.get("age"), None);
        assert_eq!(vector.named().nth(5), Some(("applicant_income", 5.0)));
    }

    #[test]
    fn property_area_code_feeds_last_column() {
        let code = code(PropertyArea::Semiurban);
        assert_eq!(code, 1.0);
    }
}
