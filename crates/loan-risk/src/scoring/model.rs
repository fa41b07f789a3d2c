use serde::{Deserialize, Serialize};

/// Binary outcome of the classifier. Class `1` is the default / high-risk class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskClass {
    LowRisk,
    HighRisk,
}

impl RiskClass {
    pub const fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(Self::LowRisk),
            1 => Some(Self::HighRisk),
            _ => None,
        }
    }

    pub const fn label_value(self) -> u8 {
        match self {
            Self::LowRisk => 0,
            Self::HighRisk => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LowRisk => "Low Risk",
            Self::HighRisk => "High Risk",
        }
    }
}

/// Probability pair `(p0, p1)` for the low- and high-risk classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub low_risk: f64,
    pub high_risk: f64,
}

impl ClassProbabilities {
    /// Builds the pair from the high-risk probability, clamped into `[0, 1]`.
    pub fn from_high_risk(high_risk: f64) -> Self {
        let high_risk = high_risk.clamp(0.0, 1.0);
        Self {
            low_risk: 1.0 - high_risk,
            high_risk,
        }
    }

    pub fn of(&self, class: RiskClass) -> f64 {
        match class {
            RiskClass::LowRisk => self.low_risk,
            RiskClass::HighRisk => self.high_risk,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    #[error("classifier expects {expected} features but received {found}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("feature {index} is not a finite number")]
    NonFinite { index: usize },
}

/// Contract every pre-trained classifier adapter satisfies.
pub trait RiskClassifier: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<RiskClass, InferenceError>;

    /// `Ok(None)` when the underlying model has no calibrated probability output.
    fn predict_probability(
        &self,
        features: &[f64],
    ) -> Result<Option<ClassProbabilities>, InferenceError>;
}

/// Coefficients and intercept shared by the linear adapters.
#[derive(Debug, Clone, PartialEq)]
struct LinearWeights {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearWeights {
    fn decision(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.coefficients.len() {
            return Err(InferenceError::ShapeMismatch {
                expected: self.coefficients.len(),
                found: features.len(),
            });
        }
        if let Some(index) = features.iter().position(|value| !value.is_finite()) {
            return Err(InferenceError::NonFinite { index });
        }

        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(weight, value)| weight * value)
            .sum();
        Ok(dot + self.intercept)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    weights: LinearWeights,
    threshold: f64,
}

impl LogisticRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64, threshold: f64) -> Self {
        Self {
            weights: LinearWeights {
                coefficients,
                intercept,
            },
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn high_risk_probability(&self, features: &[f64]) -> Result<f64, InferenceError> {
        self.weights.decision(features).map(sigmoid)
    }
}

impl RiskClassifier for LogisticRegression {
    fn predict(&self, features: &[f64]) -> Result<RiskClass, InferenceError> {
        let p1 = self.high_risk_probability(features)?;
        Ok(if p1 >= self.threshold {
            RiskClass::HighRisk
        } else {
            RiskClass::LowRisk
        })
    }

    fn predict_probability(
        &self,
        features: &[f64],
    ) -> Result<Option<ClassProbabilities>, InferenceError> {
        let p1 = self.high_risk_probability(features)?;
        Ok(Some(ClassProbabilities::from_high_risk(p1)))
    }
}

/// Margin classifier: only the sign of the decision function is meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSvm {
    weights: LinearWeights,
}

impl LinearSvm {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            weights: LinearWeights {
                coefficients,
                intercept,
            },
        }
    }
}

impl RiskClassifier for LinearSvm {
    fn predict(&self, features: &[f64]) -> Result<RiskClass, InferenceError> {
        let margin = self.weights.decision(features)?;
        Ok(if margin > 0.0 {
            RiskClass::HighRisk
        } else {
            RiskClass::LowRisk
        })
    }

    fn predict_probability(
        &self,
        features: &[f64],
    ) -> Result<Option<ClassProbabilities>, InferenceError> {
        self.weights.decision(features)?;
        Ok(None)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
