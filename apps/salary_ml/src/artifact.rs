use std::{fs, path::Path};

use serde::Deserialize;

use crate::{ModelError, Regressor, FEATURE_COUNT, FEATURE_NAMES};

/// Why an artifact could not be turned into a model.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("model file not found at {0}")]
    NotFound(String),
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse model file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("feature order mismatch: expected {expected:?}, artifact has {found:?}")]
    FeatureOrder {
        expected: [&'static str; FEATURE_COUNT],
        found: Vec<String>,
    },
    #[error("expected 3 coefficients, artifact has {0}")]
    CoefficientCount(usize),
    #[error("artifact contains non-finite parameters")]
    NonFinite,
}

#[derive(Debug, Deserialize)]
struct LinearArtifact {
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    coefficients: Vec<f64>,
    intercept: f64,
}

/// Ordinary linear regression: `intercept + Σ coefficients[i] * x[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: [f64; FEATURE_COUNT], intercept: f64) -> Result<Self, LoadError> {
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(LoadError::NonFinite);
        }
        Ok(Self {
            coefficients,
            intercept,
        })
    }

    /// Read a JSON artifact from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoadError::NotFound(path.display().to_string()));
        }
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, LoadError> {
        let artifact: LinearArtifact = serde_json::from_str(raw)?;

        if let Some(names) = artifact.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES) {
                return Err(LoadError::FeatureOrder {
                    expected: FEATURE_NAMES,
                    found: names,
                });
            }
        }

        let coefficients: [f64; FEATURE_COUNT] = artifact
            .coefficients
            .as_slice()
            .try_into()
            .map_err(|_| LoadError::CoefficientCount(artifact.coefficients.len()))?;

        Self::new(coefficients, artifact.intercept)
    }
}

impl Regressor for LinearModel {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError> {
        let out = self
            .coefficients
            .iter()
            .zip(features)
            .fold(self.intercept, |acc, (c, x)| acc + c * x);
        if !out.is_finite() {
            return Err(ModelError::NonFiniteOutput(out));
        }
        Ok(out)
    }
}
