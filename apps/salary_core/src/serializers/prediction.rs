use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;
use crate::models::prediction;

pub const SCORE_MAX: f64 = 100.0;
pub const YEARS_MAX: f64 = 50.0;

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionReq {
    #[serde(deserialize_with = "lax_f64")]
    pub test_score: f64,
    #[serde(deserialize_with = "lax_f64")]
    pub interview_score: f64,
    #[serde(deserialize_with = "lax_f64")]
    pub years_experience: f64,
}

/// Accept a JSON number or a string holding one (`85` or `"85"`).
fn lax_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(f64),
        Str(String),
    }

    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid number: {s:?}"))),
    }
}

impl PredictionReq {
    pub fn validate(&self) -> Result<(), AppError> {
        check_range("test_score", self.test_score, SCORE_MAX)?;
        check_range("interview_score", self.interview_score, SCORE_MAX)?;
        check_range("years_experience", self.years_experience, YEARS_MAX)
    }
}

fn check_range(field: &str, value: f64, max: f64) -> Result<(), AppError> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{field} must be between 0 and {max}"
        )))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PredictionOut {
    pub id: i64,
    pub test_score: f64,
    pub interview_score: f64,
    pub years_experience: f64,
    pub predicted_salary: f64,
    pub created_at: String,
}

impl From<prediction::Model> for PredictionOut {
    fn from(m: prediction::Model) -> Self {
        Self {
            id: m.id,
            test_score: m.test_score,
            interview_score: m.interview_score,
            years_experience: m.years_experience,
            predicted_salary: m.predicted_salary,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}
