use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Total points the four components add up to.
pub const MAX_SCORE: f64 = 100.0;

const SUM_TOLERANCE: f64 = 1e-6;

/// Points each match component is worth. The defaults put half the total on skills.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub skills: f64,
    pub role: f64,
    pub location: f64,
    pub remote: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            skills: 50.0,
            role: 20.0,
            location: 15.0,
            remote: 15.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("match weight '{name}' must be a finite, non-negative number (got {value})")]
    InvalidComponent { name: &'static str, value: f64 },

    #[error("match weights must sum to 100 (got {sum})")]
    BadSum { sum: f64 },

    #[error("match weight '{key}' is not a number: '{raw}'")]
    Unparseable { key: &'static str, raw: String },
}

impl MatchWeights {
    pub fn sum(&self) -> f64 {
        self.skills + self.role + self.location + self.remote
    }

    /// Each component must be finite and non-negative and the four must add up to
    /// exactly `MAX_SCORE`, which keeps every computed score inside 0..=100.
    pub fn validate(&self) -> Result<(), WeightsError> {
        for (name, value) in [
            ("skills", self.skills),
            ("role", self.role),
            ("location", self.location),
            ("remote", self.remote),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError::InvalidComponent { name, value });
            }
        }

        let sum = self.sum();
        if (sum - MAX_SCORE).abs() > SUM_TOLERANCE {
            return Err(WeightsError::BadSum { sum });
        }
        Ok(())
    }

    /// Builds weights from `MATCH_WEIGHT_*` keys, falling back to the default for
    /// each key the lookup does not provide. The result is validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, WeightsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |key: &'static str, fallback: f64| -> Result<f64, WeightsError> {
            match lookup(key) {
                Some(raw) => raw.trim().parse::<f64>().map_err(|_| WeightsError::Unparseable {
                    key,
                    raw: raw.clone(),
                }),
                None => Ok(fallback),
            }
        };

        let weights = Self {
            skills: read("MATCH_WEIGHT_SKILLS", defaults.skills)?,
            role: read("MATCH_WEIGHT_ROLE", defaults.role)?,
            location: read("MATCH_WEIGHT_LOCATION", defaults.location)?,
            remote: read("MATCH_WEIGHT_REMOTE", defaults.remote)?,
        };
        weights.validate()?;
        Ok(weights)
    }
}
