//! Planner configuration.
//!
//! Every tunable of the engine lives here: classification keywords,
//! score weights, streak lookback and the global shift system.
//! Missing JSON fields fall back to the defaults below.
//!
//! # Example
//!
//! ```
//! use u_roster::config::PlannerConfig;
//!
//! let config = PlannerConfig::from_json(r#"{ "shift_system": 2 }"#).unwrap();
//! assert_eq!(config.shift_system, 2);
//! assert_eq!(config.weights.this_week, 100.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::PlannerResult;

/// Score weights for the Fair and Shift-Constrained strategies.
///
/// `score = this_week × assignments_this_week
///        + history × historical_assignments_on_group
///        + streak × consecutive_weeks_on_group`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Weight per assignment already held in the target week.
    pub this_week: f64,
    /// Weight per earlier assignment on the same group.
    pub history: f64,
    /// Weight per consecutive preceding week on the same group.
    pub streak: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            this_week: 100.0,
            history: 10.0,
            streak: 5.0,
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Substrings marking a test as an audit (case-insensitive).
    pub audit_keywords: Vec<String>,
    /// Substrings marking a test as a peel-off / adhesion test (case-insensitive).
    pub adhesion_keywords: Vec<String>,
    /// Plant-wide shift system (1..=3) used when a request does not override it.
    pub shift_system: u8,
    /// Fair scoring weights.
    pub weights: ScoreWeights,
    /// How many preceding weeks the streak walk inspects.
    pub streak_lookback: u32,
    /// Missing test names listed in a Partial coverage status.
    pub max_missing_listed: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            audit_keywords: vec!["audit".into(), "audyt".into()],
            adhesion_keywords: vec!["peel".into(), "adhesion".into(), "przyczep".into()],
            shift_system: 3,
            weights: ScoreWeights::default(),
            streak_lookback: 8,
            max_missing_listed: 3,
        }
    }
}

impl PlannerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON. Absent fields keep their defaults.
    pub fn from_json(json: &str) -> PlannerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the configuration to pretty JSON.
    pub fn to_json(&self) -> PlannerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replaces the audit keyword list.
    pub fn with_audit_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audit_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the adhesion keyword list.
    pub fn with_adhesion_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.adhesion_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the global shift system (clamped to 1..=3).
    pub fn with_shift_system(mut self, shift_system: u8) -> Self {
        self.shift_system = shift_system.clamp(1, 3);
        self
    }

    /// Sets the Fair scoring weights.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the streak lookback in weeks.
    pub fn with_streak_lookback(mut self, weeks: u32) -> Self {
        self.streak_lookback = weeks;
        self
    }
}
