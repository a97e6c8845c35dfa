// Aggregate verdict types: the JSON envelope consumers receive.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{AnalysisResult, Severity};

/// Recommended handling for a scored URL, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Block,
    WarnStrong,
    Warn,
    Notify,
    Allow,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Block => "block",
            Action::WarnStrong => "warn_strong",
            Action::Warn => "warn",
            Action::Notify => "notify",
            Action::Allow => "allow",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: Action,
    pub message: String,
}

/// One displayable warning derived from a single analyzer reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningEntry {
    pub icon: String,
    pub title: String,
    pub description: String,
    /// Plugin id of the analyzer that produced the reason.
    pub source: String,
    pub severity: Severity,
}

/// The scored analysis payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub url: String,
    pub total_score: f64,
    pub severity: Severity,
    pub results: Vec<AnalysisResult>,
    pub recommendation: Recommendation,
    pub visual_effect: String,
    pub warnings: Vec<WarningEntry>,
    /// ISO-8601 assembly time.
    pub timestamp: String,
}

/// Envelope handed to consumers. `status` is always "success"; the engine
/// degrades inputs instead of failing whole verdicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub status: String,
    pub analysis: Analysis,
}
