// Aggregation policy data: weights, thresholds, adjustment constants.
//
// Everything numeric the engine reads lives here as swappable values with
// defaults. The engine contains the mechanics; tuning never touches it.

use std::collections::HashMap;

use crate::model::{plugin, Severity};

use super::presentation::Presentation;

/// Per-plugin importance weights for the weighted average.
#[derive(Debug, Clone)]
pub struct PluginWeights {
    table: HashMap<String, f64>,
    default_weight: f64,
}

impl PluginWeights {
    pub fn new(table: HashMap<String, f64>, default_weight: f64) -> Self {
        PluginWeights {
            table,
            default_weight,
        }
    }

    /// Unrecognized plugin ids fall back to the default weight, so an
    /// unknown analyzer still participates, just faintly.
    pub fn weight_for(&self, plugin_id: &str) -> f64 {
        self.table
            .get(plugin_id)
            .copied()
            .unwrap_or(self.default_weight)
    }
}

impl Default for PluginWeights {
    /// url-pattern 0.30, whois-checker 0.35, dom-analyzer 0.25,
    /// anything else 0.10.
    fn default() -> Self {
        let mut table = HashMap::new();
        table.insert(plugin::URL_PATTERN.to_string(), 0.30);
        table.insert(plugin::WHOIS_CHECKER.to_string(), 0.35);
        table.insert(plugin::DOM_ANALYZER.to_string(), 0.25);
        PluginWeights {
            table,
            default_weight: 0.10,
        }
    }
}

/// Aggregate severity thresholds.
///
/// Entries are kept sorted by descending floor, so classification is a
/// single walk returning the first tier whose floor the score meets.
#[derive(Debug, Clone)]
pub struct SeverityThresholds {
    entries: Vec<(Severity, f64)>,
}

impl SeverityThresholds {
    pub fn new(mut entries: Vec<(Severity, f64)>) -> Self {
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        SeverityThresholds { entries }
    }

    pub fn classify(&self, score: f64) -> Severity {
        self.entries
            .iter()
            .find(|entry| score >= entry.1)
            .map(|entry| entry.0)
            .unwrap_or(Severity::Info)
    }
}

impl Default for SeverityThresholds {
    /// critical 80, high 60, medium 35, low 15, info 0.
    fn default() -> Self {
        SeverityThresholds::new(vec![
            (Severity::Critical, 80.0),
            (Severity::High, 60.0),
            (Severity::Medium, 35.0),
            (Severity::Low, 15.0),
            (Severity::Info, 0.0),
        ])
    }
}

/// Cross-signal adjustments applied after the weighted average, in the
/// order the fields are listed. Each is independent of the others.
#[derive(Debug, Clone)]
pub struct Adjustments {
    /// Added once when at least `min_high_results` results carry severity
    /// high (defaults 15.0 / 2)
    pub compounding_bonus: f64,
    pub min_high_results: usize,
    /// Subtracted for every result whose metadata marks a trusted domain;
    /// stacks deliberately (default 30.0)
    pub trusted_discount: f64,
    /// Added once when a young domain and phishing keywords co-occur
    /// across results (default 20.0)
    pub correlation_bonus: f64,
    /// Domain age in days below which the correlation bonus arms
    /// (default 30)
    pub correlation_max_age_days: i64,
    /// Domain age below which the summary calls the domain very new
    /// (default 7)
    pub very_new_age_days: i64,
}

impl Default for Adjustments {
    fn default() -> Self {
        Adjustments {
            compounding_bonus: 15.0,
            min_high_results: 2,
            trusted_discount: 30.0,
            correlation_bonus: 20.0,
            correlation_max_age_days: 30,
            very_new_age_days: 7,
        }
    }
}

/// Everything the engine reads: numeric policy plus presentation tables.
#[derive(Debug, Clone, Default)]
pub struct ScoringPolicy {
    pub weights: PluginWeights,
    pub thresholds: SeverityThresholds,
    pub adjustments: Adjustments,
    pub presentation: Presentation,
}
