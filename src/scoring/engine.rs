// Score aggregation. Turns a batch of per-analyzer results into one
// verdict: weighted average over the plugins that actually reported,
// cross-signal adjustments, clamp, round, classify, then presentation.

use chrono::{SecondsFormat, Utc};
use tracing::debug;

use crate::model::{meta, plugin, AnalysisResult, Severity};

use super::policy::ScoringPolicy;
use super::verdict::{AggregateResult, Analysis, Recommendation, WarningEntry};

pub struct ScoringEngine {
    policy: ScoringPolicy,
}

impl ScoringEngine {
    pub fn new() -> Self {
        ScoringEngine::with_policy(ScoringPolicy::default())
    }

    pub fn with_policy(policy: ScoringPolicy) -> Self {
        ScoringEngine { policy }
    }

    /// Aggregate analyzer results into the final verdict. Never fails:
    /// an empty batch produces the safe verdict, and malformed metadata
    /// reads as absent through the accessor defaults.
    pub fn calculate_total_score(&self, results: &[AnalysisResult]) -> AggregateResult {
        if results.is_empty() {
            return self.safe_verdict();
        }

        // Step 1: weighted average, normalized by the weights actually
        // present so a missing analyzer does not drag the score down.
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        for result in results {
            let weight = self.policy.weights.weight_for(&result.plugin_id);
            weighted_sum += result.score * weight;
            total_weight += weight;
        }
        let base = if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        };

        // Step 2: cross-signal adjustments on the unclamped score.
        let adjusted = self.apply_adjustments(base, results);

        // Step 3: clamp, then round to the published precision; severity is
        // classified from the rounded score so the JSON a consumer sees and
        // the tier it carries can never disagree.
        let total_score = round2(adjusted.clamp(0.0, 100.0));
        let severity = self.policy.thresholds.classify(total_score);

        debug!(
            base = format!("{base:.2}"),
            total_score,
            severity = %severity,
            "aggregated verdict"
        );

        let presentation = &self.policy.presentation;
        AggregateResult {
            status: "success".to_string(),
            analysis: Analysis {
                url: results
                    .first()
                    .and_then(|r| r.meta_str(meta::URL))
                    .unwrap_or("unknown")
                    .to_string(),
                total_score,
                severity,
                results: results.to_vec(),
                recommendation: Recommendation {
                    action: presentation.action_for(severity),
                    message: self.summary_message(severity, results),
                },
                visual_effect: presentation.effect_for(severity),
                warnings: self.build_warnings(results),
                timestamp: now_iso(),
            },
        }
    }

    fn apply_adjustments(&self, base: f64, results: &[AnalysisResult]) -> f64 {
        let adj = &self.policy.adjustments;
        let mut score = base;

        // Several independent high-severity findings compound.
        let high_count = results
            .iter()
            .filter(|r| r.severity == Severity::High)
            .count();
        if high_count >= adj.min_high_results {
            score += adj.compounding_bonus;
        }

        // Trusted-domain discount, once per result that marks it.
        let trusted_marks = results
            .iter()
            .filter(|r| r.meta_bool(meta::TRUSTED_DOMAIN))
            .count();
        score -= adj.trusted_discount * trusted_marks as f64;

        // A brand-new domain plus credential keywords in the URL is worth
        // more than either signal alone. Applied once per batch.
        let young_domain = results.iter().any(|r| {
            r.plugin_id == plugin::WHOIS_CHECKER
                && r.meta_i64(meta::DOMAIN_AGE)
                    .is_some_and(|age| age < adj.correlation_max_age_days)
        });
        let keywords_seen = results.iter().any(|r| {
            r.plugin_id == plugin::URL_PATTERN
                && r.meta_list(meta::PHISHING_KEYWORDS)
                    .is_some_and(|k| !k.is_empty())
        });
        if young_domain && keywords_seen {
            score += adj.correlation_bonus;
        }

        score
    }

    /// One warning per reason, highest severity first. The sort is stable,
    /// so reasons keep their analyzer's input order within a tier.
    fn build_warnings(&self, results: &[AnalysisResult]) -> Vec<WarningEntry> {
        let mut ordered: Vec<&AnalysisResult> = results.iter().collect();
        ordered.sort_by_key(|r| std::cmp::Reverse(r.severity));

        let presentation = &self.policy.presentation;
        let mut warnings = Vec::new();
        for result in ordered {
            for reason in &result.reasons {
                warnings.push(WarningEntry {
                    icon: presentation.icon_for(&result.plugin_id, result.severity),
                    title: presentation.display_name_for(&result.plugin_id),
                    description: reason.clone(),
                    source: result.plugin_id.clone(),
                    severity: result.severity,
                });
            }
        }
        warnings
    }

    fn summary_message(&self, severity: Severity, results: &[AnalysisResult]) -> String {
        let presentation = &self.policy.presentation;
        let adj = &self.policy.adjustments;
        let mut message = presentation.summary_for(severity);

        let very_new = results.iter().any(|r| {
            r.plugin_id == plugin::WHOIS_CHECKER
                && r.meta_i64(meta::DOMAIN_AGE)
                    .is_some_and(|age| age < adj.very_new_age_days)
        });
        if very_new {
            message.push(' ');
            message.push_str(&presentation.very_new_domain_note);
        }

        let credential_form = results.iter().any(|r| {
            r.plugin_id == plugin::DOM_ANALYZER && r.meta_bool(meta::CREDENTIAL_FORM_DETECTED)
        });
        if credential_form {
            message.push(' ');
            message.push_str(&presentation.credential_caution_note);
        }

        message
    }

    /// Verdict for an empty batch: nothing analyzed, nothing to warn about.
    fn safe_verdict(&self) -> AggregateResult {
        let presentation = &self.policy.presentation;
        AggregateResult {
            status: "success".to_string(),
            analysis: Analysis {
                url: "unknown".to_string(),
                total_score: 0.0,
                severity: Severity::Info,
                results: Vec::new(),
                recommendation: Recommendation {
                    action: presentation.action_for(Severity::Info),
                    message: presentation.summary_for(Severity::Info),
                },
                visual_effect: presentation.effect_for(Severity::Info),
                warnings: Vec::new(),
                timestamp: now_iso(),
            },
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        ScoringEngine::new()
    }
}

/// Round to the 2-decimal precision the verdict publishes.
fn round2(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
