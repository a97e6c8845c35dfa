// Presentation policy: recommended actions, warning icons, display names,
// and summary templates keyed by severity or plugin.

use std::collections::HashMap;

use crate::model::{plugin, Severity};

use super::verdict::Action;

/// Display tables the verdict assembly reads. Every lookup has a fallback,
/// so an analyzer this table has never heard of still renders.
#[derive(Debug, Clone)]
pub struct Presentation {
    /// Severity to recommended action; missing entries read as allow.
    pub actions: HashMap<Severity, Action>,
    /// Severity to UI effect tag; missing entries read as "none".
    pub visual_effects: HashMap<Severity, String>,
    /// (plugin id, severity) to warning icon.
    pub icons: HashMap<(String, Severity), String>,
    pub fallback_icon: String,
    /// Plugin id to human display name; missing entries keep the raw id.
    pub display_names: HashMap<String, String>,
    /// Severity to summary sentence.
    pub summaries: HashMap<Severity, String>,
    pub fallback_summary: String,
    /// Appended when registration data reports a very new domain.
    pub very_new_domain_note: String,
    /// Appended when page inspection flags a credential form.
    pub credential_caution_note: String,
}

impl Presentation {
    pub fn action_for(&self, severity: Severity) -> Action {
        self.actions.get(&severity).copied().unwrap_or(Action::Allow)
    }

    pub fn effect_for(&self, severity: Severity) -> String {
        self.visual_effects
            .get(&severity)
            .cloned()
            .unwrap_or_else(|| "none".to_string())
    }

    pub fn icon_for(&self, plugin_id: &str, severity: Severity) -> String {
        self.icons
            .get(&(plugin_id.to_string(), severity))
            .cloned()
            .unwrap_or_else(|| self.fallback_icon.clone())
    }

    pub fn display_name_for(&self, plugin_id: &str) -> String {
        self.display_names
            .get(plugin_id)
            .cloned()
            .unwrap_or_else(|| plugin_id.to_string())
    }

    pub fn summary_for(&self, severity: Severity) -> String {
        self.summaries
            .get(&severity)
            .cloned()
            .unwrap_or_else(|| self.fallback_summary.clone())
    }
}

impl Default for Presentation {
    fn default() -> Self {
        let actions = HashMap::from([
            (Severity::Critical, Action::Block),
            (Severity::High, Action::WarnStrong),
            (Severity::Medium, Action::Warn),
            (Severity::Low, Action::Notify),
            (Severity::Info, Action::Allow),
        ]);

        let visual_effects = HashMap::from([
            (Severity::Critical, "aurora-red".to_string()),
            (Severity::High, "aurora-gold".to_string()),
            (Severity::Medium, "aurora-yellow".to_string()),
            (Severity::Low, "aurora-blue".to_string()),
            (Severity::Info, "none".to_string()),
        ]);

        let mut icons = HashMap::new();
        for (sev, icon) in [
            (Severity::High, "🚨"),
            (Severity::Medium, "⚠️"),
            (Severity::Low, "ℹ️"),
            (Severity::Info, "✓"),
        ] {
            icons.insert((plugin::WHOIS_CHECKER.to_string(), sev), icon.to_string());
        }
        for (sev, icon) in [
            (Severity::High, "🔴"),
            (Severity::Medium, "🟡"),
            (Severity::Low, "🔵"),
            (Severity::Info, "✓"),
        ] {
            icons.insert((plugin::URL_PATTERN.to_string(), sev), icon.to_string());
        }
        for (sev, icon) in [
            (Severity::High, "🔑"),
            (Severity::Medium, "🔍"),
            (Severity::Low, "ℹ️"),
            (Severity::Info, "✓"),
        ] {
            icons.insert((plugin::DOM_ANALYZER.to_string(), sev), icon.to_string());
        }

        let display_names = HashMap::from([
            (plugin::URL_PATTERN.to_string(), "URL Structure".to_string()),
            (
                plugin::WHOIS_CHECKER.to_string(),
                "Domain Registration".to_string(),
            ),
            (plugin::DOM_ANALYZER.to_string(), "Page Content".to_string()),
        ]);

        let summaries = HashMap::from([
            (
                Severity::Critical,
                "This site is extremely dangerous. We strongly recommend leaving immediately."
                    .to_string(),
            ),
            (
                Severity::High,
                "This site shows strong signs of phishing or malware. Proceed with extreme caution."
                    .to_string(),
            ),
            (
                Severity::Medium,
                "This site contains suspicious elements. Avoid entering personal information."
                    .to_string(),
            ),
            (
                Severity::Low,
                "This site has minor concerns. Use it carefully.".to_string(),
            ),
            (
                Severity::Info,
                "This site appears to be relatively safe.".to_string(),
            ),
        ]);

        Presentation {
            actions,
            visual_effects,
            icons,
            fallback_icon: "⚠️".to_string(),
            display_names,
            summaries,
            fallback_summary: "The safety of this site could not be determined.".to_string(),
            very_new_domain_note: "The domain is extremely new, so extra caution is advised."
                .to_string(),
            credential_caution_note: "Do not enter passwords or payment card details on this site."
                .to_string(),
        }
    }
}
