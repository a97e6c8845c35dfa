// Analyzer result contract: the types that flow between analyzers and the
// scoring engine.
//
// Every analyzer produces an `AnalysisResult`; the scoring engine consumes
// a list of them and never mutates one. The core fields are strongly typed;
// analyzer-specific extras live in a narrow metadata map read through
// default-on-missing accessors, so a partial or malformed result degrades
// instead of crashing aggregation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Stable plugin identifiers used as weighting and lookup keys.
pub mod plugin {
    pub const URL_PATTERN: &str = "url-pattern";
    pub const WHOIS_CHECKER: &str = "whois-checker";
    /// Page-content analyzer. Not implemented here; participates in
    /// aggregation through the same result schema.
    pub const DOM_ANALYZER: &str = "dom-analyzer";
}

/// Well-known metadata keys. Keys are camelCase because the metadata map is
/// part of the serialized result schema.
pub mod meta {
    pub const URL: &str = "url";
    pub const DOMAIN: &str = "domain";
    pub const SUSPICIOUS_PATTERNS: &str = "suspiciousPatterns";
    pub const PHISHING_KEYWORDS: &str = "phishingKeywords";
    pub const TRUSTED_DOMAIN: &str = "trustedDomain";
    pub const DOMAIN_AGE: &str = "domainAge";
    pub const CREATION_DATE: &str = "creationDate";
    pub const REGISTRAR: &str = "registrar";
    pub const WHOIS_PROTECTED: &str = "whoisProtected";
    pub const NAME_SERVERS: &str = "nameServers";
    pub const EXPIRATION_DATE: &str = "expirationDate";
    pub const DAYS_UNTIL_EXPIRY: &str = "daysUntilExpiry";
    pub const CREDENTIAL_FORM_DETECTED: &str = "credentialFormDetected";
    pub const DEGRADED: &str = "degraded";
    pub const ERROR: &str = "error";
}

/// Severity tier. One total ordering covers both layers:
/// `Info < Low < Medium < High < Critical`.
///
/// Individual analyzers never emit `Critical`; that tier is reachable only
/// from the aggregate verdict's threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A metadata value. Closed set of shapes instead of arbitrary JSON; the
/// untagged serialization keeps the wire form a plain key/value object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        MetaValue::Bool(v)
    }
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        MetaValue::Int(v)
    }
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self {
        MetaValue::Float(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::Text(v.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        MetaValue::Text(v)
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(v: Vec<String>) -> Self {
        MetaValue::List(v)
    }
}

/// Analyzer-specific extension map. BTreeMap keeps serialized output
/// deterministic.
pub type Metadata = BTreeMap<String, MetaValue>;

/// The standardized product of one analyzer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub plugin_id: String,
    /// Always in [0, 100].
    pub score: f64,
    pub severity: Severity,
    /// Human-readable findings. Never empty; a neutral message stands in
    /// when nothing fired.
    pub reasons: Vec<String>,
    pub metadata: Metadata,
}

impl AnalysisResult {
    /// Neutral fallback for an analyzer whose internals failed. The failure
    /// is visible in the metadata (`degraded` + `error`) rather than hidden
    /// behind an ordinary zero score.
    pub fn degraded(plugin_id: &str, reason: String, error: String) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert(meta::DEGRADED.to_string(), MetaValue::Bool(true));
        metadata.insert(meta::ERROR.to_string(), MetaValue::Text(error));
        AnalysisResult {
            plugin_id: plugin_id.to_string(),
            score: 0.0,
            severity: Severity::Info,
            reasons: vec![reason],
            metadata,
        }
    }

    /// True when this result is the neutral fallback for a failed run.
    pub fn is_degraded(&self) -> bool {
        self.meta_bool(meta::DEGRADED)
    }

    /// Boolean metadata lookup; missing or non-boolean reads as false.
    pub fn meta_bool(&self, key: &str) -> bool {
        matches!(self.metadata.get(key), Some(MetaValue::Bool(true)))
    }

    /// Integer metadata lookup. Tolerates a float value (truncated) so a
    /// result deserialized from JSON with `5.0` still reads as 5.
    pub fn meta_i64(&self, key: &str) -> Option<i64> {
        match self.metadata.get(key) {
            Some(MetaValue::Int(v)) => Some(*v),
            Some(MetaValue::Float(v)) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn meta_str(&self, key: &str) -> Option<&str> {
        match self.metadata.get(key) {
            Some(MetaValue::Text(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn meta_list(&self, key: &str) -> Option<&[String]> {
        match self.metadata.get(key) {
            Some(MetaValue::List(v)) => Some(v.as_slice()),
            _ => None,
        }
    }
}
