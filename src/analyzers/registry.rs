// Domain registration analysis: age, registrar, privacy masking,
// nameservers, expiry.
//
// The analyzer extracts a domain from the URL, consults the injected
// cache, and only then asks the resolver. Successful evaluations are
// cached; failures degrade to a tagged neutral result and are never
// cached, so the next call retries.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::analyzers::{band_severity, Analyzer};
use crate::model::{meta, plugin, AnalysisResult, MetaValue, Metadata};
use crate::registry::cache::RegistryCache;
use crate::registry::traits::{RegistryRecord, RegistryResolver};

/// Registrars associated with free or throwaway registrations.
const SUSPICIOUS_REGISTRARS: &[&str] = &["freenom", "free domain", "duckdns"];

/// Contact-text markers of privacy-masked registrations.
const PRIVACY_MARKERS: &[&str] = &[
    "privacy",
    "protected",
    "redacted",
    "whoisguard",
    "private registration",
    "proxy",
];

/// Nameserver substrings of large managed-DNS operators. Serving DNS from
/// none of these is a weak signal on its own, hence the small score.
const KNOWN_DNS_SERVICES: &[&str] = &["cloudflare", "amazonaws", "googledomains", "azure"];

const CLEAN_REASON: &str = "Registration data looks ordinary";

/// Tunable scores and bands for registration checks.
#[derive(Debug, Clone)]
pub struct RegistryHeuristics {
    /// Age buckets as (days, points): a domain younger than `days` earns
    /// `points`. Checked in order, first match wins
    /// (defaults 30/40, 90/25, 180/15).
    pub age_buckets: Vec<(i64, f64)>,
    /// Added when the registrar matches the suspicious list (default 20)
    pub suspicious_registrar: f64,
    /// Added when registrant details are privacy-masked (default 10)
    pub privacy_masked: f64,
    /// Added when no nameserver belongs to a known operator (default 5)
    pub unknown_nameservers: f64,
    /// Days-to-expiry window that earns `expiring_soon` (default 30)
    pub expiry_window_days: i64,
    /// Added when expiration falls inside the window (default 15)
    pub expiring_soon: f64,
    /// Severity band floors (defaults 50 / 30)
    pub high_band: f64,
    pub medium_band: f64,
}

impl Default for RegistryHeuristics {
    fn default() -> Self {
        RegistryHeuristics {
            age_buckets: vec![(30, 40.0), (90, 25.0), (180, 15.0)],
            suspicious_registrar: 20.0,
            privacy_masked: 10.0,
            unknown_nameservers: 5.0,
            expiry_window_days: 30,
            expiring_soon: 15.0,
            high_band: 50.0,
            medium_band: 30.0,
        }
    }
}

/// Registration-data analyzer, `pluginId = "whois-checker"`.
///
/// The cache is shared (`Arc`) so several analyzer instances, or a caller
/// wanting visibility, can hold the same one.
pub struct RegistryAnalyzer {
    resolver: Arc<dyn RegistryResolver>,
    cache: Arc<RegistryCache>,
    heuristics: RegistryHeuristics,
}

impl RegistryAnalyzer {
    pub fn new(resolver: Arc<dyn RegistryResolver>, cache: Arc<RegistryCache>) -> Self {
        Self::with_heuristics(resolver, cache, RegistryHeuristics::default())
    }

    pub fn with_heuristics(
        resolver: Arc<dyn RegistryResolver>,
        cache: Arc<RegistryCache>,
        heuristics: RegistryHeuristics,
    ) -> Self {
        RegistryAnalyzer {
            resolver,
            cache,
            heuristics,
        }
    }
}

/// Reduce a URL to its domain by plain string splitting: scheme substrings
/// are removed wherever they appear, then everything after the first `/`,
/// `?`, or `:` is dropped, then the result is lowercased. Deliberately not
/// a URL parser; the cache key is exactly this reduction.
pub fn extract_domain(url: &str) -> String {
    let stripped = url.replace("https://", "").replace("http://", "");
    let host = stripped
        .split('/')
        .next()
        .unwrap_or_default()
        .split('?')
        .next()
        .unwrap_or_default()
        .split(':')
        .next()
        .unwrap_or_default();
    host.trim().to_ascii_lowercase()
}

/// Score one registration record. Pure; `now` is passed in so tests can
/// pin the clock.
pub fn evaluate_record(
    heuristics: &RegistryHeuristics,
    domain: &str,
    record: &RegistryRecord,
    now: DateTime<Utc>,
) -> AnalysisResult {
    let h = heuristics;
    let mut score = 0.0;
    let mut reasons: Vec<String> = Vec::new();
    let mut metadata = Metadata::new();
    metadata.insert(meta::DOMAIN.to_string(), MetaValue::Text(domain.to_string()));

    // Age. Metadata is recorded whenever the creation date is known,
    // whether or not a bucket fires.
    if let Some(created) = record.creation_date {
        let age_days = (now - created).num_days();
        metadata.insert(meta::DOMAIN_AGE.to_string(), MetaValue::Int(age_days));
        metadata.insert(
            meta::CREATION_DATE.to_string(),
            MetaValue::Text(created.format("%Y-%m-%d").to_string()),
        );
        if let Some(bucket) = h.age_buckets.iter().find(|b| age_days < b.0) {
            score += bucket.1;
            reasons.push(format!(
                "Domain was registered recently: {age_days} days ago ({})",
                created.format("%Y-%m-%d")
            ));
        }
    }

    // Registrar
    if let Some(registrar) = &record.registrar {
        metadata.insert(
            meta::REGISTRAR.to_string(),
            MetaValue::Text(registrar.clone()),
        );
        let lowered = registrar.to_lowercase();
        if SUSPICIOUS_REGISTRARS.iter().any(|s| lowered.contains(s)) {
            score += h.suspicious_registrar;
            reasons.push(format!(
                "Registrar is associated with free registrations ({registrar})"
            ));
        }
    }

    // Privacy masking across registrant and organization text
    let contact_text = format!(
        "{} {}",
        record.registrant.as_deref().unwrap_or_default(),
        record.organization.as_deref().unwrap_or_default()
    )
    .to_lowercase();
    if PRIVACY_MARKERS.iter().any(|m| contact_text.contains(m)) {
        score += h.privacy_masked;
        metadata.insert(meta::WHOIS_PROTECTED.to_string(), MetaValue::Bool(true));
        reasons.push("Registrant identity is privacy-masked".to_string());
    }

    // Nameservers: only judged when the record lists them
    if !record.name_servers.is_empty() {
        metadata.insert(
            meta::NAME_SERVERS.to_string(),
            MetaValue::List(record.name_servers.clone()),
        );
        let recognized = record.name_servers.iter().any(|ns| {
            let ns = ns.to_lowercase();
            KNOWN_DNS_SERVICES.iter().any(|svc| ns.contains(svc))
        });
        if !recognized {
            score += h.unknown_nameservers;
            reasons.push("Nameservers do not belong to a recognized DNS operator".to_string());
        }
    }

    // Expiry. Metadata recorded whenever the expiration date is known.
    if let Some(expires) = record.expiration_date {
        let days_left = (expires - now).num_days();
        metadata.insert(
            meta::EXPIRATION_DATE.to_string(),
            MetaValue::Text(expires.format("%Y-%m-%d").to_string()),
        );
        metadata.insert(
            meta::DAYS_UNTIL_EXPIRY.to_string(),
            MetaValue::Int(days_left),
        );
        if days_left < h.expiry_window_days {
            score += h.expiring_soon;
            reasons.push(format!("Registration expires in {days_left} days"));
        }
    }

    let score = score.min(100.0);
    if reasons.is_empty() {
        reasons.push(CLEAN_REASON.to_string());
    }

    AnalysisResult {
        plugin_id: plugin::WHOIS_CHECKER.to_string(),
        score,
        severity: band_severity(score, h.high_band, h.medium_band),
        reasons,
        metadata,
    }
}

#[async_trait]
impl Analyzer for RegistryAnalyzer {
    fn plugin_id(&self) -> &'static str {
        plugin::WHOIS_CHECKER
    }

    async fn analyze(&self, url: &str) -> AnalysisResult {
        let domain = extract_domain(url);
        if let Some(hit) = self.cache.get(&domain).await {
            debug!(domain, "registry cache hit");
            return hit;
        }

        match self.resolver.lookup(&domain).await {
            Ok(record) => {
                let result = evaluate_record(&self.heuristics, &domain, &record, Utc::now());
                self.cache.insert(domain, result.clone()).await;
                result
            }
            Err(e) => {
                warn!(domain, error = %e, "registry resolution failed, emitting degraded result");
                AnalysisResult::degraded(
                    plugin::WHOIS_CHECKER,
                    format!("Registration lookup failed: {e}"),
                    e.to_string(),
                )
            }
        }
    }
}
