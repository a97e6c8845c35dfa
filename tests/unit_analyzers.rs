// Analyzer behavior through the public API: structural URL checks and
// registration-data evaluation. No network anywhere; registration data
// comes from fixed-record resolvers.

use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use tokio::time::Duration;

use palisade::analyzers::registry::RegistryAnalyzer;
use palisade::analyzers::url::UrlAnalyzer;
use palisade::analyzers::Analyzer;
use palisade::model::{meta, Severity};
use palisade::registry::cache::RegistryCache;
use palisade::registry::traits::{FailingResolver, RegistryRecord, StaticResolver};

// ============================================================
// URL analyzer scenarios
// ============================================================

#[tokio::test]
async fn url_scenarios_match_expected_scores() {
    let cases = [
        ("https://example.com/docs", 0.0, Severity::Info),
        // +15 insecure scheme
        ("http://example.com/", 15.0, Severity::Low),
        // +60 raw IP host
        ("https://192.168.0.1/", 60.0, Severity::High),
        // +10 deep subdomain nesting (four dots)
        ("https://a.b.c.example.com/", 10.0, Severity::Low),
        // +10 explicit non-standard port
        ("https://example.com:8443/", 10.0, Severity::Low),
        // 15 + 60 = 75; keywords suppressed once the running score is >= 50
        ("http://192.168.1.1/login?verify=1", 75.0, Severity::High),
    ];

    let analyzer = UrlAnalyzer::default();
    for (url, expected_score, expected_severity) in cases {
        let result = analyzer.analyze(url).await;
        assert_eq!(result.plugin_id, "url-pattern", "{url}");
        assert_eq!(result.score, expected_score, "{url}");
        assert_eq!(result.severity, expected_severity, "{url}");
        assert!(!result.reasons.is_empty(), "{url}");
        assert_eq!(result.meta_str(meta::URL), Some(url), "{url}");
    }
}

#[tokio::test]
async fn keywords_add_up_below_the_throttle() {
    // 15 (http) + 2 keywords * 20 = 55; the scheme alone leaves the
    // running score below 50, so the keyword bonus still fires.
    let result = UrlAnalyzer::default()
        .analyze("http://phishy.example/login?verify=1")
        .await;
    assert_eq!(result.score, 55.0);
    assert_eq!(result.severity, Severity::Medium);
    assert_eq!(
        result.meta_list(meta::PHISHING_KEYWORDS),
        Some(&["login".to_string(), "verify".to_string()][..])
    );
}

#[tokio::test]
async fn reasons_name_what_fired() {
    let result = UrlAnalyzer::default()
        .analyze("http://192.168.1.1/login")
        .await;
    assert!(result.reasons.iter().any(|r| r.contains("HTTPS")));
    assert!(result.reasons.iter().any(|r| r.contains("IP address")));
}

// ============================================================
// Registration analyzer scenarios
// ============================================================

fn analyzer_with(record: RegistryRecord) -> RegistryAnalyzer {
    RegistryAnalyzer::new(
        Arc::new(StaticResolver::new(record)),
        Arc::new(RegistryCache::new(Duration::from_secs(300))),
    )
}

#[tokio::test]
async fn every_registration_signal_fires_on_a_throwaway_domain() {
    let now = Utc::now();
    let record = RegistryRecord {
        creation_date: Some(now - ChronoDuration::days(10)),
        expiration_date: Some(now + ChronoDuration::days(10)),
        registrar: Some("Freenom World".to_string()),
        registrant: Some("REDACTED FOR PRIVACY".to_string()),
        organization: None,
        name_servers: vec!["ns1.shady.example".to_string()],
    };

    // 40 (age < 30) + 20 (registrar) + 10 (privacy) + 5 (nameservers)
    // + 15 (expiring soon) = 90
    let result = analyzer_with(record).analyze("https://shady.example/x").await;
    assert_eq!(result.plugin_id, "whois-checker");
    assert_eq!(result.score, 90.0);
    assert_eq!(result.severity, Severity::High);
    assert_eq!(result.reasons.len(), 5);
    assert_eq!(result.meta_str(meta::DOMAIN), Some("shady.example"));
    assert_eq!(result.meta_i64(meta::DOMAIN_AGE), Some(10));
    assert!(result.meta_bool(meta::WHOIS_PROTECTED));
    assert!(result.meta_i64(meta::DAYS_UNTIL_EXPIRY).is_some());
}

#[tokio::test]
async fn mature_clean_record_reads_as_ordinary() {
    let record = RegistryRecord {
        creation_date: Some(Utc::now() - ChronoDuration::days(2000)),
        expiration_date: Some(Utc::now() + ChronoDuration::days(300)),
        registrar: Some("MarkMonitor Inc.".to_string()),
        registrant: Some("Example Corp".to_string()),
        organization: Some("Example Corp".to_string()),
        name_servers: vec!["dee.ns.cloudflare.com".to_string()],
    };

    let result = analyzer_with(record).analyze("https://example.com/").await;
    assert_eq!(result.score, 0.0);
    assert_eq!(result.severity, Severity::Info);
    assert_eq!(result.reasons.len(), 1);
    assert_eq!(result.meta_i64(meta::DOMAIN_AGE), Some(2000));
}

#[tokio::test]
async fn failed_lookup_degrades_with_a_visible_error() {
    let analyzer = RegistryAnalyzer::new(
        Arc::new(FailingResolver),
        Arc::new(RegistryCache::new(Duration::from_secs(300))),
    );

    let result = analyzer.analyze("https://unreachable.example/").await;
    assert!(result.is_degraded());
    assert_eq!(result.score, 0.0);
    assert_eq!(result.severity, Severity::Info);
    assert!(result.reasons[0].contains("Registration lookup failed"));
    assert!(result
        .meta_str(meta::ERROR)
        .is_some_and(|e| e.contains("unreachable.example")));
}
