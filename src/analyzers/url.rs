// URL structure analysis: scheme, host shape, keyword scan, ports.
//
// Pure string and structure checks with no network access. Each check adds
// to a running score and records a reason plus a `suspiciousPatterns` tag;
// the final score is capped at 100 and banded into a severity.

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::warn;
use url::Url;

use crate::analyzers::{band_severity, Analyzer};
use crate::model::{meta, plugin, AnalysisResult, MetaValue, Metadata};

/// Keywords that commonly appear in credential-harvesting URLs, matched
/// case-insensitively against the whole URL (path and query included).
const PHISHING_KEYWORDS: &[&str] = &[
    "login", "signin", "verify", "secure", "account", "update", "banking", "confirm", "wallet",
    "password",
];

/// Dotted-quad prefix. Deliberately unanchored at the end: a host that
/// merely starts with four number groups ("1.2.3.4.example.com") is treated
/// as an IP-style host too.
static IP_HOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").expect("static pattern"));

const CLEAN_REASON: &str = "No structural issues found";

/// Tunable scores and bands for the structural checks.
///
/// Score model: checks fire additively in a fixed order (scheme, IP host,
/// keywords, subdomain depth, port), the sum is capped at 100, and the
/// severity bands classify the capped score.
#[derive(Debug, Clone)]
pub struct UrlHeuristics {
    /// Added when the scheme is anything but https (default 15)
    pub insecure_scheme: f64,
    /// Added when the host matches the dotted-quad pattern (default 60)
    pub ip_host: f64,
    /// Added per matched keyword (default 20)
    pub per_keyword: f64,
    /// The keyword bonus fires only while the running score is still below
    /// this value (default 50), so already-flagged URLs are not piled on
    pub keyword_throttle: f64,
    /// Added when the host has more than `max_host_dots` dots (default 10)
    pub deep_subdomain: f64,
    /// Dot-count limit before a host counts as deeply nested (default 3)
    pub max_host_dots: usize,
    /// Added for an explicit port other than 80/443 (default 10)
    pub nonstandard_port: f64,
    /// Severity band floors: >= high_band is high, >= medium_band is medium,
    /// anything above zero is low (defaults 60 / 30)
    pub high_band: f64,
    pub medium_band: f64,
}

impl Default for UrlHeuristics {
    fn default() -> Self {
        UrlHeuristics {
            insecure_scheme: 15.0,
            ip_host: 60.0,
            per_keyword: 20.0,
            keyword_throttle: 50.0,
            deep_subdomain: 10.0,
            max_host_dots: 3,
            nonstandard_port: 10.0,
            high_band: 60.0,
            medium_band: 30.0,
        }
    }
}

/// Structural URL analyzer, `pluginId = "url-pattern"`.
pub struct UrlAnalyzer {
    heuristics: UrlHeuristics,
    /// Lowercased allowlist; matching hosts get `metadata.trustedDomain`
    /// set so the scoring engine can discount them. The analyzer's own
    /// score is not reduced here.
    trusted_domains: Vec<String>,
}

impl UrlAnalyzer {
    pub fn new(trusted_domains: Vec<String>) -> Self {
        Self::with_heuristics(UrlHeuristics::default(), trusted_domains)
    }

    pub fn with_heuristics(heuristics: UrlHeuristics, trusted_domains: Vec<String>) -> Self {
        let trusted_domains = trusted_domains
            .into_iter()
            .map(|d| d.trim().to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        UrlAnalyzer {
            heuristics,
            trusted_domains,
        }
    }

    /// Fallible core; `analyze` wraps parse errors into a degraded result.
    fn inspect(&self, raw: &str) -> Result<AnalysisResult> {
        let h = &self.heuristics;
        let parsed = Url::parse(raw)?;
        let host = parsed.host_str().unwrap_or_default();

        let mut score = 0.0;
        let mut reasons: Vec<String> = Vec::new();
        let mut patterns: Vec<String> = Vec::new();
        let mut keywords: Vec<String> = Vec::new();

        // 1. Scheme
        if parsed.scheme() != "https" {
            score += h.insecure_scheme;
            reasons.push("Connection does not use HTTPS".to_string());
            patterns.push("no-https".to_string());
        }

        // 2. Literal IP host
        let ip_host = IP_HOST.is_match(host);
        if ip_host {
            score += h.ip_host;
            reasons.push("Host is a raw IP address instead of a domain name".to_string());
            patterns.push("ip-address-host".to_string());
        }

        // 3. Keyword scan, throttled by the running score
        let lowered = raw.to_lowercase();
        let found: Vec<String> = PHISHING_KEYWORDS
            .iter()
            .filter(|kw| lowered.contains(**kw))
            .map(|kw| (*kw).to_string())
            .collect();
        if !found.is_empty() && score < h.keyword_throttle {
            score += h.per_keyword * found.len() as f64;
            reasons.push(format!("Suspicious keywords in URL: {}", found.join(", ")));
            patterns.push("phishing-keywords".to_string());
            keywords = found;
        }

        // 4. Subdomain depth (IP-style hosts excluded)
        let dots = host.matches('.').count();
        if dots > h.max_host_dots && !ip_host {
            score += h.deep_subdomain;
            reasons.push("Hostname nests subdomains unusually deep".to_string());
            patterns.push("deep-subdomain".to_string());
        }

        // 5. Explicit non-standard port
        if let Some(port) = parsed.port() {
            if port != 80 && port != 443 {
                score += h.nonstandard_port;
                reasons.push(format!("Non-standard port {port} in use"));
                patterns.push("non-standard-port".to_string());
            }
        }

        let trusted = self.is_trusted(host);
        if trusted {
            reasons.push("Host is on the trusted-domain allowlist".to_string());
        }

        let score = score.min(100.0);
        if reasons.is_empty() {
            reasons.push(CLEAN_REASON.to_string());
        }

        let mut metadata = Metadata::new();
        metadata.insert(meta::URL.to_string(), MetaValue::Text(raw.to_string()));
        metadata.insert(
            meta::SUSPICIOUS_PATTERNS.to_string(),
            MetaValue::List(patterns),
        );
        metadata.insert(
            meta::PHISHING_KEYWORDS.to_string(),
            MetaValue::List(keywords),
        );
        if trusted {
            metadata.insert(meta::TRUSTED_DOMAIN.to_string(), MetaValue::Bool(true));
        }

        Ok(AnalysisResult {
            plugin_id: plugin::URL_PATTERN.to_string(),
            score,
            severity: band_severity(score, h.high_band, h.medium_band),
            reasons,
            metadata,
        })
    }

    /// Exact match or parent-domain suffix match against the allowlist.
    fn is_trusted(&self, host: &str) -> bool {
        self.trusted_domains
            .iter()
            .any(|d| host == d || host.ends_with(&format!(".{d}")))
    }
}

impl Default for UrlAnalyzer {
    fn default() -> Self {
        UrlAnalyzer::new(Vec::new())
    }
}

#[async_trait]
impl Analyzer for UrlAnalyzer {
    fn plugin_id(&self) -> &'static str {
        plugin::URL_PATTERN
    }

    async fn analyze(&self, url: &str) -> AnalysisResult {
        match self.inspect(url) {
            Ok(result) => result,
            Err(e) => {
                warn!(url, error = %e, "URL parse failed, emitting degraded result");
                AnalysisResult::degraded(
                    plugin::URL_PATTERN,
                    format!("URL could not be parsed: {e}"),
                    e.to_string(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    fn analyzer() -> UrlAnalyzer {
        UrlAnalyzer::default()
    }

    #[test]
    fn clean_https_url_is_info_with_neutral_reason() {
        let result = analyzer().inspect("https://example.com/docs").unwrap();
        assert_eq!(result.score, 0.0);
        assert_eq!(result.severity, Severity::Info);
        assert_eq!(result.reasons, vec![CLEAN_REASON.to_string()]);
        // Pattern lists are always present, even when empty
        assert_eq!(result.meta_list(meta::SUSPICIOUS_PATTERNS), Some(&[][..]));
        assert_eq!(result.meta_list(meta::PHISHING_KEYWORDS), Some(&[][..]));
        assert_eq!(result.meta_str(meta::URL), Some("https://example.com/docs"));
    }

    #[test]
    fn http_scheme_adds_15() {
        let result = analyzer().inspect("http://example.com/").unwrap();
        assert_eq!(result.score, 15.0);
        assert_eq!(result.severity, Severity::Low);
        assert!(result
            .meta_list(meta::SUSPICIOUS_PATTERNS)
            .unwrap()
            .contains(&"no-https".to_string()));
    }

    #[test]
    fn ip_host_with_keywords_hits_throttle() {
        // 15 (http) + 60 (IP) = 75; the running score is already >= 50, so
        // the two matched keywords add nothing.
        let result = analyzer()
            .inspect("http://192.168.1.1/login?verify=1")
            .unwrap();
        assert_eq!(result.score, 75.0);
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.meta_list(meta::PHISHING_KEYWORDS), Some(&[][..]));
        let patterns = result.meta_list(meta::SUSPICIOUS_PATTERNS).unwrap();
        assert!(patterns.contains(&"no-https".to_string()));
        assert!(patterns.contains(&"ip-address-host".to_string()));
        assert!(!patterns.contains(&"phishing-keywords".to_string()));
    }

    #[test]
    fn keywords_fire_below_throttle_in_list_order() {
        // 0 running score, two keywords: 20 * 2 = 40
        let result = analyzer()
            .inspect("https://secure-login.example.com/")
            .unwrap();
        assert_eq!(result.score, 40.0);
        assert_eq!(result.severity, Severity::Medium);
        assert_eq!(
            result.meta_list(meta::PHISHING_KEYWORDS),
            Some(&["login".to_string(), "secure".to_string()][..])
        );
    }

    #[test]
    fn throttle_boundary_is_exclusive_at_50() {
        // Custom heuristics put the running score at exactly 50 before the
        // keyword check: 15 + 35 = 50, which is not below 50.
        let heuristics = UrlHeuristics {
            ip_host: 35.0,
            ..UrlHeuristics::default()
        };
        let analyzer = UrlAnalyzer::with_heuristics(heuristics, Vec::new());
        let result = analyzer.inspect("http://10.0.0.1/login").unwrap();
        assert_eq!(result.score, 50.0);
        assert_eq!(result.meta_list(meta::PHISHING_KEYWORDS), Some(&[][..]));
    }

    #[test]
    fn score_caps_at_100() {
        // With the throttle lifted: 15 (http) + 60 (IP) + 80 (four
        // keywords) + 10 (port) = 165, capped to 100.
        let heuristics = UrlHeuristics {
            keyword_throttle: 1000.0,
            ..UrlHeuristics::default()
        };
        let analyzer = UrlAnalyzer::with_heuristics(heuristics, Vec::new());
        let result = analyzer
            .inspect("http://192.168.1.1:8080/login?verify=secure&account=1")
            .unwrap();
        assert_eq!(result.score, 100.0);
        assert_eq!(result.severity, Severity::High);
    }

    #[test]
    fn deep_subdomain_needs_more_than_three_dots() {
        let three = analyzer().inspect("https://a.b.example.com/").unwrap();
        assert_eq!(three.score, 0.0);

        let four = analyzer().inspect("https://a.b.c.example.com/").unwrap();
        assert_eq!(four.score, 10.0);
        assert!(four
            .meta_list(meta::SUSPICIOUS_PATTERNS)
            .unwrap()
            .contains(&"deep-subdomain".to_string()));
    }

    #[test]
    fn dotted_quad_prefix_host_counts_as_ip_not_deep() {
        // Host starts with four number groups; the prefix match treats it
        // as an IP-style host and the depth check stands down.
        let result = analyzer().inspect("https://1.2.3.4.example.com/").unwrap();
        assert_eq!(result.score, 60.0);
        let patterns = result.meta_list(meta::SUSPICIOUS_PATTERNS).unwrap();
        assert!(patterns.contains(&"ip-address-host".to_string()));
        assert!(!patterns.contains(&"deep-subdomain".to_string()));
    }

    #[test]
    fn explicit_default_ports_are_not_flagged() {
        let https_443 = analyzer().inspect("https://example.com:443/").unwrap();
        assert_eq!(https_443.score, 0.0);

        // Cross-scheme default still sits in the 80/443 allowance
        let http_443 = analyzer().inspect("http://example.com:443/").unwrap();
        assert_eq!(http_443.score, 15.0);
    }

    #[test]
    fn nonstandard_port_adds_10() {
        let result = analyzer().inspect("https://example.com:8443/").unwrap();
        assert_eq!(result.score, 10.0);
        assert_eq!(result.severity, Severity::Low);
        assert!(result.reasons[0].contains("8443"));
    }

    #[test]
    fn trusted_host_sets_flag_without_touching_score() {
        let analyzer = UrlAnalyzer::new(vec!["github.com".to_string()]);
        let result = analyzer.inspect("https://github.com/login").unwrap();
        // "login" keyword still fires; trust is a flag for the engine
        assert_eq!(result.score, 20.0);
        assert!(result.meta_bool(meta::TRUSTED_DOMAIN));

        let sub = analyzer.inspect("https://gist.github.com/").unwrap();
        assert!(sub.meta_bool(meta::TRUSTED_DOMAIN));

        let lookalike = analyzer.inspect("https://github.com.evil.example/").unwrap();
        assert!(!lookalike.meta_bool(meta::TRUSTED_DOMAIN));
    }

    #[test]
    fn allowlisted_ip_host_is_still_marked_trusted() {
        // 15 (http) + 60 (IP host) = 75; the mark follows the allowlist
        // regardless of host shape
        let analyzer = UrlAnalyzer::new(vec!["192.168.1.10".to_string()]);
        let result = analyzer.inspect("http://192.168.1.10/admin").unwrap();
        assert_eq!(result.score, 75.0);
        assert!(result.meta_bool(meta::TRUSTED_DOMAIN));
    }

    #[tokio::test]
    async fn unparseable_input_degrades_instead_of_failing() {
        let result = analyzer().analyze("not a url").await;
        assert!(result.is_degraded());
        assert_eq!(result.score, 0.0);
        assert_eq!(result.severity, Severity::Info);
        assert_eq!(result.reasons.len(), 1);
        assert!(result.meta_str(meta::ERROR).is_some());
    }
}
