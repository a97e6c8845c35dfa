use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Central configuration loaded from environment variables.
///
/// Every setting has a working default, so a bare `palisade analyze <url>`
/// needs no .env at all. The .env file is loaded automatically at startup
/// via dotenvy.
pub struct Config {
    /// RDAP bootstrap endpoint (defaults to https://rdap.org). All
    /// registration lookups go through it; no API key needed.
    pub rdap_base_url: String,
    /// Per-request deadline for registration lookups.
    pub registry_timeout: Duration,
    /// How long a registration lookup stays cached. Zero disables caching.
    pub cache_ttl: Duration,
    /// Domains exempted from structural scoring (exact or subdomain match).
    /// Comma-separated in PALISADE_TRUSTED_DOMAINS.
    pub trusted_domains: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// defaults above. Fails only on values that do not parse.
    pub fn load() -> Result<Self> {
        Ok(Self {
            rdap_base_url: env::var("PALISADE_RDAP_URL")
                .unwrap_or_else(|_| crate::registry::rdap::DEFAULT_BASE_URL.to_string()),
            registry_timeout: Duration::from_secs(parse_secs(
                "PALISADE_REGISTRY_TIMEOUT_SECS",
                5,
            )?),
            cache_ttl: Duration::from_secs(parse_secs("PALISADE_CACHE_TTL_SECS", 3600)?),
            trusted_domains: env::var("PALISADE_TRUSTED_DOMAINS")
                .map(|raw| parse_domain_list(&raw))
                .unwrap_or_default(),
        })
    }
}

fn parse_secs(var: &str, default: u64) -> Result<u64> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{var} must be a whole number of seconds, got {raw:?}")),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated domain list, dropping blanks so trailing commas
/// and stray whitespace are harmless.
fn parse_domain_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|entry| entry.trim().to_ascii_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}
