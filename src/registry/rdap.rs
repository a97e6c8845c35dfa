// RDAP registry resolver.
//
// RDAP is the JSON successor to WHOIS. A bootstrap service (rdap.org by
// default) redirects `GET /domain/{name}` to the registry operator for the
// right TLD, so one base URL covers every TLD. Responses carry
// registration events, contact entities as jCard arrays, and nameservers.
//
// Protocol reference: RFC 9083 (JSON responses for RDAP).

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tokio::time::Duration;
use tracing::debug;

use super::rate_limit::Pacer;
use super::traits::{RegistryRecord, RegistryResolver};

/// Public bootstrap endpoint; redirects per-TLD to the right registry.
pub const DEFAULT_BASE_URL: &str = "https://rdap.org";

/// Spacing between outbound requests; public bootstrap services throttle
/// anything faster.
const REQUEST_INTERVAL: Duration = Duration::from_millis(250);

/// RDAP-backed registry resolver.
pub struct RdapResolver {
    client: Client,
    base_url: String,
    pacer: Pacer,
}

impl RdapResolver {
    /// `base_url` is the bootstrap endpoint, e.g. `https://rdap.org`.
    /// `timeout` bounds each request end to end (the analyzer itself
    /// imposes no deadline).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for RDAP lookups")?;
        Ok(RdapResolver {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            pacer: Pacer::new(REQUEST_INTERVAL),
        })
    }
}

#[async_trait]
impl RegistryResolver for RdapResolver {
    async fn lookup(&self, domain: &str) -> Result<RegistryRecord> {
        self.pacer.pace().await;

        let url = format!("{}/domain/{}", self.base_url, domain);
        debug!(domain, "RDAP lookup");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("RDAP request for {domain} failed"))?;

        if !response.status().is_success() {
            anyhow::bail!("RDAP lookup for {} returned {}", domain, response.status());
        }

        let body: RdapDomain = response
            .json()
            .await
            .with_context(|| format!("Failed to parse RDAP response for {domain}"))?;

        Ok(record_from(body))
    }
}

/// Map an RDAP domain object onto the flat record the analyzer consumes.
fn record_from(body: RdapDomain) -> RegistryRecord {
    let mut record = RegistryRecord::default();

    for event in &body.events {
        match event.event_action.as_str() {
            "registration" => record.creation_date = parse_event_date(&event.event_date),
            "expiration" => record.expiration_date = parse_event_date(&event.event_date),
            _ => {}
        }
    }

    record.registrar = find_entity_text(&body.entities, "registrar", "fn");
    record.registrant = find_entity_text(&body.entities, "registrant", "fn");
    record.organization = find_entity_text(&body.entities, "registrant", "org");
    record.name_servers = body
        .nameservers
        .into_iter()
        .filter_map(|ns| ns.ldh_name)
        .collect();

    record
}

fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Depth-first search for the first entity carrying `role`, returning the
/// named jCard property text. Registrar entities often nest abuse
/// contacts, so children are searched too.
fn find_entity_text(entities: &[RdapEntity], role: &str, property: &str) -> Option<String> {
    for entity in entities {
        if entity.roles.iter().any(|r| r.eq_ignore_ascii_case(role)) {
            if let Some(text) = entity
                .vcard_array
                .as_ref()
                .and_then(|vcard| vcard_text(vcard, property))
            {
                return Some(text);
            }
        }
        if let Some(text) = find_entity_text(&entity.entities, role, property) {
            return Some(text);
        }
    }
    None
}

/// jCard arrays look like `["vcard", [["fn", {}, "text", "Example Ltd"], ...]]`;
/// the property value sits at index 3 of its entry.
fn vcard_text(vcard: &Value, property: &str) -> Option<String> {
    let items = vcard.get(1)?.as_array()?;
    for item in items {
        let parts = match item.as_array() {
            Some(parts) => parts,
            None => continue,
        };
        if parts.first().and_then(Value::as_str) != Some(property) {
            continue;
        }
        if let Some(text) = parts.get(3).and_then(Value::as_str) {
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

// --- RDAP response types (subset we consume) ---

#[derive(Debug, Deserialize)]
struct RdapDomain {
    #[serde(default)]
    events: Vec<RdapEvent>,
    #[serde(default)]
    entities: Vec<RdapEntity>,
    #[serde(default)]
    nameservers: Vec<RdapNameserver>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RdapEvent {
    event_action: String,
    event_date: String,
}

#[derive(Debug, Deserialize)]
struct RdapEntity {
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default, rename = "vcardArray")]
    vcard_array: Option<Value>,
    #[serde(default)]
    entities: Vec<RdapEntity>,
}

#[derive(Debug, Deserialize)]
struct RdapNameserver {
    #[serde(default, rename = "ldhName")]
    ldh_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = r#"{
        "objectClassName": "domain",
        "ldhName": "example-shop.com",
        "events": [
            {"eventAction": "registration", "eventDate": "2026-07-20T09:30:00Z"},
            {"eventAction": "expiration", "eventDate": "2027-07-20T09:30:00Z"},
            {"eventAction": "last changed", "eventDate": "2026-07-21T00:00:00Z"}
        ],
        "entities": [
            {
                "roles": ["registrar"],
                "vcardArray": ["vcard", [
                    ["version", {}, "text", "4.0"],
                    ["fn", {}, "text", "Example Registrar Inc"]
                ]],
                "entities": [
                    {"roles": ["abuse"], "vcardArray": ["vcard", [["fn", {}, "text", "Abuse Desk"]]]}
                ]
            },
            {
                "roles": ["registrant"],
                "vcardArray": ["vcard", [
                    ["fn", {}, "text", "REDACTED FOR PRIVACY"],
                    ["org", {}, "text", "Privacy service provided by Withheld"]
                ]]
            }
        ],
        "nameservers": [
            {"ldhName": "ns1.example-dns.net"},
            {"ldhName": "ns2.example-dns.net"}
        ]
    }"#;

    #[test]
    fn maps_events_entities_and_nameservers() {
        let body: RdapDomain = serde_json::from_str(SAMPLE).unwrap();
        let record = record_from(body);

        assert_eq!(
            record.creation_date,
            Some(Utc.with_ymd_and_hms(2026, 7, 20, 9, 30, 0).unwrap())
        );
        assert_eq!(
            record.expiration_date,
            Some(Utc.with_ymd_and_hms(2027, 7, 20, 9, 30, 0).unwrap())
        );
        assert_eq!(record.registrar.as_deref(), Some("Example Registrar Inc"));
        assert_eq!(record.registrant.as_deref(), Some("REDACTED FOR PRIVACY"));
        assert_eq!(
            record.organization.as_deref(),
            Some("Privacy service provided by Withheld")
        );
        assert_eq!(
            record.name_servers,
            vec!["ns1.example-dns.net", "ns2.example-dns.net"]
        );
    }

    #[test]
    fn tolerates_missing_sections() {
        let body: RdapDomain = serde_json::from_str(r#"{"objectClassName": "domain"}"#).unwrap();
        let record = record_from(body);
        assert_eq!(record, RegistryRecord::default());
    }

    #[test]
    fn abuse_contact_does_not_shadow_registrar_name() {
        let body: RdapDomain = serde_json::from_str(SAMPLE).unwrap();
        let record = record_from(body);
        // The registrar's own fn wins over the nested abuse contact's.
        assert_eq!(record.registrar.as_deref(), Some("Example Registrar Inc"));
    }

    #[test]
    fn malformed_vcard_entries_are_skipped() {
        let vcard: Value = serde_json::from_str(
            r#"["vcard", ["not-an-array", ["fn", {}, "text", ""], ["fn", {}, "text", "Real Name"]]]"#,
        )
        .unwrap();
        assert_eq!(vcard_text(&vcard, "fn").as_deref(), Some("Real Name"));
    }

    #[test]
    fn unparseable_event_date_reads_as_none() {
        assert_eq!(parse_event_date("sometime in 2026"), None);
        assert!(parse_event_date("2026-07-20T09:30:00+09:00").is_some());
    }
}
