// Registry resolver trait: the swap-ready abstraction over registration
// data sources.
//
// The default implementation speaks RDAP over HTTP (rdap.rs). Tests and
// offline composition use the fixed-record resolver below.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured registration metadata for one domain. Every field is
/// optional; registries disclose different subsets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryRecord {
    pub creation_date: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub registrar: Option<String>,
    pub registrant: Option<String>,
    pub organization: Option<String>,
    pub name_servers: Vec<String>,
}

/// Trait for resolving a domain's registration data. Implementations are
/// async because real resolvers hit the network.
#[async_trait]
pub trait RegistryResolver: Send + Sync {
    /// Resolve one domain. A single attempt; callers decide what a failure
    /// means (the analyzer degrades, the CLI reports).
    async fn lookup(&self, domain: &str) -> Result<RegistryRecord>;
}

/// Resolver returning the same record for every domain. Counts lookups so
/// cache behavior is observable from tests.
pub struct StaticResolver {
    record: RegistryRecord,
    calls: AtomicUsize,
}

impl StaticResolver {
    pub fn new(record: RegistryRecord) -> Self {
        StaticResolver {
            record,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many lookups reached this resolver (cache hits don't).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RegistryResolver for StaticResolver {
    async fn lookup(&self, _domain: &str) -> Result<RegistryRecord> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.record.clone())
    }
}

/// Resolver that always fails. Exercises the degraded-result path without
/// a network.
pub struct FailingResolver;

#[async_trait]
impl RegistryResolver for FailingResolver {
    async fn lookup(&self, domain: &str) -> Result<RegistryRecord> {
        anyhow::bail!("no registration data source available for {domain}")
    }
}
