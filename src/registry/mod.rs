// Domain registration lookup: the external capability behind the
// whois-checker analyzer.
//
// The RegistryResolver trait defines the seam. RdapResolver implements it
// over HTTP against an RDAP bootstrap service; the cache and pacer keep
// repeated lookups cheap and polite.

pub mod cache;
pub mod rate_limit;
pub mod rdap;
pub mod traits;
