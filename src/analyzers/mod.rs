// Analyzers: independent, pluggable URL checks.
//
// Each analyzer inspects one URL and produces a standardized
// AnalysisResult. The trait surface is infallible: an analyzer traps its
// own failures and returns a degraded neutral result instead, so one
// broken check can never abort the pipeline.

pub mod registry;
pub mod url;

use async_trait::async_trait;

use crate::model::{AnalysisResult, Severity};

/// A pluggable URL check. Implementations must be async because some
/// analyzers consult external capabilities (registry resolution).
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Stable identifier used as the weighting and display lookup key.
    fn plugin_id(&self) -> &'static str;

    /// Analyze one URL. Never fails; internal errors surface as a
    /// degraded result with score 0 and severity info.
    async fn analyze(&self, url: &str) -> AnalysisResult;
}

/// Band an analyzer score into a severity. Analyzers never emit
/// `Critical`; that tier belongs to the aggregate verdict.
pub fn band_severity(score: f64, high_band: f64, medium_band: f64) -> Severity {
    match score {
        s if s >= high_band => Severity::High,
        s if s >= medium_band => Severity::Medium,
        s if s > 0.0 => Severity::Low,
        _ => Severity::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banding_boundaries_are_inclusive() {
        assert_eq!(band_severity(60.0, 60.0, 30.0), Severity::High);
        assert_eq!(band_severity(59.9, 60.0, 30.0), Severity::Medium);
        assert_eq!(band_severity(30.0, 60.0, 30.0), Severity::Medium);
        assert_eq!(band_severity(29.9, 60.0, 30.0), Severity::Low);
        assert_eq!(band_severity(0.1, 60.0, 30.0), Severity::Low);
        assert_eq!(band_severity(0.0, 60.0, 30.0), Severity::Info);
    }
}
