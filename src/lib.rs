// Palisade: phishing risk scoring for URLs
//
// This is the library root. Each module corresponds to a major subsystem
// of the analysis pipeline: analyzers produce standardized results, the
// registry module feeds them registration data, and scoring folds the
// batch into one verdict.

pub mod analyzers;
pub mod config;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod scoring;
