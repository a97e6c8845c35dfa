// Score aggregation: policy data, verdict types, and the engine.
//
// The ScoringEngine owns the mechanics; every number it reads (weights,
// thresholds, adjustments, presentation tables) comes from a ScoringPolicy
// value, so deployments tune behavior by swapping data, not code.

pub mod engine;
pub mod policy;
pub mod presentation;
pub mod verdict;
