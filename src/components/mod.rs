//! Scoring and reporting components of the analysis pipeline.
//!
//! Both run after detection and extraction and only read their results.

pub mod narrative;
pub mod risk_scorer;

pub use narrative::NarrativeGenerator;
pub use risk_scorer::{RiskAssessment, RiskLevel, RiskScorer, MAX_SCORE};
