//! Risk Scorer Component
//!
//! Turns category matches and extracted indicators into a bounded score,
//! a discrete risk level, the scam verdict and a confidence value.

use crate::config::{KeywordCategory, ScoringConfig};
use crate::detection::CategoryMatchSet;
use crate::features::ExtractedIntelligence;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Minimal => "Minimal",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub score: u32,
    pub risk_level: RiskLevel,
    pub is_scam: bool,
    pub confidence: f64,
}

pub struct RiskScorer {
    config: ScoringConfig,
    category_weights: Vec<(String, u32)>,
}

impl RiskScorer {
    pub fn new(config: ScoringConfig, categories: &[KeywordCategory]) -> Self {
        Self {
            config,
            category_weights: categories
                .iter()
                .map(|c| (c.name.clone(), c.weight))
                .collect(),
        }
    }

    pub fn score(
        &self,
        matches: &CategoryMatchSet,
        intelligence: &ExtractedIntelligence,
    ) -> RiskAssessment {
        let raw = self.raw_score(matches, intelligence);
        let score = raw.min(MAX_SCORE as u64) as u32;
        let risk_level = self.risk_level(score);

        log::trace!("Raw risk score {} clamped to {} ({})", raw, score, risk_level);

        RiskAssessment {
            score,
            risk_level,
            is_scam: score >= self.config.scam_threshold,
            confidence: self.confidence(score),
        }
    }

    /// Unclamped weighted sum. Accumulated in u64 so large match counts can't overflow.
    fn raw_score(&self, matches: &CategoryMatchSet, intel: &ExtractedIntelligence) -> u64 {
        let keyword_score: u64 = self
            .category_weights
            .iter()
            .map(|(name, weight)| matches.count(name) as u64 * *weight as u64)
            .sum();

        let indicator_score = intel.phone_numbers.len() as u64
            * self.config.phone_number_weight as u64
            + intel.upi_ids.len() as u64 * self.config.upi_id_weight as u64
            + intel.phishing_links.len() as u64 * self.config.phishing_link_weight as u64
            + intel.bank_accounts.len() as u64 * self.config.bank_account_weight as u64;

        keyword_score + indicator_score
    }

    pub fn risk_level(&self, score: u32) -> RiskLevel {
        match score {
            s if s >= self.config.high_threshold => RiskLevel::High,
            s if s >= self.config.medium_threshold => RiskLevel::Medium,
            s if s >= self.config.low_threshold => RiskLevel::Low,
            _ => RiskLevel::Minimal,
        }
    }

    pub fn confidence(&self, score: u32) -> f64 {
        (self.config.confidence_base + score as f64 * self.config.confidence_slope)
            .min(self.config.confidence_ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::CategoryMatches;

    fn categories() -> Vec<KeywordCategory> {
        vec![
            KeywordCategory::new("urgency", 10, &[]),
            KeywordCategory::new("threat", 12, &[]),
        ]
    }

    fn matches(urgency: &[&str], threat: &[&str]) -> CategoryMatchSet {
        let group = |name: &str, phrases: &[&str]| CategoryMatches {
            category: name.to_string(),
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
        };
        CategoryMatchSet::new(vec![group("urgency", urgency), group("threat", threat)])
    }

    fn scorer() -> RiskScorer {
        RiskScorer::new(ScoringConfig::default(), &categories())
    }

    #[test]
    fn test_empty_scores_zero() {
        let assessment = scorer().score(&matches(&[], &[]), &ExtractedIntelligence::default());
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.risk_level, RiskLevel::Minimal);
        assert!(!assessment.is_scam);
        assert!((assessment.confidence - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_sum() {
        let intel = ExtractedIntelligence {
            phone_numbers: vec!["9876543210".to_string()],
            upi_ids: vec!["a@ybl".to_string()],
            ..Default::default()
        };
        // 2*10 + 1*12 + 10 + 15
        let assessment = scorer().score(&matches(&["urgent", "hurry"], &["blocked"]), &intel);
        assert_eq!(assessment.score, 57);
        assert_eq!(assessment.risk_level, RiskLevel::Medium);
        assert!(assessment.is_scam);
    }

    #[test]
    fn test_clamped_to_max() {
        let phrases: Vec<String> = (0..50).map(|i| format!("p{i}")).collect();
        let refs: Vec<&str> = phrases.iter().map(String::as_str).collect();
        let intel = ExtractedIntelligence {
            phishing_links: vec!["http://bit.ly/x".to_string(); 5],
            ..Default::default()
        };
        let assessment = scorer().score(&matches(&refs, &refs), &intel);
        assert_eq!(assessment.score, MAX_SCORE);
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert!((assessment.confidence - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_band_edges() {
        let scorer = scorer();
        assert_eq!(scorer.risk_level(19), RiskLevel::Minimal);
        assert_eq!(scorer.risk_level(20), RiskLevel::Low);
        assert_eq!(scorer.risk_level(39), RiskLevel::Low);
        assert_eq!(scorer.risk_level(40), RiskLevel::Medium);
        assert_eq!(scorer.risk_level(69), RiskLevel::Medium);
        assert_eq!(scorer.risk_level(70), RiskLevel::High);
        assert_eq!(scorer.risk_level(100), RiskLevel::High);
    }

    #[test]
    fn test_scam_threshold_boundary() {
        let scorer = scorer();
        let intel = ExtractedIntelligence::default();
        // 3*10 + 0 = 30; 3*10 + 12 = 42
        assert!(!scorer.score(&matches(&["a", "b", "c"], &[]), &intel).is_scam);
        assert!(scorer.score(&matches(&["a", "b", "c"], &["d"]), &intel).is_scam);
    }

    #[test]
    fn test_adding_a_match_never_lowers_score() {
        let scorer = scorer();
        let intel = ExtractedIntelligence::default();
        let mut previous = 0;
        let phrases = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k"];
        for n in 0..=phrases.len() {
            let score = scorer.score(&matches(&phrases[..n], &[]), &intel).score;
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn test_confidence_is_monotonic_and_capped() {
        let scorer = scorer();
        assert!((scorer.confidence(84) - 88.6).abs() < 1e-9);
        assert!(scorer.confidence(50) <= scorer.confidence(60));
        assert!(scorer.confidence(100) <= 95.0);
    }

    #[test]
    fn test_unknown_category_contributes_nothing() {
        let scorer = RiskScorer::new(ScoringConfig::default(), &[]);
        let assessment = scorer.score(&matches(&["urgent"], &["blocked"]), &ExtractedIntelligence::default());
        assert_eq!(assessment.score, 0);
    }
}
