//! Narrative Component
//!
//! Picks the recommendation list for a verdict and writes the one-sentence
//! analysis notes.

use crate::components::risk_scorer::RiskAssessment;
use crate::config::NarrativeConfig;
use crate::detection::CategoryMatchSet;
use crate::features::ExtractedIntelligence;

pub struct NarrativeGenerator {
    config: NarrativeConfig,
}

impl NarrativeGenerator {
    pub fn new(config: NarrativeConfig) -> Self {
        Self { config }
    }

    pub fn recommendations(&self, assessment: &RiskAssessment) -> Vec<String> {
        if assessment.is_scam {
            self.config.scam_recommendations.clone()
        } else {
            self.config.safe_recommendations.clone()
        }
    }

    pub fn notes(
        &self,
        character_count: usize,
        assessment: &RiskAssessment,
        matches: &CategoryMatchSet,
        intelligence: &ExtractedIntelligence,
        channel: Option<&str>,
    ) -> String {
        let source = match channel {
            Some(channel) if !channel.trim().is_empty() => {
                format!("{} characters received via {}", character_count, channel.trim())
            }
            _ => format!("{character_count} characters"),
        };

        let per_category = matches
            .groups()
            .iter()
            .map(|g| format!("{} {}", g.category, g.phrases.len()))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Analyzed {}: {} suspicious phrase matches ({}); extracted {} phone numbers, {} UPI IDs, {} bank accounts and {} phishing links. Risk level {} with score {}/100.",
            source,
            matches.total(),
            per_category,
            intelligence.phone_numbers.len(),
            intelligence.upi_ids.len(),
            intelligence.bank_accounts.len(),
            intelligence.phishing_links.len(),
            assessment.risk_level,
            assessment.score
        )
    }

    /// Recommendations and notes for one analysis.
    pub fn narrate(
        &self,
        character_count: usize,
        assessment: &RiskAssessment,
        matches: &CategoryMatchSet,
        intelligence: &ExtractedIntelligence,
        channel: Option<&str>,
    ) -> (Vec<String>, String) {
        (
            self.recommendations(assessment),
            self.notes(character_count, assessment, matches, intelligence, channel),
        )
    }
}
