//! Tunable tables for the scoring engine.
//!
//! Every weight, threshold and list the pipeline consults lives here so that
//! call sites never carry their own literals. The defaults are the reference
//! tuning; YAML files may override any section independently.

use super::{ConfigError, LegitimateDomainsConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named group of trigger phrases that all contribute the same weight per match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCategory {
    pub name: String,
    pub phrases: Vec<String>,
    pub weight: u32,
}

impl KeywordCategory {
    pub fn new(name: &str, weight: u32, phrases: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
            weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub categories: Vec<KeywordCategory>,
    /// Filler tokens tolerated between the words of a multi-word phrase.
    pub phrase_gap: usize,
    pub scoring: ScoringConfig,
    pub limits: ExtractionLimits,
    pub links: LinkPolicy,
    pub payment_ids: PaymentIdPolicy,
    pub narrative: NarrativeConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            phrase_gap: 2,
            scoring: ScoringConfig::default(),
            limits: ExtractionLimits::default(),
            links: LinkPolicy::default(),
            payment_ids: PaymentIdPolicy::default(),
            narrative: NarrativeConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Rejects tables that would make per-call behavior ill-defined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for category in &self.categories {
            let name = category.name.trim();
            if name.is_empty() {
                return Err(ConfigError::EmptyCategoryName);
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(ConfigError::DuplicateCategory(category.name.clone()));
            }
            if category.phrases.iter().any(|p| p.trim().is_empty()) {
                return Err(ConfigError::EmptyPhrase {
                    category: category.name.clone(),
                });
            }
        }

        self.scoring.validate()
    }
}

/// Weights for extracted indicators plus the score-to-verdict mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub phone_number_weight: u32,
    pub upi_id_weight: u32,
    pub phishing_link_weight: u32,
    pub bank_account_weight: u32,
    pub scam_threshold: u32,
    pub high_threshold: u32,
    pub medium_threshold: u32,
    pub low_threshold: u32,
    pub confidence_base: f64,
    pub confidence_slope: f64,
    pub confidence_ceiling: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            phone_number_weight: 10,
            upi_id_weight: 15,
            phishing_link_weight: 20,
            bank_account_weight: 10,
            scam_threshold: 40,
            high_threshold: 70,
            medium_threshold: 40,
            low_threshold: 20,
            confidence_base: 55.0,
            confidence_slope: 0.4,
            confidence_ceiling: 95.0,
        }
    }
}

impl ScoringConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let (low, medium, high) = (
            self.low_threshold,
            self.medium_threshold,
            self.high_threshold,
        );
        if low == 0 || low >= medium || medium >= high || high > 100 {
            return Err(ConfigError::InvalidRiskBands { low, medium, high });
        }

        if self.scam_threshold == 0 || self.scam_threshold > 100 {
            return Err(ConfigError::InvalidScamThreshold(self.scam_threshold));
        }

        let confidence = [
            self.confidence_base,
            self.confidence_slope,
            self.confidence_ceiling,
        ];
        if confidence.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::InvalidConfidence(
                "base, slope and ceiling must be finite and non-negative".to_string(),
            ));
        }
        if self.confidence_ceiling > 100.0 {
            return Err(ConfigError::InvalidConfidence(format!(
                "ceiling {} exceeds 100",
                self.confidence_ceiling
            )));
        }

        Ok(())
    }
}

/// Per-field caps on extracted intelligence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionLimits {
    pub phone_numbers: usize,
    pub upi_ids: usize,
    pub bank_accounts: usize,
    pub links: usize,
    pub suspicious_keywords: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            phone_numbers: 5,
            upi_ids: 5,
            bank_accounts: 5,
            links: 5,
            suspicious_keywords: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkPolicy {
    /// Substrings that mark a link as phishing.
    pub phishing_markers: Vec<String>,
    pub allowlist_enabled: bool,
    pub legitimate_domains: LegitimateDomainsConfig,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            phishing_markers: [
                "bit.ly", "tinyurl", "shorturl", "t.co", "goo.gl", "click", "verify", "secure",
                "update", "login",
            ]
            .iter()
            .map(|m| m.to_string())
            .collect(),
            allowlist_enabled: true,
            legitimate_domains: LegitimateDomainsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentIdPolicy {
    /// A handle followed directly by one of these is an email address.
    pub email_suffixes: Vec<String>,
}

impl Default for PaymentIdPolicy {
    fn default() -> Self {
        Self {
            email_suffixes: vec![".com".to_string(), ".in".to_string(), ".org".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    pub scam_recommendations: Vec<String>,
    pub safe_recommendations: Vec<String>,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            scam_recommendations: vec![
                "Do not share OTPs, PINs, CVVs or passwords with anyone, including callers claiming to be from your bank.".to_string(),
                "Do not transfer money or approve UPI collect requests from unknown contacts.".to_string(),
                "Verify the request independently through the organisation's official website or helpline.".to_string(),
                "Report the incident to the National Cyber Crime Helpline (1930) or at https://cybercrime.gov.in.".to_string(),
            ],
            safe_recommendations: vec![
                "This message appears safe, but stay vigilant.".to_string(),
                "Never share OTPs or banking credentials, even with familiar contacts.".to_string(),
            ],
        }
    }
}

fn default_categories() -> Vec<KeywordCategory> {
    vec![
        KeywordCategory::new(
            "urgency",
            10,
            &[
                "urgent",
                "immediately",
                "right now",
                "act now",
                "within 24 hours",
                "expire",
                "last chance",
                "hurry",
                "limited time",
                "final notice",
                "turant",
                "jaldi",
                "तुरंत",
                "जल्दी",
            ],
        ),
        KeywordCategory::new(
            "financial",
            10,
            &[
                "bank account",
                "transfer",
                "payment",
                "pay",
                "upi",
                "refund",
                "cashback",
                "lottery",
                "prize",
                "reward",
                "you have won",
                "winner",
                "loan",
                "kyc",
                "credit card",
                "debit card",
                "processing fee",
                "paisa",
                "पैसे",
                "भुगतान",
            ],
        ),
        KeywordCategory::new(
            "impersonation",
            15,
            &[
                "sbi",
                "hdfc",
                "icici",
                "axis bank",
                "rbi",
                "reserve bank",
                "income tax",
                "police",
                "cbi",
                "customs",
                "courier",
                "fedex",
                "amazon",
                "flipkart",
                "paytm",
                "customer care",
                "bank manager",
                "government",
                "cyber cell",
                "trai",
            ],
        ),
        KeywordCategory::new(
            "dataRequest",
            15,
            &[
                "share otp",
                "send otp",
                "otp batao",
                "one time password",
                "cvv",
                "upi pin",
                "atm pin",
                "mpin",
                "password",
                "card number",
                "account number",
                "aadhaar",
                "pan card",
                "verify your account",
                "login details",
                "ओटीपी",
            ],
        ),
        KeywordCategory::new(
            "threat",
            12,
            &[
                "blocked",
                "suspension",
                "suspended",
                "deactivated",
                "legal action",
                "arrest",
                "penalty",
                "frozen",
                "terminated",
                "warrant",
                "disconnected",
                "band ho jayega",
                "बंद",
                "गिरफ्तार",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        let names: Vec<&str> = config.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["urgency", "financial", "impersonation", "dataRequest", "threat"]
        );
    }

    #[test]
    fn test_duplicate_category_names_rejected() {
        let mut config = EngineConfig::default();
        config
            .categories
            .push(KeywordCategory::new("Threat", 5, &["doom"]));

        match config.validate() {
            Err(ConfigError::DuplicateCategory(name)) => assert_eq!(name, "Threat"),
            other => panic!("expected duplicate category error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_phrase_rejected() {
        let mut config = EngineConfig::default();
        config.categories = vec![KeywordCategory::new("urgency", 10, &["urgent", "  "])];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyPhrase { .. })
        ));
    }

    #[test]
    fn test_overlapping_risk_bands_rejected() {
        let mut config = EngineConfig::default();
        config.scoring.medium_threshold = 80;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRiskBands { medium: 80, .. })
        ));
    }

    #[test]
    fn test_scam_threshold_bounds() {
        let mut config = EngineConfig::default();
        config.scoring.scam_threshold = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidScamThreshold(0))
        ));

        config.scoring.scam_threshold = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_confidence_ceiling_bounds() {
        let mut config = EngineConfig::default();
        config.scoring.confidence_ceiling = 120.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfidence(_))
        ));
    }
}
