pub mod account_numbers;
pub mod link_analyzer;
pub mod payment_ids;
pub mod phone_numbers;

use crate::config::{EngineConfig, ExtractionLimits};
use crate::detection::CategoryMatchSet;
use account_numbers::AccountNumberExtractor;
use link_analyzer::LinkAnalyzer;
use payment_ids::PaymentIdExtractor;
use phone_numbers::PhoneNumberExtractor;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Structured indicators pulled out of one input.
///
/// Every list is deduplicated, keeps first-seen order and is capped by
/// [`ExtractionLimits`]. `links` holds every http(s) link; only the
/// flagged subset is reported in `phishing_links`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedIntelligence {
    pub bank_accounts: Vec<String>,
    pub upi_ids: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub phishing_links: Vec<String>,
    pub suspicious_keywords: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

impl ExtractedIntelligence {
    /// True when no scored indicator (accounts, UPI ids, phones, phishing links) was found.
    pub fn has_no_indicators(&self) -> bool {
        self.bank_accounts.is_empty()
            && self.upi_ids.is_empty()
            && self.phone_numbers.is_empty()
            && self.phishing_links.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.has_no_indicators() && self.suspicious_keywords.is_empty() && self.links.is_empty()
    }

    /// Folds `other` into `self`, keeping the dedup and cap guarantees.
    pub fn merge(&mut self, other: &ExtractedIntelligence, limits: &ExtractionLimits) {
        extend_unique(&mut self.bank_accounts, &other.bank_accounts, limits.bank_accounts);
        extend_unique(&mut self.upi_ids, &other.upi_ids, limits.upi_ids);
        extend_unique(&mut self.phone_numbers, &other.phone_numbers, limits.phone_numbers);
        extend_unique(&mut self.phishing_links, &other.phishing_links, limits.links);
        extend_unique(
            &mut self.suspicious_keywords,
            &other.suspicious_keywords,
            limits.suspicious_keywords,
        );
        extend_unique(&mut self.links, &other.links, limits.links);
    }
}

fn extend_unique(target: &mut Vec<String>, values: &[String], cap: usize) {
    for value in values {
        if target.len() >= cap {
            break;
        }
        if !target.contains(value) {
            target.push(value.clone());
        }
    }
}

/// Deduplicates by `key`, keeps first-seen order and stops at `cap`.
pub(crate) fn unique_capped<I, F>(values: I, cap: usize, key: F) -> Vec<String>
where
    I: IntoIterator<Item = String>,
    F: Fn(&str) -> String,
{
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for value in values {
        if result.len() >= cap {
            break;
        }
        if seen.insert(key(&value)) {
            result.push(value);
        }
    }
    result
}

/// Runs the fixed set of regex extractors over one input.
pub struct IntelligenceExtractor {
    phones: PhoneNumberExtractor,
    payment_ids: PaymentIdExtractor,
    accounts: AccountNumberExtractor,
    links: LinkAnalyzer,
    limits: ExtractionLimits,
}

impl IntelligenceExtractor {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            phones: PhoneNumberExtractor::new(config.limits.phone_numbers),
            payment_ids: PaymentIdExtractor::new(
                config.payment_ids.email_suffixes.clone(),
                config.limits.upi_ids,
            ),
            accounts: AccountNumberExtractor::new(config.limits.bank_accounts),
            links: LinkAnalyzer::from_config(&config.links),
            limits: config.limits.clone(),
        }
    }

    /// Extracts every indicator from `text`. Never fails; odd input just yields fewer hits.
    pub fn extract(&self, text: &str) -> ExtractedIntelligence {
        let phone_matches = self.phones.find_all(text);
        let phone_keys: HashSet<String> = phone_matches
            .iter()
            .map(|p| phone_numbers::subscriber_number(p))
            .collect();

        let links = self.links.extract_links(text);
        let phishing_links = unique_capped(
            links
                .iter()
                .filter(|link| link.is_phishing)
                .map(|link| link.url.clone()),
            self.limits.links,
            str::to_string,
        );

        ExtractedIntelligence {
            bank_accounts: self.accounts.extract(text, &phone_keys),
            upi_ids: self.payment_ids.extract(text),
            phone_numbers: self.phones.cap(phone_matches),
            phishing_links,
            suspicious_keywords: Vec::new(),
            links: unique_capped(
                links.into_iter().map(|link| link.url),
                self.limits.links,
                str::to_string,
            ),
        }
    }

    /// Merged list of matched phrases across categories, deduplicated and capped.
    pub fn suspicious_keywords(&self, matches: &CategoryMatchSet) -> Vec<String> {
        unique_capped(
            matches.all_phrases().cloned(),
            self.limits.suspicious_keywords,
            str::to_lowercase,
        )
    }
}
