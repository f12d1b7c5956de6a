use crate::config::LinkPolicy;
use crate::domain_utils::DomainUtils;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref LINK_RE: Regex = Regex::new(r#"(?i)https?://[^\s<>"'`]+"#).unwrap();
}

/// Sentence punctuation that commonly trails a pasted link.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '\'', '"'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    pub url: String,
    pub host: Option<String>,
    pub is_phishing: bool,
    /// Sector of the allowlisted domain the host belongs to, if any.
    pub legitimate_sector: Option<String>,
}

pub struct LinkAnalyzer {
    phishing_markers: Vec<String>,
    policy: LinkPolicy,
}

impl LinkAnalyzer {
    pub fn from_config(policy: &LinkPolicy) -> Self {
        Self {
            phishing_markers: policy
                .phishing_markers
                .iter()
                .map(|m| m.to_lowercase())
                .collect(),
            policy: policy.clone(),
        }
    }

    /// Every distinct http(s) link in text order, each with its verdict.
    /// Uncapped, so a run of harmless links can't push a phishing link out.
    pub fn extract_links(&self, text: &str) -> Vec<ExtractedLink> {
        let mut seen = HashSet::new();
        let mut links: Vec<ExtractedLink> = Vec::new();

        for m in LINK_RE.find_iter(text) {
            let url = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            if seen.insert(url) {
                links.push(self.analyze_link(url));
            }
        }

        links
    }

    pub fn analyze_link(&self, url: &str) -> ExtractedLink {
        let host = DomainUtils::host_from_url(url);
        let legitimate_sector = host
            .as_deref()
            .and_then(|h| self.policy.legitimate_domains.sector_for(h))
            .map(str::to_string);

        let url_lower = url.to_lowercase();
        let has_marker = self
            .phishing_markers
            .iter()
            .any(|marker| url_lower.contains(marker.as_str()));
        let allowlisted = self.policy.allowlist_enabled && legitimate_sector.is_some();

        if has_marker && allowlisted {
            log::debug!(
                "Link {} carries a phishing marker but is on the {} allowlist",
                url,
                legitimate_sector.as_deref().unwrap_or_default()
            );
        }

        ExtractedLink {
            url: url.to_string(),
            host,
            is_phishing: has_marker && !allowlisted,
            legitimate_sector,
        }
    }
}
