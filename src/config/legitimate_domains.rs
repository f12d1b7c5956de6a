use crate::domain_utils::DomainUtils;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Known-good domains grouped by sector (banks, ecommerce, government, payments).
///
/// Hosts on this list never raise a phishing flag, even when the URL carries
/// a marker such as `verify` or `login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegitimateDomainsConfig {
    pub legitimate_domains: BTreeMap<String, Vec<String>>,
}

impl Default for LegitimateDomainsConfig {
    fn default() -> Self {
        let mut legitimate_domains = BTreeMap::new();
        legitimate_domains.insert(
            "banks".to_string(),
            to_strings(&[
                "sbi.co.in",
                "onlinesbi.sbi",
                "onlinesbi.com",
                "hdfcbank.com",
                "icicibank.com",
                "axisbank.com",
                "kotak.com",
                "pnbindia.in",
                "bankofbaroda.in",
                "rbi.org.in",
            ]),
        );
        legitimate_domains.insert(
            "ecommerce".to_string(),
            to_strings(&["amazon.in", "amazon.com", "flipkart.com", "myntra.com"]),
        );
        legitimate_domains.insert(
            "government".to_string(),
            to_strings(&[
                "gov.in",
                "nic.in",
                "india.gov.in",
                "incometax.gov.in",
                "uidai.gov.in",
                "cybercrime.gov.in",
            ]),
        );
        legitimate_domains.insert(
            "payments".to_string(),
            to_strings(&[
                "paytm.com",
                "phonepe.com",
                "pay.google.com",
                "npci.org.in",
                "bhimupi.org.in",
                "razorpay.com",
            ]),
        );

        Self { legitimate_domains }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl LegitimateDomainsConfig {
    pub fn all_domains(&self) -> Vec<String> {
        let mut domains = Vec::new();
        for domain_list in self.legitimate_domains.values() {
            domains.extend(domain_list.iter().cloned());
        }
        domains
    }

    /// Returns the sector a host belongs to, matching exact domains and subdomains.
    pub fn sector_for(&self, host: &str) -> Option<&str> {
        let host = DomainUtils::canonicalize_domain(host);
        self.legitimate_domains
            .iter()
            .find(|(_, domains)| DomainUtils::matches_domain_list(&host, domains))
            .map(|(sector, _)| sector.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_lookup() {
        let config = LegitimateDomainsConfig::default();
        assert_eq!(config.sector_for("www.amazon.in"), Some("ecommerce"));
        assert_eq!(config.sector_for("retail.onlinesbi.sbi"), Some("banks"));
        assert_eq!(config.sector_for("services.gst.gov.in"), Some("government"));
        assert_eq!(config.sector_for("amazon-verify.suspicious.com"), None);
        assert_eq!(config.sector_for("notamazon.in"), None);
    }

    #[test]
    fn test_all_domains_flattens_sectors() {
        let config = LegitimateDomainsConfig::default();
        let domains = config.all_domains();
        assert!(domains.contains(&"paytm.com".to_string()));
        assert!(domains.contains(&"hdfcbank.com".to_string()));
    }
}
