use url::Url;

/// Minimal domain hierarchy utilities
pub struct DomainUtils;

impl DomainUtils {
    /// Extract the lowercase host from an http(s) URL
    pub fn host_from_url(url: &str) -> Option<String> {
        Url::parse(url)
            .ok()?
            .host_str()
            .map(|h| h.trim_end_matches('.').to_lowercase())
    }

    /// Check if domain matches any in list (with hierarchy support)
    pub fn matches_domain_list(domain: &str, domain_list: &[String]) -> bool {
        let domain_lower = domain.to_lowercase();

        domain_list.iter().any(|pattern| {
            let pattern_lower = pattern.to_lowercase();
            domain_lower == pattern_lower || domain_lower.ends_with(&format!(".{pattern_lower}"))
        })
    }

    /// Canonicalize domain (remove www prefix)
    pub fn canonicalize_domain(domain: &str) -> String {
        let domain_lower = domain.to_lowercase();
        match domain_lower.strip_prefix("www.") {
            Some(stripped) => stripped.to_string(),
            None => domain_lower,
        }
    }
}
