use super::unique_capped;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Indian mobile numbers: 10 digits starting 6-9, optional +91 / 91 prefix
    static ref PHONE_RE: Regex =
        Regex::new(r"(?:\+91[\s-]?|\b91[\s-]?|\b)[6-9]\d{9}\b").unwrap();
}

/// The 10-digit subscriber number, used as the dedup key so that
/// `+91 9876543210` and `9876543210` count once.
pub fn subscriber_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    let skip = digits.len().saturating_sub(10);
    digits[skip..].to_string()
}

pub struct PhoneNumberExtractor {
    cap: usize,
}

impl PhoneNumberExtractor {
    pub fn new(cap: usize) -> Self {
        Self { cap }
    }

    /// Every phone match in text order, before dedup and cap.
    pub fn find_all(&self, text: &str) -> Vec<String> {
        PHONE_RE
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    pub fn cap(&self, matches: Vec<String>) -> Vec<String> {
        unique_capped(matches, self.cap, subscriber_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<String> {
        let extractor = PhoneNumberExtractor::new(5);
        extractor.cap(extractor.find_all(text))
    }

    #[test]
    fn test_prefixes_and_separators() {
        assert_eq!(extract("Call +919876543210"), vec!["+919876543210"]);
        assert_eq!(extract("Call +91-8765432109"), vec!["+91-8765432109"]);
        assert_eq!(extract("Call 91 7654321098 now"), vec!["91 7654321098"]);
        assert_eq!(extract("Call 6543210987."), vec!["6543210987"]);
    }

    #[test]
    fn test_rejects_invalid_numbers() {
        // Leading digit outside 6-9
        assert!(extract("Call 5432109876").is_empty());
        // Too long to be a mobile number
        assert!(extract("Ref 98765432101234").is_empty());
        // Too short
        assert!(extract("Call 987654321").is_empty());
    }

    #[test]
    fn test_repeated_number_is_deduplicated() {
        let text = vec!["9876543210"; 8].join(" and ");
        assert_eq!(extract(&text), vec!["9876543210"]);

        let text = "Call +919876543210 or 9876543210";
        assert_eq!(extract(text), vec!["+919876543210"]);
    }

    #[test]
    fn test_caps_at_limit_in_first_seen_order() {
        let text = "9000000001, 8000000002, 7000000003, 6000000004, 9111111115, 8222222226";
        assert_eq!(
            extract(text),
            vec![
                "9000000001",
                "8000000002",
                "7000000003",
                "6000000004",
                "9111111115"
            ]
        );
    }

    #[test]
    fn test_subscriber_number() {
        assert_eq!(subscriber_number("+91 98765-43210"), "9876543210");
        assert_eq!(subscriber_number("9876543210"), "9876543210");
    }
}
