use super::phone_numbers::subscriber_number;
use super::unique_capped;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref BARE_DIGITS_RE: Regex = Regex::new(r"\b\d{9,18}\b").unwrap();
    // Card-like: 16 digits in groups of four, optional space/hyphen separators
    static ref GROUPED_CARD_RE: Regex =
        Regex::new(r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}[\s-]?\d{4}\b").unwrap();
}

/// Bank-account and card-like numbers.
pub struct AccountNumberExtractor {
    cap: usize,
}

impl AccountNumberExtractor {
    pub fn new(cap: usize) -> Self {
        Self { cap }
    }

    /// Pools both pattern families in text order. Digit runs that are just a
    /// phone number already seen in `phone_keys` are skipped.
    pub fn extract(&self, text: &str, phone_keys: &HashSet<String>) -> Vec<String> {
        let mut candidates: Vec<(usize, &str)> = BARE_DIGITS_RE
            .find_iter(text)
            .chain(GROUPED_CARD_RE.find_iter(text))
            .map(|m| (m.start(), m.as_str()))
            .collect();
        candidates.sort_by_key(|(start, _)| *start);

        unique_capped(
            candidates
                .into_iter()
                .filter(|(_, value)| !is_phone_number(value, phone_keys))
                .map(|(_, value)| value.to_string()),
            self.cap,
            str::to_string,
        )
    }
}

fn is_phone_number(value: &str, phone_keys: &HashSet<String>) -> bool {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    let is_phone_length = digits.len() == 10 || (digits.len() == 12 && digits.starts_with("91"));
    is_phone_length && phone_keys.contains(&subscriber_number(&digits))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<String> {
        AccountNumberExtractor::new(5).extract(text, &HashSet::new())
    }

    #[test]
    fn test_bare_digit_runs() {
        assert_eq!(extract("A/c 123456789 ok"), vec!["123456789"]);
        assert_eq!(
            extract("A/c 123456789012345678"),
            vec!["123456789012345678"]
        );
        // 8 and 19 digits fall outside the range
        assert!(extract("ref 12345678").is_empty());
        assert!(extract("ref 1234567890123456789").is_empty());
    }

    #[test]
    fn test_grouped_card_numbers() {
        assert_eq!(
            extract("card 4111 1111 1111 1111 expires"),
            vec!["4111 1111 1111 1111"]
        );
        assert_eq!(
            extract("card 5500-0000-0000-0004"),
            vec!["5500-0000-0000-0004"]
        );
    }

    #[test]
    fn test_pools_both_families_without_duplicates() {
        let text = "4111111111111111 then 4111111111111111 then 222233334444";
        assert_eq!(extract(text), vec!["4111111111111111", "222233334444"]);
    }

    #[test]
    fn test_text_order_across_families() {
        let text = "card 4111-1111-1111-1111, account 987654321012";
        assert_eq!(
            extract(text),
            vec!["4111-1111-1111-1111", "987654321012"]
        );
    }

    #[test]
    fn test_skips_known_phone_numbers() {
        let mut phones = HashSet::new();
        phones.insert("9876543210".to_string());

        let extractor = AccountNumberExtractor::new(5);
        assert!(extractor.extract("919876543210", &phones).is_empty());
        assert!(extractor.extract("9876543210", &phones).is_empty());
        assert_eq!(
            extractor.extract("1234567890", &phones),
            vec!["1234567890"]
        );
    }

    #[test]
    fn test_cap() {
        let text = "111111111 222222222 333333333 444444444 555555555 666666666";
        assert_eq!(extract(text).len(), 5);
    }
}
