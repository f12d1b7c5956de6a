use super::unique_capped;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref UPI_RE: Regex = Regex::new(r"[\w.\-]+@\w+").unwrap();
}

/// UPI-style payment handles (`name@bank`).
///
/// Email addresses look the same up to the handle, so a match immediately
/// followed by one of the configured email suffixes is dropped.
pub struct PaymentIdExtractor {
    email_suffixes: Vec<String>,
    /// Longest suffix in chars; bounds how much of the text after a match is read.
    suffix_window: usize,
    cap: usize,
}

impl PaymentIdExtractor {
    pub fn new(email_suffixes: Vec<String>, cap: usize) -> Self {
        let email_suffixes: Vec<String> = email_suffixes
            .into_iter()
            .map(|s| s.to_lowercase())
            .collect();
        let suffix_window = email_suffixes
            .iter()
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(0);

        Self {
            email_suffixes,
            suffix_window,
            cap,
        }
    }

    pub fn extract(&self, text: &str) -> Vec<String> {
        let handles = UPI_RE
            .find_iter(text)
            .filter(|m| !self.is_email(&text[m.end()..]))
            .map(|m| m.as_str().to_string());

        unique_capped(handles, self.cap, str::to_string)
    }

    fn is_email(&self, rest: &str) -> bool {
        let window: String = rest.chars().take(self.suffix_window).collect();
        let window = window.to_lowercase();
        self.email_suffixes
            .iter()
            .any(|suffix| window.starts_with(suffix.as_str()))
    }
}
