/// Unicode script detection for the scripts seen in Indian scam traffic.
pub struct ScriptDetector;

const SCRIPTS: &[&str] = &[
    "Latin",
    "Devanagari",
    "Bengali",
    "Gurmukhi",
    "Gujarati",
    "Tamil",
    "Telugu",
    "Kannada",
    "Malayalam",
    "Cyrillic",
    "Arabic",
];

impl ScriptDetector {
    pub fn contains_script(text: &str, script: &str) -> bool {
        match script.to_lowercase().as_str() {
            "latin" => text.chars().any(|c| c.is_ascii_alphabetic()),
            "devanagari" | "hindi" | "hi" => Self::contains_range(text, '\u{0900}', '\u{097F}'),
            "bengali" | "bn" => Self::contains_range(text, '\u{0980}', '\u{09FF}'),
            "gurmukhi" | "punjabi" | "pa" => Self::contains_range(text, '\u{0A00}', '\u{0A7F}'),
            "gujarati" | "gu" => Self::contains_range(text, '\u{0A80}', '\u{0AFF}'),
            "tamil" | "ta" => Self::contains_range(text, '\u{0B80}', '\u{0BFF}'),
            "telugu" | "te" => Self::contains_range(text, '\u{0C00}', '\u{0C7F}'),
            "kannada" | "kn" => Self::contains_range(text, '\u{0C80}', '\u{0CFF}'),
            "malayalam" | "ml" => Self::contains_range(text, '\u{0D00}', '\u{0D7F}'),
            "cyrillic" => Self::contains_cyrillic(text),
            "arabic" | "urdu" | "ur" => Self::contains_arabic(text),
            _ => {
                log::warn!("Unsupported script for detection: {script}");
                false
            }
        }
    }

    fn contains_range(text: &str, start: char, end: char) -> bool {
        text.chars().any(|c| (start..=end).contains(&c))
    }

    fn contains_cyrillic(text: &str) -> bool {
        text.chars().any(|c| {
            matches!(c,
                '\u{0400}'..='\u{04FF}' |  // Cyrillic
                '\u{0500}'..='\u{052F}'    // Cyrillic Supplement
            )
        })
    }

    fn contains_arabic(text: &str) -> bool {
        text.chars().any(|c| {
            matches!(c,
                '\u{0600}'..='\u{06FF}' |  // Arabic
                '\u{0750}'..='\u{077F}' |  // Arabic Supplement
                '\u{08A0}'..='\u{08FF}'    // Arabic Extended-A
            )
        })
    }

    /// Scripts present in `text`, in a fixed order.
    pub fn detect_scripts(text: &str) -> Vec<String> {
        SCRIPTS
            .iter()
            .filter(|script| Self::contains_script(text, script))
            .map(|script| script.to_string())
            .collect()
    }
}
