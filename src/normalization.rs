use std::collections::HashMap;

/// Input text prepared for the two consumers in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// Zero-width characters removed, casing kept. Fed to the extractor.
    pub cleaned: String,
    /// Lowercased, homoglyph-folded, whitespace-collapsed. Fed to the matcher.
    pub folded: String,
}

pub struct TextNormalizer {
    homoglyph_map: HashMap<char, char>,
    zero_width_chars: Vec<char>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        let mut homoglyph_map = HashMap::new();

        // Cyrillic lookalikes used to dodge keyword filters
        for (from, to) in [
            ('\u{0430}', 'a'),
            ('\u{0432}', 'b'),
            ('\u{0435}', 'e'),
            ('\u{0456}', 'i'),
            ('\u{0458}', 'j'),
            ('\u{043A}', 'k'),
            ('\u{043C}', 'm'),
            ('\u{043D}', 'h'),
            ('\u{043E}', 'o'),
            ('\u{0440}', 'p'),
            ('\u{0441}', 'c'),
            ('\u{0455}', 's'),
            ('\u{0442}', 't'),
            ('\u{0443}', 'y'),
            ('\u{0445}', 'x'),
        ] {
            homoglyph_map.insert(from, to);
        }

        // Greek
        for (from, to) in [
            ('\u{03B1}', 'a'),
            ('\u{03B9}', 'i'),
            ('\u{03BA}', 'k'),
            ('\u{03BF}', 'o'),
            ('\u{03C1}', 'p'),
            ('\u{03C4}', 't'),
            ('\u{03C5}', 'u'),
        ] {
            homoglyph_map.insert(from, to);
        }

        Self {
            homoglyph_map,
            zero_width_chars: vec!['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'],
        }
    }

    pub fn normalize(&self, text: &str) -> NormalizedText {
        let cleaned = self.strip_zero_width(text);
        let folded = self.fold(&cleaned);

        NormalizedText {
            cleaned,
            folded,
        }
    }

    /// Folds a configured phrase exactly the way input text is folded, so
    /// substring containment compares like with like.
    pub fn fold_phrase(&self, phrase: &str) -> String {
        self.fold(&self.strip_zero_width(phrase))
    }

    fn strip_zero_width(&self, text: &str) -> String {
        text.chars()
            .filter(|c| !self.zero_width_chars.contains(c))
            .collect()
    }

    fn fold(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let mut folded = String::with_capacity(lowered.len());
        let mut pending_space = false;

        for c in lowered.chars() {
            if c.is_whitespace() {
                pending_space = !folded.is_empty();
                continue;
            }
            if pending_space {
                folded.push(' ');
                pending_space = false;
            }
            folded.push(*self.homoglyph_map.get(&c).unwrap_or(&c));
        }

        folded
    }
}
