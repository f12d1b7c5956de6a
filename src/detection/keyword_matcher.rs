use super::{CategoryMatchSet, CategoryMatches};
use crate::config::{ConfigError, KeywordCategory};
use crate::normalization::TextNormalizer;
use regex::Regex;

struct CompiledPhrase {
    original: String,
    folded: String,
    /// Present for multi-word phrases when filler tokens are tolerated.
    gapped: Option<Regex>,
}

impl CompiledPhrase {
    fn matches(&self, folded_text: &str) -> bool {
        folded_text.contains(&self.folded)
            || self
                .gapped
                .as_ref()
                .map_or(false, |pattern| pattern.is_match(folded_text))
    }
}

struct CompiledCategory {
    name: String,
    phrases: Vec<CompiledPhrase>,
}

/// Case-insensitive phrase matcher over a fixed category table.
///
/// Matching is substring containment on folded text, never word splitting,
/// so phrases in scripts without spaces (or mixed with Latin) still hit.
/// A multi-word phrase also matches when up to `phrase_gap` filler tokens
/// sit between its words ("share your otp" for `share otp`).
pub struct KeywordMatcher {
    categories: Vec<CompiledCategory>,
}

impl KeywordMatcher {
    pub fn new(
        categories: &[KeywordCategory],
        phrase_gap: usize,
        normalizer: &TextNormalizer,
    ) -> Result<Self, ConfigError> {
        let mut compiled = Vec::with_capacity(categories.len());

        for category in categories {
            let mut phrases = Vec::with_capacity(category.phrases.len());
            for phrase in &category.phrases {
                let folded = normalizer.fold_phrase(phrase);
                let gapped = Self::gap_pattern(&folded, phrase_gap)
                    .map(|pattern| {
                        Regex::new(&pattern).map_err(|source| ConfigError::Pattern {
                            phrase: phrase.clone(),
                            source,
                        })
                    })
                    .transpose()?;

                phrases.push(CompiledPhrase {
                    original: phrase.clone(),
                    folded,
                    gapped,
                });
            }

            compiled.push(CompiledCategory {
                name: category.name.clone(),
                phrases,
            });
        }

        log::debug!(
            "Compiled keyword matcher: {} categories, {} phrases",
            compiled.len(),
            compiled.iter().map(|c| c.phrases.len()).sum::<usize>()
        );

        Ok(Self {
            categories: compiled,
        })
    }

    fn gap_pattern(folded_phrase: &str, phrase_gap: usize) -> Option<String> {
        let words: Vec<&str> = folded_phrase.split(' ').collect();
        if phrase_gap == 0 || words.len() < 2 {
            return None;
        }

        let separator = format!(r"\s+(?:\S+\s+){{0,{phrase_gap}}}");
        let escaped: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
        Some(escaped.join(&separator))
    }

    /// Records every configured phrase found in `folded_text`; no early exit.
    pub fn find_matches(&self, folded_text: &str) -> CategoryMatchSet {
        let groups = self
            .categories
            .iter()
            .map(|category| CategoryMatches {
                category: category.name.clone(),
                phrases: if folded_text.is_empty() {
                    Vec::new()
                } else {
                    category
                        .phrases
                        .iter()
                        .filter(|phrase| phrase.matches(folded_text))
                        .map(|phrase| phrase.original.clone())
                        .collect()
                },
            })
            .collect();

        CategoryMatchSet::new(groups)
    }
}
