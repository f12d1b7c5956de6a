pub mod keyword_matcher;

pub use keyword_matcher::KeywordMatcher;

use serde::{Deserialize, Serialize};

/// Phrases of one category found in a single input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMatches {
    pub category: String,
    pub phrases: Vec<String>,
}

/// Per-category phrase hits for one analysis, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMatchSet {
    groups: Vec<CategoryMatches>,
}

impl CategoryMatchSet {
    pub fn new(groups: Vec<CategoryMatches>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[CategoryMatches] {
        &self.groups
    }

    /// Matched phrases for `category`; empty when the category is unknown or had no hits.
    pub fn get(&self, category: &str) -> &[String] {
        self.groups
            .iter()
            .find(|g| g.category == category)
            .map(|g| g.phrases.as_slice())
            .unwrap_or(&[])
    }

    pub fn count(&self, category: &str) -> usize {
        self.get(category).len()
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.phrases.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Every matched phrase, category by category.
    pub fn all_phrases(&self) -> impl Iterator<Item = &String> {
        self.groups.iter().flat_map(|g| g.phrases.iter())
    }
}
