use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

lazy_static! {
    static ref DEFAULT_STOP_WORDS: StopWords = StopWords::new([
        "i", "a", "about", "an", "are", "as", "at", "be", "by", "for", "from",
        "how", "in", "is", "it", "of", "on", "or", "that", "the", "this", "to",
        "was", "what", "when", "where", "which", "who", "will", "with",
    ]);
}

/// Words that carry no meaning as search tags and are never indexed or queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Build a stop-word set. Entries are lowercased so lookups match normalized terms.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { words: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect() }
    }

    /// Expects an already lowercased term.
    pub fn contains(&self, term: &str) -> bool { self.words.contains(term) }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }
}

impl Default for StopWords {
    fn default() -> Self { DEFAULT_STOP_WORDS.clone() }
}

/// How custom tags combine with the words of a document's text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagPolicy {
    /// Custom tags are indexed instead of the text words.
    #[default]
    Replace,
    /// Custom tags are indexed after the text words.
    Augment,
}

/// Lowercase a raw token. Empty tokens and stop words yield `None`.
pub fn normalize_term(raw: &str, stop_words: &StopWords) -> Option<String> {
    if raw.is_empty() { return None; }
    let term = raw.to_lowercase();
    if stop_words.contains(&term) { return None; }
    Some(term)
}

/// Terms a document is indexed under, in derivation order.
///
/// The text is split on single spaces. Repeated words are kept, so a document
/// mentioning a word twice appears twice in that word's postings list.
pub fn effective_terms(
    text: &str,
    custom_tags: &[String],
    policy: TagPolicy,
    stop_words: &StopWords,
) -> Vec<String> {
    let words = text.split(' ');
    let tags = custom_tags.iter().map(String::as_str);
    let raw: Box<dyn Iterator<Item = &str> + '_> = match (policy, custom_tags.is_empty()) {
        (_, true) => Box::new(words),
        (TagPolicy::Replace, false) => Box::new(tags),
        (TagPolicy::Augment, false) => Box::new(words.chain(tags)),
    };
    raw.filter_map(|t| normalize_term(t, stop_words)).collect()
}
