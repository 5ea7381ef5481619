use crate::error::{IndexError, Result};
use crate::tags::{effective_terms, normalize_term, StopWords, TagPolicy};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

pub type DocId = u32;

/// Tag-searchable document store.
///
/// Invariant: a document id appears in the postings list of a term exactly as
/// many times as that term occurs among the document's effective terms, and
/// no term maps to an empty postings list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvertedIndex {
    pub(crate) postings: HashMap<String, Vec<DocId>>,
    pub(crate) documents: BTreeMap<DocId, String>,
    pub(crate) custom_tags: BTreeMap<DocId, Vec<String>>,
    pub(crate) next_doc_id: DocId,
    pub(crate) tag_policy: TagPolicy,
    stop_words: StopWords,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn with_policy(tag_policy: TagPolicy) -> Self {
        Self { tag_policy, ..Self::default() }
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    /// Store `text` and index it under its effective terms. Empty `tags` means
    /// the text words are used; otherwise the policy decides.
    ///
    /// Fails without touching the index once every id has been handed out.
    pub fn add_document(&mut self, text: &str, tags: &[String]) -> Result<DocId> {
        let doc_id = self.next_doc_id;
        self.next_doc_id = doc_id.checked_add(1).ok_or(IndexError::IdsExhausted)?;
        self.documents.insert(doc_id, text.to_string());
        if !tags.is_empty() {
            self.custom_tags.insert(doc_id, tags.to_vec());
        }

        let terms = effective_terms(text, tags, self.tag_policy, &self.stop_words);
        for term in &terms {
            self.postings.entry(term.clone()).or_default().push(doc_id);
        }
        tracing::debug!(doc_id, terms = terms.len(), "added document");
        Ok(doc_id)
    }

    /// Remove a document and reclaim any postings lists it leaves empty.
    /// Returns `false` if the id is unknown.
    pub fn delete_document(&mut self, doc_id: DocId) -> bool {
        let Some(text) = self.documents.remove(&doc_id) else {
            tracing::debug!(doc_id, "delete of unknown document");
            return false;
        };
        let tags = self.custom_tags.remove(&doc_id).unwrap_or_default();

        for term in effective_terms(&text, &tags, self.tag_policy, &self.stop_words) {
            let Some(ids) = self.postings.get_mut(&term) else { continue };
            if let Some(pos) = ids.iter().position(|&id| id == doc_id) {
                ids.remove(pos);
            }
            if ids.is_empty() {
                self.postings.remove(&term);
            }
        }
        tracing::debug!(doc_id, "deleted document");
        true
    }

    /// Documents tagged with every usable query term.
    ///
    /// Stop words and terms absent from the index add no constraint. A query
    /// with no usable terms matches nothing.
    pub fn search<I, S>(&self, query: I) -> BTreeSet<DocId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lists = query
            .into_iter()
            .filter_map(|t| normalize_term(t.as_ref(), &self.stop_words))
            .filter_map(|t| self.postings.get(&t));

        let Some(first) = lists.next() else { return BTreeSet::new() };
        let mut matches: BTreeSet<DocId> = first.iter().copied().collect();
        for ids in lists {
            if matches.is_empty() { break; }
            let ids: HashSet<DocId> = ids.iter().copied().collect();
            matches.retain(|id| ids.contains(id));
        }
        tracing::debug!(hits = matches.len(), "search");
        matches
    }

    pub fn document(&self, doc_id: DocId) -> Option<&str> {
        self.documents.get(&doc_id).map(String::as_str)
    }

    /// All stored documents in ascending id order.
    pub fn documents(&self) -> impl Iterator<Item = (DocId, &str)> + '_ {
        self.documents.iter().map(|(id, text)| (*id, text.as_str()))
    }

    pub fn custom_tags(&self, doc_id: DocId) -> Option<&[String]> {
        self.custom_tags.get(&doc_id).map(Vec::as_slice)
    }

    /// Postings list for a term, after normalization.
    pub fn postings(&self, term: &str) -> Option<&[DocId]> {
        let term = normalize_term(term, &self.stop_words)?;
        self.postings.get(&term).map(Vec::as_slice)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }

    pub fn next_doc_id(&self) -> DocId { self.next_doc_id }

    pub fn tag_policy(&self) -> TagPolicy { self.tag_policy }

    pub fn stop_words(&self) -> &StopWords { &self.stop_words }
}

/// Parse a document id given as text, e.g. from the command line.
pub fn parse_doc_id(raw: &str) -> Result<DocId> {
    raw.trim().parse().map_err(|_| IndexError::InvalidDocId(raw.to_string()))
}
