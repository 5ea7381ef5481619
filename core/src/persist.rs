//! Single-file storage for an [`InvertedIndex`].
//!
//! The file holds one line: a JSON object whose values are themselves JSON
//! documents encoded as strings.
//!
//! ```text
//! {"index":"{\"git\":[0]}","documents":"{\"0\":\"git log\"}","custom_tags":"{}","next_doc_id":"1"}
//! ```
//!
//! Document ids are integers in memory and string keys on the wire; the
//! conversion happens only in this module.

use crate::error::{IndexError, Result};
use crate::index::{DocId, InvertedIndex};
use crate::tags::TagPolicy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    index: String,
    #[serde(alias = "term_dict")]
    documents: String,
    #[serde(default)]
    custom_tags: Option<String>,
    next_doc_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tag_policy: Option<TagPolicy>,
}

pub fn serialize(index: &InvertedIndex) -> Result<Vec<u8>> {
    // Sorted keys keep the file stable across saves.
    let postings: BTreeMap<&str, &Vec<DocId>> =
        index.postings.iter().map(|(term, ids)| (term.as_str(), ids)).collect();
    let documents: BTreeMap<String, &str> =
        index.documents.iter().map(|(id, text)| (id.to_string(), text.as_str())).collect();
    let custom_tags: BTreeMap<String, &Vec<String>> =
        index.custom_tags.iter().map(|(id, tags)| (id.to_string(), tags)).collect();

    let record = Record {
        index: serde_json::to_string(&postings)?,
        documents: serde_json::to_string(&documents)?,
        custom_tags: Some(serde_json::to_string(&custom_tags)?),
        next_doc_id: serde_json::to_string(&index.next_doc_id)?,
        tag_policy: match index.tag_policy {
            TagPolicy::Replace => None,
            policy => Some(policy),
        },
    };
    Ok(serde_json::to_vec(&record)?)
}

pub fn deserialize(bytes: &[u8]) -> Result<InvertedIndex> {
    let line = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    let line = std::str::from_utf8(line)
        .map_err(|e| IndexError::Corrupt(format!("not valid UTF-8: {e}")))?;
    let record: Record = serde_json::from_str(line.trim_end_matches('\r'))?;

    let postings: HashMap<String, Vec<DocId>> = serde_json::from_str(&record.index)?;
    let documents = with_doc_id_keys(serde_json::from_str::<BTreeMap<String, String>>(&record.documents)?)?;
    let custom_tags = match record.custom_tags.as_deref() {
        Some(raw) => with_doc_id_keys(serde_json::from_str::<BTreeMap<String, Vec<String>>>(raw)?)?,
        None => BTreeMap::new(),
    };
    let next_doc_id: DocId = serde_json::from_str(&record.next_doc_id)?;

    if let Some(&max) = documents.keys().next_back() {
        if max >= next_doc_id {
            return Err(IndexError::Corrupt(format!(
                "next_doc_id {next_doc_id} does not exceed stored document id {max}"
            )));
        }
    }

    for (term, ids) in &postings {
        if term.is_empty() || ids.is_empty() {
            return Err(IndexError::Corrupt(format!("empty term or postings list for {term:?}")));
        }
        if let Some(id) = ids.iter().find(|id| !documents.contains_key(*id)) {
            return Err(IndexError::Corrupt(format!("term {term:?} lists unknown document {id}")));
        }
    }
    if let Some(id) = custom_tags.keys().find(|id| !documents.contains_key(*id)) {
        return Err(IndexError::Corrupt(format!("custom tags for unknown document {id}")));
    }

    let mut index = InvertedIndex::with_policy(record.tag_policy.unwrap_or_default());
    index.postings = postings;
    index.documents = documents;
    index.custom_tags = custom_tags;
    index.next_doc_id = next_doc_id;
    Ok(index)
}

fn with_doc_id_keys<V>(map: BTreeMap<String, V>) -> Result<BTreeMap<DocId, V>> {
    map.into_iter()
        .map(|(key, value)| {
            let id = key
                .parse::<DocId>()
                .map_err(|_| IndexError::Corrupt(format!("document id key {key:?} is not an integer")))?;
            Ok((id, value))
        })
        .collect()
}

/// Read an index file. A missing file is reported as [`IndexError::NotFound`].
pub fn load_index<P: AsRef<Path>>(path: P) -> Result<InvertedIndex> {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(IndexError::NotFound { path: path.to_path_buf() })
        }
        Err(e) => return Err(e.into()),
    };
    let index = deserialize(&bytes)?;
    tracing::info!(path = %path.display(), documents = index.len(), "loaded index");
    Ok(index)
}

/// Replace the index file with the full current state.
///
/// The data goes to a temporary file in the same directory which is then
/// renamed over `path`, so readers see either the old or the new file.
pub fn save_index<P: AsRef<Path>>(path: P, index: &InvertedIndex) -> Result<()> {
    let path = path.as_ref();
    let bytes = serialize(index)?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| IndexError::Io(e.error))?;
    tracing::info!(path = %path.display(), documents = index.len(), "saved index");
    Ok(())
}
