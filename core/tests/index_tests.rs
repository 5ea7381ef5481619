use howdoi_core::{InvertedIndex, StopWords, TagPolicy};
use std::collections::BTreeSet;

fn ids(list: &[u32]) -> BTreeSet<u32> { list.iter().copied().collect() }

#[test]
fn end_to_end_add_search_delete() {
    let mut idx = InvertedIndex::new();
    let id = idx.add_document("list all files", &[]).unwrap();
    assert_eq!(id, 0);
    assert_eq!(idx.search(["files"]), ids(&[0]));
    assert!(idx.search(["missing"]).is_empty());
    assert!(idx.delete_document(0));
    assert!(idx.search(["files"]).is_empty());
    assert!(idx.is_empty());
}

#[test]
fn search_is_case_insensitive() {
    let mut idx = InvertedIndex::new();
    let id = idx.add_document("List Files", &[]).unwrap();
    assert_eq!(idx.search(["list"]), ids(&[id]));
    assert_eq!(idx.search(["LIST"]), ids(&[id]));
    assert_eq!(idx.search(["fIlEs", "list"]), ids(&[id]));
}

#[test]
fn stop_words_alone_match_nothing() {
    let mut idx = InvertedIndex::new();
    for text in ["the cat", "the dog", "find the bone"] {
        idx.add_document(text, &[]).unwrap();
    }
    assert!(idx.search(["the"]).is_empty());
    assert!(idx.search(["the", "an"]).is_empty());
    assert!(idx.postings("the").is_none());
    assert_eq!(idx.search(["the", "dog"]), ids(&[1]));
}

#[test]
fn every_subset_of_effective_terms_finds_the_document() {
    let mut idx = InvertedIndex::new();
    idx.add_document("docker ps all containers", &[]).unwrap();
    let id = idx.add_document("docker compose up detached", &[]).unwrap();
    let terms = ["docker", "compose", "up", "detached"];
    for mask in 1u32..(1 << terms.len()) {
        let query: Vec<&str> = terms
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, t)| *t)
            .collect();
        assert!(idx.search(&query).contains(&id), "query {query:?}");
    }
}

#[test]
fn delete_reclaims_unique_terms_only() {
    let mut idx = InvertedIndex::new();
    let a = idx.add_document("grep recursive pattern", &[]).unwrap();
    let b = idx.add_document("grep count matches", &[]).unwrap();
    assert!(idx.delete_document(a));

    assert!(idx.postings("recursive").is_none());
    assert!(idx.postings("pattern").is_none());
    assert_eq!(idx.postings("grep"), Some(&[b][..]));
    assert!(!idx.search(["recursive"]).contains(&a));
    assert!(!idx.delete_document(a));

    let mut terms: Vec<&str> = idx.terms().collect();
    terms.sort_unstable();
    assert_eq!(terms, ["count", "grep", "matches"]);
}

#[test]
fn ids_stay_monotonic_across_deletes() {
    let mut idx = InvertedIndex::new();
    let first = idx.add_document("one", &[]).unwrap();
    let second = idx.add_document("two", &[]).unwrap();
    assert!(idx.delete_document(second));
    assert!(idx.delete_document(first));
    assert_eq!(idx.add_document("three", &[]).unwrap(), 2);
}

#[test]
fn replace_and_augment_policies_differ() {
    let tags = vec!["history".to_string()];

    let mut replace = InvertedIndex::new();
    let r = replace.add_document("git log", &tags).unwrap();
    assert!(replace.search(["git"]).is_empty());
    assert_eq!(replace.search(["history"]), ids(&[r]));

    let mut augment = InvertedIndex::with_policy(TagPolicy::Augment);
    let a = augment.add_document("git log", &tags).unwrap();
    assert_eq!(augment.search(["git", "history"]), ids(&[a]));
}

#[test]
fn custom_stop_words_are_honoured() {
    let mut idx = InvertedIndex::new().with_stop_words(StopWords::new(["sudo"]));
    let id = idx.add_document("sudo the reboot", &[]).unwrap();
    assert!(idx.search(["sudo"]).is_empty());
    assert_eq!(idx.search(["the"]), ids(&[id]));
}
