//! Synonym dictionary expansion, run once at startup after indexing.
//!
//! A dictionary entry `term -> [variations]` merges the postings of the first
//! index stem containing `term` into the stems of each variation. The match
//! direction is asymmetric and the outcome depends on scan order, so key
//! scans run in lexicographic order to keep expansion deterministic. Postings
//! are copied rather than shared: a later merge into one stem must never leak
//! into another.

use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;
use walkdir::WalkDir;

use crate::index::StemIndex;
use crate::pipeline::stem;
use crate::source::load_dictionary;

/// One synonym dictionary: head term to variation strings.
pub type Dictionary = HashMap<String, Vec<String>>;

const MULTI_WORD_MARKERS: &[char] = &[' ', ',', '!', '?'];

fn is_single_term(s: &str) -> bool {
    !s.contains(MULTI_WORD_MARKERS)
}

/// Merge one dictionary into the index. Returns the number of head terms that
/// matched an index stem.
pub fn apply_dictionary(index: &mut StemIndex, dictionary: &Dictionary) -> usize {
    let mut terms: Vec<&String> = dictionary.keys().collect();
    terms.sort_unstable();
    let mut merged = 0;
    for term in terms {
        if !is_single_term(term) {
            continue;
        }
        // Variations inserted by earlier terms take part in later scans.
        let keys = index.keys_sorted();
        if let Some(source) = keys.iter().find(|key| key.contains(term.as_str())) {
            insert_variations(index, source, &dictionary[term]);
            merged += 1;
        }
    }
    merged
}

fn insert_variations(index: &mut StemIndex, source: &str, variations: &[String]) {
    for variation in variations {
        if !is_single_term(variation) {
            continue;
        }
        let target = stem(variation);
        let copied = index.postings(source).to_vec();
        index.merge(target, copied);
    }
}

/// Load and apply every dictionary file under `dir`, in file-name order.
/// Posting lists are left unsorted here; the ranker re-sorts during merge.
pub fn apply_directory(index: &mut StemIndex, dir: &Path) -> Result<()> {
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let dictionary = load_dictionary(entry.path())?;
        let merged = apply_dictionary(index, &dictionary);
        tracing::info!(
            terms = merged,
            file = %entry.path().display(),
            "dictionary merged into index"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchOptions;
    use crate::index::Document;
    use crate::pipeline::StopWords;

    fn index_of(content: &str) -> StemIndex {
        let docs = vec![Document {
            object_id: "0".into(),
            title: String::new(),
            keywords: Vec::new(),
            tags: Vec::new(),
            category: String::new(),
            content: vec![content.to_string()],
        }];
        StemIndex::build(&docs, &StopWords::new(), &SearchOptions::default())
    }

    #[test]
    fn variation_inherits_source_postings() {
        let mut index = index_of("kubernetes cluster");
        let mut dictionary = Dictionary::new();
        dictionary.insert("kubernet".into(), vec!["k8s".into()]);
        assert_eq!(apply_dictionary(&mut index, &dictionary), 1);
        let source = index.postings(&stem("kubernetes")).to_vec();
        assert_eq!(index.postings("k8s"), source.as_slice());
    }

    #[test]
    fn multi_word_terms_and_variations_are_skipped() {
        let mut index = index_of("kubernetes");
        let mut dictionary = Dictionary::new();
        dictionary.insert("kubernet cluster".into(), vec!["k8s".into()]);
        dictionary.insert("kubernet".into(), vec!["the k8s".into()]);
        // The multi-word term never matches; the multi-word variation is dropped.
        assert_eq!(apply_dictionary(&mut index, &dictionary), 1);
        assert!(index.postings("k8s").is_empty());
    }

    #[test]
    fn merged_postings_are_copies_not_aliases() {
        let mut index = index_of("kubernetes");
        let mut dictionary = Dictionary::new();
        dictionary.insert("kubernet".into(), vec!["k8s".into()]);
        apply_dictionary(&mut index, &dictionary);
        let before = index.postings(&stem("kubernetes")).len();
        // Growing the variation's list must not grow the source list.
        let extra = index.postings("k8s").to_vec();
        index.merge("k8s".into(), extra);
        assert_eq!(index.postings(&stem("kubernetes")).len(), before);
    }

    #[test]
    fn unmatched_term_contributes_nothing() {
        let mut index = index_of("kubernetes");
        let mut dictionary = Dictionary::new();
        dictionary.insert("postgres".into(), vec!["pg".into()]);
        assert_eq!(apply_dictionary(&mut index, &dictionary), 0);
        assert!(index.postings("pg").is_empty());
    }
}
