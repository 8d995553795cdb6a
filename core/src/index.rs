use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::config::SearchOptions;
use crate::pipeline::{extract_stems, StopWords};

/// A source document as loaded from the content JSON. Documents are addressed
/// by their position in the loaded list everywhere else in the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub title: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub tags: Vec<String>,
    pub category: String,
    pub content: Vec<String>,
}

/// One posting: a document's weight under a stem. Tags and category are
/// copied in so that ranking and filtering never touch the document list.
#[derive(Debug, Clone, PartialEq)]
pub struct DocStat {
    pub doc_index: usize,
    pub score: f64,
    pub tags: Vec<String>,
    pub category: String,
}

/// Descending score, stable on ties.
pub fn by_score_desc(a: &DocStat, b: &DocStat) -> Ordering {
    b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
}

/// The inverted index: stem to postings, ordered by descending score. The
/// same document may appear several times under one stem since content, title
/// and keywords contribute separate postings; merging happens at ranking time.
#[derive(Debug, Default)]
pub struct StemIndex {
    postings: HashMap<String, Vec<DocStat>>,
}

impl StemIndex {
    /// Index the whole corpus: content first, then title, then keywords, per
    /// document in load order.
    pub fn build(documents: &[Document], stop_words: &StopWords, options: &SearchOptions) -> Self {
        let mut index = StemIndex::default();
        for (doc_index, doc) in documents.iter().enumerate() {
            index.add_content(doc_index, doc, stop_words);
            index.add_title(doc_index, doc, stop_words, options.title_weight);
            index.add_keywords(doc_index, doc, stop_words, options.keywords_weight);
        }
        index.sort_by_score();
        index
    }

    /// Term frequency over the document's whole content, paragraphs pooled.
    fn add_content(&mut self, doc_index: usize, doc: &Document, stop_words: &StopWords) {
        let mut counts: HashMap<String, f64> = HashMap::new();
        let mut total = 0usize;
        for paragraph in &doc.content {
            let stems = extract_stems(paragraph, stop_words);
            total += stems.len();
            for stem in stems {
                *counts.entry(stem).or_insert(0.0) += 1.0;
            }
        }
        for (stem, count) in counts {
            let score = count / total as f64;
            self.push(stem, stat(doc_index, score, doc));
        }
    }

    /// Title boost. The numerator is the posting count already accumulated
    /// under the stem, so a later document with the same title outscores an
    /// earlier one.
    fn add_title(&mut self, doc_index: usize, doc: &Document, stop_words: &StopWords, weight: f64) {
        if doc.title.is_empty() {
            return;
        }
        let title_len = doc.title.chars().count() as f64;
        for stem in extract_stems(&doc.title, stop_words) {
            let rank = self.postings.get(&stem).map_or(0, Vec::len) as f64;
            let score = weight * rank / title_len;
            self.push(stem, stat(doc_index, score, doc));
        }
    }

    /// Keyword boost: 1-based position within the phrase over the phrase count.
    fn add_keywords(&mut self, doc_index: usize, doc: &Document, stop_words: &StopWords, weight: f64) {
        if doc.keywords.is_empty() {
            return;
        }
        let phrases = doc.keywords.len() as f64;
        for phrase in &doc.keywords {
            for (position, stem) in extract_stems(phrase, stop_words).into_iter().enumerate() {
                let score = weight * (1.0 + position as f64) / phrases;
                self.push(stem, stat(doc_index, score, doc));
            }
        }
    }

    pub fn push(&mut self, stem: String, posting: DocStat) {
        self.postings.entry(stem).or_default().push(posting);
    }

    /// Append copies of postings under `stem`; unknown stems are created.
    pub fn merge(&mut self, stem: String, postings: Vec<DocStat>) {
        self.postings.entry(stem).or_default().extend(postings);
    }

    /// Postings for a stem; unknown stems resolve to the empty list.
    pub fn postings(&self, stem: &str) -> &[DocStat] {
        self.postings.get(stem).map_or(&[], Vec::as_slice)
    }

    /// Index keys in lexicographic order, for deterministic scans.
    pub fn keys_sorted(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.postings.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    pub fn sort_by_score(&mut self) {
        for list in self.postings.values_mut() {
            list.sort_by(by_score_desc);
        }
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

fn stat(doc_index: usize, score: f64, doc: &Document) -> DocStat {
    DocStat {
        doc_index,
        score,
        tags: doc.tags.clone(),
        category: doc.category.clone(),
    }
}
