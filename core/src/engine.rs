use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::config::SearchOptions;
use crate::dict;
use crate::index::{DocStat, Document, StemIndex};
use crate::pipeline::StopWords;
use crate::query;
use crate::snippet::{self, Highlighter};

/// One search hit as serialized to the client. Markup in `title` and
/// `fragments` is emitted literally for downstream rendering.
#[derive(Debug, Serialize)]
pub struct Hit {
    pub title: String,
    pub link: String,
    pub fragments: Vec<String>,
    pub tags: Vec<String>,
    pub category: String,
}

/// The frozen search engine: corpus, inverted index, stop words and tuning,
/// built once at startup and only read afterwards. Sharing `&SearchEngine`
/// across request workers is safe because the read path mutates nothing.
pub struct SearchEngine {
    documents: Vec<Document>,
    index: StemIndex,
    stem_keys: Vec<String>,
    stop_words: StopWords,
    options: SearchOptions,
}

impl SearchEngine {
    /// Index the corpus and merge the synonym dictionaries, then freeze.
    pub fn build(
        documents: Vec<Document>,
        stop_words: StopWords,
        dicts_dir: Option<&Path>,
        options: SearchOptions,
    ) -> Result<Self> {
        let mut index = StemIndex::build(&documents, &stop_words, &options);
        if let Some(dir) = dicts_dir {
            dict::apply_directory(&mut index, dir)?;
        }
        Ok(Self::from_parts(documents, stop_words, index, options))
    }

    /// Assemble an engine from an already-built index.
    pub fn from_parts(
        documents: Vec<Document>,
        stop_words: StopWords,
        index: StemIndex,
        options: SearchOptions,
    ) -> Self {
        let stem_keys = index.keys_sorted();
        Self {
            documents,
            index,
            stem_keys,
            stop_words,
            options,
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Run the full query pipeline: normalize, expand to composite
    /// candidates, resolve posting lists, rank and filter, then render each
    /// hit's title and fragments. Documents without a single matching
    /// paragraph are dropped.
    pub fn search(&self, raw_query: &str, category: &[String], tags: &[String]) -> Vec<Hit> {
        let words = query::normalize_query(raw_query);
        let candidates = query::expand_words(
            &words,
            &self.stem_keys,
            &self.stop_words,
            self.options.distance_limit,
        );
        let lists: Vec<Vec<DocStat>> = candidates
            .iter()
            .map(|candidate| query::resolve(&self.index, candidate))
            .collect();
        let doc_indices = query::rank(lists, category, tags, self.options.frequency_limit);

        let highlighter = Highlighter::new(&words, &self.stop_words, &self.options);
        let mut hits = Vec::new();
        for doc_index in doc_indices {
            let document = &self.documents[doc_index];
            let (_, title) = highlighter.mark(&document.title, false);
            let fragments = snippet::fragments(&highlighter, document);
            if fragments.is_empty() {
                continue;
            }
            hits.push(Hit {
                title,
                link: format!("/{}", document.object_id),
                fragments,
                tags: document.tags.clone(),
                category: document.category.clone(),
            });
        }
        hits
    }
}
