//! Startup loaders for the three JSON inputs: the document corpus, the
//! stop-word set and the synonym dictionaries. Any failure here is fatal to
//! the process; nothing is reloaded afterwards.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use crate::dict::Dictionary;
use crate::index::Document;
use crate::pipeline::StopWords;

/// Load the corpus: a JSON array of documents.
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    let started = Instant::now();
    let file = File::open(path)
        .with_context(|| format!("cannot open content file '{}'", path.display()))?;
    let documents: Vec<Document> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("malformed content JSON in '{}'", path.display()))?;
    tracing::info!(
        count = documents.len(),
        elapsed = ?started.elapsed(),
        file = %path.display(),
        "documents loaded"
    );
    Ok(documents)
}

/// Load the stop-word set: a JSON object whose keys are the stop tokens.
/// Values are ignored.
pub fn load_stop_words(path: &Path) -> Result<StopWords> {
    let started = Instant::now();
    let file = File::open(path)
        .with_context(|| format!("cannot open stop-words file '{}'", path.display()))?;
    let entries: HashMap<String, serde_json::Value> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("malformed stop-words JSON in '{}'", path.display()))?;
    let stop_words: StopWords = entries.into_keys().collect();
    tracing::info!(
        count = stop_words.len(),
        elapsed = ?started.elapsed(),
        file = %path.display(),
        "stop words loaded"
    );
    Ok(stop_words)
}

/// Load one synonym dictionary: a JSON object mapping a head term to its
/// variation strings.
pub fn load_dictionary(path: &Path) -> Result<Dictionary> {
    let started = Instant::now();
    let file = File::open(path)
        .with_context(|| format!("cannot open dictionary file '{}'", path.display()))?;
    let dictionary: Dictionary = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("malformed dictionary JSON in '{}'", path.display()))?;
    tracing::info!(
        terms = dictionary.len(),
        elapsed = ?started.elapsed(),
        file = %path.display(),
        "dictionary loaded"
    );
    Ok(dictionary)
}
