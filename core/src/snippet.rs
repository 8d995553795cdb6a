//! Snippet extraction: locate query terms in the original text, cluster
//! nearby occurrences, wrap them in marker tags and trim the context window.
//!
//! Matching runs over the folded text while splicing and windowing operate on
//! the original bytes, so every cut is treated as a byte offset and the trim
//! helper repairs any UTF-8 damage before a snippet leaves this module.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::SearchOptions;
use crate::index::Document;
use crate::pipeline::{extract_stems, fold, StopWords};

lazy_static! {
    static ref EDGE_WORD: Regex =
        Regex::new(r#"(^[a-zа-я!?.:"«»—]+ | [a-zа-я!?.:"«»—]+$)"#).expect("valid regex");
}

/// Per-request highlighter: the compiled search pattern plus the snippet
/// configuration. Built once from the normalized query words and reused for
/// the title and every content paragraph of every hit.
pub struct Highlighter<'a> {
    pattern: Option<Regex>,
    options: &'a SearchOptions,
}

impl<'a> Highlighter<'a> {
    /// Build the pattern: a `+` word becomes its parts separated by bounded
    /// gaps, a `-` word splits into alternatives, a plain word passes through;
    /// every word additionally contributes its stems. Query text reaches the
    /// regex verbatim, so a word that fails to parse simply never matches.
    pub fn new(words: &[String], stop_words: &StopWords, options: &'a SearchOptions) -> Self {
        let gap = format!(".{{0,{}}}", options.distance_between);
        let mut branches: Vec<String> = Vec::new();
        for raw in words {
            let word = raw.replace('ё', "е");
            if word.contains('+') {
                branches.push(word.replace('+', &gap));
            } else if word.contains('-') {
                branches.extend(word.split('-').map(str::to_string));
            } else {
                branches.push(word.clone());
            }
            branches.extend(extract_stems(&word, stop_words));
        }
        let source = format!("({})", fold(&branches.join("|")));
        Self {
            pattern: Regex::new(&source).ok(),
            options,
        }
    }

    /// Mark every occurrence of the pattern in `text`. Returns whether
    /// anything was found and the rendered string; when nothing matches the
    /// input comes back unchanged.
    pub fn mark(&self, text: &str, trim: bool) -> (bool, String) {
        let Some(pattern) = &self.pattern else {
            return (false, text.to_string());
        };
        let folded = fold(text);
        let mut occurrences: Vec<(usize, usize)> = Vec::new();
        for found in pattern.find_iter(&folded) {
            if self.options.occurrences >= 0 && occurrences.len() >= self.options.occurrences as usize
            {
                break;
            }
            occurrences.push((found.start(), found.end()));
        }
        if occurrences.is_empty() {
            return (false, text.to_string());
        }
        let mut rendered: Vec<String> = Vec::new();
        for indices in cluster(&occurrences, self.options.around_range) {
            let first = indices[0].0;
            let last = indices[indices.len() - 1].1;
            let start_index = first.saturating_sub(self.options.around_range);
            let stop_index = (last + self.options.around_range).min(text.len());
            let (marked, tag_bytes) = splice_markers(text, &indices, &self.options.marker_tag);
            if trim {
                if stop_index - start_index < marked.len() + tag_bytes {
                    let window = &marked[start_index..(stop_index + tag_bytes).min(marked.len())];
                    rendered.push(trim_and_wrap(window, self.options));
                }
            } else {
                rendered.push(into_valid_utf8(&marked));
            }
        }
        (true, rendered.join(" "))
    }
}

/// Apply the highlighter to each content paragraph of a hit document,
/// keeping only the paragraphs that actually matched.
pub fn fragments(highlighter: &Highlighter, document: &Document) -> Vec<String> {
    document
        .content
        .iter()
        .filter_map(|paragraph| {
            let (found, marked) = highlighter.mark(paragraph, true);
            found.then_some(marked)
        })
        .collect()
}

/// Group occurrences into clusters: an occurrence joins the current cluster
/// when its start lies within the previous occurrence's reach, which widens
/// with both the context range and the match's own length.
fn cluster(occurrences: &[(usize, usize)], around_range: usize) -> Vec<Vec<(usize, usize)>> {
    let mut clusters: Vec<Vec<(usize, usize)>> = Vec::new();
    for (i, &(start, end)) in occurrences.iter().enumerate() {
        if i > 0 {
            let previous_end = occurrences[i - 1].1;
            if start <= previous_end + 2 * (around_range + (end - start)) {
                if let Some(current) = clusters.last_mut() {
                    current.push((start, end));
                }
                continue;
            }
        }
        clusters.push(vec![(start, end)]);
    }
    clusters
}

/// Splice open/close markers around each occurrence, rightmost first so the
/// earlier offsets stay valid. Returns the marked bytes and the number of
/// tag bytes inserted.
fn splice_markers(text: &str, indices: &[(usize, usize)], marker: &str) -> (Vec<u8>, usize) {
    let open = format!("<{marker}>");
    let close = format!("</{marker}>");
    let mut bytes = text.as_bytes().to_vec();
    let mut tag_bytes = 0;
    for &(start, end) in indices.iter().rev() {
        let end = end.min(bytes.len());
        let start = start.min(end);
        bytes.splice(end..end, close.bytes());
        bytes.splice(start..start, open.bytes());
        tag_bytes += open.len() + close.len();
    }
    (bytes, tag_bytes)
}

/// Repair a byte window into valid UTF-8, strip the part-words left at the
/// edges of an oversized window, and wrap with the placeholder when anything
/// was removed.
fn trim_and_wrap(window: &[u8], options: &SearchOptions) -> String {
    let original_len = window.len();
    let mut trimmed = into_valid_utf8(window);
    if original_len > 2 * options.around_range {
        trimmed = EDGE_WORD.replace_all(&trimmed, "").into_owned();
    }
    if trimmed.len() < original_len {
        format!(
            "{placeholder}{trimmed}{placeholder}",
            placeholder = options.trimmer_placeholder
        )
    } else {
        trimmed
    }
}

/// Decode bytes as UTF-8, discarding invalid sequences.
fn into_valid_utf8(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;
    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                break;
            }
            Err(err) => {
                let valid_len = err.valid_up_to();
                if let Ok(valid) = std::str::from_utf8(&rest[..valid_len]) {
                    out.push_str(valid);
                }
                let skip = err.error_len().unwrap_or(rest.len() - valid_len);
                rest = &rest[valid_len + skip..];
            }
        }
    }
    out
}
