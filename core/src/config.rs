//! Search tuning knobs and their defaults.

/// Tag name wrapped around matched words in snippets.
pub const DEFAULT_MARKER_TAG: &str = "mark";
/// How many characters may separate `+`-joined words when highlighting.
pub const DEFAULT_DISTANCE_BETWEEN: usize = 20;
/// Placeholder glued onto a snippet when its edges were trimmed.
pub const DEFAULT_TRIMMER_PLACEHOLDER: &str = "...";
/// Cap on matches per paragraph; negative means unlimited.
pub const DEFAULT_OCCURRENCES: i64 = -1;
/// Characters of context kept on each side of a snippet cluster.
pub const DEFAULT_AROUND_RANGE: usize = 42;
/// Edit distance cap for fuzzy stem lookup.
pub const DEFAULT_DISTANCE_LIMIT: usize = 3;
/// Postings scoring below `top_score * limit` are dropped from the ranking.
pub const DEFAULT_FREQUENCY_LIMIT: f64 = 0.5;
/// Boost applied to stems found in document titles.
pub const DEFAULT_TITLE_WEIGHT: f64 = 10.0;
/// Boost applied to stems found in keyword phrases.
pub const DEFAULT_KEYWORDS_WEIGHT: f64 = 1.0;

/// Runtime search configuration, shared by the indexer, the ranker and the
/// snippet extractor. Frozen after startup.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub marker_tag: String,
    pub distance_between: usize,
    pub trimmer_placeholder: String,
    pub occurrences: i64,
    pub around_range: usize,
    pub distance_limit: usize,
    pub frequency_limit: f64,
    pub title_weight: f64,
    pub keywords_weight: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            marker_tag: DEFAULT_MARKER_TAG.to_string(),
            distance_between: DEFAULT_DISTANCE_BETWEEN,
            trimmer_placeholder: DEFAULT_TRIMMER_PLACEHOLDER.to_string(),
            occurrences: DEFAULT_OCCURRENCES,
            around_range: DEFAULT_AROUND_RANGE,
            distance_limit: DEFAULT_DISTANCE_LIMIT,
            frequency_limit: DEFAULT_FREQUENCY_LIMIT,
            title_weight: DEFAULT_TITLE_WEIGHT,
            keywords_weight: DEFAULT_KEYWORDS_WEIGHT,
        }
    }
}
