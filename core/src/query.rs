//! Query processing: normalization, candidate expansion, posting-list
//! algebra and the final ranking.

use lazy_static::lazy_static;
use regex::Regex;

use crate::fuzzy::closest_stems;
use crate::index::{by_score_desc, DocStat, StemIndex};
use crate::pipeline::{extract_stems, StopWords};

lazy_static! {
    static ref PLUS_SPACES: Regex = Regex::new(r" *\+ *").expect("valid regex");
    static ref MINUS_SPACES: Regex = Regex::new(r" *- *").expect("valid regex");
    static ref SPACE_RUNS: Regex = Regex::new(r" +").expect("valid regex");
}

/// Normalize a raw query: tighten `+` and `-` against their operands,
/// collapse space runs, split on single spaces.
pub fn normalize_query(raw: &str) -> Vec<String> {
    let tightened = PLUS_SPACES.replace_all(raw, "+");
    let tightened = MINUS_SPACES.replace_all(&tightened, "-");
    let collapsed = SPACE_RUNS.replace_all(&tightened, " ");
    collapsed.split(' ').map(str::to_string).collect()
}

/// Expand every query word into composite candidates. Each of the word's
/// stems widens into its fuzzy candidate set; `+` and `-` words take the
/// in-order Cartesian product of those sets, plain words flatten them.
pub fn expand_words(
    words: &[String],
    stem_keys: &[String],
    stop_words: &StopWords,
    distance_limit: usize,
) -> Vec<String> {
    let mut expanded = Vec::new();
    for word in words {
        let candidates: Vec<Vec<String>> = extract_stems(word, stop_words)
            .iter()
            .map(|token| closest_stems(token, stem_keys, distance_limit))
            .collect();
        if word.contains('+') {
            expanded.extend(cartesian_join(&candidates, '+'));
        } else if word.contains('-') {
            expanded.extend(cartesian_join(&candidates, '-'));
        } else {
            expanded.extend(candidates.into_iter().flatten());
        }
    }
    expanded
}

/// Every combination of one candidate per position, joined left to right.
/// Any empty position empties the whole product.
fn cartesian_join(sets: &[Vec<String>], separator: char) -> Vec<String> {
    let Some(first) = sets.first() else {
        return Vec::new();
    };
    let mut combos = first.clone();
    for set in &sets[1..] {
        let mut joined = Vec::with_capacity(combos.len() * set.len());
        for prefix in &combos {
            for candidate in set {
                joined.push(format!("{prefix}{separator}{candidate}"));
            }
        }
        combos = joined;
    }
    combos
}

/// Resolve one composite candidate to a posting list.
pub fn resolve(index: &StemIndex, candidate: &str) -> Vec<DocStat> {
    if candidate.contains('+') {
        let mut parts = candidate.split('+');
        let mut merged = first_postings(index, parts.next());
        for part in parts {
            merged = intersect(&merged, index.postings(part));
        }
        merged
    } else if candidate.contains('-') {
        let mut parts = candidate.split('-');
        let mut merged = first_postings(index, parts.next());
        for part in parts {
            merged = subtract(&merged, index.postings(part));
        }
        merged
    } else {
        index.postings(candidate).to_vec()
    }
}

fn first_postings(index: &StemIndex, stem: Option<&str>) -> Vec<DocStat> {
    stem.map_or_else(Vec::new, |s| index.postings(s).to_vec())
}

/// Intersection: keep documents present on both sides, summing the scores.
/// Tags and category follow the left side.
pub fn intersect(first: &[DocStat], second: &[DocStat]) -> Vec<DocStat> {
    let mut merged = Vec::new();
    for left in first {
        for right in second {
            if left.doc_index == right.doc_index {
                merged.push(DocStat {
                    doc_index: left.doc_index,
                    score: left.score + right.score,
                    tags: left.tags.clone(),
                    category: left.category.clone(),
                });
            }
        }
    }
    merged.sort_by(by_score_desc);
    merged
}

/// Difference: drop every left entry whose document appears on the right;
/// duplicates on the left survive otherwise.
pub fn subtract(first: &[DocStat], second: &[DocStat]) -> Vec<DocStat> {
    first
        .iter()
        .filter(|left| !second.iter().any(|right| right.doc_index == left.doc_index))
        .cloned()
        .collect()
}

/// Merge per-candidate posting lists into the final ordered document list:
/// stable sort by descending score, frequency floor relative to the top
/// score, category/tag whitelists, then first-occurrence deduplication.
pub fn rank(
    lists: Vec<Vec<DocStat>>,
    category: &[String],
    tags: &[String],
    frequency_limit: f64,
) -> Vec<usize> {
    let mut stream: Vec<DocStat> = lists.into_iter().flatten().collect();
    stream.sort_by(by_score_desc);
    let floor = stream.first().map_or(0.0, |top| top.score * frequency_limit);
    let filter_category = !category.is_empty() && !category[0].is_empty();
    let filter_tags = !tags.is_empty() && !tags[0].is_empty();
    let mut result: Vec<usize> = Vec::new();
    for posting in &stream {
        if posting.score < floor {
            continue;
        }
        if filter_category && !category.contains(&posting.category) {
            continue;
        }
        if filter_tags && !posting.tags.iter().any(|tag| tags.contains(tag)) {
            continue;
        }
        if !result.contains(&posting.doc_index) {
            result.push(posting.doc_index);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(doc_index: usize, score: f64) -> DocStat {
        DocStat {
            doc_index,
            score,
            tags: vec!["news".into()],
            category: "tech".into(),
        }
    }

    #[test]
    fn normalization_tightens_operators() {
        assert_eq!(
            normalize_query("red +  fox   - hole"),
            vec!["red+fox-hole".to_string()]
        );
        assert_eq!(
            normalize_query("cache  invalidation"),
            vec!["cache".to_string(), "invalidation".to_string()]
        );
    }

    #[test]
    fn cartesian_product_joins_in_order() {
        let sets = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["x".to_string()],
        ];
        assert_eq!(cartesian_join(&sets, '+'), vec!["a+x", "b+x"]);
    }

    #[test]
    fn empty_position_empties_the_product() {
        let sets = vec![vec!["a".to_string()], Vec::new()];
        assert!(cartesian_join(&sets, '+').is_empty());
    }

    #[test]
    fn intersection_sums_scores() {
        let first = vec![posting(0, 0.5), posting(1, 0.4)];
        let second = vec![posting(1, 0.3)];
        let merged = intersect(&first, &second);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].doc_index, 1);
        assert!((merged[0].score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn subtraction_drops_matching_documents() {
        let first = vec![posting(0, 0.5), posting(1, 0.4), posting(0, 0.1)];
        let second = vec![posting(1, 0.9)];
        let remaining = subtract(&first, &second);
        assert_eq!(
            remaining.iter().map(|p| p.doc_index).collect::<Vec<_>>(),
            vec![0, 0]
        );
    }

    #[test]
    fn rank_applies_frequency_floor() {
        let lists = vec![vec![posting(0, 1.0), posting(1, 0.3)]];
        // Floor at 0.5: document 1 is below it.
        assert_eq!(rank(lists, &[], &[], 0.5), vec![0]);
    }

    #[test]
    fn rank_deduplicates_keeping_first() {
        let lists = vec![vec![posting(0, 1.0), posting(0, 0.9), posting(1, 0.8)]];
        assert_eq!(rank(lists, &[], &[], 0.5), vec![0, 1]);
    }

    #[test]
    fn rank_filters_by_category_and_tags() {
        let mut other = posting(1, 0.9);
        other.category = "food".into();
        other.tags = vec!["cooking".into()];
        let lists = vec![vec![posting(0, 1.0), other]];
        assert_eq!(
            rank(lists.clone(), &["tech".to_string()], &[], 0.5),
            vec![0]
        );
        assert_eq!(
            rank(lists.clone(), &[], &["cooking".to_string()], 0.5),
            vec![1]
        );
        assert_eq!(
            rank(
                lists,
                &["tech".to_string()],
                &["cooking".to_string()],
                0.5
            ),
            Vec::<usize>::new()
        );
    }

    #[test]
    fn empty_first_filter_entry_disables_the_filter() {
        let lists = vec![vec![posting(0, 1.0)]];
        assert_eq!(rank(lists, &[String::new()], &[], 0.5), vec![0]);
    }
}
