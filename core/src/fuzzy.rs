//! Approximate stem lookup: Levenshtein distance over code points plus a
//! QWERTY/ЙЦУКЕН keyboard-layout transposition for queries typed in the wrong
//! layout.

use lazy_static::lazy_static;
use std::collections::{BTreeMap, HashMap};

lazy_static! {
    static ref LAYOUT: HashMap<char, char> = {
        // Latin key and the Russian letter sharing it, one pair per key.
        const PAIRS: &[(char, char)] = &[
            ('q', 'й'), ('w', 'ц'), ('e', 'у'), ('r', 'к'), ('t', 'е'),
            ('y', 'н'), ('u', 'г'), ('i', 'ш'), ('o', 'щ'), ('p', 'з'),
            ('[', 'х'), (']', 'ъ'),
            ('a', 'ф'), ('s', 'ы'), ('d', 'в'), ('f', 'а'), ('g', 'п'),
            ('h', 'р'), ('j', 'о'), ('k', 'л'), ('l', 'д'), (';', 'ж'),
            ('\'', 'э'), ('\\', 'ё'),
            ('z', 'я'), ('x', 'ч'), ('c', 'с'), ('v', 'м'), ('b', 'и'),
            ('n', 'т'), ('m', 'ь'), (',', 'б'), ('.', 'ю'),
        ];
        let mut table = HashMap::with_capacity(PAIRS.len() * 2);
        for &(latin, cyrillic) in PAIRS {
            table.insert(latin, cyrillic);
            table.insert(cyrillic, latin);
        }
        table
    };
}

/// Retype a string in the opposite keyboard layout. Characters outside the
/// table contribute nothing.
pub fn switch_layout(s: &str) -> String {
    s.chars().filter_map(|c| LAYOUT.get(&c).copied()).collect()
}

/// Levenshtein distance over code points, with one acceleration: a stem that
/// merely extends the whole token by less than half of its own length counts
/// as an exact match.
pub fn edit_distance(token: &str, stem: &str) -> usize {
    let t: Vec<char> = token.chars().collect();
    let s: Vec<char> = stem.chars().collect();
    if !s.is_empty()
        && stem.starts_with(token)
        && ((s.len() - t.len()) as f64) / (s.len() as f64) < 0.5
    {
        return 0;
    }
    let mut column: Vec<usize> = (0..=t.len()).collect();
    for (x, &sc) in s.iter().enumerate() {
        column[0] = x + 1;
        let mut diagonal = x;
        for (y, &tc) in t.iter().enumerate() {
            let previous = column[y + 1];
            let substitution = diagonal + usize::from(tc != sc);
            column[y + 1] = substitution.min(column[y + 1] + 1).min(column[y] + 1);
            diagonal = previous;
        }
    }
    column[t.len()]
}

/// Candidate stems for one query token: every index stem within `limit`,
/// measured as typed and, failing that, through the layout switch. Exact
/// matches win outright; otherwise all stems at the closest observed distance
/// are returned. An unreachable token yields the empty set.
pub fn closest_stems(token: &str, stem_keys: &[String], limit: usize) -> Vec<String> {
    let mut by_distance: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    let retyped = switch_layout(token);
    for stem in stem_keys {
        let distance = edit_distance(token, stem);
        if distance <= limit {
            by_distance.entry(distance).or_default().push(stem.clone());
        } else {
            let distance = edit_distance(&retyped, stem);
            if distance <= limit {
                by_distance.entry(distance).or_default().push(stem.clone());
            }
        }
    }
    by_distance.into_iter().next().map(|(_, stems)| stems).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(stems: &[&str]) -> Vec<String> {
        stems.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn classic_distances() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("javascrpt", "javascript"), 1);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", ""), 3);
    }

    #[test]
    fn distance_counts_code_points_not_bytes() {
        // One substituted Cyrillic letter is one edit, not two.
        assert_eq!(edit_distance("кошка", "кошку"), 1);
    }

    #[test]
    fn prefix_extension_counts_as_exact() {
        // "javascript" extends "javascrip" by 1/10 of its length.
        assert_eq!(edit_distance("javascrip", "javascript"), 0);
        // "cat" -> "catastrophe" extends by more than half, no shortcut.
        assert!(edit_distance("cat", "catastrophe") > 0);
    }

    #[test]
    fn layout_transposes_both_ways() {
        assert_eq!(switch_layout("rfhnf"), "карта");
        assert_eq!(switch_layout("карта"), "rfhnf");
    }

    #[test]
    fn layout_is_an_involution_on_table_characters() {
        for sample in ["привет", "ghbdtn", "съешь ещё", "hello, world."] {
            let there_and_back = switch_layout(&switch_layout(sample));
            let table_only: String = sample.chars().filter(|c| !c.is_whitespace()).collect();
            assert_eq!(there_and_back, table_only);
        }
    }

    #[test]
    fn exact_match_suppresses_fuzzier_candidates() {
        let stems = keys(&["cache", "cachet", "catch"]);
        let found = closest_stems("cache", &stems, 3);
        assert!(found.contains(&"cache".to_string()));
        assert!(!found.contains(&"catch".to_string()));
    }

    #[test]
    fn falls_back_to_minimum_distance() {
        let stems = keys(&["javascript", "java"]);
        let found = closest_stems("javascrpt", &stems, 3);
        assert_eq!(found, vec!["javascript".to_string()]);
    }

    #[test]
    fn wrong_layout_token_finds_cyrillic_stem() {
        let stems = keys(&["карт", "границ"]);
        let found = closest_stems("rfhnf", &stems, 3);
        assert_eq!(found, vec!["карт".to_string()]);
    }

    #[test]
    fn unreachable_token_yields_nothing() {
        let stems = keys(&["внезапность"]);
        assert!(closest_stems("xyz", &stems, 3).is_empty());
    }
}
