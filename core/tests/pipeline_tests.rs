use poisk_core::pipeline::{extract_stems, fold, StopWords};

#[test]
fn it_stems_english_and_russian() {
    let stems = extract_stems("Running cats и спящие кошки", &StopWords::new());
    assert!(stems.contains(&"run".to_string()));
    assert!(stems.contains(&"cat".to_string()));
    assert!(stems.contains(&"кошк".to_string()));
}

#[test]
fn it_folds_case_and_yo_identically_everywhere() {
    // The same collapse is applied to corpus text and query words, so the
    // two spellings produce the same stem.
    let a = extract_stems("Ёлки", &StopWords::new());
    let b = extract_stems("елки", &StopWords::new());
    assert_eq!(a, b);
    assert_eq!(fold("Ёлки"), "елки");
}

#[test]
fn it_filters_stop_words_after_folding() {
    let stop_words: StopWords = ["the", "весь"].iter().map(|s| s.to_string()).collect();
    let stems = extract_stems("The cats спят ВЕСЬ день", &stop_words);
    assert!(!stems.contains(&"the".to_string()));
    assert!(!stems.iter().any(|s| s.starts_with("вес")));
    assert!(stems.contains(&"ден".to_string()));
}
