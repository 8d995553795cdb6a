use criterion::{criterion_group, criterion_main, Criterion};
use poisk_core::fuzzy::closest_stems;
use poisk_core::pipeline::{extract_stems, StopWords};

const PARAGRAPH: &str = "Полнотекстовый поиск по двуязычному корпусу требует \
единообразной обработки текста: tokenization, folding and stemming must be \
applied identically to documents and queries. Кэш инвалидация остаётся одной \
из двух сложных задач информатики, naming things being the other one.";

fn bench_extract_stems(c: &mut Criterion) {
    let stop_words = StopWords::new();
    c.bench_function("extract_stems_bilingual", |b| {
        b.iter(|| extract_stems(PARAGRAPH, &stop_words))
    });
}

fn bench_fuzzy_scan(c: &mut Criterion) {
    let stop_words = StopWords::new();
    let stems: Vec<String> = extract_stems(PARAGRAPH, &stop_words);
    c.bench_function("closest_stems_typo", |b| {
        b.iter(|| closest_stems("поиск", &stems, 3))
    });
}

criterion_group!(benches, bench_extract_stems, bench_fuzzy_scan);
criterion_main!(benches);
