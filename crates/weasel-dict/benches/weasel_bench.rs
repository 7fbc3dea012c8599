// Criterion benchmarks for weasel-dict.
//
// Words come from tests/data/en-US-small.txt plus generated filler so the
// word map has a realistic size. No external files are needed.
//
// Run:
//   cargo bench -p weasel-dict

use criterion::{Criterion, criterion_group, criterion_main};
use weasel_dict::{
    Dictionary, DictionaryConfig, DictionaryKey, PreprocessorDescriptor, PreprocessorKind,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn load_words() -> Vec<String> {
    let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/en-US-small.txt");
    let mut words: Vec<String> = std::fs::read_to_string(&path)
        .unwrap_or_default()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect();
    words.extend((0..50_000).map(|i| format!("word{i}")));
    words
}

fn build_dictionary(config: &DictionaryConfig) -> Dictionary {
    let key: DictionaryKey = "en-US".parse().expect("valid key");
    Dictionary::from_words(key, load_words(), config)
}

const TEXT: &str = "He said \"hello world\" now and the Apple pear was 42 apples, \
    I said word12 word99999 $5 https://example.com banana cherry";

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Lookups of known words on the read-lock path.
fn bench_known_words(c: &mut Criterion) {
    let dict = build_dictionary(&DictionaryConfig::default());
    let words = ["apple", "banana", "word1", "word25000", "word49999"];

    c.bench_function("word_results_known", |b| {
        b.iter(|| {
            for word in &words {
                std::hint::black_box(dict.word_results(word).ok());
            }
        });
    });
}

/// Repeated misses answered from the invalid-word cache.
fn bench_cached_misses(c: &mut Criterion) {
    let dict = build_dictionary(&DictionaryConfig::default());
    let misses = ["appel", "banan", "chery", "wrod1", "helo"];
    for miss in &misses {
        let _ = dict.word_results(miss);
    }

    c.bench_function("word_results_cached_miss", |b| {
        b.iter(|| {
            for word in &misses {
                std::hint::black_box(dict.word_results(word).ok());
            }
        });
    });
}

/// Misses with the cache disabled, so every lookup is a fresh miss.
fn bench_uncached_misses(c: &mut Criterion) {
    let config = DictionaryConfig {
        max_invalid_words_bytesize: 0,
        ..Default::default()
    };
    let dict = build_dictionary(&config);
    let misses = ["appel", "banan", "chery", "wrod1", "helo"];

    c.bench_function("word_results_uncached_miss", |b| {
        b.iter(|| {
            for word in &misses {
                std::hint::black_box(dict.word_results(word).ok());
            }
        });
    });
}

/// A block of text through the full pipeline with preprocessors.
fn bench_block(c: &mut Criterion) {
    let config = DictionaryConfig {
        default_word_preprocessors: vec![
            PreprocessorDescriptor::new(PreprocessorKind::Normalize),
            PreprocessorDescriptor::new(PreprocessorKind::Downcase),
            PreprocessorDescriptor::new(PreprocessorKind::TrailingDot),
        ],
        ..Default::default()
    };
    let dict = build_dictionary(&config);

    c.bench_function("block_results", |b| {
        b.iter(|| std::hint::black_box(dict.block_results(TEXT).ok()));
    });
}

criterion_group!(
    benches,
    bench_known_words,
    bench_cached_misses,
    bench_uncached_misses,
    bench_block
);
criterion_main!(benches);
