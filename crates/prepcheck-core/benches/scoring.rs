use criterion::{black_box, criterion_group, criterion_main, Criterion};

use prepcheck_core::concepts::ConceptTable;
use prepcheck_core::keywords::match_keywords;
use prepcheck_core::model::ReferenceAnswer;
use prepcheck_core::similarity::score_similarity;
use prepcheck_core::text::{DiceSimilarity, SnowballStemmer};
use prepcheck_core::Evaluator;

const REFERENCE: &str = "React Hooks are functions that let you use state and other React \
features in functional components. Introduced in React 16.8, they allow you to use state, \
lifecycle methods, and other features without writing class components. Common hooks include \
useState for managing state, useEffect for side effects, useContext for consuming context, \
and useReducer for complex state logic.";

const ANSWER: &str = "Hooks let function components keep state with useState and run side \
effects after render. They replaced most class component lifecycle methods. Custom hooks \
share stateful logic between components.";

fn keywords() -> Vec<String> {
    [
        "hooks",
        "useState",
        "useEffect",
        "functional components",
        "state management",
        "side effects",
        "lifecycle",
        "custom hooks",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

fn bench_keywords(c: &mut Criterion) {
    let mut group = c.benchmark_group("keywords");
    let stemmer = SnowballStemmer::english();
    let similarity = DiceSimilarity;
    let concepts = ConceptTable::builtin();
    let keywords = keywords();

    group.bench_function("8_keywords", |b| {
        b.iter(|| {
            match_keywords(
                black_box(ANSWER),
                black_box(&keywords),
                &stemmer,
                &similarity,
                &concepts,
            )
        })
    });

    group.finish();
}

fn bench_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity");
    let long_answer = ANSWER.repeat(20);
    // Thousands of distinct tokens, none of which appear in the reference.
    let very_long_answer: String = (0..5_000).map(|i| format!("term{i} ")).collect();

    group.bench_function("short", |b| {
        b.iter(|| score_similarity(black_box(ANSWER), black_box(REFERENCE), &DiceSimilarity))
    });

    group.bench_function("long_answer", |b| {
        b.iter(|| score_similarity(black_box(&long_answer), black_box(REFERENCE), &DiceSimilarity))
    });

    group.sample_size(10);
    group.bench_function("very_long_distinct_answer", |b| {
        b.iter(|| {
            score_similarity(
                black_box(&very_long_answer),
                black_box(REFERENCE),
                &DiceSimilarity,
            )
        })
    });

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let evaluator = Evaluator::default();
    let reference = ReferenceAnswer::new(REFERENCE, keywords());

    group.bench_function("full", |b| {
        b.iter(|| evaluator.evaluate(black_box(ANSWER), black_box(&reference)))
    });

    group.bench_function("empty_answer", |b| {
        b.iter(|| evaluator.evaluate(black_box(""), black_box(&reference)))
    });

    let very_long_answer = format!("{} {ANSWER}", "filler ".repeat(5_000));
    group.sample_size(10);
    group.bench_function("very_long_answer", |b| {
        b.iter(|| evaluator.evaluate(black_box(&very_long_answer), black_box(&reference)))
    });

    group.finish();
}

criterion_group!(benches, bench_keywords, bench_similarity, bench_evaluate);
criterion_main!(benches);
