use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use quizpulse_core::history::{normalize_history, parse_percentage};
use quizpulse_core::model::{Outcome, RawAttempt, ScoredQuestion, Selection};
use quizpulse_core::recommend::{recommend, RecommendationRules};
use quizpulse_core::statistics::aggregate_by_topic;

fn make_scored(n: usize) -> Vec<ScoredQuestion> {
    (0..n)
        .map(|i| {
            let outcome = match i % 3 {
                0 => Outcome::Correct,
                1 => Outcome::Incorrect,
                _ => Outcome::Unanswered,
            };
            ScoredQuestion {
                question_id: i.to_string(),
                topic: format!("Topic {}", i % 12),
                difficulty_level: ["Easy", "Medium", "Hard"][i % 3].to_string(),
                selected_option: match outcome {
                    Outcome::Unanswered => Selection::Unanswered,
                    _ => Selection::Chosen("a".into()),
                },
                outcome,
                marks: match outcome {
                    Outcome::Correct => 4.0,
                    Outcome::Incorrect => -1.0,
                    Outcome::Unanswered => 0.0,
                },
            }
        })
        .collect()
}

fn make_history(n: usize) -> Vec<RawAttempt> {
    (0..n)
        .map(|i| RawAttempt {
            score: Some(json!(format!("{}%", 40 + i % 60))),
            accuracy: Some(json!(50 + i % 50)),
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_by_topic");
    for n in [100, 1000, 10_000] {
        let scored = make_scored(n);
        group.bench_function(format!("n={n}"), |b| {
            b.iter(|| aggregate_by_topic(black_box(&scored)))
        });
    }
    group.finish();
}

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("history");
    let raw = make_history(500);
    group.bench_function("normalize_500", |b| {
        b.iter(|| normalize_history(black_box(&raw)))
    });
    group.bench_function("parse_percentage", |b| {
        let v = json!(" 87.5% ");
        b.iter(|| parse_percentage(black_box(&v)))
    });
    group.finish();
}

fn bench_recommend(c: &mut Criterion) {
    let stats = aggregate_by_topic(&make_scored(1000));
    let history = normalize_history(&make_history(50));
    let rules = RecommendationRules::default();
    c.bench_function("recommend", |b| {
        b.iter(|| recommend(black_box(&stats), black_box(&history), black_box(&rules)))
    });
}

criterion_group!(benches, bench_aggregate, bench_history, bench_recommend);
criterion_main!(benches);
