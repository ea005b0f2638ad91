use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_toml_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("toml_parsing");

    let small_toml = generate_question_set_toml(5);
    let medium_toml = generate_question_set_toml(50);
    let large_toml = generate_question_set_toml(200);

    group.bench_function("5_questions", |b| {
        b.iter(|| {
            markwise_core::parser::parse_question_set_str(
                black_box(&small_toml),
                black_box("bench.toml".as_ref()),
            )
        })
    });

    group.bench_function("50_questions", |b| {
        b.iter(|| {
            markwise_core::parser::parse_question_set_str(
                black_box(&medium_toml),
                black_box("bench.toml".as_ref()),
            )
        })
    });

    group.bench_function("200_questions", |b| {
        b.iter(|| {
            markwise_core::parser::parse_question_set_str(
                black_box(&large_toml),
                black_box("bench.toml".as_ref()),
            )
        })
    });

    group.finish();
}

fn bench_submission_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("submission_parsing");

    let submission = generate_submission_toml(50);
    group.bench_function("50_answers", |b| {
        b.iter(|| {
            markwise_core::parser::parse_submission_str(
                black_box(&submission),
                black_box("answers.toml".as_ref()),
            )
        })
    });

    group.finish();
}

fn generate_question_set_toml(n: usize) -> String {
    let mut s = String::new();
    s.push_str(
        r#"[question_set]
id = "bench"
title = "Benchmark"
subject = "Science"
"#,
    );
    for i in 0..n {
        s.push_str(&format!(
            r#"
[[questions]]
id = "q{i}"
kind = "short-answer"
text = "Define term {i} and its uses."
marks = 5
concept = "Concept {i}"
required_keywords = ["alpha{i}", "beta{i}", "gamma{i}", "delta{i}"]
"#
        ));
    }
    s
}

fn generate_submission_toml(n: usize) -> String {
    let mut s = String::new();
    s.push_str(
        r#"[submission]
student = "Bench Student"
elapsed_secs = 300

[answers]
"#,
    );
    for i in 0..n {
        s.push_str(&format!(
            "q{i} = \"alpha{i} and beta{i} are related because of gamma{i}\"\n"
        ));
    }
    s
}

criterion_group!(benches, bench_toml_parsing, bench_submission_parsing);
criterion_main!(benches);
