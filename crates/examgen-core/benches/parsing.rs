use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use examgen_core::parser::{parse_bank_str, validate_bank};

fn make_bank_toml(n: usize) -> String {
    let mut s = String::from("[bank]\nid = \"bench\"\nname = \"Bench\"\n");
    for i in 0..n {
        s.push_str(&format!(
            "\n[[questions]]\nid = \"Q{i:04}\"\nstatement = \"Question {i}\"\n\
             options = [\"a{i}\", \"b{i}\", \"c{i}\", \"d{i}\"]\ncorrect = \"B\"\n\
             block = \"01\"\ntopic = \"{}\"\ndifficulty = \"Easy\"\n",
            i % 4
        ));
    }
    s
}

fn bench_parse_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_bank");
    let path = PathBuf::from("bench.toml");

    let small = make_bank_toml(20);
    group.bench_function("20 questions", |b| {
        b.iter(|| parse_bank_str(black_box(&small), &path))
    });

    let large = make_bank_toml(500);
    group.bench_function("500 questions", |b| {
        b.iter(|| parse_bank_str(black_box(&large), &path))
    });

    group.finish();
}

fn bench_validate_bank(c: &mut Criterion) {
    let path = PathBuf::from("bench.toml");
    let bank = parse_bank_str(&make_bank_toml(500), &path).unwrap();

    c.bench_function("validate_bank 500 questions", |b| {
        b.iter(|| validate_bank(black_box(&bank)))
    });
}

criterion_group!(benches, bench_parse_bank, bench_validate_bank);
criterion_main!(benches);
