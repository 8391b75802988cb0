//! Pipeline performance benchmarks.
//!
//! Measures the local stages of a run: parsing, column resolution, row
//! summaries, and the merge steps applied to screening results. Remote calls
//! are replaced by the mock provider.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geosift::merge::{dedupe_by_column, sort_by_sample_size};
use geosift::summary::summarize_rows;
use geosift::{
    ClassifyConfig, Classifier, ColumnRoles, DataTable, MockProvider, Parser, RetryPolicy,
};

/// Generate a synthetic GEO series table.
fn generate_geo_table(count: usize) -> DataTable {
    let headers = ["gse", "title", "summary", "organism", "platform", "n_samples", "submission_date"]
        .iter()
        .map(|h| h.to_string())
        .collect();

    let distinct = count / 2 + 1;
    let rows = (0..count)
        .map(|row| {
            vec![
                format!("GSE{}", 100_000 + row % distinct),
                format!("Series {} of tissue {}", row, row % 17),
                "Single cell RNA sequencing of dissociated tumour tissue using the 10x Genomics \
                 Chromium platform with matched adjacent normal samples. "
                    .repeat(1 + row % 3),
                if row % 4 == 0 { "Mus musculus" } else { "Homo sapiens" }.to_string(),
                format!("GPL{}", 20_000 + row % 50),
                match row % 6 {
                    0 => "NA".to_string(),
                    1 => format!("{} samples", row % 90),
                    _ => (row % 200).to_string(),
                },
                format!("2023-{:02}-{:02}", (row % 12) + 1, (row % 28) + 1),
            ]
        })
        .collect();

    DataTable::new(headers, rows)
}

fn to_tsv(table: &DataTable) -> Vec<u8> {
    let mut out = table.headers.join("\t");
    out.push('\n');
    for row in &table.rows {
        out.push_str(&row.join("\t"));
        out.push('\n');
    }
    out.into_bytes()
}

/// Benchmark parsing TSV bytes of various sizes.
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_tsv");

    for rows in [100, 1_000, 10_000].iter() {
        let data = to_tsv(&generate_geo_table(*rows));

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            let parser = Parser::new();
            b.iter(|| black_box(parser.parse_bytes(data, b'\t').unwrap()))
        });
    }

    group.finish();
}

/// Benchmark column resolution, which scans numeric columns once.
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_columns");

    for rows in [100, 10_000].iter() {
        let table = generate_geo_table(*rows);
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(ColumnRoles::resolve(table)))
        });
    }

    group.finish();
}

/// Benchmark rendering row summaries for one batch.
fn bench_summaries(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize_rows");

    for batch in [50, 500].iter() {
        let table = generate_geo_table(*batch);
        let roles = ColumnRoles::resolve(&table);

        group.throughput(Throughput::Elements(*batch as u64));
        group.bench_with_input(BenchmarkId::new("batch", batch), &table, |b, table| {
            b.iter(|| black_box(summarize_rows(table, 0..table.row_count(), &roles)))
        });
    }

    group.finish();
}

/// Benchmark the dedupe and sort applied to screening results.
fn bench_merge(c: &mut Criterion) {
    let table = generate_geo_table(10_000);

    c.bench_function("dedupe_and_sort_10k", |b| {
        b.iter(|| {
            let deduped = dedupe_by_column(&table, "gse");
            black_box(sort_by_sample_size(&deduped, "n_samples"))
        })
    });
}

/// Benchmark a full classification run against the mock provider.
fn bench_classify_mock(c: &mut Criterion) {
    let table = generate_geo_table(1_000);
    let config = ClassifyConfig {
        retry: RetryPolicy::without_backoff(),
        ..Default::default()
    };

    c.bench_function("classify_1k_mock", |b| {
        b.iter(|| {
            let classifier = Classifier::with_config(MockProvider::new(), config.clone());
            black_box(classifier.classify(&table).unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_resolve,
    bench_summaries,
    bench_merge,
    bench_classify_mock,
);
criterion_main!(benches);
