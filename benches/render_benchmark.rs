//! Benchmarks for docform rendering performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks render synthetic tables through the built-in encoders
//! and the transform pipeline.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use docform::model::record;
use docform::operation::{LimitOp, SortDirection, SortOp};
use docform::transform::{EmojiTransformer, NormalizeTransformer, StripColorsTransformer};
use docform::{
    Cancellation, Document, Output, RenderOptions, Renderer, RendererRegistry, TableContent,
    TransformPipeline,
};

/// Creates a document holding one table with the given number of rows.
fn create_test_document(rows: usize) -> Document {
    let records = (0..rows)
        .map(|i| {
            record([
                ("id", json!(i)),
                ("name", json!(format!("user-{}", i))),
                ("status", json!(if i % 3 == 0 { "OK" } else { "No" })),
                ("score", json!((i * 7919) % 1000)),
            ])
        })
        .collect();

    let table = TableContent::from_keys(["id", "name", "status", "score"], records)
        .expect("valid table")
        .with_title("Benchmark");

    let builder = Document::builder();
    builder.header("Benchmark report").add_content(table);
    builder.build()
}

fn full_pipeline() -> Arc<TransformPipeline> {
    let pipeline = TransformPipeline::new()
        .with_transformer(EmojiTransformer::new())
        .with_transformer(StripColorsTransformer::new())
        .with_transformer(NormalizeTransformer::default());
    Arc::new(pipeline)
}

/// Benchmark each built-in format on a large table.
fn bench_formats(c: &mut Criterion) {
    let doc = create_test_document(10_000);
    let registry = RendererRegistry::with_defaults(&RenderOptions::default(), None);
    let cancel = Cancellation::never();

    let mut group = c.benchmark_group("render_10k_rows");
    for format in ["markdown", "text", "json", "csv"] {
        let renderer = registry.get(format).expect("built-in format");
        group.bench_function(format, |b| {
            b.iter(|| renderer.render(&cancel, black_box(&doc)).unwrap());
        });
    }
    group.finish();
}

/// Benchmark the transform pipeline overhead.
fn bench_pipeline(c: &mut Criterion) {
    let doc = create_test_document(10_000);
    let cancel = Cancellation::never();
    let plain = RendererRegistry::with_defaults(&RenderOptions::default(), None);
    let piped = RendererRegistry::with_defaults(&RenderOptions::default(), Some(full_pipeline()));

    let mut group = c.benchmark_group("pipeline");
    group.bench_function("markdown_plain", |b| {
        b.iter(|| plain.render("markdown", &cancel, black_box(&doc)).unwrap());
    });
    group.bench_function("markdown_transformed", |b| {
        b.iter(|| piped.render("markdown", &cancel, black_box(&doc)).unwrap());
    });
    group.finish();
}

/// Benchmark table operations at various sizes.
fn bench_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_limit");

    for rows in [100, 1_000, 10_000].iter() {
        let records = (0..*rows)
            .map(|i| record([("score", json!((i * 7919) % 1000))]))
            .collect();
        let table = TableContent::from_keys(["score"], records)
            .expect("valid table")
            .with_operation(SortOp::new("score", SortDirection::Descending))
            .with_operation(LimitOp::new(10));

        group.bench_function(format!("{}_rows", rows), |b| {
            b.iter(|| black_box(&table).apply_operations().unwrap());
        });
    }

    group.finish();
}

/// Benchmark parallel multi-format output.
fn bench_output(c: &mut Criterion) {
    let doc = create_test_document(1_000);
    let output = Output::with_defaults(RenderOptions::default(), Some(full_pipeline()))
        .formats(["markdown", "text", "json", "csv"]);

    c.bench_function("output_all_formats", |b| {
        b.iter(|| output.render(black_box(&doc)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_formats,
    bench_pipeline,
    bench_operations,
    bench_output,
);
criterion_main!(benches);
