//! Integration tests for the transform pipeline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use docform::model::{record, Record, TableContent};
use docform::render::ContentEncoder;
use docform::transform::{
    DataTransformer, FnByteTransformer, FnDataTransformer, RecordFilterTransformer,
};
use docform::{
    Cancellation, Content, Document, DocumentRenderer, Error, ErrorKind, Renderer,
    TransformPipeline,
};
use serde_json::{json, Value};

/// Minimal HTML encoder: one `<tr>` per record, cells in schema order.
#[derive(Default)]
struct HtmlEncoder {
    encoded: AtomicUsize,
}

impl ContentEncoder for HtmlEncoder {
    fn format(&self) -> &str {
        "html"
    }

    fn encode(&self, content: &Content) -> docform::Result<Vec<u8>> {
        self.encoded.fetch_add(1, Ordering::SeqCst);
        let html = match content {
            Content::Table(t) => {
                let keys = t.schema().visible_keys();
                let rows: Vec<String> = t
                    .records()
                    .iter()
                    .map(|r| {
                        let cells: String = keys
                            .iter()
                            .map(|k| format!("<td>{}</td>", TableContent::cell_text(r, k)))
                            .collect();
                        format!("<tr>{}</tr>", cells)
                    })
                    .collect();
                format!("<table>{}</table>", rows.join(""))
            }
            other => format!("<p>{}</p>", other.plain_text()),
        };
        Ok(html.into_bytes())
    }

    fn separator(&self) -> &[u8] {
        b"\n"
    }
}

fn users() -> Vec<Record> {
    vec![
        record([
            ("name", json!("Alice")),
            ("age", json!(25)),
            ("status", json!("active")),
        ]),
        record([
            ("name", json!("Bob")),
            ("age", json!(30)),
            ("status", json!("inactive")),
        ]),
        record([
            ("name", json!("Charlie")),
            ("age", json!(35)),
            ("status", json!("active")),
        ]),
    ]
}

fn users_doc() -> Document {
    let builder = Document::builder();
    builder.table(Some("Users"), ["name", "age", "status"], users());
    builder.build()
}

fn active_filter() -> RecordFilterTransformer {
    RecordFilterTransformer::new("active-only", |r| r["status"] == json!("active"))
        .with_mapper(|mut r| {
            if let Some(Value::String(name)) = r.get_mut("name") {
                *name = format!("[FILTERED] {}", name);
            }
            r
        })
        .with_priority(100)
        .with_formats(["html"])
}

fn recording_byte(
    name: &'static str,
    priority: i32,
    fail: bool,
    log: &Arc<Mutex<Vec<&'static str>>>,
) -> FnByteTransformer {
    let log = Arc::clone(log);
    FnByteTransformer::new(name, move |bytes, _| {
        log.lock().unwrap().push(name);
        if fail {
            Err(Error::Other(format!("{} exploded", name)))
        } else {
            Ok(bytes)
        }
    })
    .with_priority(priority)
}

#[test]
fn test_html_filter_scenario() {
    let pipeline = Arc::new(TransformPipeline::new().with_transformer(active_filter()));
    let doc = users_doc();

    let html = DocumentRenderer::new(HtmlEncoder::default()).with_pipeline(Arc::clone(&pipeline));
    let out = String::from_utf8(html.render(&Cancellation::never(), &doc).unwrap()).unwrap();
    assert_eq!(
        out,
        "<table>\
         <tr><td>[FILTERED] Alice</td><td>25</td><td>active</td></tr>\
         <tr><td>[FILTERED] Charlie</td><td>35</td><td>active</td></tr>\
         </table>"
    );

    // Other formats see all three records, unprefixed.
    let registry = docform::RendererRegistry::with_defaults(
        &docform::RenderOptions::default(),
        Some(pipeline),
    );
    let json = registry
        .render("json", &Cancellation::never(), &doc)
        .unwrap();
    let value: Value = serde_json::from_slice(&json).unwrap();
    let records = value["contents"][0]["records"].as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1]["name"], json!("Bob"));

    // The document itself is untouched.
    match &doc.contents()[0] {
        Content::Table(t) => assert_eq!(t.row_count(), 3),
        other => panic!("expected table, got {}", other.kind()),
    }
}

#[test]
fn test_format_restricted_transformer_never_runs() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let json_only = FnDataTransformer::new("json-only", move |content, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(content)
    })
    .with_formats(["json"]);

    let sample: Content = docform::TextContent::new("x").into();
    assert!(!json_only.can_transform(&sample, "html"));
    assert!(json_only.can_transform(&sample, "JSON"));

    let pipeline = Arc::new(TransformPipeline::new().with_transformer(json_only));
    let renderer = DocumentRenderer::new(HtmlEncoder::default()).with_pipeline(pipeline);
    renderer.render(&Cancellation::never(), &users_doc()).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_priority_beats_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let pipeline = TransformPipeline::new();
    pipeline
        .add(recording_byte("p2-first", 20, false, &log))
        .add(recording_byte("p1", 10, false, &log))
        .add(recording_byte("p2-second", 20, false, &log));

    let renderer = DocumentRenderer::new(HtmlEncoder::default()).with_pipeline(Arc::new(pipeline));
    renderer.render(&Cancellation::never(), &users_doc()).unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["p1", "p2-first", "p2-second"]);
}

#[test]
fn test_fail_fast() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let pipeline = TransformPipeline::new()
        .with_transformer(recording_byte("A", 1, false, &log))
        .with_transformer(recording_byte("B", 2, true, &log))
        .with_transformer(recording_byte("C", 3, false, &log));

    let renderer = DocumentRenderer::new(HtmlEncoder::default()).with_pipeline(Arc::new(pipeline));
    let err = renderer
        .render(&Cancellation::never(), &users_doc())
        .unwrap_err();

    assert_eq!(*log.lock().unwrap(), vec!["A", "B"]);
    assert_eq!(err.kind(), ErrorKind::TransformFailed);
    assert_eq!(err.transformer(), Some("B"));
    match err {
        Error::TransformFailed { format, source, .. } => {
            assert_eq!(format, "html");
            assert!(source.to_string().contains("B exploded"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_data_transformer_failure_names_content() {
    let pipeline = TransformPipeline::new().with_transformer(FnDataTransformer::new(
        "broken",
        |_, _| Err(Error::Other("nope".into())),
    ));
    let doc = users_doc();
    let table_id = doc.contents()[0].id().to_string();

    let renderer = DocumentRenderer::new(HtmlEncoder::default()).with_pipeline(Arc::new(pipeline));
    match renderer.render(&Cancellation::never(), &doc).unwrap_err() {
        Error::TransformFailed {
            transformer,
            target,
            ..
        } => {
            assert_eq!(transformer, "broken");
            assert!(target.contains(&table_id));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_precancelled_render_does_nothing() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let data_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&data_calls);
    let pipeline = TransformPipeline::new()
        .with_transformer(recording_byte("bytes", 1, false, &log))
        .with_transformer(FnDataTransformer::new("data", move |c, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(c)
        }));

    let renderer = DocumentRenderer::new(HtmlEncoder::default()).with_pipeline(Arc::new(pipeline));
    let cancel = Cancellation::new();
    cancel.cancel();

    let err = renderer.render(&cancel, &users_doc()).unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(data_calls.load(Ordering::SeqCst), 0);
    assert_eq!(renderer.encoder().encoded.load(Ordering::SeqCst), 0);

    let mut sink = Vec::new();
    assert!(renderer
        .render_to(&cancel, &users_doc(), &mut sink)
        .unwrap_err()
        .is_cancelled());
    assert!(sink.is_empty());
}

#[test]
fn test_cancel_between_items() {
    let cancel = Cancellation::new();
    let trigger = cancel.clone();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let pipeline = TransformPipeline::new().with_transformer(FnDataTransformer::new(
        "cancel-on-first",
        move |c, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            trigger.cancel();
            Ok(c)
        },
    ));

    let builder = Document::builder();
    builder.text("one").text("two").text("three");
    let doc = builder.build();

    let renderer = DocumentRenderer::new(HtmlEncoder::default()).with_pipeline(Arc::new(pipeline));
    let mut sink = Vec::new();
    let err = renderer.render_to(&cancel, &doc, &mut sink).unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(renderer.encoder().encoded.load(Ordering::SeqCst), 0);
    assert!(sink.is_empty());
}

#[test]
fn test_failing_transformer_leaves_stream_empty() {
    let pipeline = TransformPipeline::new().with_transformer(
        FnDataTransformer::new("tables-break", |c, _| match c {
            Content::Table(_) => Err(Error::Other("bad table".into())),
            other => Ok(other),
        }),
    );

    let builder = Document::builder();
    builder.text("intro");
    builder.table(None, ["name", "age", "status"], users());
    let doc = builder.build();

    let renderer = DocumentRenderer::new(HtmlEncoder::default()).with_pipeline(Arc::new(pipeline));
    assert!(renderer.supports_streaming());
    let mut sink = Vec::new();
    let err = renderer
        .render_to(&Cancellation::never(), &doc, &mut sink)
        .unwrap_err();
    assert_eq!(err.transformer(), Some("tables-break"));
    assert!(sink.is_empty());
}

#[test]
fn test_pipeline_changes_while_rendering() {
    let pipeline = Arc::new(TransformPipeline::new());
    let doc = Arc::new(users_doc());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let pipeline = Arc::clone(&pipeline);
            let doc = Arc::clone(&doc);
            std::thread::spawn(move || {
                let renderer =
                    DocumentRenderer::new(HtmlEncoder::default()).with_pipeline(pipeline.clone());
                for j in 0..20 {
                    let name = format!("t{}-{}", i, j);
                    pipeline.add(FnByteTransformer::new(name.clone(), |b, _| Ok(b)));
                    renderer.render(&Cancellation::never(), &doc).unwrap();
                    pipeline.remove(&name);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(pipeline.is_empty());
}
