//! Integration tests for the document model and builder.

use std::thread;

use docform::model::record;
use docform::{Content, ContentKind, Document, ErrorKind, SectionContent, TextContent};
use serde_json::json;

#[test]
fn test_builder_keeps_insertion_order() {
    let builder = Document::builder();
    builder
        .header("Report")
        .text("intro")
        .table(Some("Users"), ["name"], vec![record([("name", json!("Alice"))])])
        .section("Details", 2, |s| {
            s.text("nested");
        });
    let doc = builder.build();

    let kinds: Vec<ContentKind> = doc.iter().map(Content::kind).collect();
    assert_eq!(
        kinds,
        vec![
            ContentKind::Text,
            ContentKind::Text,
            ContentKind::Table,
            ContentKind::Section
        ]
    );
}

#[test]
fn test_accessors_return_copies() {
    let builder = Document::builder();
    builder.text("one").set_metadata("title", "Report");
    let doc = builder.build();

    let mut contents = doc.contents();
    contents.clear();
    contents.push(TextContent::new("injected").into());
    let mut metadata = doc.metadata();
    metadata.insert("title".into(), json!("changed"));
    metadata.insert("extra".into(), json!(1));

    assert_eq!(doc.len(), 1);
    assert_eq!(doc.contents()[0].plain_text(), "one");
    assert_eq!(doc.metadata().len(), 1);
    assert_eq!(doc.metadata_value("title"), Some(&json!("Report")));
}

#[test]
fn test_builder_after_build() {
    let builder = Document::builder();
    builder.text("kept");
    let first = builder.build();

    builder.text("ignored").set_metadata("k", "v");
    assert!(builder.is_built());
    assert!(builder.is_empty());

    let second = builder.build();
    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert!(second.metadata().is_empty());
}

#[test]
fn test_builder_shared_across_threads() {
    let builder = Document::builder();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let builder = builder.clone();
            thread::spawn(move || {
                for j in 0..25 {
                    builder.text(format!("{}-{}", i, j));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let doc = builder.build();
    assert_eq!(doc.len(), 200);
}

#[test]
fn test_try_build_reports_invalid_table() {
    let builder = Document::builder();
    builder
        .text("ok")
        .table(None, ["name"], vec![record([("age", json!(3))])]);
    assert!(builder.has_errors());

    let err = builder.try_build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn test_build_skips_invalid_table() {
    let builder = Document::builder();
    builder
        .text("ok")
        .table(None, ["name"], vec![record([("age", json!(3))])]);
    let doc = builder.build();
    assert_eq!(doc.len(), 1);
}

#[test]
fn test_nested_walk_is_depth_first() {
    let inner = SectionContent::new("inner", 3, vec![TextContent::new("leaf").into()]);
    let outer = SectionContent::new(
        "outer",
        2,
        vec![inner.into(), TextContent::new("after").into()],
    );
    let content: Content = outer.into();

    let texts: Vec<String> = content
        .walk()
        .into_iter()
        .filter(|c| c.kind() == ContentKind::Text)
        .map(Content::plain_text)
        .collect();
    assert_eq!(texts, vec!["leaf", "after"]);
}

#[test]
fn test_content_ids_are_unique() {
    let a: Content = TextContent::new("same").into();
    let b: Content = TextContent::new("same").into();
    assert_ne!(a.id(), b.id());
}

#[test]
fn test_frontmatter() {
    let builder = Document::builder();
    builder
        .set_metadata("title", "Q3 \"final\"")
        .set_metadata("pages", 3);
    let doc = builder.build();
    assert_eq!(
        doc.to_yaml_frontmatter(),
        "---\npages: 3\ntitle: \"Q3 \\\"final\\\"\"\n---\n"
    );
}
