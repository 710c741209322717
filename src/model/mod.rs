//! Document model: content variants, tables and the document builder.
//!
//! The model is format-agnostic. Encoders read it; transformers produce
//! modified copies of it. Nothing in the render path mutates a built
//! [`Document`].

mod chart;
mod content;
mod document;
mod section;
mod table;
mod text;

pub use chart::{ChartContent, DiagramContent, Edge, GraphContent};
pub use content::{Content, ContentKind};
pub use document::{Document, DocumentBuilder, Metadata};
pub use section::{CollapsibleSection, SectionContent};
pub use table::{display_value, record, Field, Record, Schema, TableContent};
pub use text::{RawContent, TextContent, TextStyle};
