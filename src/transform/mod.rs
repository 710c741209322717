//! Data and byte transformers and the pipeline that runs them.
//!
//! Two kinds of transformers plug into a render:
//!
//! - [`DataTransformer`]s run before encoding, once per content item, and
//!   return a replacement [`Content`].
//! - [`ByteTransformer`]s run after encoding, once per document, on the
//!   complete encoded output.
//!
//! Both are wrapped in a [`TransformerAdapter`] so they can share one
//! [`TransformPipeline`], which orders them by `(priority, registration)`.
//!
//! # Example
//!
//! ```
//! use docform::transform::{FnByteTransformer, TransformPipeline};
//! use docform::Cancellation;
//!
//! let pipeline = TransformPipeline::new();
//! pipeline.add(FnByteTransformer::new("shout", |bytes, _format| {
//!     Ok(bytes.to_ascii_uppercase())
//! }));
//!
//! let out = pipeline
//!     .transform_bytes(&Cancellation::never(), b"hello".to_vec(), "text")
//!     .unwrap();
//! assert_eq!(out, b"HELLO");
//! ```

mod adapter;
mod closure;
mod color;
mod emoji;
mod normalize;
mod pipeline;

pub use adapter::TransformerAdapter;
pub use closure::{FnByteTransformer, FnDataTransformer, RecordFilterTransformer, RecordMapper};
pub use color::StripColorsTransformer;
pub use emoji::EmojiTransformer;
pub use normalize::{NormalizeOptions, NormalizePreset, NormalizeTransformer};
pub use pipeline::TransformPipeline;

use crate::error::Result;
use crate::model::Content;

/// Priority used when a transformer does not choose one.
pub const DEFAULT_PRIORITY: i32 = 100;

/// A named, prioritized transform over one content item, run before encoding.
pub trait DataTransformer: Send + Sync {
    /// Unique name within a pipeline.
    fn name(&self) -> &str;

    /// Lower runs earlier.
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    /// Formats this transformer applies to. Empty means every format.
    fn formats(&self) -> &[String] {
        &[]
    }

    /// Whether the transformer should run for `content` rendered as `format`.
    fn can_transform(&self, content: &Content, format: &str) -> bool {
        let _ = content;
        format_matches(self.formats(), format)
    }

    /// Produce the replacement content.
    fn transform(&self, content: Content, format: &str) -> Result<Content>;
}

/// A named, prioritized transform over encoded output, run after encoding.
pub trait ByteTransformer: Send + Sync {
    /// Unique name within a pipeline.
    fn name(&self) -> &str;

    /// Lower runs earlier.
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    /// Formats this transformer applies to. Empty means every format.
    fn formats(&self) -> &[String] {
        &[]
    }

    /// Whether the transformer should run for output in `format`.
    fn can_transform(&self, format: &str) -> bool {
        format_matches(self.formats(), format)
    }

    /// Produce the replacement bytes.
    fn transform(&self, input: Vec<u8>, format: &str) -> Result<Vec<u8>>;
}

/// Check `format` against a format list; an empty list matches everything.
/// Comparison ignores ASCII case.
pub fn format_matches(formats: &[String], format: &str) -> bool {
    formats.is_empty() || formats.iter().any(|f| f.eq_ignore_ascii_case(format))
}

/// Collect format names into an owned list.
pub(crate) fn format_list<S: Into<String>>(formats: impl IntoIterator<Item = S>) -> Vec<String> {
    formats.into_iter().map(Into::into).collect()
}
