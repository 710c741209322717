//! Uniform wrapper over the two transformer kinds.

use std::fmt;
use std::sync::Arc;

use super::{
    ByteTransformer, DataTransformer, EmojiTransformer, FnByteTransformer, FnDataTransformer,
    NormalizeTransformer, RecordFilterTransformer, StripColorsTransformer,
};
use crate::model::Content;

/// Holds exactly one transformer; its kind is fixed at construction.
#[derive(Clone)]
pub enum TransformerAdapter {
    /// Runs on content before encoding
    Data(Arc<dyn DataTransformer>),
    /// Runs on encoded bytes after encoding
    Byte(Arc<dyn ByteTransformer>),
}

impl TransformerAdapter {
    /// Wrap a data transformer.
    pub fn data<T: DataTransformer + 'static>(transformer: T) -> Self {
        TransformerAdapter::Data(Arc::new(transformer))
    }

    /// Wrap a byte transformer.
    pub fn byte<T: ByteTransformer + 'static>(transformer: T) -> Self {
        TransformerAdapter::Byte(Arc::new(transformer))
    }

    /// Name of the wrapped transformer.
    pub fn name(&self) -> &str {
        match self {
            TransformerAdapter::Data(t) => t.name(),
            TransformerAdapter::Byte(t) => t.name(),
        }
    }

    /// Priority of the wrapped transformer.
    pub fn priority(&self) -> i32 {
        match self {
            TransformerAdapter::Data(t) => t.priority(),
            TransformerAdapter::Byte(t) => t.priority(),
        }
    }

    /// Formats of the wrapped transformer (empty = all).
    pub fn formats(&self) -> &[String] {
        match self {
            TransformerAdapter::Data(t) => t.formats(),
            TransformerAdapter::Byte(t) => t.formats(),
        }
    }

    /// Whether this adapter holds a data transformer.
    pub fn is_data_transformer(&self) -> bool {
        matches!(self, TransformerAdapter::Data(_))
    }

    /// Whether this adapter holds a byte transformer.
    pub fn is_byte_transformer(&self) -> bool {
        matches!(self, TransformerAdapter::Byte(_))
    }

    /// The data transformer, if that is what this adapter holds.
    pub fn as_data_transformer(&self) -> Option<&dyn DataTransformer> {
        match self {
            TransformerAdapter::Data(t) => Some(t.as_ref()),
            TransformerAdapter::Byte(_) => None,
        }
    }

    /// The byte transformer, if that is what this adapter holds.
    pub fn as_byte_transformer(&self) -> Option<&dyn ByteTransformer> {
        match self {
            TransformerAdapter::Byte(t) => Some(t.as_ref()),
            TransformerAdapter::Data(_) => None,
        }
    }

    /// True only for a data transformer that accepts this content and format.
    pub fn applies_to_content(&self, content: &Content, format: &str) -> bool {
        self.as_data_transformer()
            .is_some_and(|t| t.can_transform(content, format))
    }

    /// True only for a byte transformer that accepts this format.
    pub fn applies_to_bytes(&self, format: &str) -> bool {
        self.as_byte_transformer()
            .is_some_and(|t| t.can_transform(format))
    }
}

impl From<Arc<dyn DataTransformer>> for TransformerAdapter {
    fn from(transformer: Arc<dyn DataTransformer>) -> Self {
        TransformerAdapter::Data(transformer)
    }
}

impl From<Arc<dyn ByteTransformer>> for TransformerAdapter {
    fn from(transformer: Arc<dyn ByteTransformer>) -> Self {
        TransformerAdapter::Byte(transformer)
    }
}

macro_rules! impl_from_transformer {
    ($variant:ident: $($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for TransformerAdapter {
                fn from(transformer: $ty) -> Self {
                    TransformerAdapter::$variant(Arc::new(transformer))
                }
            }
        )*
    };
}

impl_from_transformer!(Data: FnDataTransformer, RecordFilterTransformer);
impl_from_transformer!(
    Byte: FnByteTransformer,
    EmojiTransformer,
    StripColorsTransformer,
    NormalizeTransformer,
);

impl fmt::Debug for TransformerAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            TransformerAdapter::Data(_) => "data",
            TransformerAdapter::Byte(_) => "byte",
        };
        f.debug_struct("TransformerAdapter")
            .field("kind", &kind)
            .field("name", &self.name())
            .field("priority", &self.priority())
            .field("formats", &self.formats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextContent;

    #[test]
    fn test_exactly_one_accessor() {
        let data = TransformerAdapter::from(FnDataTransformer::new("d", |c, _| Ok(c)));
        assert!(data.is_data_transformer());
        assert!(data.as_data_transformer().is_some());
        assert!(data.as_byte_transformer().is_none());

        let byte = TransformerAdapter::from(FnByteTransformer::new("b", |b, _| Ok(b)));
        assert!(!byte.is_data_transformer());
        assert!(byte.as_byte_transformer().is_some());
        assert!(byte.as_data_transformer().is_none());
    }

    #[test]
    fn test_applicability_respects_kind_and_format() {
        let content = Content::from(TextContent::new("x"));
        let data = TransformerAdapter::from(
            FnDataTransformer::new("d", |c, _| Ok(c)).with_formats(["json"]),
        );
        assert!(data.applies_to_content(&content, "json"));
        assert!(!data.applies_to_content(&content, "html"));
        assert!(!data.applies_to_bytes("json"));

        let byte = TransformerAdapter::from(FnByteTransformer::new("b", |b, _| Ok(b)));
        assert!(byte.applies_to_bytes("html"));
        assert!(!byte.applies_to_content(&content, "html"));
    }
}
