mod extractor;
mod normalizer;

pub use extractor::{
    DocumentExtractor, ExtractionError, ExtractionResult, FilePageSource, PageSource, RawDocument,
};
pub use normalizer::TextNormalizer;
