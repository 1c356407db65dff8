use std::path::{Path, PathBuf};

use thiserror::Error;

use super::normalizer::TextNormalizer;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Unsupported document type: {0}")]
    UnsupportedType(String),
    #[error("Failed to read PDF {path}: {message}")]
    Pdf { path: PathBuf, message: String },
    #[error("Extraction failed: {0}")]
    Failed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Page texts of one document, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDocument {
    pub pages: Vec<String>,
}

impl RawDocument {
    #[must_use]
    pub const fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page texts joined with newlines. Empty pages keep their (empty) slot.
    pub fn join(&self) -> String {
        self.pages.join("\n")
    }
}

/// Reads the pages of a stored document.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn read_pages(&self, path: &Path) -> ExtractionResult<RawDocument>;
}

/// Page source backed by the filesystem.
///
/// PDFs go through `pdf-extract` on the blocking pool. Plain-text files
/// (`.txt`, e.g. `pdftotext` output) are split into pages on form feeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilePageSource;

impl FilePageSource {
    fn read_pdf(path: &Path) -> ExtractionResult<RawDocument> {
        let pages = pdf_extract::extract_text_by_pages(path).map_err(|e| ExtractionError::Pdf {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(RawDocument::new(pages))
    }

    fn read_text(path: &Path) -> ExtractionResult<RawDocument> {
        let content = std::fs::read_to_string(path)?;
        let pages = content
            .trim_end_matches('\u{c}')
            .split('\u{c}')
            .map(String::from)
            .collect();
        Ok(RawDocument::new(pages))
    }
}

#[async_trait::async_trait]
impl PageSource for FilePageSource {
    async fn read_pages(&self, path: &Path) -> ExtractionResult<RawDocument> {
        if !path.exists() {
            return Err(ExtractionError::NotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let owned = path.to_path_buf();
        let document = match extension.as_str() {
            "pdf" => tokio::task::spawn_blocking(move || Self::read_pdf(&owned)).await,
            "txt" | "text" => tokio::task::spawn_blocking(move || Self::read_text(&owned)).await,
            other => return Err(ExtractionError::UnsupportedType(other.to_string())),
        }
        .map_err(|e| ExtractionError::Failed(format!("{}: {e}", path.display())))??;

        tracing::debug!(
            "Read {} pages from {}",
            document.page_count(),
            path.display()
        );

        Ok(document)
    }
}

/// Turns a stored transcript into one normalized string.
pub struct DocumentExtractor {
    source: Box<dyn PageSource>,
    normalizer: TextNormalizer,
}

impl DocumentExtractor {
    #[must_use]
    pub fn new(normalizer: TextNormalizer) -> Self {
        Self {
            source: Box::new(FilePageSource),
            normalizer,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: Box<dyn PageSource>) -> Self {
        self.source = source;
        self
    }

    /// Newline-joined page text before normalization.
    pub async fn extract_raw(&self, path: &Path) -> ExtractionResult<String> {
        let document = self.source.read_pages(path).await?;
        Ok(document.join())
    }

    pub async fn extract(&self, path: &Path) -> ExtractionResult<String> {
        let raw = self.extract_raw(path).await?;
        Ok(self.normalizer.normalize(&raw))
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new(TextNormalizer::default())
    }
}
