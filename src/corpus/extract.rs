use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("{path}: parser panicked")]
    Panicked { path: PathBuf },
}

/// Converts one source document into plain text.
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError>;

    /// Text of the document, or a readable error line standing in for it.
    fn extract_or_notice(&self, path: &Path) -> String {
        self.extract(path).unwrap_or_else(|e| error_notice(&e))
    }
}

/// Text stored in place of a document that could not be read.
pub fn error_notice(err: &ExtractionError) -> String {
    format!("Error reading PDF: {}", err)
}

/// PDF text extraction via `pdf-extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        // pdf-extract panics on some malformed xref tables
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path)));
        match outcome {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ExtractionError::Unreadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => Err(ExtractionError::Panicked {
                path: path.to_path_buf(),
            }),
        }
    }
}
