//! Error types for the nyaya-docintel library.
//!
//! Two error types reflect the two places a request can go wrong:
//!
//! * [`DocIntelError`]: **fatal**, the pipeline produced no summary (bad
//!   upload, corrupt PDF, OCR found nothing). Returned as `Err` from
//!   [`crate::DocumentPipeline::summarize`].
//!
//! * [`UpstreamError`]: the completion API call failed. Whether it becomes a
//!   fatal [`DocIntelError::Upstream`] or is folded into the summary text is
//!   decided by [`crate::config::UpstreamFailurePolicy`].

use thiserror::Error;

/// All fatal errors returned by the extraction-summarization pipeline.
#[derive(Debug, Error)]
pub enum DocIntelError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Upload rejected before any processing (extension, empty body).
    #[error("{0}")]
    InvalidInput(String),

    // ── PDF errors ────────────────────────────────────────────────────────
    /// pdfium could not open the document.
    #[error("PDF is corrupt or unreadable: {detail}")]
    CorruptPdf { detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide."
    )]
    PdfiumBindingFailed(String),

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The OCR engine failed on a page. One bad page aborts the document.
    #[error("OCR failed on page {page}: {source}")]
    OcrFailed {
        page: usize,
        #[source]
        source: OcrError,
    },

    /// Every page came back blank.
    #[error("Extracted text is empty")]
    EmptyExtraction,

    /// Extracted text exceeds the configured `max_text_chars`.
    #[error("Extracted text is {chars} characters, over the {limit} character limit")]
    TextTooLarge { chars: usize, limit: usize },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Scratch PDF or working-text file could not be written or read.
    #[error("Working file error at '{path}': {source}")]
    WorkingFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ── Upstream errors ───────────────────────────────────────────────────
    /// Summarization call failed and the policy is `Propagate`.
    #[error("Summarization service error: {0}")]
    Upstream(#[from] UpstreamError),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocIntelError {
    /// `true` for errors that mean "the document could not be processed",
    /// as opposed to a bad request or an upstream outage.
    pub fn is_processing_failure(&self) -> bool {
        matches!(
            self,
            DocIntelError::CorruptPdf { .. }
                | DocIntelError::PdfiumBindingFailed(_)
                | DocIntelError::RasterisationFailed { .. }
                | DocIntelError::OcrFailed { .. }
                | DocIntelError::EmptyExtraction
                | DocIntelError::TextTooLarge { .. }
                | DocIntelError::WorkingFile { .. }
        )
    }
}

/// Failure of the single outbound completion request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// The API answered with a non-200 status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection, TLS or timeout failure before a response arrived.
    #[error("{0}")]
    Transport(String),

    /// HTTP 200, but the body did not carry `choices[0].message.content`.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Failure reported by an [`crate::pipeline::ocr::OcrEngine`].
#[derive(Debug, Error)]
pub enum OcrError {
    /// The engine executable could not be started.
    #[error("could not launch '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine ran but exited unsuccessfully.
    #[error("engine exited with {status}: {stderr}")]
    Engine { status: String, stderr: String },

    /// The page bitmap could not be encoded for the engine.
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    /// Temporary image file handling failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
