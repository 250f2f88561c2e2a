//! # nyaya-docintel
//!
//! Summarise scanned legal PDFs in plain language.
//!
//! Each uploaded document is rasterised page by page, OCR'd, written to a
//! page-delimited working-text file and sent in one request to an
//! OpenAI-compatible chat-completions endpoint. The summary comes back as
//! bullet points with Markdown emphasis stripped.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF upload
//!  │
//!  ├─ 1. Input      validate `.pdf` name and non-empty body; stage scratch file
//!  ├─ 2. Render     rasterise pages at 2× via pdfium (blocking)
//!  ├─ 3. OCR        tesseract per page; rejoin hyphenated line breaks
//!  ├─ 4. Transcript `--- Page N ---` blocks → <OUTPUT_DIR>/pdfTextExtractor.txt
//!  ├─ 5. Summarize  one chat-completion call
//!  └─ 6. Polish     strip `*`
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nyaya_docintel::{DocumentPipeline, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::builder()
//!         .api_key(std::env::var("GROQ_API_KEY")?)
//!         .output_dir("/tmp/nyaya")
//!         .build()?;
//!     let pipeline = DocumentPipeline::new(config)?;
//!     let summary = pipeline.summarize(std::fs::read("judgment.pdf")?).await?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | Enables the `nyaya-server` binary (clap + anyhow + tracing-subscriber) |
//!
//! The HTTP router itself ([`api::router`]) is always available for
//! embedding in another axum application.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod api;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use api::{router, ApiError};
pub use config::{AllowedOrigins, ServiceConfig, ServiceConfigBuilder, UpstreamFailurePolicy};
pub use error::{DocIntelError, OcrError, UpstreamError};
pub use output::{ExtractedText, PageText, StatusResponse, SummaryResponse};
pub use pipeline::ocr::{OcrEngine, TesseractCli};
pub use pipeline::render::{PageImage, PageSource, PageVisitor, PdfiumPageSource};
pub use summarize::{extract_file, DocumentPipeline};
