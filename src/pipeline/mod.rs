//! Pipeline stages for PDF extraction and summarization.
//!
//! Each submodule implements one transformation step, so each can be tested
//! on its own and swapped (rasteriser, OCR engine) without touching the rest.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ encode ──▶ ocr ──▶ postprocess ──▶ transcript ──▶ llm ──▶ postprocess
//! (upload)  (pdfium)   (PNG)    (tesseract) (hyphens)   (working file) (POST)  (asterisks)
//! ```
//!
//! 1. [`input`]:      validate the upload and stage a scratch `.pdf`
//! 2. [`render`]:     rasterise each page at a fixed zoom; blocking
//! 3. [`encode`]:     PNG-encode the bitmap for the OCR engine
//! 4. [`ocr`]:        recognise text on one page; blocking
//! 5. [`postprocess`]: rejoin hyphenated line breaks; later strip `*`
//! 6. [`transcript`]: append page-delimited text to the working file
//! 7. [`llm`]:        the single completion call; the only network I/O

pub mod encode;
pub mod input;
pub mod llm;
pub mod ocr;
pub mod postprocess;
pub mod render;
pub mod transcript;
