//! Extraction results handed from the OCR stage to the summarizer.

use serde::{Deserialize, Serialize};

/// OCR text recovered from one page, after hyphen-break cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number.
    pub page_num: usize,
    pub text: String,
}

/// The whole document's text, in page order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedText {
    /// Per-page OCR output in document order.
    pub pages: Vec<PageText>,

    /// Page-delimited text exactly as written to the working file and read
    /// back. This is what the summarizer receives.
    pub text: String,
}

impl ExtractedText {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Character count of the page-delimited text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// `true` when OCR recovered nothing usable: the working text is empty,
    /// or every page came back as whitespace and only delimiters remain.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty() || self.pages.iter().all(|p| p.text.trim().is_empty())
    }
}

/// Response body of `POST /extract-text/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub text: String,
}

/// Response body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
}
