//! Input handling: validate an upload and stage it as a scratch PDF.
//!
//! ## Why a scratch file?
//!
//! The rasteriser opens documents by path. Writing the upload into a
//! [`tempfile::NamedTempFile`] gives pdfium a path while tying cleanup to
//! `Drop`, so the copy disappears on every exit path, including early
//! returns on a corrupt document.

use crate::error::DocIntelError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// A validated upload: declared filename plus non-empty bytes.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    filename: String,
    bytes: Vec<u8>,
}

impl UploadedDocument {
    /// Check the upload constraints, in the order a client sees them:
    /// extension first, then body.
    pub fn validate(filename: impl Into<String>, bytes: Vec<u8>) -> Result<Self, DocIntelError> {
        let filename = filename.into();
        if !is_pdf_filename(&filename) {
            return Err(DocIntelError::InvalidInput(
                "Only PDF files are supported".into(),
            ));
        }
        if bytes.is_empty() {
            return Err(DocIntelError::InvalidInput("Uploaded file is empty".into()));
        }
        Ok(Self { filename, bytes })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// `true` if `filename` ends in `.pdf`, ignoring case.
pub fn is_pdf_filename(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".pdf")
}

/// Write `bytes` to a uniquely named `.pdf` scratch file.
///
/// The file is removed when the returned handle is dropped.
pub fn write_scratch_pdf(bytes: &[u8]) -> Result<NamedTempFile, DocIntelError> {
    let mut tmp = tempfile::Builder::new()
        .prefix("nyaya-upload-")
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| scratch_error(Path::new("<tempdir>"), e))?;
    if let Err(e) = tmp.write_all(bytes).and_then(|_| tmp.as_file().sync_data()) {
        return Err(scratch_error(tmp.path(), e));
    }

    debug!(
        "Staged {} byte upload at {}",
        bytes.len(),
        tmp.path().display()
    );
    Ok(tmp)
}

fn scratch_error(path: &Path, source: std::io::Error) -> DocIntelError {
    DocIntelError::WorkingFile {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_filename() {
        assert!(is_pdf_filename("judgment.pdf"));
        assert!(is_pdf_filename("JUDGMENT.PDF"));
        assert!(is_pdf_filename("order.Pdf"));
        assert!(!is_pdf_filename("judgment.pdf.txt"));
        assert!(!is_pdf_filename("scan.png"));
        assert!(!is_pdf_filename("pdf"));
        assert!(!is_pdf_filename(""));
    }

    #[test]
    fn validate_rejects_wrong_extension_first() {
        // Empty body AND wrong extension: the extension message wins.
        let err = UploadedDocument::validate("notes.docx", Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "Only PDF files are supported");
    }

    #[test]
    fn validate_rejects_empty_body() {
        let err = UploadedDocument::validate("case.pdf", Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "Uploaded file is empty");
    }

    #[test]
    fn validate_accepts_pdf() {
        let doc = UploadedDocument::validate("Case.PDF", b"%PDF-1.7".to_vec()).unwrap();
        assert_eq!(doc.filename(), "Case.PDF");
        assert_eq!(doc.bytes(), b"%PDF-1.7");
    }

    #[test]
    fn scratch_pdf_is_removed_on_drop() {
        let tmp = write_scratch_pdf(b"%PDF-1.4 test").unwrap();
        let path = tmp.path().to_path_buf();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4 test");
        drop(tmp);
        assert!(!path.exists());
    }

    #[test]
    fn scratch_names_are_unique() {
        let a = write_scratch_pdf(b"a").unwrap();
        let b = write_scratch_pdf(b"b").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
