//! The working-text file: page-delimited OCR output on disk.
//!
//! Each request appends to its own uniquely named temp file inside
//! `output_dir`. Once the page loop finishes, the file is read back and then
//! renamed onto `<output_dir>/pdfTextExtractor.txt`. The rename is atomic,
//! so concurrent requests never interleave writes, and the fixed path always
//! holds one complete extraction (the most recent to finish).

use crate::error::DocIntelError;
use crate::pipeline::postprocess::page_block;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Per-request working-text file.
pub struct Transcript {
    file: NamedTempFile,
}

impl Transcript {
    /// Create an empty transcript inside `dir`, creating `dir` if needed.
    ///
    /// Creating it next to the final path keeps [`Transcript::publish`] a
    /// same-filesystem rename.
    pub fn create_in(dir: &Path) -> Result<Self, DocIntelError> {
        std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
        let file = tempfile::Builder::new()
            .prefix("pdfTextExtractor-")
            .suffix(".txt.tmp")
            .tempfile_in(dir)
            .map_err(|e| io_error(dir, e))?;
        debug!("Working text at {}", file.path().display());
        Ok(Self { file })
    }

    /// Append `--- Page {page_num} ---`, the text and a blank line.
    pub fn append_page(&mut self, page_num: usize, text: &str) -> Result<(), DocIntelError> {
        let block = page_block(page_num, text);
        if let Err(e) = self.file.write_all(block.as_bytes()) {
            return Err(io_error(self.file.path(), e));
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Read the whole file back as UTF-8.
    pub fn read_back(&mut self) -> Result<String, DocIntelError> {
        if let Err(e) = self.file.flush() {
            return Err(io_error(self.file.path(), e));
        }
        std::fs::read_to_string(self.file.path()).map_err(|e| io_error(self.file.path(), e))
    }

    /// Atomically move the transcript onto `dest`, replacing what was there.
    pub fn publish(self, dest: &Path) -> Result<PathBuf, DocIntelError> {
        self.file
            .persist(dest)
            .map_err(|e| io_error(dest, e.error))?;
        debug!("Published working text to {}", dest.display());
        Ok(dest.to_path_buf())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> DocIntelError {
    DocIntelError::WorkingFile {
        path: path.display().to_string(),
        source,
    }
}
