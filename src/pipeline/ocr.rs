//! OCR: turn a page bitmap into text.
//!
//! [`OcrEngine`] is the seam; [`TesseractCli`] is the production engine. It
//! drives the `tesseract` executable rather than linking libtesseract, so the
//! crate builds without leptonica headers and the engine can be swapped by
//! pointing `TESSERACT_CMD` at another install.

use crate::error::OcrError;
use crate::pipeline::encode::encode_png;
use image::DynamicImage;
use std::process::Command;
use tracing::{debug, warn};

/// Bitmap → text. Implementations are blocking and called from
/// `spawn_blocking`.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// OCR through the Tesseract command-line tool.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    command: String,
    language: Option<String>,
}

impl TesseractCli {
    /// `command` is an executable name on `PATH` or a full path.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: None,
        }
    }

    /// Set the `-l` language (e.g. `eng`, `eng+hin`). `None` keeps the
    /// engine default.
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// `true` if `<command> --version` runs.
    pub fn is_available(&self) -> bool {
        let ok = Command::new(&self.command)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false);
        if !ok {
            warn!(
                "tesseract not found at '{}' - install tesseract-ocr or set TESSERACT_CMD",
                self.command
            );
        }
        ok
    }

    fn build_command(&self, image_path: &std::path::Path) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg(image_path).arg("stdout");
        if let Some(ref lang) = self.language {
            cmd.arg("-l").arg(lang);
        }
        cmd
    }
}

impl OcrEngine for TesseractCli {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let png = encode_png(image)?;

        let mut tmp = tempfile::Builder::new()
            .prefix("nyaya-page-")
            .suffix(".png")
            .tempfile()?;
        std::io::Write::write_all(&mut tmp, &png)?;

        let output = self
            .build_command(tmp.path())
            .output()
            .map_err(|source| OcrError::Launch {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::Engine {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("OCR produced {} chars", text.len());
        Ok(text)
    }
}
