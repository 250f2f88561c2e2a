//! Configuration for the extraction-summarization service.
//!
//! Everything the pipeline and the HTTP layer need is carried by one
//! [`ServiceConfig`], built through [`ServiceConfigBuilder`] and handed to
//! [`crate::DocumentPipeline::new`]. Nothing is read from process-wide
//! constants at request time; the server binary maps its flags and
//! environment variables onto the builder once at startup.

use crate::error::DocIntelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default OpenAI-compatible completion endpoint.
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default completion model.
pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

/// Default working-text directory, expanded against the home directory.
pub const DEFAULT_OUTPUT_DIR: &str = "~/Nyaya/logs";

/// File name of the latest extraction inside `output_dir`.
pub const WORKING_TEXT_FILE: &str = "pdfTextExtractor.txt";

/// Default request body limit: 50 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Default Tesseract executable for the current platform.
#[cfg(windows)]
pub const DEFAULT_TESSERACT_CMD: &str = r"C:\Program Files\Tesseract-OCR\tesseract.exe";
/// Default Tesseract executable for the current platform.
#[cfg(not(windows))]
pub const DEFAULT_TESSERACT_CMD: &str = "tesseract";

/// Configuration for one running service instance.
///
/// Built via [`ServiceConfig::builder()`]. `Default` is available but has an
/// empty `api_key`, so [`ServiceConfigBuilder::build`] must be used for
/// anything that talks to the completion API.
///
/// # Example
/// ```rust
/// use nyaya_docintel::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .api_key("gsk_test")
///     .output_dir("/tmp/nyaya")
///     .build()
///     .unwrap();
/// assert_eq!(config.render_scale, 2.0);
/// ```
#[derive(Clone)]
pub struct ServiceConfig {
    /// Completion endpoint URL. Default: [`DEFAULT_API_URL`].
    pub api_url: String,

    /// Bearer credential for the completion endpoint. Never logged.
    pub api_key: String,

    /// Model identifier sent with every request. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Optional request timeout for the completion call in seconds.
    /// `None` keeps the HTTP client's default.
    pub api_timeout_secs: Option<u64>,

    /// What to do when the completion call fails. Default: [`UpstreamFailurePolicy::Degrade`].
    pub upstream_failure_policy: UpstreamFailurePolicy,

    /// Directory holding [`WORKING_TEXT_FILE`]. Created on demand.
    pub output_dir: PathBuf,

    /// Zoom applied on both axes when rasterising a page. Default: 2.0.
    ///
    /// PDF user space is 72 units per inch, so 2.0 renders at ~144 DPI.
    pub render_scale: f32,

    /// Tesseract executable name or path.
    pub tesseract_cmd: String,

    /// Tesseract language (`-l`). `None` leaves the engine default.
    pub ocr_language: Option<String>,

    /// Explicit pdfium shared library. `None` binds the system library.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Reject documents whose extracted text exceeds this many characters.
    /// `None` sends the whole text regardless of size.
    pub max_text_chars: Option<usize>,

    /// CORS origins accepted by the HTTP layer. Default: any.
    pub allowed_origins: AllowedOrigins,

    /// Maximum accepted request body in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            api_timeout_secs: None,
            upstream_failure_policy: UpstreamFailurePolicy::default(),
            output_dir: expand_home(DEFAULT_OUTPUT_DIR),
            render_scale: 2.0,
            tesseract_cmd: DEFAULT_TESSERACT_CMD.to_string(),
            ocr_language: None,
            pdfium_lib_path: None,
            max_text_chars: None,
            allowed_origins: AllowedOrigins::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model", &self.model)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("upstream_failure_policy", &self.upstream_failure_policy)
            .field("output_dir", &self.output_dir)
            .field("render_scale", &self.render_scale)
            .field("tesseract_cmd", &self.tesseract_cmd)
            .field("ocr_language", &self.ocr_language)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field("max_text_chars", &self.max_text_chars)
            .field("allowed_origins", &self.allowed_origins)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl ServiceConfig {
    /// Create a new builder for `ServiceConfig`.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            config: Self::default(),
        }
    }

    /// Path of the latest-extraction file, `<output_dir>/pdfTextExtractor.txt`.
    pub fn working_text_path(&self) -> PathBuf {
        self.output_dir.join(WORKING_TEXT_FILE)
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.config.api_timeout_secs = secs.filter(|s| *s > 0);
        self
    }

    pub fn upstream_failure_policy(mut self, policy: UpstreamFailurePolicy) -> Self {
        self.config.upstream_failure_policy = policy;
        self
    }

    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn render_scale(mut self, scale: f32) -> Self {
        self.config.render_scale = scale;
        self
    }

    pub fn tesseract_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.config.tesseract_cmd = cmd.into();
        self
    }

    pub fn ocr_language(mut self, lang: Option<String>) -> Self {
        self.config.ocr_language = lang.filter(|l| !l.trim().is_empty());
        self
    }

    pub fn pdfium_lib_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.pdfium_lib_path = path;
        self
    }

    pub fn max_text_chars(mut self, limit: Option<usize>) -> Self {
        self.config.max_text_chars = limit;
        self
    }

    pub fn allowed_origins(mut self, origins: AllowedOrigins) -> Self {
        self.config.allowed_origins = origins;
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServiceConfig, DocIntelError> {
        let c = &self.config;
        if c.api_key.trim().is_empty() {
            return Err(DocIntelError::InvalidConfig(
                "API key is required (set GROQ_API_KEY)".into(),
            ));
        }
        if c.api_url.trim().is_empty() {
            return Err(DocIntelError::InvalidConfig("API URL must not be empty".into()));
        }
        if c.model.trim().is_empty() {
            return Err(DocIntelError::InvalidConfig("Model must not be empty".into()));
        }
        if !(c.render_scale.is_finite() && c.render_scale > 0.0) {
            return Err(DocIntelError::InvalidConfig(format!(
                "Render scale must be > 0, got {}",
                c.render_scale
            )));
        }
        if c.max_upload_bytes == 0 {
            return Err(DocIntelError::InvalidConfig(
                "Upload limit must be ≥ 1 byte".into(),
            ));
        }
        if c.max_text_chars == Some(0) {
            return Err(DocIntelError::InvalidConfig(
                "Text limit must be ≥ 1 character".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How a failed completion call surfaces to the caller.
///
/// | Policy | Caller sees |
/// |--------|-------------|
/// | `Degrade` | HTTP 200 whose `text` is `Error summarizing text: …` (default) |
/// | `Propagate` | HTTP 502 with the upstream error as detail |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UpstreamFailurePolicy {
    /// Fold the upstream error into the summary string.
    #[default]
    Degrade,
    /// Fail the request with [`DocIntelError::Upstream`].
    Propagate,
}

/// Origins permitted by the CORS layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllowedOrigins {
    /// `*`: any origin.
    #[default]
    Any,
    /// Exact origins, e.g. `https://app.example.com`.
    List(Vec<String>),
}

/// Parse the `ALLOWED_ORIGINS` format: comma-separated origins, `*` for any.
///
/// Blank entries are dropped; a lone `*` anywhere in the list wins.
pub fn parse_allowed_origins(raw: &str) -> AllowedOrigins {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowedOrigins::Any
    } else {
        AllowedOrigins::List(origins)
    }
}

/// Expand a leading `~` against the user's home directory.
///
/// Paths without `~` are returned unchanged, as is `~` itself when no home
/// directory can be determined.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
            .or_else(|| path.strip_prefix("~\\"))
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
