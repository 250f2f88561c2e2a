//! HTTP server binary for nyaya-docintel.
//!
//! Maps flags and environment variables to `ServiceConfig`, then serves the
//! API until Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use nyaya_docintel::config::{expand_home, parse_allowed_origins, DEFAULT_TESSERACT_CMD};
use nyaya_docintel::pipeline::ocr::TesseractCli;
use nyaya_docintel::{router, DocumentPipeline, ServiceConfig, UpstreamFailurePolicy};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on the default address
  GROQ_API_KEY=gsk_... nyaya-server

  # Listen on all interfaces, restrict CORS
  nyaya-server --bind 0.0.0.0:8000 --allowed-origins https://app.example.com

  # Summarise a document
  curl -X POST http://127.0.0.1:8000/extract-text/ -F "file=@judgment.pdf"

REQUIREMENTS:
  tesseract   OCR engine on PATH, or set TESSERACT_CMD
  libpdfium   system-wide, or set PDFIUM_LIB_PATH=/path/to/libpdfium

The latest extracted text is kept in $OUTPUT_DIR/pdfTextExtractor.txt.
"#;

/// Summarise scanned legal PDFs over HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "nyaya-server",
    version,
    about = "Summarise scanned legal PDFs over HTTP",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Address to listen on.
    #[arg(long, env = "NYAYA_BIND", default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Bearer credential for the summarization API.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Chat-completions endpoint.
    #[arg(long, env = "SUMMARY_API_URL", default_value = nyaya_docintel::config::DEFAULT_API_URL)]
    api_url: String,

    /// Model ID sent with every request.
    #[arg(long, env = "SUMMARY_MODEL", default_value = nyaya_docintel::config::DEFAULT_MODEL)]
    model: String,

    /// Summarization request timeout in seconds (0 or unset: none).
    #[arg(long, env = "SUMMARY_API_TIMEOUT")]
    api_timeout: Option<u64>,

    /// What to do when the summarization call fails.
    #[arg(long, env = "SUMMARY_ON_UPSTREAM_ERROR", value_enum, default_value = "degrade")]
    on_upstream_error: PolicyArg,

    /// Directory for the working-text file.
    #[arg(long, env = "OUTPUT_DIR", default_value = nyaya_docintel::config::DEFAULT_OUTPUT_DIR)]
    output_dir: String,

    /// Comma-separated CORS origins, `*` for any.
    #[arg(long, env = "ALLOWED_ORIGINS", default_value = "*")]
    allowed_origins: String,

    /// Reject documents whose extracted text exceeds this many characters.
    #[arg(long, env = "MAX_TEXT_CHARS")]
    max_text_chars: Option<usize>,

    /// Request body limit in bytes.
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = nyaya_docintel::config::DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,

    /// Tesseract executable.
    #[arg(long, env = "TESSERACT_CMD", default_value = DEFAULT_TESSERACT_CMD)]
    tesseract_cmd: String,

    /// Tesseract language, e.g. `eng` or `eng+hin`.
    #[arg(long, env = "OCR_LANG")]
    ocr_lang: Option<String>,

    /// Path to libpdfium; the system library is used when unset.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib_path: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "NYAYA_VERBOSE")]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum PolicyArg {
    Degrade,
    Propagate,
}

impl From<PolicyArg> for UpstreamFailurePolicy {
    fn from(v: PolicyArg) -> Self {
        match v {
            PolicyArg::Degrade => UpstreamFailurePolicy::Degrade,
            PolicyArg::Propagate => UpstreamFailurePolicy::Propagate,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let bind = cli.bind;
    let config = build_config(cli)?;

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    let tesseract = TesseractCli::new(config.tesseract_cmd.clone());
    if !tesseract.is_available() {
        warn!("OCR requests will fail until tesseract is installed");
    }

    info!("Working text file: {}", config.working_text_path().display());
    let pipeline =
        Arc::new(DocumentPipeline::new(config).context("Failed to initialise pipeline")?);
    let app = router(pipeline);

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!("Nyaya Document Intelligence API listening on http://{}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shut down");
    Ok(())
}

fn build_config(cli: Cli) -> Result<ServiceConfig> {
    ServiceConfig::builder()
        .api_key(cli.api_key)
        .api_url(cli.api_url)
        .model(cli.model)
        .api_timeout_secs(cli.api_timeout)
        .upstream_failure_policy(cli.on_upstream_error.into())
        .output_dir(expand_home(&cli.output_dir))
        .allowed_origins(parse_allowed_origins(&cli.allowed_origins))
        .max_text_chars(cli.max_text_chars)
        .max_upload_bytes(cli.max_upload_bytes)
        .tesseract_cmd(cli.tesseract_cmd)
        .ocr_language(cli.ocr_lang)
        .pdfium_lib_path(cli.pdfium_lib_path)
        .build()
        .context("Invalid configuration")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
