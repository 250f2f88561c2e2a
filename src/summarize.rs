//! Document pipeline: PDF bytes in, plain-language summary out.
//!
//! [`DocumentPipeline`] owns the configuration and the three collaborators
//! (page source, OCR engine, completion client) and runs the steps in
//! sequence. It holds no per-request state, so one instance is shared by all
//! HTTP handlers behind an `Arc`.

use crate::config::{ServiceConfig, UpstreamFailurePolicy};
use crate::error::DocIntelError;
use crate::output::{ExtractedText, PageText};
use crate::pipeline::input::write_scratch_pdf;
use crate::pipeline::llm::{degraded_summary, CompletionClient};
use crate::pipeline::ocr::{OcrEngine, TesseractCli};
use crate::pipeline::postprocess::{join_hyphenated_breaks, strip_asterisks};
use crate::pipeline::render::{PageSource, PdfiumPageSource};
use crate::pipeline::transcript::Transcript;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Extraction-summarization pipeline shared across requests.
pub struct DocumentPipeline {
    config: Arc<ServiceConfig>,
    pages: Arc<dyn PageSource>,
    ocr: Arc<dyn OcrEngine>,
    completion: CompletionClient,
}

impl std::fmt::Debug for DocumentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentPipeline")
            .field("config", &self.config)
            .field("completion", &self.completion)
            .finish_non_exhaustive()
    }
}

impl DocumentPipeline {
    /// Pipeline with the production collaborators: pdfium and Tesseract.
    pub fn new(config: ServiceConfig) -> Result<Self, DocIntelError> {
        let pages = PdfiumPageSource::new(config.pdfium_lib_path.clone());
        let ocr = TesseractCli::new(config.tesseract_cmd.clone())
            .with_language(config.ocr_language.clone());
        Self::with_components(config, Arc::new(pages), Arc::new(ocr))
    }

    /// Pipeline with caller-supplied rasteriser and OCR engine.
    pub fn with_components(
        config: ServiceConfig,
        pages: Arc<dyn PageSource>,
        ocr: Arc<dyn OcrEngine>,
    ) -> Result<Self, DocIntelError> {
        let completion = CompletionClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            pages,
            ocr,
            completion,
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Run the whole pipeline on raw PDF bytes.
    ///
    /// # Errors
    /// - [`DocIntelError::CorruptPdf`] and the other processing failures
    ///   when no text could be extracted
    /// - [`DocIntelError::TextTooLarge`] when `max_text_chars` is exceeded
    /// - [`DocIntelError::Upstream`] only under [`UpstreamFailurePolicy::Propagate`]
    pub async fn summarize(&self, pdf_bytes: impl Into<Vec<u8>>) -> Result<String, DocIntelError> {
        let total_start = Instant::now();

        let extracted = self.extract_text(pdf_bytes).await?;

        if extracted.is_blank() {
            error!("Extracted text is empty");
            return Err(DocIntelError::EmptyExtraction);
        }

        let chars = extracted.char_count();
        if let Some(limit) = self.config.max_text_chars {
            if chars > limit {
                warn!("Extracted text is {} chars, limit {}", chars, limit);
                return Err(DocIntelError::TextTooLarge { chars, limit });
            }
        }

        let summary = match self.completion.summarize(&extracted.text).await {
            Ok(summary) => summary,
            Err(e) => match self.config.upstream_failure_policy {
                UpstreamFailurePolicy::Degrade => degraded_summary(&e),
                UpstreamFailurePolicy::Propagate => return Err(e.into()),
            },
        };

        let summary = strip_asterisks(&summary);
        info!(
            "Summarised {} pages ({} chars) in {}ms",
            extracted.page_count(),
            chars,
            total_start.elapsed().as_millis()
        );
        Ok(summary)
    }

    /// Rasterise and OCR every page, writing the working-text file.
    ///
    /// Runs inside `spawn_blocking`: both pdfium and the OCR engine block.
    pub async fn extract_text(
        &self,
        pdf_bytes: impl Into<Vec<u8>>,
    ) -> Result<ExtractedText, DocIntelError> {
        let bytes = pdf_bytes.into();
        let pages = Arc::clone(&self.pages);
        let ocr = Arc::clone(&self.ocr);
        let config = Arc::clone(&self.config);

        tokio::task::spawn_blocking(move || {
            extract_blocking(&bytes, pages.as_ref(), ocr.as_ref(), &config)
        })
        .await
        .map_err(|e| DocIntelError::Internal(format!("Extraction task panicked: {}", e)))?
    }
}

/// Blocking implementation of text extraction.
fn extract_blocking(
    pdf_bytes: &[u8],
    pages: &dyn PageSource,
    ocr: &dyn OcrEngine,
    config: &ServiceConfig,
) -> Result<ExtractedText, DocIntelError> {
    let start = Instant::now();
    let scratch = write_scratch_pdf(pdf_bytes)?;
    let mut transcript = Transcript::create_in(&config.output_dir)?;
    let mut page_texts: Vec<PageText> = Vec::new();

    let total_pages = pages.visit_pages(scratch.path(), config.render_scale, &mut |page| {
        info!("Processing page {}/{}", page.page_num, page.total_pages);

        let raw = ocr
            .recognize(&page.image)
            .map_err(|source| DocIntelError::OcrFailed {
                page: page.page_num,
                source,
            })?;
        let text = join_hyphenated_breaks(&raw);

        transcript.append_page(page.page_num, &text)?;
        page_texts.push(PageText {
            page_num: page.page_num,
            text,
        });
        Ok(())
    })?;

    // Scratch copy is no longer needed once the document has been walked.
    drop(scratch);

    let text = transcript.read_back()?;
    let working_file = transcript.publish(&config.working_text_path())?;

    info!(
        "Extracted {} chars from {} pages in {}ms ({})",
        text.len(),
        total_pages,
        start.elapsed().as_millis(),
        working_file.display()
    );

    Ok(ExtractedText {
        pages: page_texts,
        text,
    })
}

/// Extract text from a PDF already on disk, without summarising.
///
/// Used by diagnostics and the e2e tests; it writes nothing to `output_dir`.
pub fn extract_file(
    pdf_path: &Path,
    pages: &dyn PageSource,
    ocr: &dyn OcrEngine,
    render_scale: f32,
) -> Result<Vec<PageText>, DocIntelError> {
    let mut out = Vec::new();
    pages.visit_pages(pdf_path, render_scale, &mut |page| {
        let raw = ocr
            .recognize(&page.image)
            .map_err(|source| DocIntelError::OcrFailed {
                page: page.page_num,
                source,
            })?;
        out.push(PageText {
            page_num: page.page_num,
            text: join_hyphenated_breaks(&raw),
        });
        Ok(())
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use crate::pipeline::render::{PageImage, PageVisitor};
    use image::DynamicImage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Renders `n` blank pages, or fails to open if `n` is `None`.
    struct FakePages(Option<usize>);

    impl PageSource for FakePages {
        fn visit_pages(
            &self,
            _pdf_path: &Path,
            _scale: f32,
            visit: &mut PageVisitor<'_>,
        ) -> Result<usize, DocIntelError> {
            let n = self.0.ok_or_else(|| DocIntelError::CorruptPdf {
                detail: "FormatError".into(),
            })?;
            for i in 0..n {
                visit(PageImage {
                    page_num: i + 1,
                    total_pages: n,
                    image: DynamicImage::new_luma8(2, 2),
                })?;
            }
            Ok(n)
        }
    }

    /// Returns the scripted text for each call in turn.
    struct ScriptedOcr {
        texts: Vec<&'static str>,
        calls: AtomicUsize,
    }

    impl ScriptedOcr {
        fn new(texts: Vec<&'static str>) -> Self {
            Self {
                texts,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl OcrEngine for ScriptedOcr {
        fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
            let i = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.texts.get(i).copied().unwrap_or_default().to_string())
        }
    }

    struct FailingOcr;

    impl OcrEngine for FailingOcr {
        fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
            Err(OcrError::Engine {
                status: "exit status: 1".into(),
                stderr: "Failed loading language 'eng'".into(),
            })
        }
    }

    fn pipeline(dir: &Path, pages: FakePages, ocr: impl OcrEngine + 'static) -> DocumentPipeline {
        let config = ServiceConfig::builder()
            .api_key("test-key")
            // Nothing listens here; extraction tests never reach the network.
            .api_url("http://127.0.0.1:9/v1/chat/completions")
            .output_dir(dir)
            .build()
            .unwrap();
        DocumentPipeline::with_components(config, Arc::new(pages), Arc::new(ocr)).unwrap()
    }

    #[tokio::test]
    async fn extract_writes_delimited_working_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(
            dir.path(),
            FakePages(Some(2)),
            ScriptedOcr::new(vec!["exam-\nple one", "page two"]),
        );

        let extracted = p.extract_text(b"%PDF-1.4".to_vec()).await.unwrap();
        assert_eq!(extracted.page_count(), 2);
        assert_eq!(extracted.pages[0].text, "example one");
        assert_eq!(
            extracted.text,
            "--- Page 1 ---\nexample one\n\n--- Page 2 ---\npage two\n\n"
        );

        let on_disk = std::fs::read_to_string(dir.path().join("pdfTextExtractor.txt")).unwrap();
        assert_eq!(on_disk, extracted.text);
    }

    #[tokio::test]
    async fn extract_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(dir.path(), FakePages(Some(1)), ScriptedOcr::new(vec!["x"]));
        p.extract_text(b"%PDF").await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["pdfTextExtractor.txt".to_string()]);
    }

    #[tokio::test]
    async fn corrupt_pdf_is_processing_failure() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(dir.path(), FakePages(None), ScriptedOcr::new(vec![]));
        let err = p.summarize(b"not a pdf").await.unwrap_err();
        assert!(matches!(err, DocIntelError::CorruptPdf { .. }), "got: {err:?}");
        assert!(err.is_processing_failure());
    }

    #[tokio::test]
    async fn ocr_failure_aborts_document() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(dir.path(), FakePages(Some(3)), FailingOcr);
        let err = p.summarize(b"%PDF").await.unwrap_err();
        assert!(matches!(err, DocIntelError::OcrFailed { page: 1, .. }), "got: {err:?}");
        assert!(!dir.path().join("pdfTextExtractor.txt").exists());
    }

    #[tokio::test]
    async fn blank_pages_are_empty_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(dir.path(), FakePages(Some(2)), ScriptedOcr::new(vec!["  \n", "\n"]));
        let err = p.summarize(b"%PDF").await.unwrap_err();
        assert!(matches!(err, DocIntelError::EmptyExtraction), "got: {err:?}");
    }

    #[tokio::test]
    async fn zero_page_document_is_empty_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(dir.path(), FakePages(Some(0)), ScriptedOcr::new(vec![]));
        let err = p.summarize(b"%PDF").await.unwrap_err();
        assert!(matches!(err, DocIntelError::EmptyExtraction), "got: {err:?}");
    }

    #[tokio::test]
    async fn unreachable_upstream_degrades_to_error_text() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(dir.path(), FakePages(Some(1)), ScriptedOcr::new(vec!["facts"]));
        let summary = p.summarize(b"%PDF").await.unwrap();
        assert!(summary.starts_with("Error summarizing text:"), "got: {summary}");
    }

    #[test]
    fn extract_file_collects_pages_without_output_dir() {
        let ocr = ScriptedOcr::new(vec!["a-\nb", "c"]);
        let pages = extract_file(Path::new("unused.pdf"), &FakePages(Some(2)), &ocr, 2.0).unwrap();
        assert_eq!(
            pages,
            vec![
                PageText {
                    page_num: 1,
                    text: "ab".into()
                },
                PageText {
                    page_num: 2,
                    text: "c".into()
                },
            ]
        );
    }
}
