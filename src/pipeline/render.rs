//! PDF rasterisation: render every page to a `DynamicImage` via pdfium.
//!
//! ## Why a visitor?
//!
//! Pages are handed to the caller one at a time, in document order. The
//! closure returns `Result` so a failure on any page aborts the whole walk.
//!
//! ## Lock scope
//!
//! With pdfium-render's `thread_safe` feature every bound `Pdfium` holds a
//! process-wide lock until dropped. [`PdfiumPageSource`] therefore renders
//! all pages to PNG up front, drops the library, and only then visits them.
//! OCR runs outside the lock, so concurrent uploads serialise on rendering
//! alone. Pending pages are held PNG-compressed, not as raw bitmaps.
//!
//! Implementations are blocking. Call them from `spawn_blocking`.

use crate::error::DocIntelError;
use crate::pipeline::encode::encode_png;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One rendered page.
pub struct PageImage {
    /// 1-indexed page number.
    pub page_num: usize,
    pub total_pages: usize,
    pub image: DynamicImage,
}

/// Callback invoked once per rendered page.
pub type PageVisitor<'a> = dyn FnMut(PageImage) -> Result<(), DocIntelError> + 'a;

/// Something that can open a PDF and render its pages.
pub trait PageSource: Send + Sync {
    /// Render every page of `pdf_path` at `scale` on both axes, calling
    /// `visit` for each in order. Returns the document's page count.
    fn visit_pages(
        &self,
        pdf_path: &Path,
        scale: f32,
        visit: &mut PageVisitor<'_>,
    ) -> Result<usize, DocIntelError>;
}

/// [`PageSource`] backed by the pdfium C++ library.
#[derive(Debug, Clone, Default)]
pub struct PdfiumPageSource {
    lib_path: Option<PathBuf>,
}

impl PdfiumPageSource {
    /// Bind to the library at `lib_path`, or to the system library when `None`.
    pub fn new(lib_path: Option<PathBuf>) -> Self {
        Self { lib_path }
    }

    /// Load the pdfium bindings.
    ///
    /// Called per document rather than once at startup so a missing library
    /// surfaces as a request error instead of taking the server down.
    pub fn bind(&self) -> Result<Pdfium, DocIntelError> {
        let bindings = match &self.lib_path {
            Some(path) => Pdfium::bind_to_library(path),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| DocIntelError::PdfiumBindingFailed(format!("{:?}", e)))?;
        Ok(Pdfium::new(bindings))
    }
}

impl PdfiumPageSource {
    /// Render every page to PNG bytes. The pdfium lock is held only for the
    /// duration of this call.
    fn render_to_png(&self, pdf_path: &Path, scale: f32) -> Result<Vec<Vec<u8>>, DocIntelError> {
        let pdfium = self.bind()?;

        let document = pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| DocIntelError::CorruptPdf {
                detail: format!("{:?}", e),
            })?;

        let pages = document.pages();
        info!("Converting {} pages...", pages.len());

        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let mut rendered = Vec::with_capacity(pages.len() as usize);

        for (idx, page) in pages.iter().enumerate() {
            let page_num = idx + 1;
            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                DocIntelError::RasterisationFailed {
                    page: page_num,
                    detail: format!("{:?}", e),
                }
            })?;

            let image = bitmap.as_image();
            let png = encode_png(&image).map_err(|e| DocIntelError::RasterisationFailed {
                page: page_num,
                detail: e.to_string(),
            })?;
            debug!(
                "Rendered page {} → {}x{} px, {} bytes PNG",
                page_num,
                image.width(),
                image.height(),
                png.len()
            );
            rendered.push(png);
        }

        Ok(rendered)
    }
}

impl PageSource for PdfiumPageSource {
    fn visit_pages(
        &self,
        pdf_path: &Path,
        scale: f32,
        visit: &mut PageVisitor<'_>,
    ) -> Result<usize, DocIntelError> {
        let rendered = self.render_to_png(pdf_path, scale)?;
        let total_pages = rendered.len();

        for (idx, png) in rendered.into_iter().enumerate() {
            let page_num = idx + 1;
            let image = image::load_from_memory_with_format(&png, image::ImageFormat::Png)
                .map_err(|e| DocIntelError::RasterisationFailed {
                    page: page_num,
                    detail: e.to_string(),
                })?;

            visit(PageImage {
                page_num,
                total_pages,
                image,
            })?;
        }

        Ok(total_pages)
    }
}
