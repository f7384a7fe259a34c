//! Local PDF text extraction.
//!
//! A [`PdfTextSource`] opens a document from a byte buffer and returns the
//! text items of every page, in page order. [`parse_pdf`] flattens that into
//! one string: items on a page joined by a single space, every page followed
//! by a newline. Layout and columns are ignored.
//!
//! ## Threading
//!
//! `pdfium-render` wraps the PDFium C++ library, which is synchronous and
//! keeps thread-local state. [`PdfiumTextSource`] does all PDFium work on the
//! blocking pool so tokio workers keep serving other tasks while a document
//! is being read.

use crate::error::LocalParseError;
use futures::future::BoxFuture;
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// Environment variable pointing at an existing PDFium shared library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Text items of one page, in content order.
pub type PageItems = Vec<String>;

/// Turns a PDF byte buffer into per-page text items.
pub trait PdfTextSource: Send + Sync {
    /// Extract every page, page 1 first. Any failure aborts the whole
    /// document; partial results are never returned.
    fn extract_pages(
        &self,
        bytes: Vec<u8>,
    ) -> BoxFuture<'_, Result<Vec<PageItems>, LocalParseError>>;
}

/// Extract and flatten a document's text.
pub async fn parse_pdf(
    source: &dyn PdfTextSource,
    bytes: Vec<u8>,
) -> Result<String, LocalParseError> {
    let pages = source.extract_pages(bytes).await?;
    Ok(flatten_pages(&pages))
}

/// Join each page's items with a space and end every page with `\n`.
pub fn flatten_pages(pages: &[PageItems]) -> String {
    let mut text = String::new();
    for items in pages {
        text.push_str(&items.join(" "));
        text.push('\n');
    }
    text
}

/// [`PdfTextSource`] backed by PDFium's text layer.
#[derive(Debug, Default, Clone)]
pub struct PdfiumTextSource {
    library_path: Option<PathBuf>,
}

impl PdfiumTextSource {
    /// Bind using `PDFIUM_LIB_PATH`, a library next to the executable, or
    /// the system library, in that order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to the library at `path` only.
    pub fn with_library_path(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some(path.into()),
        }
    }
}

impl PdfTextSource for PdfiumTextSource {
    fn extract_pages(
        &self,
        bytes: Vec<u8>,
    ) -> BoxFuture<'_, Result<Vec<PageItems>, LocalParseError>> {
        let library_path = self.library_path.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || extract_blocking(library_path, &bytes))
                .await
                .map_err(|e| LocalParseError::Task(e.to_string()))?
        })
    }
}

/// Blocking implementation of page text extraction.
fn extract_blocking(
    library_path: Option<PathBuf>,
    bytes: &[u8],
) -> Result<Vec<PageItems>, LocalParseError> {
    let pdfium = bind_pdfium(library_path)?;

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| LocalParseError::Open(format!("{:?}", e)))?;

    let pages = document.pages();
    let total_pages = pages.len();
    info!("PDF loaded: {} pages", total_pages);

    let mut result = Vec::with_capacity(total_pages as usize);
    for idx in 0..total_pages {
        let page_num = idx as usize + 1;
        let page = pages.get(idx).map_err(|e| LocalParseError::Page {
            page: page_num,
            detail: format!("{:?}", e),
        })?;
        let text = page.text().map_err(|e| LocalParseError::Page {
            page: page_num,
            detail: format!("{:?}", e),
        })?;

        let items: PageItems = text
            .segments()
            .iter()
            .map(|segment| segment.text())
            .collect();
        debug!("Page {} → {} text items", page_num, items.len());
        result.push(items);
    }

    Ok(result)
}

/// Load the PDFium dynamic library.
fn bind_pdfium(library_path: Option<PathBuf>) -> Result<Pdfium, LocalParseError> {
    let explicit =
        library_path.or_else(|| std::env::var(PDFIUM_LIB_PATH_ENV).ok().map(PathBuf::from));
    if let Some(path) = explicit {
        debug!("Loading PDFium from {}", path.display());
        return Pdfium::bind_to_library(&path)
            .map(Pdfium::new)
            .map_err(|e| LocalParseError::EngineUnavailable(format!("{}: {}", path.display(), e)));
    }

    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
    {
        let candidate =
            Pdfium::pdfium_platform_library_name_at_path(dir.to_string_lossy().as_ref());
        if let Ok(bindings) = Pdfium::bind_to_library(&candidate) {
            debug!("Loaded PDFium next to executable: {}", dir.display());
            return Ok(Pdfium::new(bindings));
        }
    }

    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| {
            LocalParseError::EngineUnavailable(format!(
                "{e}. Set {PDFIUM_LIB_PATH_ENV}=/path/to/libpdfium or install PDFium"
            ))
        })
}
