//! Bracket-tag markup for blog post bodies.
//!
//! Authors format posts with `[section]`, `[h]`, `[li]`, `[br]` and, in the
//! linked dialect, `[source="URL" text:LABEL]`. Posts are stored as the raw
//! markup string; every render parses it again.

mod block;
mod config;
mod editor;
mod excerpt;
mod parser;
mod sanitize;
mod tags;
mod typst;

pub use block::{ContentBlock, Preview, plain_text};
pub use config::{
    Config, ConfigError, ExcerptConfig, LayoutConfig, LinksConfig, PreviewConfig, SectionConfig,
};
pub use editor::{Draft, Edit, EditError, Selection, backspace, block_at_cursor, insert_tag};
pub use excerpt::excerpt;
pub use parser::{parse, parse_with_dialect};
pub use sanitize::sanitize;
pub use tags::{BREAK, Dialect, PairedTag, TagKind};

use thiserror::Error;
use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Typst compilation failed: {0}")]
    Compile(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

/// Convert markup to Typst markup.
pub fn markup_to_typst(markup: &str, config: &Config) -> String {
    let preview = Preview::from_markup(markup, config.dialect);
    let typst_content = typst::preview_to_typst(&preview, config);
    log::debug!(
        "{} blocks -> {} bytes of Typst markup",
        preview.blocks().len(),
        typst_content.len()
    );
    typst_content
}

/// Compile markup to a Typst document.
fn compile_document(
    markup: &str,
    config: &Config,
) -> Result<typst_library::layout::PagedDocument, RenderError> {
    let typst_content = markup_to_typst(markup, config);

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    engine
        .compile()
        .output
        .map_err(|e| RenderError::Compile(format!("{:?}", e)))
}

/// Convert markup to PDF bytes.
pub fn markup_to_pdf(markup: &str, config: &Config) -> Result<Vec<u8>, RenderError> {
    let doc = compile_document(markup, config)?;

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| RenderError::Pdf(format!("{:?}", e)))
}

/// Result of rendering markup to SVG pages.
pub struct SvgDocument {
    pub pages: Vec<String>,
    pub width_pt: f64,
    pub height_pt: f64,
}

/// Convert markup to SVG pages.
pub fn markup_to_svg(markup: &str, config: &Config) -> Result<SvgDocument, RenderError> {
    let doc = compile_document(markup, config)?;

    let pages: Vec<String> = doc.pages.iter().map(|page| typst_svg::svg(page)).collect();

    // Get dimensions from first page (assuming all pages same size)
    let (width_pt, height_pt) = if let Some(first_page) = doc.pages.first() {
        let size = first_page.frame.size();
        (size.x.to_pt(), size.y.to_pt())
    } else {
        (595.0, 842.0) // A4 default
    };

    Ok(SvgDocument {
        pages,
        width_pt,
        height_pt,
    })
}
