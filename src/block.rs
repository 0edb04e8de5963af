use serde::Serialize;

use crate::parser;
use crate::tags::Dialect;

/// One unit of parsed post content, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "camelCase")]
pub enum ContentBlock {
    /// Untagged text, kept verbatim.
    Text(String),
    Break,
    Heading(String),
    ListItem(String),
    /// Boxed/quoted block. Inner tags are literal text.
    Section(String),
    Link { url: String, label: String },
}

impl ContentBlock {
    /// Text a reader sees for this block, with markup resolved.
    pub fn visible_text(&self) -> &str {
        match self {
            ContentBlock::Text(text)
            | ContentBlock::Heading(text)
            | ContentBlock::ListItem(text)
            | ContentBlock::Section(text) => text,
            ContentBlock::Link { label, .. } => label,
            ContentBlock::Break => "\n",
        }
    }
}

/// Concatenate the visible text of every block in reading order.
pub fn plain_text(blocks: &[ContentBlock]) -> String {
    blocks.iter().map(ContentBlock::visible_text).collect()
}

/// What a preview pane should show for a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Blank draft; the renderer shows its placeholder.
    Empty,
    Blocks(Vec<ContentBlock>),
}

impl Preview {
    pub fn from_markup(markup: &str, dialect: Dialect) -> Self {
        if markup.trim().is_empty() {
            return Preview::Empty;
        }
        let blocks = parser::parse_with_dialect(markup, dialect);
        if blocks.is_empty() {
            Preview::Empty
        } else {
            Preview::Blocks(blocks)
        }
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        match self {
            Preview::Empty => &[],
            Preview::Blocks(blocks) => blocks,
        }
    }
}
