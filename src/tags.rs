//! Tag tokens of the post-body markup.
//!
//! Stored posts are re-parsed by every client, so the tokens here are a wire
//! format: lowercase only, matched byte for byte.

use serde::Deserialize;

/// Which grammar the parser recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `[section]`, `[h]`, `[li]` and `[br]`.
    #[default]
    Base,
    /// Everything in `Base` plus `[source="URL" text:LABEL]`.
    Linked,
}

/// A tag that must appear as an open/close pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairedTag {
    Section,
    Heading,
    ListItem,
}

impl PairedTag {
    /// Declaration order. The sanitizer passes and the backspace tie-break both follow it.
    pub const ALL: [PairedTag; 3] = [PairedTag::Section, PairedTag::Heading, PairedTag::ListItem];

    pub fn open(self) -> &'static str {
        match self {
            PairedTag::Section => "[section]",
            PairedTag::Heading => "[h]",
            PairedTag::ListItem => "[li]",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            PairedTag::Section => "[/section]",
            PairedTag::Heading => "[/h]",
            PairedTag::ListItem => "[/li]",
        }
    }

    /// Opening syntax without the closing bracket, used to spot a tag that
    /// bled into another tag's span. Only counts when not followed by a word
    /// character.
    pub fn fragment(self) -> &'static str {
        match self {
            PairedTag::Section => "[section",
            PairedTag::Heading => "[h",
            PairedTag::ListItem => "[li",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PairedTag::Section => "section",
            PairedTag::Heading => "heading",
            PairedTag::ListItem => "list",
        }
    }
}

/// Self-closing line break token.
pub const BREAK: &str = "[br]";

/// Prefix of the link token, `[source="URL" text:LABEL]`.
pub const LINK_OPEN: &str = "[source=\"";

/// Separator between the quoted URL and the label of a link token.
pub const LINK_LABEL: &str = "\" text:";

/// Tags the editor toolbar can insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Section,
    Heading,
    List,
    Break,
    Link,
}

impl TagKind {
    /// Text inserted before the selection.
    pub fn open_marker(self) -> &'static str {
        match self {
            TagKind::Section => "[section]\n",
            TagKind::Heading => "[h]",
            TagKind::List => "[li]",
            TagKind::Break => "[br]\n",
            TagKind::Link => LINK_OPEN,
        }
    }

    /// Text inserted after the selection.
    pub fn close_marker(self) -> &'static str {
        match self {
            TagKind::Section => "\n[/section]",
            TagKind::Heading => "[/h]",
            TagKind::List => "[/li]",
            TagKind::Break => "",
            TagKind::Link => "\" text:]",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_prefix_their_open_tokens() {
        for tag in PairedTag::ALL {
            assert!(tag.open().starts_with(tag.fragment()));
            assert!(!tag.close().contains(tag.fragment()));
        }
    }

    #[test]
    fn link_markers_wrap_a_url() {
        let token = format!(
            "{}https://x.y{}",
            TagKind::Link.open_marker(),
            TagKind::Link.close_marker()
        );
        assert_eq!(token, "[source=\"https://x.y\" text:]");
        assert!(token.starts_with(LINK_OPEN));
        assert!(token.contains(LINK_LABEL));
    }

    #[test]
    fn dialect_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            dialect: Dialect,
        }
        let w: Wrapper = toml::from_str("dialect = \"linked\"").unwrap();
        assert_eq!(w.dialect, Dialect::Linked);
    }
}
