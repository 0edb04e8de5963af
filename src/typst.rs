use crate::block::{ContentBlock, Preview};
use crate::config::Config;

/// Convert a preview to Typst markup, using the placeholder when it is empty.
pub fn preview_to_typst(preview: &Preview, config: &Config) -> String {
    match preview {
        Preview::Empty => {
            let mut out = preamble(config);
            out.push_str("#text(fill: gray, style: \"italic\")[");
            escape_markup(&config.preview.placeholder, &mut out);
            out.push_str("]\n");
            out
        }
        Preview::Blocks(blocks) => blocks_to_typst(blocks, config),
    }
}

/// Convert blocks to Typst markup
pub fn blocks_to_typst(blocks: &[ContentBlock], config: &Config) -> String {
    let mut out = preamble(config);

    for block in blocks {
        emit_block(block, config, &mut out);
    }

    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn preamble(config: &Config) -> String {
    let mut out = String::new();
    out.push_str("#set par(linebreaks: \"optimized\")\n");
    out.push_str("#show link: set text(fill: rgb(");
    push_string_literal(&config.links.color, &mut out);
    out.push_str("))\n");
    if config.links.underline {
        out.push_str("#show link: underline\n");
    }
    out.push('\n');
    out
}

fn emit_block(block: &ContentBlock, config: &Config, out: &mut String) {
    match block {
        ContentBlock::Text(text) => {
            escape_markup(text, out);
        }
        ContentBlock::Break => {
            start_line(out);
            out.push_str("#v(");
            out.push_str(&config.layout.break_spacing);
            out.push_str(")\n");
        }
        ContentBlock::Heading(text) => {
            start_line(out);
            out.push_str("#block[#text(size: ");
            out.push_str(&config.layout.heading_size);
            out.push_str(", weight: \"bold\")[");
            escape_markup(text, out);
            out.push_str("]]\n");
        }
        ContentBlock::ListItem(text) => {
            start_line(out);
            out.push_str("#list[");
            escape_markup(text, out);
            out.push_str("]\n");
        }
        ContentBlock::Section(text) => {
            start_line(out);
            out.push_str("#block(width: 100%, inset: 8pt, radius: 4pt, fill: rgb(");
            push_string_literal(&config.section.fill, out);
            out.push_str("), stroke: (left: 4pt + rgb(");
            push_string_literal(&config.section.accent, out);
            out.push_str(")))[");
            escape_markup(text, out);
            out.push_str("]\n");
        }
        ContentBlock::Link { url, label } => {
            out.push_str("#link(");
            push_string_literal(url, out);
            out.push(')');
            if !label.trim().is_empty() {
                out.push('[');
                escape_markup(label, out);
                out.push(']');
            }
        }
    }
}

/// Block-level calls go on their own line.
fn start_line(out: &mut String) {
    if !out.ends_with('\n') {
        out.push('\n');
    }
}

fn escape_markup(text: &str, out: &mut String) {
    let mut prev = None;
    for ch in text.chars() {
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '/' | '~' | '='
            | '-' | '+' => {
                out.push('\\');
                out.push(ch);
            }
            // `1.` at a line start would open a numbered list
            '.' if prev.is_some_and(|p: char| p.is_ascii_digit()) => out.push_str("\\."),
            '\n' => out.push_str(" \\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
        prev = Some(ch);
    }
}

fn push_string_literal(value: &str, out: &mut String) {
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}
