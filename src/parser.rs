use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::block::ContentBlock;
use crate::tags::{BREAK, Dialect, LINK_LABEL, LINK_OPEN, PairedTag};

static BASE_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| build_grammar(Dialect::Base));
static LINKED_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| build_grammar(Dialect::Linked));

/// Build the alternation for a dialect. Alternatives are tried left to right
/// at each position: section, heading, list, link, break.
fn build_grammar(dialect: Dialect) -> Regex {
    let mut alternatives: Vec<String> = PairedTag::ALL
        .iter()
        .map(|tag| {
            format!(
                "{}(?P<{}>.*?){}",
                regex::escape(tag.open()),
                tag.name(),
                regex::escape(tag.close())
            )
        })
        .collect();
    if dialect == Dialect::Linked {
        alternatives.push(format!(
            r#"{}(?P<url>[^"]*){}(?P<label>[^\]]*)\]"#,
            regex::escape(LINK_OPEN),
            regex::escape(LINK_LABEL)
        ));
    }
    alternatives.push(regex::escape(BREAK));

    let pattern = format!("(?s){}", alternatives.join("|"));
    Regex::new(&pattern).expect("tag grammar is a valid regex")
}

/// The compiled grammar for a dialect, shared with the excerpt builder.
pub(crate) fn grammar(dialect: Dialect) -> &'static Regex {
    match dialect {
        Dialect::Base => &BASE_GRAMMAR,
        Dialect::Linked => &LINKED_GRAMMAR,
    }
}

/// Parse markup in the base dialect.
pub fn parse(markup: &str) -> Vec<ContentBlock> {
    parse_with_dialect(markup, Dialect::Base)
}

/// Parse markup into blocks in one left-to-right scan.
///
/// Never fails: anything the grammar does not recognise, including stray or
/// unterminated tags, comes back as `Text`. Tags inside a captured body are
/// not parsed again.
pub fn parse_with_dialect(markup: &str, dialect: Dialect) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    let mut last = 0;

    for caps in grammar(dialect).captures_iter(markup) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            blocks.push(ContentBlock::Text(markup[last..whole.start()].to_string()));
        }
        blocks.push(block_from_captures(&caps));
        last = whole.end();
    }

    if last < markup.len() {
        blocks.push(ContentBlock::Text(markup[last..].to_string()));
    }

    blocks
}

fn block_from_captures(caps: &Captures<'_>) -> ContentBlock {
    let body = |tag: PairedTag| caps.name(tag.name()).map(|m| m.as_str().trim().to_string());

    if let Some(content) = body(PairedTag::Section) {
        ContentBlock::Section(content)
    } else if let Some(content) = body(PairedTag::Heading) {
        ContentBlock::Heading(content)
    } else if let Some(content) = body(PairedTag::ListItem) {
        ContentBlock::ListItem(content)
    } else if let Some(url) = caps.name("url") {
        ContentBlock::Link {
            url: url.as_str().to_string(),
            label: caps
                .name("label")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        }
    } else {
        ContentBlock::Break
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn text(s: &str) -> ContentBlock {
        ContentBlock::Text(s.to_string())
    }

    #[test]
    fn plain_text_is_one_block() {
        assert_eq!(parse("hello world"), vec![text("hello world")]);
    }

    #[test]
    fn empty_input_has_no_blocks() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn whitespace_is_kept_as_text() {
        assert_eq!(parse("  \n "), vec![text("  \n ")]);
    }

    #[test]
    fn mixed_document() {
        assert_eq!(
            parse("Check [h]this[/h] out[br]for real"),
            vec![
                text("Check "),
                ContentBlock::Heading("this".to_string()),
                text(" out"),
                ContentBlock::Break,
                text("for real"),
            ]
        );
    }

    #[rstest]
    #[case("[section]\n  quoted \n[/section]", ContentBlock::Section("quoted".to_string()))]
    #[case("[h] Title [/h]", ContentBlock::Heading("Title".to_string()))]
    #[case("[li]\titem\n[/li]", ContentBlock::ListItem("item".to_string()))]
    #[case("[br]", ContentBlock::Break)]
    fn single_tags(#[case] markup: &str, #[case] expected: ContentBlock) {
        assert_eq!(parse(markup), vec![expected]);
    }

    #[test]
    fn bodies_span_lines() {
        assert_eq!(
            parse("[section]line one\nline two[/section]"),
            vec![ContentBlock::Section("line one\nline two".to_string())]
        );
    }

    #[test]
    fn nested_tags_stay_literal() {
        assert_eq!(
            parse("[section]a [h]b[/h] c[/section]"),
            vec![ContentBlock::Section("a [h]b[/h] c".to_string())]
        );
    }

    #[test]
    fn bodies_are_non_greedy() {
        assert_eq!(
            parse("[li]a[/li] and [li]b[/li]"),
            vec![
                ContentBlock::ListItem("a".to_string()),
                text(" and "),
                ContentBlock::ListItem("b".to_string()),
            ]
        );
    }

    #[test]
    fn leftmost_match_wins() {
        // The heading opens first, so its body swallows the section open tag
        // and the trailing section close is left as text.
        assert_eq!(
            parse("[h]x[section]y[/h]z[/section]"),
            vec![
                ContentBlock::Heading("x[section]y".to_string()),
                text("z[/section]"),
            ]
        );
    }

    #[rstest]
    #[case("[section]")]
    #[case("[/h]")]
    #[case("[li]no close")]
    #[case("[BR]")]
    #[case("[ br ]")]
    #[case("[[[]]]")]
    fn unrecognised_tags_are_text(#[case] markup: &str) {
        assert_eq!(parse(markup), vec![text(markup)]);
    }

    #[test]
    fn unterminated_open_before_complete_pair() {
        assert_eq!(
            parse("[section][section][/section]"),
            vec![ContentBlock::Section("[section]".to_string())]
        );
    }

    #[test]
    fn text_gaps_are_not_trimmed() {
        assert_eq!(
            parse("  a [br]  b  "),
            vec![text("  a "), ContentBlock::Break, text("  b  ")]
        );
    }

    #[test]
    fn base_dialect_ignores_links() {
        let markup = r#"see [source="https://a.b" text:here]"#;
        assert_eq!(parse(markup), vec![text(markup)]);
    }

    #[test]
    fn linked_dialect_parses_links() {
        assert_eq!(
            parse_with_dialect(
                r#"see [source="https://a.b/c?d=1" text:the docs] now"#,
                Dialect::Linked
            ),
            vec![
                text("see "),
                ContentBlock::Link {
                    url: "https://a.b/c?d=1".to_string(),
                    label: "the docs".to_string(),
                },
                text(" now"),
            ]
        );
    }

    #[test]
    fn link_with_empty_label() {
        assert_eq!(
            parse_with_dialect(r#"[source="u" text:]"#, Dialect::Linked),
            vec![ContentBlock::Link {
                url: "u".to_string(),
                label: String::new(),
            }]
        );
    }

    #[test]
    fn link_inside_section_stays_literal() {
        assert_eq!(
            parse_with_dialect(
                r#"[section][source="u" text:l][/section]"#,
                Dialect::Linked
            ),
            vec![ContentBlock::Section(r#"[source="u" text:l]"#.to_string())]
        );
    }

    #[test]
    fn many_breaks() {
        let markup = "[br]".repeat(10_000);
        let blocks = parse(&markup);
        assert_eq!(blocks.len(), 10_000);
        assert!(blocks.iter().all(|b| *b == ContentBlock::Break));
    }

    #[test]
    fn multibyte_text_around_tags() {
        assert_eq!(
            parse("héllo [h]wörld ✓[/h]日本"),
            vec![
                text("héllo "),
                ContentBlock::Heading("wörld ✓".to_string()),
                text("日本"),
            ]
        );
    }
}
