use crate::config::ExcerptConfig;
use crate::parser;
use crate::tags::Dialect;

/// One-line summary of a post body for feed cards.
///
/// Tagged spans are dropped along with their bodies, so only untagged prose
/// remains. Whitespace runs collapse to one space and the result is cut to
/// `max_chars` characters plus the ellipsis.
pub fn excerpt(markup: &str, dialect: Dialect, options: &ExcerptConfig) -> String {
    let untagged = parser::grammar(dialect).replace_all(markup, "");
    let collapsed = untagged.split_whitespace().collect::<Vec<_>>().join(" ");

    match collapsed.char_indices().nth(options.max_chars) {
        Some((cut, _)) => format!("{}{}", &collapsed[..cut], options.ellipsis),
        None => collapsed,
    }
}
