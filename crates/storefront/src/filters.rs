//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Splits managed copy into paragraphs on blank lines.
///
/// Usage in templates: `{% for p in section.content|paragraphs %}`
#[askama::filter_fn]
pub fn paragraphs(value: impl Display, _env: &dyn askama::Values) -> askama::Result<Vec<String>> {
    Ok(split_paragraphs(&value.to_string()))
}

fn split_paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_paragraphs() {
        assert_eq!(
            split_paragraphs("First.\n\n  Second.\n\n\n\nThird."),
            ["First.", "Second.", "Third."]
        );
        assert!(split_paragraphs("  ").is_empty());
    }
}
