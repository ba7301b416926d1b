//! Plain-text helpers over HTML post bodies.

/// Words read per minute.
const WORDS_PER_MINUTE: usize = 200;

/// Length of generated excerpts in characters.
pub const EXCERPT_LENGTH: usize = 160;

/// Strips tags and common entities from HTML, collapsing whitespace.
#[must_use]
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Estimated reading time, at least one minute.
#[must_use]
pub fn reading_time_minutes(content: &str) -> u32 {
    let words = strip_html(content).split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// Builds an excerpt from the first [`EXCERPT_LENGTH`] characters of the
/// text, cut on a word boundary and suffixed with an ellipsis.
#[must_use]
pub fn generate_excerpt(content: &str) -> String {
    let text = strip_html(content);
    if text.chars().count() <= EXCERPT_LENGTH {
        return text;
    }

    let cut: String = text.chars().take(EXCERPT_LENGTH).collect();
    let trimmed = match cut.rfind(' ') {
        Some(index) if index > 0 => &cut[..index],
        _ => cut.as_str(),
    };

    format!(
        "{}…",
        trimmed.trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Hello <strong>world</strong></p><p>Again&nbsp;&amp; again</p>"),
            "Hello world Again & again"
        );
        assert_eq!(strip_html("no tags"), "no tags");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time_minutes(""), 1);
        assert_eq!(reading_time_minutes(&"word ".repeat(200)), 1);
        assert_eq!(reading_time_minutes(&"word ".repeat(201)), 2);
        assert_eq!(
            reading_time_minutes(&format!("<p>{}</p>", "word ".repeat(1000))),
            5
        );
    }

    #[test]
    fn test_short_content_excerpt_unchanged() {
        assert_eq!(generate_excerpt("<p>Short post.</p>"), "Short post.");
    }

    #[test]
    fn test_long_content_excerpt_cut_on_word() {
        let content = format!("<p>{}</p>", "alpha beta gamma delta ".repeat(20));
        let excerpt = generate_excerpt(&content);

        assert!(excerpt.ends_with('…'));
        assert!(excerpt.chars().count() <= EXCERPT_LENGTH + 1);
        let body = excerpt.trim_end_matches('…');
        assert!(content.contains(body));
        assert!(!body.ends_with(' '));
    }
}
