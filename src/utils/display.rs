//! Terminal display utilities.

use unicode_width::UnicodeWidthStr;

/// Truncate text to fit within the specified width, appending an ellipsis
/// if truncation occurred.
///
/// # Examples
///
/// ```
/// use paper_scout::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
/// assert_eq!(truncate_with_ellipsis("Hi", 8), "Hi");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width > max_width - 3 {
            break;
        }
        width += ch_width;
        out.push(ch);
    }

    out.truncate(out.trim_end().len());
    out.push_str("...");
    out
}
