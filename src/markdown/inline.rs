use std::sync::LazyLock;

use regex::{Captures, Regex};

// Emphasis content may not start or end with whitespace, and underscore
// delimiters only count on word boundaries.
static BOLD_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^\s*](?:[^\n]*?[^\s*])?)\*\*").unwrap());
static BOLD_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b__([^\s_](?:[^\n]*?[^\s_])?)__\b").unwrap());
static ITALIC_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^\s*](?:[^*\n]*?[^\s*])?)\*").unwrap());
static ITALIC_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b_([^\s_](?:[^_\n]*?[^\s_])?)_\b").unwrap());
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\n]+?)`").unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<(/?)([a-z]+)>").unwrap());

/// Apply bold, then italic, then inline code to escaped text.
///
/// Bold runs first so that `**x**` is never read as two italic spans.
pub fn format_inline(text: &str) -> String {
    let text = wrap(text, &BOLD_STAR, "strong");
    let text = wrap(&text, &BOLD_UNDERSCORE, "strong");
    let text = wrap(&text, &ITALIC_STAR, "em");
    let text = wrap(&text, &ITALIC_UNDERSCORE, "em");
    wrap(&text, &INLINE_CODE, "code")
}

fn wrap(text: &str, re: &Regex, tag: &str) -> String {
    re.replace_all(text, |caps: &Captures| {
        let inner = &caps[1];
        // A span whose content would cut through an earlier span stays literal.
        if is_balanced(inner) {
            format!("<{tag}>{inner}</{tag}>")
        } else {
            caps[0].to_string()
        }
    })
    .into_owned()
}

fn is_balanced(text: &str) -> bool {
    let mut open: Vec<&str> = Vec::new();
    for caps in TAG.captures_iter(text) {
        let name = caps.get(2).map_or("", |m| m.as_str());
        if caps[1].is_empty() {
            open.push(name);
        } else if open.pop() != Some(name) {
            return false;
        }
    }
    open.is_empty()
}
