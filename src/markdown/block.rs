use std::sync::LazyLock;

use regex::Regex;

use super::fence::Placeholder;
use super::inline::format_inline;

static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[*-]\s+").unwrap());
static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+").unwrap());

/// Split text into blank-line separated blocks, dropping empty ones.
pub fn segment(text: &str) -> Vec<String> {
    let text = text.replace("\r\n", "\n");
    let text = BLANK_RUN.replace_all(text.trim(), "\n\n");
    text.split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block<'a> {
    Code(Placeholder),
    UnorderedList(&'a str),
    OrderedList(&'a str),
    Paragraph(&'a str),
}

impl<'a> Block<'a> {
    /// Classify a segmented block. The first matching rule wins: a code
    /// placeholder, then a bullet line anywhere, then a numbered line anywhere.
    pub fn classify(text: &'a str) -> Self {
        if let Some(token) = Placeholder::parse(text) {
            Block::Code(token)
        } else if text.lines().any(|line| BULLET.is_match(line)) {
            Block::UnorderedList(text)
        } else if text.lines().any(|line| NUMBER.is_match(line)) {
            Block::OrderedList(text)
        } else {
            Block::Paragraph(text)
        }
    }

    /// Render the block. Code placeholders pass through for the assembler.
    pub fn render(&self) -> String {
        match self {
            Block::Code(token) => token.to_string(),
            Block::UnorderedList(text) => render_list(text, &BULLET, "ul"),
            // Literal numbers are dropped; the browser numbers the items.
            Block::OrderedList(text) => render_list(text, &NUMBER, "ol"),
            Block::Paragraph(text) => {
                format!("<p>{}</p>", format_inline(text).replace('\n', "<br>"))
            }
        }
    }
}

fn render_list(text: &str, marker: &Regex, tag: &str) -> String {
    let mut html = format!("<{tag}>");
    for line in text.lines() {
        let stripped = marker.replace(line, "");
        let item = stripped.trim();
        if item.is_empty() {
            continue;
        }
        html.push_str("<li>");
        html.push_str(&format_inline(item));
        html.push_str("</li>");
    }
    html.push_str(&format!("</{tag}>"));
    html
}
