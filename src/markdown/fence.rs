use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Delimits placeholder tokens. The escaper never lets NUL through, so a
/// token can only ever come from the extractor.
const DELIM: char = '\0';

pub static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x00CODEBLOCK(\d+)\x00").unwrap());

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```([^\s`]*)[^\S\n]*\n([\s\S]*?)```").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub content: String,
}

impl CodeBlock {
    pub fn to_html(&self) -> String {
        match &self.language {
            Some(lang) => format!(
                "<pre><code class=\"language-{lang}\">{}</code></pre>",
                self.content
            ),
            None => format!("<pre><code>{}</code></pre>", self.content),
        }
    }
}

/// Reference to the n-th extracted code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(pub usize);

impl Placeholder {
    /// Parse a block that consists of exactly one token.
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text
            .strip_prefix(DELIM)?
            .strip_suffix(DELIM)?
            .strip_prefix("CODEBLOCK")?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Placeholder)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DELIM}CODEBLOCK{}{DELIM}", self.0)
    }
}

/// Pull fenced code blocks out of already-escaped text.
///
/// Each fenced region is replaced by its placeholder padded with blank
/// lines, so segmentation always yields the token as a block of its own.
/// Unterminated fences do not match and remain literal text.
pub fn extract_code_blocks(escaped: &str) -> (String, Vec<CodeBlock>) {
    let mut blocks: Vec<CodeBlock> = Vec::new();
    let text = FENCE
        .replace_all(escaped, |caps: &Captures| {
            let token = Placeholder(blocks.len());
            let language = caps
                .get(1)
                .map(|m| m.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            let content = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
            blocks.push(CodeBlock { language, content });
            format!("\n\n{token}\n\n")
        })
        .into_owned();
    (text, blocks)
}
