//! Markdown-subset renderer for model replies.
//!
//! Input is escaped before anything else, so the only markup in the output
//! is the fixed set of tags emitted here: `p`, `br`, `ul`, `ol`, `li`,
//! `strong`, `em`, `code` and `pre`.

mod block;
mod escape;
mod fence;
mod inline;

use regex::Captures;

use block::{segment, Block};
use escape::escape_html;
use fence::{extract_code_blocks, CodeBlock, PLACEHOLDER};

pub fn markdown_to_html(text: &str) -> String {
    let escaped = escape_html(text);
    let (text, code_blocks) = extract_code_blocks(&escaped);

    let html: String = segment(&text)
        .iter()
        .map(|block| Block::classify(block).render())
        .collect();

    assemble(&html, &code_blocks)
}

/// Swap every placeholder for its rendered code block.
fn assemble(html: &str, code_blocks: &[CodeBlock]) -> String {
    PLACEHOLDER
        .replace_all(html, |caps: &Captures| {
            let block = caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|idx| code_blocks.get(idx));
            debug_assert!(block.is_some(), "unresolved code block placeholder");
            block.map(CodeBlock::to_html).unwrap_or_default()
        })
        .into_owned()
}
