//! # Prompt Parsing
//!
//! Turns a prompts document into an ordered list of [`Block`]s.
//!
//! Every line beginning with `-` (after trimming) opens a prompt. Non-blank
//! lines that follow belong to it until a blank line, another bullet, or the
//! end of the document closes it. Anything outside a prompt is plain content
//! and gets light inline formatting.
//!
//! ## Modules
//!
//! - **`types`**: `Block`, `PromptBlock`, `PlainBlock`, `PromptId`
//! - **`machine`**: `LineState` and the pure `step` transition, plus the
//!   `PromptBuilder` that numbers prompts as they close
//! - **`inline`**: heading/bold/italic/code formatting for plain lines
//!
//! Parsing is total: malformed input still yields a best-effort block list.

pub mod inline;
pub mod machine;
pub mod types;

pub use machine::{LineState, PromptBuilder, Step, step};
pub use types::{Block, LINE_BREAK, PlainBlock, PromptBlock, PromptId};

/// Parses a prompts document. Accepts `\n` and `\r\n` line endings.
pub fn parse_prompts(text: &str) -> Vec<Block> {
    let mut builder = PromptBuilder::new();
    for line in text.lines() {
        builder.push(line);
    }
    builder.finish()
}

/// Convenience: only the prompts of a parse, in document order.
pub fn prompts(blocks: &[Block]) -> impl Iterator<Item = &PromptBlock> {
    blocks.iter().filter_map(Block::as_prompt)
}
