pub mod host;
pub mod io;
pub mod panel;
pub mod parsing;
pub mod render;
pub mod writer;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use host::*;
pub use io::IoError;
pub use panel::*;
pub use parsing::{Block, LINE_BREAK, PlainBlock, PromptBlock, PromptId, parse_prompts};
pub use render::{PanelView, PromptCard, ViewItem, render, render_html};
pub use writer::{LineEnding, append_prompt, normalize_prompt_body};
