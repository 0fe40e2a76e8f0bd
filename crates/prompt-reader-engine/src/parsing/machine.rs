use super::inline::format_plain_line;
use super::types::{Block, PlainBlock, PromptBlock, PromptId};

/// Parser state between two lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LineState {
    #[default]
    Idle,
    /// A prompt is open; holds the lines collected so far.
    InPrompt { lines: Vec<String> },
}

/// Something a transition hands to the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted {
    /// A closed prompt, not yet numbered.
    Prompt(Vec<String>),
    Plain(PlainBlock),
}

/// Result of feeding one line to [`step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub next: LineState,
    pub emitted: Option<Emitted>,
}

/// Returns the bullet content if `line` opens a prompt.
fn bullet_content(line: &str) -> Option<&str> {
    line.trim().strip_prefix('-').map(str::trim_start)
}

/// Pure transition: the state after `line`, plus at most one emitted unit.
pub fn step(state: LineState, line: &str) -> Step {
    let is_blank = line.trim().is_empty();

    if let Some(content) = bullet_content(line) {
        let emitted = match state {
            LineState::InPrompt { lines } => Some(Emitted::Prompt(lines)),
            LineState::Idle => None,
        };
        return Step {
            next: LineState::InPrompt {
                lines: vec![content.to_string()],
            },
            emitted,
        };
    }

    match state {
        LineState::InPrompt { mut lines } if !is_blank => {
            lines.push(line.to_string());
            Step {
                next: LineState::InPrompt { lines },
                emitted: None,
            }
        }
        LineState::InPrompt { lines } => Step {
            next: LineState::Idle,
            emitted: Some(Emitted::Prompt(lines)),
        },
        LineState::Idle if is_blank => Step {
            next: LineState::Idle,
            emitted: None,
        },
        LineState::Idle => Step {
            next: LineState::Idle,
            emitted: Some(Emitted::Plain(PlainBlock {
                html_fragment: format_plain_line(line),
                source: line.to_string(),
            })),
        },
    }
}

/// Drives [`step`] over a document and numbers prompts as they close.
#[derive(Debug)]
pub struct PromptBuilder {
    state: LineState,
    next_id: PromptId,
    out: Vec<Block>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            state: LineState::Idle,
            next_id: PromptId::FIRST,
            out: vec![],
        }
    }

    pub fn push(&mut self, line: &str) {
        let state = std::mem::take(&mut self.state);
        let Step { next, emitted } = step(state, line);
        self.state = next;
        if let Some(emitted) = emitted {
            self.emit(emitted);
        }
    }

    pub fn finish(mut self) -> Vec<Block> {
        // EOF closes an open prompt
        if let LineState::InPrompt { lines } = std::mem::take(&mut self.state) {
            self.emit(Emitted::Prompt(lines));
        }
        self.out
    }

    fn emit(&mut self, emitted: Emitted) {
        match emitted {
            Emitted::Prompt(lines) => {
                let id = self.next_id;
                self.next_id = id.next();
                self.out.push(Block::Prompt(PromptBlock { id, lines }));
            }
            Emitted::Plain(plain) => self.out.push(Block::Plain(plain)),
        }
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
