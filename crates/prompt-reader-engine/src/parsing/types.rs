use std::fmt;

/// Marker placed between the lines of a multi-line prompt body.
pub const LINE_BREAK: &str = "<br>";

/// Identifier of a prompt within one parse.
///
/// Ids start at 1 and follow document order. They are recomputed on every
/// parse, so an id is only meaningful for the render it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PromptId(pub u32);

impl PromptId {
    pub const FIRST: PromptId = PromptId(1);

    #[must_use]
    pub fn next(self) -> PromptId {
        PromptId(self.0 + 1)
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bullet entry (`- ...`) together with its continuation lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptBlock {
    pub id: PromptId,
    /// First line is the bullet content without the `-`; the rest are raw
    /// continuation lines.
    pub lines: Vec<String>,
}

impl PromptBlock {
    /// Body as stored for display: lines joined with [`LINE_BREAK`].
    pub fn text(&self) -> String {
        self.lines.join(LINE_BREAK)
    }

    /// Body as it should land on the clipboard.
    pub fn copy_text(&self) -> String {
        self.lines.join("\n")
    }
}

/// A non-prompt line, already converted to an HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainBlock {
    pub html_fragment: String,
    /// The line as written in the document.
    pub source: String,
}

/// One parsed unit of a prompts document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Prompt(PromptBlock),
    Plain(PlainBlock),
}

impl Block {
    pub fn as_prompt(&self) -> Option<&PromptBlock> {
        match self {
            Block::Prompt(prompt) => Some(prompt),
            Block::Plain(_) => None,
        }
    }
}
