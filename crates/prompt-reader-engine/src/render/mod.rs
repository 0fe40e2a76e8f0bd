//! # Rendering
//!
//! Turns parsed [`Block`]s into what a front end displays.
//!
//! [`PanelView`] is the whole panel state: either a call-to-action when no
//! prompts file is configured, an inline error when the file can't be read,
//! or the rendered items. Each prompt becomes a [`PromptCard`] addressed by
//! the same [`PromptId`] the parser assigned, so a copy action routed by id
//! always lands on the card currently displayed.
//!
//! `html` renders a `PanelView` as a standalone HTML document for webview
//! style hosts.

pub mod html;

use std::path::{Path, PathBuf};

use html_escape::encode_text;

use crate::io::IoError;
use crate::parsing::{Block, LINE_BREAK, PromptBlock, PromptId, parse_prompts};

pub use html::render_html;

/// A prompt ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptCard {
    pub id: PromptId,
    /// Escaped body, lines joined with `<br>`.
    pub html: String,
    /// Text put on the clipboard by the copy action.
    pub copy_text: String,
}

impl PromptCard {
    /// Element id used by HTML renderers.
    pub fn dom_id(&self) -> String {
        format!("prompt-{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewItem {
    Prompt(PromptCard),
    Plain { html: String, text: String },
}

/// Everything the panel can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    /// No prompts file configured yet.
    NoPath,
    /// The configured file could not be read.
    ReadError { path: PathBuf, message: String },
    Content { path: PathBuf, items: Vec<ViewItem> },
}

impl PanelView {
    /// Builds the view for `path` by reading and parsing it.
    ///
    /// Read failures become [`PanelView::ReadError`]; nothing is propagated.
    pub fn load<F>(path: Option<&Path>, read: F) -> Self
    where
        F: FnOnce(&Path) -> Result<String, IoError>,
    {
        let Some(path) = path else {
            return PanelView::NoPath;
        };

        match read(path) {
            Ok(text) => PanelView::Content {
                path: path.to_path_buf(),
                items: render(&parse_prompts(&text)),
            },
            Err(e) => {
                log::warn!("Could not read prompts file {}: {e}", path.display());
                PanelView::ReadError {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            }
        }
    }

    pub fn items(&self) -> &[ViewItem] {
        match self {
            PanelView::Content { items, .. } => items,
            PanelView::NoPath | PanelView::ReadError { .. } => &[],
        }
    }

    pub fn prompts(&self) -> impl Iterator<Item = &PromptCard> {
        self.items().iter().filter_map(|item| match item {
            ViewItem::Prompt(card) => Some(card),
            ViewItem::Plain { .. } => None,
        })
    }

    /// Looks up a prompt of this render by id.
    pub fn prompt(&self, id: PromptId) -> Option<&PromptCard> {
        self.prompts().find(|card| card.id == id)
    }
}

/// Renders a parsed document into view items, one per block.
pub fn render(blocks: &[Block]) -> Vec<ViewItem> {
    blocks
        .iter()
        .map(|block| match block {
            Block::Prompt(prompt) => ViewItem::Prompt(prompt_card(prompt)),
            Block::Plain(plain) => ViewItem::Plain {
                html: plain.html_fragment.clone(),
                text: plain.source.clone(),
            },
        })
        .collect()
}

fn prompt_card(prompt: &PromptBlock) -> PromptCard {
    let html = prompt
        .lines
        .iter()
        .map(|line| encode_text(line))
        .collect::<Vec<_>>()
        .join(LINE_BREAK);

    PromptCard {
        id: prompt.id,
        html,
        copy_text: prompt.copy_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn render_keeps_block_order_and_ids() {
        let items = render(&parse_prompts("# Title\n\n- alpha\n\n- beta\ncontinued\n\n"));
        assert_eq!(
            items,
            vec![
                ViewItem::Plain {
                    html: "<h1>Title</h1>".to_string(),
                    text: "# Title".to_string(),
                },
                ViewItem::Prompt(PromptCard {
                    id: PromptId(1),
                    html: "alpha".to_string(),
                    copy_text: "alpha".to_string(),
                }),
                ViewItem::Prompt(PromptCard {
                    id: PromptId(2),
                    html: "beta<br>continued".to_string(),
                    copy_text: "beta\ncontinued".to_string(),
                }),
            ]
        );
    }

    #[test]
    fn prompt_html_is_escaped_per_line() {
        let items = render(&parse_prompts("- use <tag> & more\n  second <line>"));
        let ViewItem::Prompt(card) = &items[0] else {
            panic!("expected a prompt");
        };
        assert_eq!(card.html, "use &lt;tag&gt; &amp; more<br>  second &lt;line&gt;");
        assert_eq!(card.copy_text, "use <tag> & more\n  second <line>");
        assert_eq!(card.dom_id(), "prompt-1");
    }

    #[test]
    fn load_without_path_is_call_to_action() {
        let view = PanelView::load(None, |_| unreachable!("no path, no read"));
        assert_eq!(view, PanelView::NoPath);
        assert!(view.items().is_empty());
    }

    #[test]
    fn load_read_failure_carries_description() {
        let path = PathBuf::from("/prompts/missing.md");
        let view = PanelView::load(Some(path.as_path()), |p| {
            Err(IoError::NotFound(p.to_path_buf()))
        });
        match view {
            PanelView::ReadError { path: p, message } => {
                assert_eq!(p, path);
                assert!(message.contains("File not found"));
                assert!(message.contains("missing.md"));
            }
            other => panic!("expected ReadError, got {other:?}"),
        }
    }

    #[test]
    fn prompt_lookup_uses_render_ids() {
        let path = PathBuf::from("prompts.md");
        let view = PanelView::load(Some(path.as_path()), |_| Ok("- one\n- two\n".to_string()));
        assert_eq!(view.prompts().count(), 2);
        assert_eq!(view.prompt(PromptId(2)).map(|c| c.copy_text.as_str()), Some("two"));
        assert!(view.prompt(PromptId(3)).is_none());
    }
}
