use std::fmt::Write;

use html_escape::encode_text;

use super::{PanelView, PromptCard, ViewItem};

const STYLE: &str = r#"
body { font-family: var(--vscode-font-family, sans-serif); padding: 12px; color: var(--vscode-foreground, inherit); }
.prompt-item { border: 1px solid var(--vscode-panel-border, #8884); border-radius: 4px; padding: 8px; margin: 8px 0; display: flex; gap: 8px; align-items: flex-start; }
.prompt-content { flex: 1; white-space: pre-wrap; }
.error { color: var(--vscode-errorForeground, #dc322f); }
.modal { display: none; }
.modal.show { display: block; }
"#;

const PANEL_SCRIPT: &str = r#"
const host = typeof acquireVsCodeApi === 'function' ? acquireVsCodeApi() : { postMessage() {} };
document.querySelectorAll('.copy-btn').forEach(btn => {
  btn.addEventListener('click', () => {
    const id = btn.getAttribute('data-prompt-id');
    host.postMessage({ command: 'copyPrompt', id: Number(id) });
  });
});
const modal = document.getElementById('addPromptModal');
const textarea = document.getElementById('promptContent');
function closeModal() { modal.classList.remove('show'); textarea.value = ''; }
document.getElementById('addPromptBtn').addEventListener('click', () => { modal.classList.add('show'); textarea.focus(); });
document.getElementById('cancelBtn').addEventListener('click', closeModal);
document.getElementById('savePromptBtn').addEventListener('click', () => {
  const content = textarea.value.trim();
  if (content) { host.postMessage({ command: 'savePrompt', content }); closeModal(); }
});
document.addEventListener('keydown', e => { if (e.key === 'Escape') closeModal(); });
"#;

const SET_PATH_SCRIPT: &str = r#"
const host = typeof acquireVsCodeApi === 'function' ? acquireVsCodeApi() : { postMessage() {} };
document.getElementById('setPath').addEventListener('click', () => host.postMessage({ command: 'setPath' }));
"#;

/// Renders the panel as a standalone HTML document.
///
/// Prompt items carry `id="prompt-N"` and a copy button with
/// `data-prompt-id="N"`, where `N` is the [`PromptId`](crate::PromptId) of
/// the render.
pub fn render_html(view: &PanelView) -> String {
    let mut body = String::new();
    let script = match view {
        PanelView::NoPath => {
            body.push_str(concat!(
                "<div class=\"container\">",
                "<h3>No prompts file configured</h3>",
                "<p>Choose the Markdown file that holds your prompts.</p>",
                "<button id=\"setPath\">Choose file</button>",
                "</div>"
            ));
            SET_PATH_SCRIPT
        }
        PanelView::ReadError { path, message } => {
            let _ = write!(
                body,
                "<h2>Could not read prompts file</h2><p>{}</p><p class=\"error\">{}</p>",
                encode_text(&path.display().to_string()),
                encode_text(message)
            );
            ""
        }
        PanelView::Content { items, .. } => {
            body.push_str("<button id=\"addPromptBtn\">Add prompt</button>");
            for item in items {
                match item {
                    ViewItem::Prompt(card) => push_prompt_item(&mut body, card),
                    ViewItem::Plain { html, .. } => {
                        let _ = write!(body, "<div class=\"plain\">{html}</div>");
                    }
                }
            }
            body.push_str(concat!(
                "<div class=\"modal\" id=\"addPromptModal\">",
                "<label for=\"promptContent\">Prompt:</label>",
                "<textarea id=\"promptContent\" placeholder=\"Type a new prompt...\"></textarea>",
                "<button id=\"cancelBtn\">Cancel</button>",
                "<button id=\"savePromptBtn\">Save prompt</button>",
                "</div>"
            ));
            PANEL_SCRIPT
        }
    };

    let mut page = String::with_capacity(body.len() + STYLE.len() + script.len() + 256);
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    page.push_str("<title>Prompt Reader</title>\n<style>");
    page.push_str(STYLE);
    page.push_str("</style>\n</head>\n<body>\n");
    page.push_str(&body);
    if !script.is_empty() {
        page.push_str("\n<script>");
        page.push_str(script);
        page.push_str("</script>");
    }
    page.push_str("\n</body>\n</html>\n");
    page
}

fn push_prompt_item(body: &mut String, card: &PromptCard) {
    let _ = write!(
        body,
        "<div class=\"prompt-item\" id=\"{}\"><div class=\"prompt-content\">{}</div>\
         <button class=\"copy-btn\" data-prompt-id=\"{}\">Copy</button></div>",
        card.dom_id(),
        card.html,
        card.id,
    );
}
