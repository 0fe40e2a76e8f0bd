//! # Prompt Panel
//!
//! The state behind one prompts side panel: the current [`PanelView`], the
//! add-prompt form, and the watcher subscription for the configured file.
//!
//! User input arrives as [`PanelAction`]s applied through
//! [`PromptPanel::apply`]. File-change notifications may arrive on any
//! thread; they are queued and handled by [`PromptPanel::pump`] on the UI
//! thread, where any number of queued events turns into a single re-read.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use crate::host::{FileEvent, HostError, PromptHost, Severity, Subscriptions};
use crate::io::IoError;
use crate::parsing::PromptId;
use crate::render::PanelView;
use crate::writer::append_prompt;

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("No prompts file path configured")]
    NoPromptsPath,
    #[error("Failed to read prompts file: {0}")]
    Read(#[source] IoError),
    #[error("Failed to write prompts file: {0}")]
    Write(#[source] IoError),
    #[error("No prompt #{0} in the current view")]
    UnknownPrompt(PromptId),
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Something the user asked the panel to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    /// Copy prompt `id` of the render currently displayed.
    CopyPrompt(PromptId),
    OpenAddForm,
    SubmitPrompt(String),
    /// Close the add-prompt form without saving.
    Cancel,
    Refresh,
}

/// What an applied action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Copied(String),
    FormOpened,
    Saved,
    /// Submitted text was blank; nothing was written.
    Ignored,
    FormClosed,
    Refreshed,
}

/// Draft of a new prompt being typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddPromptForm {
    draft: String,
}

impl AddPromptForm {
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn push_char(&mut self, c: char) {
        self.draft.push(c);
    }

    pub fn backspace(&mut self) {
        self.draft.pop();
    }
}

#[derive(Debug)]
pub struct PromptPanel {
    view: PanelView,
    form: Option<AddPromptForm>,
    watched: Option<PathBuf>,
    subscriptions: Subscriptions,
    events_tx: Sender<FileEvent>,
    events_rx: Receiver<FileEvent>,
}

impl PromptPanel {
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            view: PanelView::NoPath,
            form: None,
            watched: None,
            subscriptions: Subscriptions::default(),
            events_tx,
            events_rx,
        }
    }

    pub fn view(&self) -> &PanelView {
        &self.view
    }

    pub fn form(&self) -> Option<&AddPromptForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut AddPromptForm> {
        self.form.as_mut()
    }

    /// The file the panel currently watches, if any.
    pub fn watched_path(&self) -> Option<&Path> {
        self.watched.as_deref()
    }

    /// (Re)binds the panel to the host's configured path: drops the old
    /// watcher, watches the new file and renders it.
    ///
    /// Call again whenever the configured path changes.
    pub fn attach<H: PromptHost>(&mut self, host: &mut H) {
        self.detach();

        if let Some(path) = host.configured_path() {
            let tx = self.events_tx.clone();
            let callback = Box::new(move |event: FileEvent| {
                // Receiver gone means the panel is gone
                let _ = tx.send(event);
            });
            match host.watch_file(&path, callback) {
                Ok(subscription) => {
                    log::info!("Watching prompts file {}", path.display());
                    self.subscriptions.push(subscription);
                    self.watched = Some(path);
                }
                Err(e) => log::error!("Failed to watch prompts file: {e}"),
            }
        }

        self.refresh(host);
    }

    /// Releases every host registration held by the panel.
    pub fn detach(&mut self) {
        self.subscriptions.dispose_all();
        self.watched = None;
        // Drop events queued for the old file
        while self.events_rx.try_recv().is_ok() {}
    }

    /// Re-reads the configured file and replaces the view.
    pub fn refresh<H: PromptHost>(&mut self, host: &H) {
        let path = host.configured_path();
        self.view = PanelView::load(path.as_deref(), |p| host.read_file(p));
    }

    /// Handles queued file events. Returns true if the view was re-read.
    ///
    /// However many events are queued, the file is read at most once.
    pub fn pump<H: PromptHost>(&mut self, host: &mut H) -> bool {
        let mut changed = false;
        while let Ok(event) = self.events_rx.try_recv() {
            if event == FileEvent::Deleted {
                host.notify_user("Prompts file was deleted", Severity::Warning);
            }
            changed = true;
        }

        if changed {
            log::debug!("Prompts file changed, refreshing view");
            self.refresh(host);
        }
        changed
    }

    pub fn apply<H: PromptHost>(
        &mut self,
        action: PanelAction,
        host: &mut H,
    ) -> Result<ActionOutcome, PanelError> {
        match action {
            PanelAction::CopyPrompt(id) => self.copy_prompt(id, host),
            PanelAction::OpenAddForm => {
                self.form = Some(AddPromptForm::default());
                Ok(ActionOutcome::FormOpened)
            }
            PanelAction::SubmitPrompt(text) => self.submit_prompt(&text, host),
            PanelAction::Cancel => {
                self.form = None;
                Ok(ActionOutcome::FormClosed)
            }
            PanelAction::Refresh => {
                self.refresh(host);
                Ok(ActionOutcome::Refreshed)
            }
        }
    }

    fn copy_prompt<H: PromptHost>(
        &mut self,
        id: PromptId,
        host: &mut H,
    ) -> Result<ActionOutcome, PanelError> {
        let text = self
            .view
            .prompt(id)
            .map(|card| card.copy_text.clone())
            .ok_or(PanelError::UnknownPrompt(id))?;

        host.copy_to_clipboard(&text)?;
        host.notify_user("Prompt copied to clipboard", Severity::Info);
        Ok(ActionOutcome::Copied(text))
    }

    fn submit_prompt<H: PromptHost>(
        &mut self,
        text: &str,
        host: &mut H,
    ) -> Result<ActionOutcome, PanelError> {
        let body = text.trim();
        if body.is_empty() {
            return Ok(ActionOutcome::Ignored);
        }

        match save_prompt(host, body) {
            Ok(()) => {
                self.form = None;
                host.notify_user("Prompt saved", Severity::Info);
                self.refresh(host);
                Ok(ActionOutcome::Saved)
            }
            Err(e) => {
                host.notify_user(&format!("Failed to save prompt: {e}"), Severity::Error);
                Err(e)
            }
        }
    }
}

impl Default for PromptPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PromptPanel {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Appends `body` as a new prompt to the host's configured file.
///
/// A missing file is treated as empty and created. Any other read failure
/// aborts before anything is written.
pub fn save_prompt<H: PromptHost>(host: &mut H, body: &str) -> Result<(), PanelError> {
    let path = host.configured_path().ok_or(PanelError::NoPromptsPath)?;

    let existing = match host.read_file(&path) {
        Ok(text) => text,
        Err(IoError::NotFound(_)) => {
            log::warn!("Prompts file {} not found, creating it", path.display());
            String::new()
        }
        Err(e) => return Err(PanelError::Read(e)),
    };

    let updated = append_prompt(&existing, body);
    host.write_file(&path, &updated).map_err(PanelError::Write)?;
    log::info!("Appended prompt to {}", path.display());
    Ok(())
}
