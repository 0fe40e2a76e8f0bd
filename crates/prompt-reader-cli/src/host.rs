use std::path::{Path, PathBuf};

use anyhow::Context;
use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::{RecursiveMode, Watcher};
use prompt_reader_config::Config;
use prompt_reader_engine::{
    FileEvent, FileEventCallback, HostError, PromptHost, Severity, Subscription, io,
};

/// Host backed by the real file system, `notify` and the system clipboard.
pub struct TerminalHost {
    config: Config,
    config_path: PathBuf,
    status: Option<(String, Severity)>,
}

impl TerminalHost {
    pub fn new(config: Config, config_path: PathBuf) -> Self {
        Self {
            config,
            config_path,
            status: None,
        }
    }

    /// Latest message for the status line.
    pub fn status(&self) -> Option<(&str, Severity)> {
        self.status.as_ref().map(|(m, s)| (m.as_str(), *s))
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Validates and persists a new prompts path.
    pub fn set_prompts_path(&mut self, path: &Path) -> anyhow::Result<()> {
        io::validate_prompts_path(path)
            .with_context(|| format!("Cannot use '{}' as prompts file", path.display()))?;
        self.config
            .set_prompts_path(path.to_path_buf(), &self.config_path)
            .with_context(|| format!("Failed to save config to {}", self.config_path.display()))?;
        log::info!("Prompts path set to {}", path.display());
        Ok(())
    }
}

fn is_target(path: &Path, target: &Path) -> bool {
    target.file_name().is_some_and(|name| path.file_name() == Some(name))
}

/// Maps a raw notify event onto the panel's file events, or `None` if it
/// does not concern `target`.
fn classify(event: &notify::Event, target: &Path) -> Option<FileEvent> {
    if let EventKind::Modify(ModifyKind::Name(RenameMode::Both)) = event.kind {
        // paths are [from, to]
        return match event.paths.as_slice() {
            [from, ..] if is_target(from, target) => Some(FileEvent::Deleted),
            [_, to, ..] if is_target(to, target) => Some(FileEvent::Modified),
            _ => None,
        };
    }

    if !event.paths.iter().any(|p| is_target(p, target)) {
        return None;
    }
    match event.kind {
        EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            Some(FileEvent::Deleted)
        }
        EventKind::Create(_) | EventKind::Modify(_) => Some(FileEvent::Modified),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}

impl PromptHost for TerminalHost {
    fn configured_path(&self) -> Option<PathBuf> {
        self.config.prompts_path.clone()
    }

    fn watch_file(
        &mut self,
        path: &Path,
        mut on_event: FileEventCallback,
    ) -> Result<Subscription, HostError> {
        // Watch the directory: editors often replace the file instead of
        // writing it in place, which would orphan a watch on the file itself.
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let target = path.to_path_buf();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => {
                    if let Some(file_event) = classify(&event, &target) {
                        on_event(file_event);
                    }
                }
                Err(e) => log::warn!("File watcher error: {e}"),
            }
        })
        .map_err(|e| HostError::Watch {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| HostError::Watch {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(Subscription::from_guard(
            format!("watch {}", path.display()),
            watcher,
        ))
    }

    fn notify_user(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => log::info!("{message}"),
            Severity::Warning => log::warn!("{message}"),
            Severity::Error => log::error!("{message}"),
        }
        self.status = Some((message.to_string(), severity));
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), HostError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| HostError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| HostError::Clipboard(e.to_string()))
    }
}
