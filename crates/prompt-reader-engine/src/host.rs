//! # Host Collaborator
//!
//! The panel core never talks to the file system, the clipboard or the user
//! directly. It goes through a [`PromptHost`], which the embedding front end
//! implements (the terminal panel in `prompt-reader-cli`, an in-memory fake in
//! tests).
//!
//! File watching is exposed as explicit [`Subscription`] handles instead of
//! ambient listeners: dropping or disposing a handle stops delivery, and
//! [`Subscriptions::dispose_all`] tears everything down in one call.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::io::{self, IoError};

/// How prominently a message should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A change to the watched prompts file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEvent {
    Modified,
    /// Surfaced separately so the user can be warned.
    Deleted,
}

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Failed to watch {path}: {reason}")]
    Watch { path: PathBuf, reason: String },
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),
}

/// Called by the host for every change to a watched file. May run on a
/// host-owned thread.
pub type FileEventCallback = Box<dyn FnMut(FileEvent) + Send + 'static>;

/// Everything the panel core needs from its environment.
pub trait PromptHost {
    /// The currently configured prompts file, if any.
    fn configured_path(&self) -> Option<PathBuf>;

    fn read_file(&self, path: &Path) -> Result<String, IoError> {
        io::read_file(path)
    }

    /// Replace the whole file. All-or-nothing from the panel's point of view.
    fn write_file(&mut self, path: &Path, text: &str) -> Result<(), IoError> {
        io::write_file(path, text)
    }

    fn watch_file(
        &mut self,
        path: &Path,
        on_event: FileEventCallback,
    ) -> Result<Subscription, HostError>;

    fn notify_user(&mut self, message: &str, severity: Severity);

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), HostError>;
}

/// Handle for one host registration. Releases it on drop.
pub struct Subscription {
    label: String,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(label: impl Into<String>, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            label: label.into(),
            release: Some(Box::new(release)),
        }
    }

    /// Wraps a value whose `Drop` ends the registration (e.g. a file watcher).
    pub fn from_guard<T: Send + 'static>(label: impl Into<String>, guard: T) -> Self {
        Self::new(label, move || drop(guard))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn dispose(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            log::debug!("Releasing subscription {}", self.label);
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("label", &self.label)
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Owns every active [`Subscription`] of a panel.
#[derive(Debug, Default)]
pub struct Subscriptions(Vec<Subscription>);

impl Subscriptions {
    pub fn push(&mut self, subscription: Subscription) {
        self.0.push(subscription);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Releases all registrations, in the order they were made.
    pub fn dispose_all(&mut self) {
        for subscription in self.0.drain(..) {
            subscription.dispose();
        }
    }
}
