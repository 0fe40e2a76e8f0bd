use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use crate::host::{FileEvent, FileEventCallback, HostError, PromptHost, Severity, Subscription};
use crate::io::IoError;

/// Create a temporary directory for prompt files
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test markdown file with content
pub fn create_test_file(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}

type Watchers = Arc<Mutex<Vec<(u64, FileEventCallback)>>>;

/// In-memory host: files live in a map, watchers are fired by hand.
#[derive(Default)]
pub struct FakeHost {
    pub path: Option<PathBuf>,
    files: HashMap<PathBuf, String>,
    pub reads: Cell<usize>,
    pub writes: usize,
    pub fail_writes: bool,
    pub clipboard: Option<String>,
    pub messages: Vec<(String, Severity)>,
    watchers: Watchers,
    next_watch: u64,
}

impl FakeHost {
    /// Configured path pointing at a file that does not exist
    pub fn with_path(path: &str) -> Self {
        Self {
            path: Some(PathBuf::from(path)),
            ..Self::default()
        }
    }

    pub fn with_file(path: &str, content: &str) -> Self {
        let mut host = Self::with_path(path);
        host.set_file(path, content);
        host
    }

    pub fn file(&self, path: &str) -> Option<&str> {
        self.files.get(Path::new(path)).map(String::as_str)
    }

    pub fn set_file(&mut self, path: &str, content: &str) {
        self.files.insert(PathBuf::from(path), content.to_string());
    }

    pub fn remove_file(&mut self, path: &str) {
        self.files.remove(Path::new(path));
    }

    /// Fire every active watcher
    pub fn emit(&self, event: FileEvent) {
        for (_, callback) in self.watchers.lock().unwrap().iter_mut() {
            callback(event);
        }
    }

    pub fn active_watches(&self) -> usize {
        self.watchers.lock().unwrap().len()
    }

    pub fn last_message(&self) -> Option<(&str, Severity)> {
        self.messages.last().map(|(m, s)| (m.as_str(), *s))
    }
}

impl PromptHost for FakeHost {
    fn configured_path(&self) -> Option<PathBuf> {
        self.path.clone()
    }

    fn read_file(&self, path: &Path) -> Result<String, IoError> {
        self.reads.set(self.reads.get() + 1);
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| IoError::NotFound(path.to_path_buf()))
    }

    fn write_file(&mut self, path: &Path, text: &str) -> Result<(), IoError> {
        if self.fail_writes {
            return Err(IoError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only file system",
            )));
        }
        self.writes += 1;
        self.files.insert(path.to_path_buf(), text.to_string());
        Ok(())
    }

    fn watch_file(
        &mut self,
        path: &Path,
        on_event: FileEventCallback,
    ) -> Result<Subscription, HostError> {
        let id = self.next_watch;
        self.next_watch += 1;
        self.watchers.lock().unwrap().push((id, on_event));

        let watchers = Arc::clone(&self.watchers);
        Ok(Subscription::new(
            format!("watch {}", path.display()),
            move || {
                watchers.lock().unwrap().retain(|(w, _)| *w != id);
            },
        ))
    }

    fn notify_user(&mut self, message: &str, severity: Severity) {
        self.messages.push((message.to_string(), severity));
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), HostError> {
        self.clipboard = Some(text.to_string());
        Ok(())
    }
}
