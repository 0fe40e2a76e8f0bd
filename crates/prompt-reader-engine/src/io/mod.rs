use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid prompts file: {0}")]
    InvalidPromptsFile(String),
}

/// Read a prompts file and return its content
pub fn read_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Replace the whole content of a prompts file
pub fn write_file(path: &Path, content: &str) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(path, content).map_err(IoError::Io)
}

/// Check that a path can be used as the prompts file.
///
/// The file does not have to exist yet (appending creates it), but it must be
/// a Markdown file and not a directory.
pub fn validate_prompts_path(path: &Path) -> Result<(), IoError> {
    if path.is_dir() {
        return Err(IoError::InvalidPromptsFile(
            "path is a directory".to_string(),
        ));
    }

    match path.extension() {
        Some(ext) if ext == "md" => Ok(()),
        _ => Err(IoError::InvalidPromptsFile(
            "expected a .md file".to_string(),
        )),
    }
}
