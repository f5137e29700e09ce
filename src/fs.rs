//! File access for the `/files` routes.
//!
//! All paths are resolved against one base directory. Concurrent uploads to
//! the same name are not coordinated; the last writer wins.

use std::fmt;
use std::path::{Component, Path, PathBuf};

#[derive(Debug)]
pub enum FileError {
    /// No base directory was configured.
    NoDirectory,
    /// The name is empty or escapes the base directory.
    InvalidName,
    Io(std::io::Error),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::NoDirectory => write!(f, "no files directory configured"),
            FileError::InvalidName => write!(f, "invalid file name"),
            FileError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FileError {
    fn from(e: std::io::Error) -> Self {
        FileError::Io(e)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileStore {
    base: Option<PathBuf>,
}

impl FileStore {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    /// Reads `<base>/<name>` in full.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, FileError> {
        let path = self.resolve(name)?;
        Ok(tokio::fs::read(path).await?)
    }

    /// Writes `data` to `<base>/<name>`, creating or truncating it.
    pub async fn write(&self, name: &str, data: &[u8]) -> Result<(), FileError> {
        let path = self.resolve(name)?;
        tokio::fs::write(path, data).await?;
        Ok(())
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, FileError> {
        let base = self.base.as_ref().ok_or(FileError::NoDirectory)?;
        let relative = Path::new(name);

        // Only plain segments: no "..", no root, no prefix.
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if name.is_empty() || !plain {
            return Err(FileError::InvalidName);
        }

        Ok(base.join(relative))
    }
}
