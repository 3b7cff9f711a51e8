use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::StoreSettings;
use crate::error::{MapiError, Result};

pub const STATE_FILE_NAME: &str = ".mapi";

/// Persists the single configured project root.
pub trait PathStore {
    /// Records `path` as the project root, replacing any previous value.
    fn set(&self, path: &Path) -> Result<()>;

    /// The configured root, which must still exist on disk.
    fn get(&self) -> Result<PathBuf>;
}

/// `~/.mapi`, when the home directory can be determined.
pub fn default_state_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(STATE_FILE_NAME))
}

/// Stores the root as plain text in a single state file. The file location
/// may be unknown (no home directory); that only fails commands that touch it.
pub struct FileStore {
    state_file: Option<PathBuf>,
}

impl FileStore {
    pub fn new(state_file: impl Into<PathBuf>) -> Self {
        Self {
            state_file: Some(state_file.into()),
        }
    }

    pub fn from_settings(settings: &StoreSettings) -> Self {
        Self {
            state_file: settings.state_file.clone(),
        }
    }

    pub fn state_file(&self) -> Result<&Path> {
        self.state_file.as_deref().ok_or(MapiError::NoHomeDir)
    }
}

impl PathStore for FileStore {
    fn set(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(MapiError::InvalidPath(path.to_path_buf()));
        }
        let bytes = encode(path).ok_or_else(|| MapiError::InvalidPath(path.to_path_buf()))?;
        let state_file = self.state_file()?;
        tracing::debug!(state_file = %state_file.display(), root = %path.display(), "saving project root");
        fs::write(state_file, bytes)
            .map_err(|e| MapiError::io(format!("Cannot write {}", state_file.display()), e))
    }

    fn get(&self) -> Result<PathBuf> {
        let state_file = self.state_file()?;
        let mut contents = match fs::read(state_file) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(state_file = %state_file.display(), "state file missing");
                return Err(MapiError::NotConfigured);
            }
            Err(e) => {
                return Err(MapiError::io(
                    format!("Cannot read {}", state_file.display()),
                    e,
                ))
            }
        };
        if contents.ends_with(b"\n") {
            contents.pop();
            if contents.ends_with(b"\r") {
                contents.pop();
            }
        }
        let root = match decode(contents) {
            Some(root) if !root.as_os_str().is_empty() => root,
            _ => return Err(MapiError::NotConfigured),
        };
        if !root.exists() {
            tracing::debug!(root = %root.display(), "configured root is gone");
            return Err(MapiError::NotConfigured);
        }
        Ok(root)
    }
}

#[cfg(unix)]
fn encode(path: &Path) -> Option<Vec<u8>> {
    use std::os::unix::ffi::OsStrExt;
    Some(path.as_os_str().as_bytes().to_vec())
}

#[cfg(not(unix))]
fn encode(path: &Path) -> Option<Vec<u8>> {
    path.to_str().map(|s| s.as_bytes().to_vec())
}

#[cfg(unix)]
fn decode(bytes: Vec<u8>) -> Option<PathBuf> {
    use std::os::unix::ffi::OsStringExt;
    Some(PathBuf::from(std::ffi::OsString::from_vec(bytes)))
}

#[cfg(not(unix))]
fn decode(bytes: Vec<u8>) -> Option<PathBuf> {
    String::from_utf8(bytes).ok().map(PathBuf::from)
}

/// Keeps the root in memory; existence is still checked against the disk.
#[derive(Default)]
pub struct MemoryStore {
    root: RefCell<Option<PathBuf>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: RefCell::new(Some(root.into())),
        }
    }
}

impl PathStore for MemoryStore {
    fn set(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(MapiError::InvalidPath(path.to_path_buf()));
        }
        *self.root.borrow_mut() = Some(path.to_path_buf());
        Ok(())
    }

    fn get(&self) -> Result<PathBuf> {
        match self.root.borrow().as_ref() {
            Some(root) if root.exists() => Ok(root.clone()),
            _ => Err(MapiError::NotConfigured),
        }
    }
}
