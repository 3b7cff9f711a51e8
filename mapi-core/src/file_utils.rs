use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::Level;
use walkdir::WalkDir;

use crate::error::{MapiError, Result};

pub struct FileUtils;

impl FileUtils {
    /// Names become directory and file names verbatim, so they are restricted
    /// to a portable character set and may not walk out of their parent.
    pub fn is_safe_name(name: &str) -> bool {
        static NAME: OnceLock<Option<Regex>> = OnceLock::new();
        let pattern = NAME.get_or_init(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").ok());
        name != "." && name != ".." && pattern.as_ref().is_some_and(|re| re.is_match(name))
    }

    pub fn create_dir(path: &Path) -> Result<()> {
        tracing::debug!(path = %path.display(), "creating directory");
        fs::create_dir(path)
            .map_err(|e| MapiError::io(format!("Cannot create {}", path.display()), e))
    }

    pub fn write(path: &Path, contents: &str) -> Result<()> {
        tracing::debug!(path = %path.display(), bytes = contents.len(), "writing file");
        fs::write(path, contents)
            .map_err(|e| MapiError::io(format!("Cannot write {}", path.display()), e))
    }

    pub fn append(path: &Path, contents: &str) -> Result<()> {
        tracing::debug!(path = %path.display(), "appending to file");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| MapiError::io(format!("Cannot open {}", path.display()), e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| MapiError::io(format!("Cannot append to {}", path.display()), e))
    }

    /// Number of files and directories below `path`, including `path` itself.
    pub fn count_entries(path: &Path) -> usize {
        WalkDir::new(path).into_iter().filter_map(|e| e.ok()).count()
    }

    pub fn remove_tree(path: &Path) -> Result<()> {
        if tracing::enabled!(Level::DEBUG) {
            let entries = Self::count_entries(path);
            tracing::debug!(path = %path.display(), entries, "removing tree");
        }
        fs::remove_dir_all(path)
            .map_err(|e| MapiError::io(format!("Cannot remove {}", path.display()), e))
    }
}
