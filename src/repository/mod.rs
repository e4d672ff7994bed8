//! Repository layer for the JSON library file

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{
    error::{AppError, AppResult},
    models::{LibraryDocument, LibraryState},
};

/// Blocking store that reads and writes the whole registry as one document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the library file
    pub fn load(&self) -> AppResult<LibraryState> {
        let bytes = fs::read(&self.path).map_err(|e| AppError::io(&self.path, e))?;

        let document: LibraryDocument = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::corrupt(&self.path, e.to_string()))?;

        let state = document
            .into_state()
            .map_err(|reason| AppError::corrupt(&self.path, reason))?;

        tracing::debug!(
            "Loaded {} books and {} users from {}",
            state.books.len(),
            state.users.len(),
            self.path.display()
        );
        Ok(state)
    }

    /// Like [`load`](Self::load), but a missing file is `Ok(None)`.
    pub fn load_if_exists(&self) -> AppResult<Option<LibraryState>> {
        match self.load() {
            Ok(state) => Ok(Some(state)),
            Err(AppError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write the library file.
    ///
    /// The document goes to a temporary file next to the destination which is
    /// then renamed over it, so readers see either the old or the new file.
    pub fn save(&self, state: &LibraryState) -> AppResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| AppError::io(dir, e))?;

        let document = LibraryDocument::from(state);
        let mut bytes = serde_json::to_vec_pretty(&document)
            .map_err(|e| AppError::io(&self.path, e.into()))?;
        bytes.push(b'\n');

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| AppError::io(dir, e))?;
        tmp.write_all(&bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| AppError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| AppError::io(&self.path, e.error))?;

        tracing::debug!(
            "Saved {} books and {} users to {}",
            state.books.len(),
            state.users.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Copy an unreadable library file to `<file>.corrupt` so a later save
    /// does not destroy it. Returns the copy's path.
    pub fn quarantine(&self) -> AppResult<PathBuf> {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".corrupt");
        let target = self.path.with_file_name(name);

        fs::copy(&self.path, &target).map_err(|e| AppError::io(&target, e))?;
        Ok(target)
    }
}
