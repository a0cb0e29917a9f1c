//! # Filesystem-backed credential storage
//!
//! [`FileStorage`] keeps the encoded credential in a single JSON file so a
//! desktop or mobile build restores its session across restarts.
//!
//! ## Platform data directories
//!
//! [`FileStorage::in_data_dir`] places the file under [`dirs::data_dir()`]:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS / iOS | `~/Library/Application Support/campus-portal/<key>.json` |
//! | Linux | `~/.local/share/campus-portal/<key>.json` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\campus-portal\<key>.json` |

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::CredentialStorage;
use crate::SessionError;

const APP_DIR: &str = "campus-portal";

/// Single-file storage for native platforms.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<data_dir>/campus-portal/<key>.json`, falling back to the working
    /// directory when the platform has no data dir.
    pub fn in_data_dir(key: &str) -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join(APP_DIR).join(format!("{key}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, raw: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
