use crate::storage::SessionStorage;
use crate::utils::{Result, WorkbenchError};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "openalgo-workbench";
const DEFAULT_SESSION: &str = "default";

/// File-backed storage: one file per key under a per-session directory.
///
/// The default root is `$XDG_RUNTIME_DIR`, which the login manager removes
/// at logout, so entries live exactly as long as the user's session.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    /// Open storage for `session_id` under `root`
    pub fn open(root: &Path, session_id: &str) -> Result<Self> {
        let dir = root.join(APP_DIR).join(sanitize(session_id));
        fs::create_dir_all(&dir).map_err(|e| {
            WorkbenchError::storage(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        Ok(Self { dir })
    }

    /// Open storage using the environment's runtime dir and session id,
    /// overridden by any explicit values
    ///
    /// Without an explicit root, `$XDG_RUNTIME_DIR` must be set: there is no
    /// shared fallback directory.
    pub fn from_env(root: Option<PathBuf>, session_id: Option<String>) -> Result<Self> {
        let root = root
            .or_else(|| runtime_root(std::env::var_os("XDG_RUNTIME_DIR")))
            .ok_or_else(|| WorkbenchError::storage("XDG_RUNTIME_DIR is not set to an absolute path"))?;
        let session_id = session_id
            .or_else(|| std::env::var("XDG_SESSION_ID").ok())
            .unwrap_or_else(|| DEFAULT_SESSION.to_string());
        Self::open(&root, &session_id)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize(key)))
    }
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Failed to read {}: {}", path.display(), e);
                }
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // Write to a sibling file first so a crash never leaves half an entry
        let path = self.entry_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        log::trace!("Stored {} ({} bytes)", path.display(), value.len());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Per-user runtime dir; relative or empty values are ignored as the
/// XDG base directory rules require
fn runtime_root(value: Option<std::ffi::OsString>) -> Option<PathBuf> {
    value.map(PathBuf::from).filter(|path| path.is_absolute())
}

/// Map a key or session id onto a safe file name component
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        DEFAULT_SESSION.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let root = tempfile::tempdir().unwrap();

        let mut storage = FileSessionStorage::open(root.path(), "42").unwrap();
        storage.set("openalgo.pane-ratios", "{}").unwrap();

        let reopened = FileSessionStorage::open(root.path(), "42").unwrap();
        assert_eq!(reopened.get("openalgo.pane-ratios").as_deref(), Some("{}"));
    }

    #[test]
    fn test_sessions_are_isolated() {
        let root = tempfile::tempdir().unwrap();

        let mut first = FileSessionStorage::open(root.path(), "a").unwrap();
        first.set("key", "value").unwrap();

        let second = FileSessionStorage::open(root.path(), "b").unwrap();
        assert_eq!(second.get("key"), None);
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let root = tempfile::tempdir().unwrap();
        let mut storage = FileSessionStorage::open(root.path(), "s").unwrap();

        storage.remove("never-written").unwrap();
        storage.set("k", "v").unwrap();
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k"), None);
    }

    #[test]
    fn test_sanitize_rejects_path_components() {
        assert_eq!(sanitize("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize(".."), "default");
        assert_eq!(sanitize(""), "default");
        assert_eq!(sanitize("session-7"), "session-7");
    }

    #[test]
    fn test_runtime_root_requires_absolute_path() {
        assert_eq!(runtime_root(None), None);
        assert_eq!(runtime_root(Some("".into())), None);
        assert_eq!(runtime_root(Some("run/user/1000".into())), None);
        assert_eq!(
            runtime_root(Some("/run/user/1000".into())),
            Some(PathBuf::from("/run/user/1000"))
        );
    }

    #[test]
    fn test_from_env_honors_explicit_values() {
        let root = tempfile::tempdir().unwrap();
        let storage =
            FileSessionStorage::from_env(Some(root.path().to_path_buf()), Some("tab 1".into()))
                .unwrap();

        assert_eq!(storage.dir(), root.path().join(APP_DIR).join("tab_1"));
    }
}
