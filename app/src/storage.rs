//! File-backed persistence.
//!
//! One file per key under a directory. Keys are reduced to a safe file
//! name; writes go to a uniquely named temporary file that is then renamed
//! over the target, so a reader never sees a half-written slice.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use todoapp_core::persistence::{PersistenceAdapter, PersistenceError, StorageFuture};

/// [`PersistenceAdapter`] storing each key as `<dir>/<key>.json`.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
    sequence: AtomicU64,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| io_error(&dir, &e))?;
        tracing::debug!(dir = %dir.display(), "Opened file storage");

        Ok(Self {
            dir,
            sequence: AtomicU64::new(0),
        })
    }

    /// Directory holding the files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        let n = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!(".{}.{n}.tmp", file_stem(key)))
    }
}

/// Reduce a key to characters that are safe in a file name.
fn file_stem(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() { "_".to_string() } else { stem }
}

fn io_error(path: &Path, error: &std::io::Error) -> PersistenceError {
    PersistenceError::Io(format!("{}: {error}", path.display()))
}

impl PersistenceAdapter for FileStorage {
    fn read<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<Vec<u8>>> {
        Box::pin(async move {
            let path = self.path_for(key);
            match tokio::fs::read(&path).await {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(io_error(&path, &e)),
            }
        })
    }

    fn write<'a>(&'a self, key: &'a str, bytes: Vec<u8>) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            let path = self.path_for(key);
            let temp = self.temp_path_for(key);

            tokio::fs::write(&temp, &bytes)
                .await
                .map_err(|e| io_error(&temp, &e))?;
            if let Err(e) = tokio::fs::rename(&temp, &path).await {
                let _ = tokio::fs::remove_file(&temp).await;
                return Err(io_error(&path, &e));
            }

            tracing::trace!(path = %path.display(), bytes = bytes.len(), "Wrote slice");
            Ok(())
        })
    }

    fn remove<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            let path = self.path_for(key);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(io_error(&path, &e)),
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_replaces_separators() {
        assert_eq!(file_stem("a/b\\c..d"), "a_b_c__d");
        assert_eq!(file_stem("todo-app-1_x"), "todo-app-1_x");
        assert_eq!(file_stem(""), "_");
    }

    #[tokio::test]
    async fn test_write_read_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).await.unwrap();

        assert_eq!(storage.read("k").await, Ok(None));

        storage.write("k", b"one".to_vec()).await.unwrap();
        storage.write("k", b"two".to_vec()).await.unwrap();
        assert_eq!(storage.read("k").await, Ok(Some(b"two".to_vec())));

        storage.remove("k").await.unwrap();
        assert_eq!(storage.read("k").await, Ok(None));
        assert_eq!(storage.remove("k").await, Ok(()));
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).await.unwrap();

        storage.write("a/b", b"x".to_vec()).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a_b.json".to_string()]);
    }

    #[tokio::test]
    async fn test_open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("one").join("two");
        let storage = FileStorage::open(&nested).await.unwrap();

        assert!(nested.is_dir());
        assert_eq!(storage.dir(), nested.as_path());
        assert_eq!(storage.path_for("k"), nested.join("k.json"));
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let storage = FileStorage::open(dir.path()).await.unwrap();
            storage.write("k", b"kept".to_vec()).await.unwrap();
        }
        let reopened = FileStorage::open(dir.path()).await.unwrap();
        assert_eq!(reopened.read("k").await, Ok(Some(b"kept".to_vec())));
    }
}
