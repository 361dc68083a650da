use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument, trace, warn};

use super::{Storage, StorageError};

pub const FILE_NAME: &str = "storage.json";

/// A JSON object file holding every key. Each write rewrites the whole file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStorage {
    /// Opens `storage.json` inside `dir`, creating the directory if needed.
    ///
    /// A missing file is an empty store. A file that isn't a JSON object of
    /// strings is logged and treated as empty; it is overwritten on the next write.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let path = dir.join(FILE_NAME);

        let values = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(values) => values,
                Err(err) => {
                    warn!(%err, "storage file is malformed, starting empty");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no storage file yet");
                BTreeMap::new()
            }
            Err(err) => return Err(err.into()),
        };

        trace!(keys = values.len(), "opened storage");

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.values.insert(key.to_owned(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FileStorage, FILE_NAME};
    use crate::storage::Storage;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wordwave-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn values_survive_reopening() {
        let dir = scratch_dir("reopen");

        let mut storage = FileStorage::open(&dir).unwrap();
        storage.set("wordWaveLastPlayed", "2025-04-01".to_owned()).unwrap();
        storage.set("darkMode", "true".to_owned()).unwrap();
        storage.remove("darkMode").unwrap();

        let reopened = FileStorage::open(&dir).unwrap();
        assert_eq!(reopened.get("wordWaveLastPlayed").as_deref(), Some("2025-04-01"));
        assert_eq!(reopened.get("darkMode"), None);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    #[tracing_test::traced_test]
    fn malformed_file_starts_empty() {
        let dir = scratch_dir("malformed");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(FILE_NAME), "{not json").unwrap();

        let mut storage = FileStorage::open(&dir).unwrap();
        assert_eq!(storage.get("wordWaveStats"), None);
        assert!(logs_contain("storage file is malformed"));

        storage.set("wordWaveStats", "{}".to_owned()).unwrap();
        let reopened = FileStorage::open(&dir).unwrap();
        assert_eq!(reopened.get("wordWaveStats").as_deref(), Some("{}"));

        std::fs::remove_dir_all(dir).unwrap();
    }
}
