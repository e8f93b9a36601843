//! Directory-backed storage: each key is a `<key>.json` file.

use bb_core::persist::{Storage, StorageError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Storage for DirStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStorage::new(dir.path());
        assert_eq!(store.read("breadboardCircuit").unwrap(), None);
    }

    #[test]
    fn write_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirStorage::new(dir.path().join("nested"));
        store.write("k", "{}").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("{}"));
        assert!(store.root().join("k.json").exists());
    }
}
