//! Snapshot files - one JSON object per collection / 快照文件
//!
//! Writes go to a temporary file in the same directory which is then renamed
//! over the canonical path, so readers only ever see a complete snapshot.
//! 写入临时文件后原子重命名，保证快照完整

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::StoreError;

/// A keyed collection mirrored to a JSON file / 映射到 JSON 文件的集合
pub struct SnapshotFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> SnapshotFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, never fails / 加载快照，永不失败
    ///
    /// A missing, empty or malformed file yields an empty map. The next
    /// successful save overwrites whatever was on disk.
    pub fn load(&self) -> HashMap<String, T> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Snapshot {:?} not found, starting empty", self.path);
                return HashMap::new();
            }
            Err(e) => {
                tracing::warn!("Failed to read snapshot {:?}: {}, starting empty", self.path, e);
                return HashMap::new();
            }
        };

        match serde_json::from_str::<HashMap<String, T>>(&content) {
            Ok(records) => {
                tracing::debug!("Loaded {} records from {:?}", records.len(), self.path);
                records
            }
            Err(e) => {
                tracing::warn!("Corrupt snapshot {:?}: {}, starting empty", self.path, e);
                HashMap::new()
            }
        }
    }

    /// Persist the full collection atomically / 原子写入整个集合
    ///
    /// The temporary file is removed on every failure path; the canonical
    /// file is only replaced by a fully written and synced snapshot.
    pub fn save(&self, records: &HashMap<String, T>) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(records)?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot".to_string());

        // Dropping the NamedTempFile deletes it, which covers the `?` exits below
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{}.", file_name))
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| StoreError::io(&self.path, e))?;

        tmp.write_all(&data).map_err(|e| StoreError::io(&self.path, e))?;
        tmp.as_file().sync_all().map_err(|e| StoreError::io(&self.path, e))?;

        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;

        tracing::debug!("Saved {} records to {:?}", records.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_entries(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::<String>::new(dir.path().join("items.json"));

        let mut records = HashMap::new();
        records.insert("a".to_string(), "first".to_string());
        records.insert("b".to_string(), "second".to_string());
        file.save(&records).unwrap();

        assert_eq!(file.load(), records);
        assert!(temp_entries(dir.path()).is_empty());
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::<String>::new(dir.path().join("absent.json"));
        assert!(file.load().is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");

        std::fs::write(&path, r#"{"a": "fir"#).unwrap();
        let file = SnapshotFile::<String>::new(path.clone());
        assert!(file.load().is_empty());

        std::fs::write(&path, "").unwrap();
        assert!(file.load().is_empty());

        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(file.load().is_empty());
    }

    #[test]
    fn test_save_overwrites_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, "garbage").unwrap();

        let file = SnapshotFile::<String>::new(path);
        let mut records = HashMap::new();
        records.insert("a".to_string(), "fresh".to_string());
        file.save(&records).unwrap();

        assert_eq!(file.load(), records);
    }

    #[test]
    fn test_failed_save_keeps_canonical_file() {
        let dir = tempfile::tempdir().unwrap();
        // The canonical path is a directory, so the final rename must fail
        let path = dir.path().join("items.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        let file = SnapshotFile::<String>::new(path.clone());
        let mut records = HashMap::new();
        records.insert("a".to_string(), "value".to_string());

        assert!(file.save(&records).is_err());
        assert!(path.is_dir());
        assert!(temp_entries(dir.path()).is_empty());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::<String>::new(dir.path().join("nope").join("items.json"));
        let err = file.save(&HashMap::new()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
