use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{Repository, StoreError};

/// A JSON array of records in one plain-text file.
///
/// - Missing or whitespace-only file: empty collection.
/// - An element that does not decode as a record is skipped with a warning.
///   `update` writes such elements back untouched, after the valid records.
/// - A file that is not a JSON array: [`StoreError::Corrupt`] from `load`.
///   `update` starts from an empty collection instead, after copying the bad
///   bytes to `<file>.corrupt`. If that copy fails the rewrite is abandoned.
pub struct JsonFileStore<T> {
    path: PathBuf,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sidecar(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "store".into());
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Exclusive lock held for one read-modify-write. Released on drop.
    ///
    /// The lock file is never removed: another writer may already hold a
    /// handle to it.
    fn lock(&self) -> Result<StoreLock, StoreError> {
        let lock_path = self.sidecar(".lock");
        fs::create_dir_all(self.parent_dir()).map_err(|e| self.io_err(e))?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|source| StoreError::Lock {
                path: lock_path.clone(),
                source,
            })?;
        file.lock_exclusive().map_err(|source| StoreError::Lock {
            path: lock_path.clone(),
            source,
        })?;
        Ok(StoreLock { file })
    }

    fn preserve_corrupt_copy(&self) -> Result<(), StoreError> {
        let backup = self.sidecar(".corrupt");
        fs::copy(&self.path, &backup).map_err(|source| StoreError::Io {
            path: backup.clone(),
            source,
        })?;
        warn!(
            store = %self.path.display(),
            backup = %backup.display(),
            "unparsable store preserved before rewrite"
        );
        Ok(())
    }

    fn write_values(&self, values: &[Value]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(values).map_err(|source| StoreError::Serialize {
            path: self.path.clone(),
            source,
        })?;

        let dir = self.parent_dir();
        fs::create_dir_all(&dir).map_err(|e| self.io_err(e))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| self.io_err(e))?;
        tmp.write_all(json.as_bytes()).map_err(|e| self.io_err(e))?;
        tmp.write_all(b"\n").map_err(|e| self.io_err(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_err(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_err(e.error))?;

        debug!(store = %self.path.display(), records = values.len(), "store rewritten");
        Ok(())
    }
}

/// Decoded file contents: the usable records plus the raw elements that
/// failed to decode, in file order.
struct Document<T> {
    records: Vec<T>,
    rejected: Vec<Value>,
}

impl<T> Default for Document<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    fn read_document(&self) -> Result<Document<T>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Document::default()),
            Err(e) => return Err(self.io_err(e)),
        };
        if raw.trim().is_empty() {
            return Ok(Document::default());
        }
        let elements: Vec<Value> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        let mut doc = Document::default();
        for (index, element) in elements.into_iter().enumerate() {
            match T::deserialize(&element) {
                Ok(record) => doc.records.push(record),
                Err(e) => {
                    warn!(
                        store = %self.path.display(),
                        index,
                        error = %e,
                        "record rejected; left in the file as is"
                    );
                    doc.rejected.push(element);
                }
            }
        }
        Ok(doc)
    }

    fn write_records(&self, records: &[T], rejected: &[Value]) -> Result<(), StoreError> {
        let mut values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<Value>, _>>()
            .map_err(|source| StoreError::Serialize {
                path: self.path.clone(),
                source,
            })?;
        values.extend(rejected.iter().cloned());
        self.write_values(&values)
    }
}

impl<T> Repository<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.read_document()?.records)
    }

    /// Replaces the whole file, including any elements that failed to decode.
    fn save(&self, records: &[T]) -> Result<(), StoreError> {
        let _lock = self.lock()?;
        self.write_records(records, &[])
    }

    fn update(&self, apply: &mut dyn FnMut(&mut Vec<T>) -> bool) -> Result<bool, StoreError> {
        let _lock = self.lock()?;

        let Document {
            mut records,
            rejected,
        } = match self.read_document() {
            Ok(doc) => doc,
            Err(e @ StoreError::Corrupt { .. }) => {
                warn!(store = %self.path.display(), error = %e, "store unparsable; treating as empty");
                self.preserve_corrupt_copy()?;
                Document::default()
            }
            Err(e) => return Err(e),
        };

        if !apply(&mut records) {
            return Ok(false);
        }
        self.write_records(&records, &rejected)?;
        Ok(true)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

struct StoreLock {
    file: File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
