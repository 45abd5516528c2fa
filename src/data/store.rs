use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::StoreError;
use super::codec::{Record, decode_record, encode};

/// A text file holding one record per line.
#[derive(Debug, Clone)]
pub struct RecordFile<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> RecordFile<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every well-formed record in file order.
    ///
    /// A missing or unreadable file is an empty collection.
    pub fn load(&self) -> Vec<T> {
        match self.read_all() {
            Ok(records) => records,
            Err(StoreError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "record file missing, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!("{e}");
                Vec::new()
            }
        }
    }

    /// Read every well-formed record, reporting a file that cannot be opened.
    pub fn read_all(&self) -> Result<Vec<T>, StoreError> {
        let bytes = fs::read(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);

        let mut skipped = 0usize;
        let records: Vec<T> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| {
                let record = decode_record(line);
                if record.is_none() {
                    skipped += 1;
                }
                record
            })
            .collect();

        if skipped > 0 {
            debug!(path = %self.path.display(), skipped, "skipped malformed records");
        }
        Ok(records)
    }

    /// Overwrite the file with `records` in order.
    pub fn save(&self, records: &[T]) -> Result<(), StoreError> {
        let contents: String = records
            .iter()
            .map(|record| encode(&record.to_fields()))
            .collect();

        fs::write(&self.path, contents).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), count = records.len(), "saved records");
        Ok(())
    }
}
