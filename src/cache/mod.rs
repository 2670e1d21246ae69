//! Append-only audit trail of retrieved corpus records.
//!
//! One file per UTC day, `<cache_dir>/<YYYYMMDD>.cache`. Each write appends
//! one batch serialized as a single JSON line, so batches can be read back
//! independently.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::corpus::CorpusStore;
use crate::error::{CounselError, Result, ValidationError};

/// Validated, non-empty list of record indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexList {
    indices: Vec<usize>,
}

impl IndexList {
    pub fn new(indices: Vec<usize>) -> std::result::Result<Self, ValidationError> {
        if indices.is_empty() {
            return Err(ValidationError::value(
                "indices",
                "list of indices cannot be empty",
            ));
        }
        Ok(Self { indices })
    }

    /// Build from loosely typed JSON values.
    ///
    /// Anything but an integer is a type error; negative integers are a
    /// value error.
    pub fn from_values(values: &[Value]) -> std::result::Result<Self, ValidationError> {
        let mut indices = Vec::with_capacity(values.len());
        for value in values {
            let is_integer = value.is_i64() || value.is_u64();
            if !is_integer {
                return Err(ValidationError::type_mismatch("indices", "integer", value));
            }
        }
        for value in values {
            let index = value
                .as_u64()
                .and_then(|i| usize::try_from(i).ok())
                .ok_or_else(|| {
                    ValidationError::value("indices", format!("{value} is not a valid index"))
                })?;
            indices.push(index);
        }
        Self::new(indices)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }
}

/// One serialized write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheBatch {
    pub written_at: DateTime<Utc>,
    pub records: Vec<CachedRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedRecord {
    pub index: usize,
    pub context: String,
    pub response: String,
}

/// Writer for the daily cache files under one directory.
#[derive(Debug, Clone)]
pub struct AccessCache {
    dir: PathBuf,
}

impl AccessCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File holding the batches written on `date`.
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.cache", date.format("%Y%m%d")))
    }

    /// Append the records at `indices` to today's (UTC) file.
    pub async fn record(&self, corpus: &CorpusStore, indices: &IndexList) -> Result<PathBuf> {
        self.record_at(corpus, indices, Utc::now()).await
    }

    /// Append the records at `indices` to the file for `now`'s UTC day.
    ///
    /// Indices are resolved before the file is touched; a bad index writes
    /// nothing.
    pub async fn record_at(
        &self,
        corpus: &CorpusStore,
        indices: &IndexList,
        now: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let records = corpus.get_by_indices(indices.as_slice())?;
        let batch = CacheBatch {
            written_at: now,
            records: indices
                .as_slice()
                .iter()
                .zip(records)
                .map(|(&index, record)| CachedRecord {
                    index,
                    context: record.context,
                    response: record.response,
                })
                .collect(),
        };

        let mut line = serde_json::to_vec(&batch)?;
        line.push(b'\n');

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(now.date_naive());
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        tracing::debug!(path = %path.display(), records = batch.records.len(), "access cache batch written");
        Ok(path)
    }

    /// Read every batch in a cache file.
    pub async fn read_batches(path: &Path) -> Result<Vec<CacheBatch>> {
        let raw = tokio::fs::read_to_string(path).await?;
        raw.lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(CounselError::from))
            .collect()
    }
}
