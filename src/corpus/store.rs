//! In-memory, read-only table of dialogue records.

use serde::{Deserialize, Serialize};

use crate::error::{CounselError, Result, ValidationError};

use super::loader::{self, CorpusSource};

/// One counseling exchange: what the client said and how the counselor
/// answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueRecord {
    pub context: String,
    pub response: String,
}

impl DialogueRecord {
    pub fn new(context: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            response: response.into(),
        }
    }
}

/// Records addressed by their ordinal position in the source dataset.
///
/// Built once and shared behind an `Arc`; there is no mutation API.
#[derive(Debug, Clone, Default)]
pub struct CorpusStore {
    records: Vec<DialogueRecord>,
}

impl CorpusStore {
    /// Build a store from already-parsed records.
    pub fn from_records(records: Vec<DialogueRecord>) -> Self {
        Self { records }
    }

    /// Fetch and parse the dataset behind `source`.
    ///
    /// Fails if the source cannot be read, any row is malformed, or the
    /// dataset holds no records.
    pub async fn load(source: &CorpusSource) -> Result<Self> {
        let records = loader::load_records(source).await?;
        tracing::info!(source = %source, records = records.len(), "corpus loaded");
        Ok(Self::from_records(records))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DialogueRecord> {
        self.records.get(index)
    }

    /// All records in index order.
    pub fn records(&self) -> &[DialogueRecord] {
        &self.records
    }

    /// Records at `indices`, in the given order.
    ///
    /// An index past the end of the store is a value error.
    pub fn get_by_indices(&self, indices: &[usize]) -> Result<Vec<DialogueRecord>> {
        indices
            .iter()
            .map(|&i| {
                self.records.get(i).cloned().ok_or_else(|| {
                    CounselError::from(ValidationError::value(
                        "indices",
                        format!("index {i} out of range for corpus of {}", self.len()),
                    ))
                })
            })
            .collect()
    }
}
