//! Reading the corpus dataset from a file or over HTTP.
//!
//! Rows are objects with at least string `Context` and `Response` fields,
//! given either as JSON Lines or as one JSON array.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{CounselError, Result};
use crate::provider::http::{shared_client, status_to_error};

use super::store::DialogueRecord;

/// Counseling conversations dataset the agent ships with.
pub const DEFAULT_CORPUS: &str =
    "hf://datasets/Amod/mental_health_counseling_conversations/combined_dataset.json";

const HF_SCHEME: &str = "hf://datasets/";
const HF_RESOLVE_BASE: &str = "https://huggingface.co/datasets";

/// Where the corpus comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusSource {
    File(PathBuf),
    Url(String),
}

impl FromStr for CorpusSource {
    type Err = CounselError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CounselError::Configuration("empty corpus location".into()));
        }
        if let Some(rest) = s.strip_prefix(HF_SCHEME) {
            // hf://datasets/<owner>/<name>/<path within repo>
            let mut parts = rest.splitn(3, '/');
            return match (parts.next(), parts.next(), parts.next()) {
                (Some(owner), Some(name), Some(file))
                    if !owner.is_empty() && !name.is_empty() && !file.is_empty() =>
                {
                    Ok(Self::Url(format!(
                        "{HF_RESOLVE_BASE}/{owner}/{name}/resolve/main/{file}"
                    )))
                }
                _ => Err(CounselError::Configuration(format!(
                    "invalid dataset location '{s}': expected hf://datasets/<owner>/<name>/<file>"
                ))),
            };
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            return Ok(Self::Url(s.to_string()));
        }
        Ok(Self::File(PathBuf::from(s)))
    }
}

impl fmt::Display for CorpusSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Deserialize)]
struct CorpusRow {
    #[serde(rename = "Context")]
    context: String,
    #[serde(rename = "Response")]
    response: String,
}

impl From<CorpusRow> for DialogueRecord {
    fn from(row: CorpusRow) -> Self {
        DialogueRecord::new(row.context, row.response)
    }
}

pub(crate) async fn load_records(source: &CorpusSource) -> Result<Vec<DialogueRecord>> {
    let raw = match source {
        CorpusSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
            CounselError::Corpus(format!("cannot read {}: {e}", path.display()))
        })?,
        CorpusSource::Url(url) => fetch(url).await?,
    };
    parse_records(&raw)
}

async fn fetch(url: &str) -> Result<String> {
    tracing::debug!(url, "fetching corpus");
    let resp = shared_client().get(url).send().await?;
    let status = resp.status().as_u16();
    if status != 200 {
        let body = resp.text().await.unwrap_or_default();
        return Err(CounselError::Corpus(format!(
            "fetching {url} failed: {}",
            status_to_error(status, &body)
        )));
    }
    Ok(resp.text().await?)
}

/// Parse JSON Lines or a JSON array of rows.
pub fn parse_records(raw: &str) -> Result<Vec<DialogueRecord>> {
    let trimmed = raw.trim_start();
    let records: Vec<DialogueRecord> = if trimmed.starts_with('[') {
        serde_json::from_str::<Vec<CorpusRow>>(trimmed)
            .map_err(|e| CounselError::Corpus(format!("malformed corpus array: {e}")))?
            .into_iter()
            .map(DialogueRecord::from)
            .collect()
    } else {
        let mut records = Vec::new();
        for (line_no, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let row: CorpusRow = serde_json::from_str(line).map_err(|e| {
                CounselError::Corpus(format!("malformed corpus row at line {}: {e}", line_no + 1))
            })?;
            records.push(row.into());
        }
        records
    };

    if records.is_empty() {
        return Err(CounselError::Corpus("corpus contains no records".into()));
    }
    Ok(records)
}
