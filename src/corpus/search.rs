//! Literal keyword search over the corpus.
//!
//! Every keyword is checked against every record (`O(keywords × records)`).
//! This is fine for a small static corpus; a larger one would need an index
//! that preserves the same case-sensitive substring semantics.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::ValidationError;

use super::store::{CorpusStore, DialogueRecord};

/// Validated, non-empty set of non-empty search keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Build from strings; rejects an empty sequence and empty keywords.
    pub fn new<I, S>(keywords: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.into();
            if keyword.is_empty() {
                return Err(ValidationError::value(
                    "keywords",
                    "empty keywords are not allowed",
                ));
            }
            if !unique.contains(&keyword) {
                unique.push(keyword);
            }
        }
        if unique.is_empty() {
            return Err(ValidationError::value(
                "keywords",
                "at least one keyword is required",
            ));
        }
        Ok(Self { keywords: unique })
    }

    /// Build from loosely typed JSON values, as delivered in tool arguments.
    ///
    /// Every element is type-checked before any value check.
    pub fn from_values(values: &[Value]) -> Result<Self, ValidationError> {
        let mut keywords = Vec::with_capacity(values.len());
        for value in values {
            match value {
                Value::String(s) => keywords.push(s.as_str()),
                other => return Err(ValidationError::type_mismatch("keywords", "string", other)),
            }
        }
        Self::new(keywords)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// A matching record with its index in the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub index: usize,
    pub record: &'a DialogueRecord,
}

/// Records whose context or response contains any keyword.
///
/// Matching is a case-sensitive literal substring test. Each record appears
/// at most once; hits come back in ascending index order.
pub fn search<'a>(corpus: &'a CorpusStore, keywords: &KeywordSet) -> Vec<SearchHit<'a>> {
    let mut matched = BTreeSet::new();
    for keyword in keywords.iter() {
        for (index, record) in corpus.records().iter().enumerate() {
            if record.context.contains(keyword) || record.response.contains(keyword) {
                matched.insert(index);
            }
        }
    }
    matched
        .into_iter()
        .map(|index| SearchHit {
            index,
            record: &corpus.records()[index],
        })
        .collect()
}

impl CorpusStore {
    /// See [`search`].
    pub fn search(&self, keywords: &KeywordSet) -> Vec<SearchHit<'_>> {
        search(self, keywords)
    }
}
