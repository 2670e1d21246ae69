//! Counseling-dialogue corpus: immutable record store, loading and keyword
//! search.

pub mod loader;
pub mod search;
pub mod store;

pub use loader::CorpusSource;
pub use search::{search, KeywordSet, SearchHit};
pub use store::{CorpusStore, DialogueRecord};
