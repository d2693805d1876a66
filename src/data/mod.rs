//! Corpus ingestion, pre-filtering and persisted oracle artefacts.

pub mod corpus;
pub mod output;
pub mod prefilter;
