//! Text processing collaborators: sentence splitting, stemming and ROUGE.

pub mod rouge;
pub mod sentences;
pub mod stem;

pub use rouge::{RougeMetric, RougeScore, RougeScorer};
pub use sentences::split_sentences;
