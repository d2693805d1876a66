//! Oracle label generation for extractive summarisation of long legal texts.
//!
//! The [`oracle`] module holds the greedy selector and the batch coordinator;
//! everything else is corpus plumbing around it.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod labels;
pub mod logging;
pub mod nlp;
pub mod oracle;
