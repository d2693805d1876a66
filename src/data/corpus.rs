//! Readers and writers for the plain-text corpus layouts.
//!
//! Raw splits hold one document per line (`{split}.source`) and one
//! reference summary per line (`{split}.target`). Processed splits hold one
//! sentence per line with a blank line after every document.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use tracing::info;

use crate::{error::Result, nlp::split_sentences, oracle::Document};

/// Read a one-document-per-line file and split every line into sentences.
pub fn read_line_documents(path: &Path) -> Result<Vec<Document>> {
    let text = fs::read_to_string(path)?;
    let documents: Vec<Document> = text
        .lines()
        .map(|line| split_sentences(line.trim()))
        .collect();
    info!(path = %path.display(), documents = documents.len(), "loaded raw documents");
    Ok(documents)
}

/// Read one trimmed string per line.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text.lines().map(|line| line.trim().to_string()).collect())
}

/// Write one trimmed string per line.
pub fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<()> {
    let mut out = create(path)?;
    for line in lines {
        writeln!(out, "{}", line.as_ref().trim())?;
    }
    out.flush()?;
    info!(path = %path.display(), rows = lines.len(), "wrote lines");
    Ok(())
}

/// Read blank-line separated documents, one sentence per line.
pub fn read_block_documents(path: &Path) -> Result<Vec<Document>> {
    let text = fs::read_to_string(path)?;
    let mut documents = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                documents.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.to_string());
        }
    }
    if !current.is_empty() {
        documents.push(current);
    }
    info!(path = %path.display(), documents = documents.len(), "loaded sentence blocks");
    Ok(documents)
}

/// Write documents as sentence blocks followed by a blank line.
pub fn write_block_documents(path: &Path, documents: &[Document]) -> Result<()> {
    let mut out = create(path)?;
    for document in documents {
        for sentence in document {
            writeln!(out, "{}", sentence.trim())?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    info!(path = %path.display(), documents = documents.len(), "wrote sentence blocks");
    Ok(())
}

pub(crate) fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}
