//! Corpus loading.
//!
//! PDFs go through the `pdftotext` utility, which separates pages with a form
//! feed. Anything else is read as text and split on form feeds the same way.

use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::error::{Error, Result};

const PAGE_BREAK: char = '\x0c';

/// Ordered page texts of the single reference document. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    pages: Vec<String>,
}

impl Document {
    pub async fn load(path: &Path) -> Result<Self> {
        let is_pdf = path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        let raw = if is_pdf { pdf_to_text(path).await? } else { read_text(path).await? };
        let pages = split_pages(&raw);
        tracing::info!(path = %path.display(), pages = pages.len(), "loaded document");
        Ok(Self { path: path.to_path_buf(), pages })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

async fn read_text(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::Document(format!("failed to read {}: {}", path.display(), e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

async fn pdf_to_text(path: &Path) -> Result<String> {
    tracing::debug!(path = %path.display(), "extracting PDF text with pdftotext");
    let output = Command::new("pdftotext")
        .arg("-enc")
        .arg("UTF-8")
        .arg(path)
        .arg("-")
        .output()
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::Document("pdftotext not found; install poppler-utils".to_string()),
            _ => Error::Document(format!("failed to run pdftotext: {e}")),
        })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Document(format!("pdftotext failed on {} ({}): {}", path.display(), output.status, stderr.trim())));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Split on form feeds. The empty tail after a final page break is not a page.
pub fn split_pages(raw: &str) -> Vec<String> {
    let mut pages: Vec<String> = raw.split(PAGE_BREAK).map(str::to_string).collect();
    if pages.len() > 1 && pages.last().is_some_and(|p| p.is_empty()) {
        pages.pop();
    }
    if pages.len() == 1 && pages[0].is_empty() {
        pages.clear();
    }
    pages
}
