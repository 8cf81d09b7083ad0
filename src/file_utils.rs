use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::snippet::Snippet;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Check whether a path looks like a translatable Markdown/MDX document
    pub fn is_markdown_file<P: AsRef<Path>>(path: P) -> bool {
        let path = path.as_ref();
        path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("mdx"))
    }

    /// Find all Markdown/MDX documents under a directory, recursively.
    ///
    /// Results come back in deterministic sorted order so runs are
    /// reproducible and reports are diffable.
    pub fn find_markdown_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            if Self::is_markdown_file(entry.path()) {
                result.push(entry.path().to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Copy a file from one location to another, ensuring the target directory exists
    pub fn copy_file<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, to: P2) -> Result<()> {
        let from = from.as_ref();
        let to = to.as_ref();

        if !from.exists() {
            return Err(anyhow::anyhow!("Source file does not exist: {:?}", from));
        }

        // Ensure the target directory exists
        if let Some(parent) = to.parent() {
            Self::ensure_dir(parent)?;
        }

        fs::copy(from, to)?;

        Ok(())
    }

    /// Remove everything inside a directory without removing the directory
    /// itself.
    pub fn clean_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {:?}", dir))?
        {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                fs::remove_dir_all(&path)
                    .with_context(|| format!("Failed to remove directory: {:?}", path))?;
            } else {
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove file: {:?}", path))?;
            }
        }

        Ok(())
    }
}

/// Sibling paths of the durable intermediate artifacts for one document.
///
/// The masked text and snippet list are persisted right after extraction so
/// a failed or cancelled translation can be retried without re-masking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Masked document body (UTF-8 text)
    pub masked_text: PathBuf,

    /// Serialized ordered snippet list
    pub snippet_list: PathBuf,
}

impl ArtifactPaths {
    /// Derive artifact paths next to a document's output location.
    ///
    /// `docs/page.mdx` maps to `docs/page-text.tmp.mdx` and
    /// `docs/page-code.tmp.json`.
    pub fn for_document<P: AsRef<Path>>(document: P) -> Self {
        let document = document.as_ref();
        let extension = document
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("md");
        let stem = document
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());
        let parent = document.parent().unwrap_or_else(|| Path::new(""));

        ArtifactPaths {
            masked_text: parent.join(format!("{}-text.tmp.{}", stem, extension)),
            snippet_list: parent.join(format!("{}-code.tmp.json", stem)),
        }
    }
}

/// Persist a snippet list as pretty-printed JSON (`[{id, code}, ...]`),
/// human-diffable and stable across runs.
pub fn write_snippet_list<P: AsRef<Path>>(path: P, snippets: &[Snippet]) -> Result<()> {
    let serialized = serde_json::to_string_pretty(snippets)
        .context("Failed to serialize snippet list to JSON")?;
    FileManager::write_to_file(path, &serialized)
}

/// Load a snippet list written by [`write_snippet_list`]
pub fn read_snippet_list<P: AsRef<Path>>(path: P) -> Result<Vec<Snippet>> {
    let content = FileManager::read_to_string(&path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snippet list: {:?}", path.as_ref()))
}
