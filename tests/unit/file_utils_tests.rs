/*!
 * Tests for file utility functions and artifact paths
 */

use anyhow::Result;
use std::path::Path;

use docwai::file_utils::{read_snippet_list, write_snippet_list, ArtifactPaths, FileManager};
use docwai::snippet::Snippet;

use crate::common;

/// file_exists is true for a real file
#[test]
fn test_fileExists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "exists.md",
        "content",
    )?;

    assert!(FileManager::file_exists(&test_file));
    Ok(())
}

/// file_exists is false for a missing file
#[test]
fn test_fileExists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.md"));
}

/// Markdown detection accepts .md and .mdx, case-insensitively
#[test]
fn test_isMarkdownFile_shouldMatchMdAndMdx() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let md = common::create_test_file(&dir, "page.md", "x")?;
    let mdx = common::create_test_file(&dir, "page.MDX", "x")?;
    let txt = common::create_test_file(&dir, "notes.txt", "x")?;

    assert!(FileManager::is_markdown_file(&md));
    assert!(FileManager::is_markdown_file(&mdx));
    assert!(!FileManager::is_markdown_file(&txt));
    Ok(())
}

/// Document discovery is recursive and returns sorted paths
#[test]
fn test_findMarkdownFiles_shouldRecurseAndSort() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    common::create_test_file(&dir, "b.md", "x")?;
    common::create_test_file(&dir, "nested/a.mdx", "x")?;
    common::create_test_file(&dir, "nested/ignore.png", "x")?;

    let found = FileManager::find_markdown_files(temp_dir.path())?;
    assert_eq!(found.len(), 2);
    assert!(found[0].ends_with("nested/a.mdx") || found[0].ends_with("b.md"));
    assert!(found.windows(2).all(|w| w[0] <= w[1]));
    Ok(())
}

/// write_to_file creates missing parent directories
#[test]
fn test_writeToFile_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("deep/nested/out.md");

    FileManager::write_to_file(&target, "hello")?;
    assert_eq!(FileManager::read_to_string(&target)?, "hello");
    Ok(())
}

/// clean_dir empties a directory without removing it
#[test]
fn test_cleanDir_shouldRemoveContents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_file(&dir, "a.md", "x")?;
    common::create_test_file(&dir, "sub/b.md", "x")?;

    FileManager::clean_dir(temp_dir.path())?;

    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(FileManager::find_markdown_files(temp_dir.path())?.is_empty());
    Ok(())
}

/// Artifact paths derive from the document name, extension preserved
#[test]
fn test_artifactPaths_forDocument_shouldDeriveSiblings() {
    let paths = ArtifactPaths::for_document(Path::new("docs/guide/page.mdx"));

    assert_eq!(paths.masked_text, Path::new("docs/guide/page-text.tmp.mdx"));
    assert_eq!(paths.snippet_list, Path::new("docs/guide/page-code.tmp.json"));
}

/// Snippet lists persist as JSON and load back in order
#[test]
fn test_snippetList_writeAndRead_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("page-code.tmp.json");

    let snippets = vec![
        Snippet::new("<notranslate>meta_header</notranslate>", "---\nid: x\n---"),
        Snippet::new("<notranslate>cx_spt_0</notranslate>", "```rs\nfn main() {}\n```"),
    ];

    write_snippet_list(&path, &snippets)?;
    let loaded = read_snippet_list(&path)?;

    assert_eq!(loaded, snippets);
    Ok(())
}
