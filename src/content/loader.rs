//! Content loader - discovers documents in the docs directory

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::FrontMatter;
use crate::helpers::encode_path;
use crate::Handbook;

/// A document found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocEntry {
    /// Path relative to the docs directory, `/`-separated
    pub path: String,
    pub title: String,
    pub tags: Vec<String>,
}

impl DocEntry {
    /// Location the viewer fetches this document from, percent-encoded
    /// so the fetcher decodes it back to the file name
    pub fn location(&self, mount: &str) -> String {
        format!("{}/{}", mount.trim_end_matches('/'), encode_path(&self.path))
    }
}

/// Loads document listings from the docs directory
pub struct ContentLoader<'a> {
    handbook: &'a Handbook,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(handbook: &'a Handbook) -> Self {
        Self { handbook }
    }

    /// All markdown documents, sorted by path
    pub fn load_docs(&self) -> Result<Vec<DocEntry>> {
        let docs_dir = &self.handbook.docs_dir;
        if !docs_dir.exists() {
            return Ok(Vec::new());
        }

        let mut docs = Vec::new();
        for entry in WalkDir::new(docs_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }
            match load_doc(docs_dir, path) {
                Ok(doc) => docs.push(doc),
                Err(e) => {
                    tracing::warn!("Failed to load document {:?}: {}", path, e);
                }
            }
        }

        docs.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(docs)
    }
}

/// Read just enough of a document to list it
fn load_doc(docs_dir: &Path, path: &Path) -> Result<DocEntry> {
    let content = fs::read_to_string(path)?;
    let (fm, body) = FrontMatter::parse(&content)?;

    let relative = path
        .strip_prefix(docs_dir)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    // Title: front-matter, then first `# ` line, then the file name
    let title = fm
        .title
        .or_else(|| {
            body.lines()
                .find_map(|line| line.strip_prefix("# "))
                .map(|t| t.trim().to_string())
        })
        .unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

    Ok(DocEntry {
        path: relative,
        title,
        tags: fm.tags,
    })
}

/// Check if a file is a markdown file
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_docs() {
        let dir = tempfile::tempdir().unwrap();
        let handbook = Handbook::new(dir.path()).unwrap();
        fs::create_dir_all(handbook.docs_dir.join("react")).unwrap();
        fs::write(
            handbook.docs_dir.join("react/hooks.md"),
            "---\ntitle: Hooks Cheat Sheet\ntags: [react]\n---\n# Hooks\n",
        )
        .unwrap();
        fs::write(handbook.docs_dir.join("node.md"), "intro\n\n# Node Basics\n").unwrap();
        fs::write(handbook.docs_dir.join("notes.txt"), "not markdown").unwrap();
        fs::write(handbook.docs_dir.join("empty.md"), "").unwrap();

        let docs = ContentLoader::new(&handbook).load_docs().unwrap();
        let paths: Vec<_> = docs.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["empty.md", "node.md", "react/hooks.md"]);
        assert_eq!(docs[0].title, "empty");
        assert_eq!(docs[1].title, "Node Basics");
        assert_eq!(docs[2].title, "Hooks Cheat Sheet");
        assert_eq!(docs[2].tags, vec!["react"]);
        assert_eq!(docs[2].location("/docs/"), "/docs/react/hooks.md");
    }

    #[tokio::test]
    async fn test_location_round_trips_through_file_source() {
        use crate::content::{DocumentSource, FileSource};

        let dir = tempfile::tempdir().unwrap();
        let handbook = Handbook::new(dir.path()).unwrap();
        fs::create_dir_all(&handbook.docs_dir).unwrap();
        fs::write(handbook.docs_dir.join("100%25-guide.md"), "# Guide\n").unwrap();
        fs::write(handbook.docs_dir.join("a b#c.md"), "# Spaced\n").unwrap();

        let source = FileSource::new(&handbook.docs_dir, "/docs");
        for doc in ContentLoader::new(&handbook).load_docs().unwrap() {
            let location = doc.location("/docs");
            assert!(source.fetch(&location).await.is_ok(), "{} did not resolve", location);
        }
    }

    #[test]
    fn test_missing_docs_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let handbook = Handbook::new(dir.path()).unwrap();
        assert!(ContentLoader::new(&handbook).load_docs().unwrap().is_empty());
    }
}
