//! Create a new document

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Handbook;

/// Create `docs/<path or slug>.md` with front matter
pub fn create_doc(handbook: &Handbook, title: &str, path: Option<&str>) -> Result<PathBuf> {
    let name = match path {
        Some(p) => p.trim_end_matches(".md").to_string(),
        None => slug::slugify(title),
    };
    if name.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let file_path = handbook.docs_dir.join(format!("{}.md", name));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = format!(
        "---\ntitle: {}\ntags: []\n---\n\n# {}\n",
        serde_yaml::to_string(title)?.trim_end(),
        title
    );
    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);
    Ok(file_path)
}
