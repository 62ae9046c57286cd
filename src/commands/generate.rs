//! Export the handbook as static HTML

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::catalog::CatalogKind;
use crate::content::loader::{ContentLoader, DocEntry};
use crate::content::FileSource;
use crate::helpers::{encode_path, full_url_for, url_for};
use crate::templates;
use crate::viewer::{DocumentViewer, FetchStatus};
use crate::Handbook;

/// Export every document to `public/<path>.html`, plus the index, the
/// catalog pages and a plain-text sitemap.
pub async fn run(handbook: &Handbook) -> Result<()> {
    let start = std::time::Instant::now();
    let config = &handbook.config;

    let docs = ContentLoader::new(handbook).load_docs()?;
    tracing::info!("Loaded {} documents", docs.len());

    // Exported pages always come from the local docs directory
    let source = FileSource::new(&handbook.docs_dir, &config.viewer.mount);
    let renderer = handbook.renderer();
    let mut pages = Vec::new();
    let mut failed = 0;

    for doc in &docs {
        let mut viewer = DocumentViewer::new(renderer.clone());
        viewer
            .navigate(&source, &doc.location(&config.viewer.mount))
            .await;
        if viewer.status() == Some(FetchStatus::Failed) {
            failed += 1;
        }

        let output = html_path(doc);
        write_file(
            &handbook.public_dir.join(&output),
            &templates::viewer_page(config, &viewer.view()),
        )?;
        tracing::debug!("Generated: {}", output);
        pages.push(output);
    }

    let index = templates::index_page(config, &docs, |doc| {
        url_for(config, &encode_path(&html_path(doc)))
    });
    write_file(&handbook.public_dir.join("index.html"), &index)?;

    let policy = handbook.search_policy();
    for kind in CatalogKind::ALL {
        let output = format!("catalog/{}/index.html", kind.name());
        write_file(
            &handbook.public_dir.join(&output),
            &templates::static_catalog_page(config, kind, &policy),
        )?;
        pages.push(format!("catalog/{}/", kind.name()));
    }

    let sitemap = std::iter::once(full_url_for(config, "/"))
        .chain(pages.iter().map(|page| full_url_for(config, &encode_path(page))))
        .collect::<Vec<_>>()
        .join("\n");
    write_file(&handbook.public_dir.join("sitemap.txt"), &(sitemap + "\n"))?;

    if failed > 0 {
        tracing::warn!("{} document(s) failed to render", failed);
    }
    tracing::info!(
        "Generated {} pages in {:.2}s",
        pages.len() + 1,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Output path of a document, relative to the public directory
pub fn html_path(doc: &DocEntry) -> String {
    Path::new(&doc.path)
        .with_extension("html")
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
