//! List handbook content

use anyhow::Result;

use crate::catalog::CatalogKind;
use crate::content::loader::ContentLoader;
use crate::Handbook;

/// List content by type
pub fn run(handbook: &Handbook, content_type: &str) -> Result<()> {
    print!("{}", listing(handbook, content_type)?);
    Ok(())
}

/// Listing text for `content_type`
pub fn listing(handbook: &Handbook, content_type: &str) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "doc" | "docs" => {
            let docs = ContentLoader::new(handbook).load_docs()?;
            out.push_str(&format!("Docs ({}):\n", docs.len()));
            for doc in docs {
                out.push_str(&format!(
                    "  {} [{}]\n",
                    doc.title,
                    doc.location(&handbook.config.viewer.mount)
                ));
            }
        }
        "catalog" | "catalogs" => {
            out.push_str(&format!("Catalogs ({}):\n", CatalogKind::ALL.len()));
            for kind in CatalogKind::ALL {
                out.push_str(&format!("  {} - {} ({})\n", kind, kind.title(), kind.len()));
            }
        }
        "category" | "categories" => {
            for kind in CatalogKind::ALL {
                let categories = kind.categories();
                out.push_str(&format!("{} ({}):\n", kind.title(), categories.len()));
                for (category, count) in categories {
                    out.push_str(&format!("  {} ({})\n", category, count));
                }
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: docs, catalogs, categories",
                content_type
            );
        }
    }

    Ok(out)
}
