//! Render a single document location

use anyhow::Result;

use crate::viewer::{DocumentViewer, ViewState};
use crate::Handbook;

/// Fetch and render `location`.
///
/// Returns the document HTML, or the presentation tree as JSON. A failed
/// load becomes an error carrying the message the viewer would show.
pub async fn render(handbook: &Handbook, location: &str, json: bool) -> Result<String> {
    let fetcher = handbook.fetcher()?;
    let mut viewer = DocumentViewer::new(handbook.renderer());

    viewer.navigate(&fetcher, location).await;

    match viewer.state() {
        ViewState::Loaded(document) if json => Ok(serde_json::to_string_pretty(&document.tree)?),
        ViewState::Loaded(_) => Ok(viewer.view().to_html()),
        ViewState::Failed(message) => Err(anyhow::anyhow!("{}", message)),
        ViewState::Idle | ViewState::Pending => {
            Err(anyhow::anyhow!("document request did not complete"))
        }
    }
}

/// Print a rendered document to stdout
pub async fn run(handbook: &Handbook, location: &str, json: bool) -> Result<()> {
    let output = render(handbook, location, json).await?;
    println!("{}", output);
    Ok(())
}
