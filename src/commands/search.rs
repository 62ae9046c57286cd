//! Search a built-in catalog from the command line

use anyhow::Result;

use crate::catalog::{search, search_json, CatalogKind, QueryState, SearchOutcome};
use crate::helpers::truncate;
use crate::Handbook;

const LABEL_WIDTH: usize = 80;

/// Search `catalog` and print the matches
pub fn run(
    handbook: &Handbook,
    catalog: &str,
    text: Option<&str>,
    categories: &[String],
    json: bool,
) -> Result<()> {
    let kind: CatalogKind = catalog.parse()?;
    let mut query = QueryState::new().with_text(text.unwrap_or_default());
    for category in categories {
        query = query.with_category(category.as_str());
    }

    let policy = handbook.search_policy();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&search_json(kind, &query, &policy))?
        );
    } else {
        print!("{}", format_outcome(&search(kind, &query, &policy)));
    }
    Ok(())
}

/// Plain-text listing of a search outcome
pub fn format_outcome(outcome: &SearchOutcome) -> String {
    if outcome.is_empty() {
        return "No results\n".to_string();
    }

    let mut out = format!(
        "{} ({} of {}):\n",
        outcome.kind.title(),
        outcome.labels.len(),
        outcome.total
    );
    for label in &outcome.labels {
        out.push_str("  ");
        out.push_str(&truncate(label, LABEL_WIDTH, None));
        out.push('\n');
    }
    out
}
