//! Built-in page templates
//!
//! The stylesheet and the page scripts are embedded in the binary; pages
//! are assembled from presentation nodes and a shared layout.

use indexmap::IndexMap;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::catalog::{search, CatalogKind, QueryState, SearchOutcome, SearchPolicy};
use crate::config::{MatchMode, SiteConfig};
use crate::content::loader::DocEntry;
use crate::content::ViewNode;
use crate::helpers::{escape_attr, escape_html, link_to, url_for};
use crate::viewer::View;

/// Styles for every presentation class
pub const STYLESHEET: &str = include_str!("assets/style.css");

/// Clipboard support for `[data-copy]` buttons
pub const COPY_SCRIPT: &str = include_str!("assets/copy.js");

/// In-page catalog filtering for exported pages
pub const FILTER_SCRIPT: &str = include_str!("assets/filter.js");

/// Wrap `body` in the site layout
pub fn layout(config: &SiteConfig, title: &str, body: &str) -> String {
    let mut nav = link_to(config, "/", "Docs");
    for kind in CatalogKind::ALL {
        nav.push_str(&link_to(
            config,
            &format!("/catalog/{}", kind.name()),
            kind.title(),
        ));
    }

    let page_title = if title.is_empty() || title == config.title {
        escape_html(&config.title)
    } else {
        format!("{} | {}", escape_html(title), escape_html(&config.title))
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="description" content="{description}">
<meta name="generator" content="handbook-rs {version}">
<title>{page_title}</title>
<style>{style}</style>
</head>
<body>
<header class="site-header"><a class="site-title" href="{home}">{site}</a><nav>{nav}</nav></header>
<main>
{body}
</main>
<script>{script}</script>
</body>
</html>
"#,
        description = escape_attr(&config.description),
        version = env!("CARGO_PKG_VERSION"),
        page_title = page_title,
        style = STYLESHEET,
        home = escape_attr(&url_for(config, "/")),
        site = escape_html(&config.title),
        nav = nav,
        body = body,
        script = COPY_SCRIPT,
    )
}

/// Document index; `href` maps each entry to its link
pub fn index_page<F>(config: &SiteConfig, docs: &[DocEntry], href: F) -> String
where
    F: Fn(&DocEntry) -> String,
{
    let docs_list = if docs.is_empty() {
        ViewNode::new("div")
            .class("no-results")
            .child(ViewNode::text("No documents yet. Add markdown files to the docs directory."))
    } else {
        ViewNode::new("ul").class("doc-list").children(
            docs.iter()
                .map(|doc| {
                    ViewNode::new("li").child(
                        ViewNode::new("a")
                            .attr("href", href(doc))
                            .child(ViewNode::text(doc.title.as_str())),
                    )
                })
                .collect(),
        )
    };

    let catalogs = ViewNode::new("ul").class("catalog-list").children(
        CatalogKind::ALL
            .iter()
            .map(|kind| {
                ViewNode::new("li")
                    .child(
                        ViewNode::new("a")
                            .attr("href", url_for(config, &format!("/catalog/{}", kind.name())))
                            .child(ViewNode::text(kind.title())),
                    )
                    .child(ViewNode::text(format!(" ({})", kind.len())))
            })
            .collect(),
    );

    let body = ViewNode::new("div")
        .child(ViewNode::new("h1").class("md-h1").child(ViewNode::text(config.title.as_str())))
        .child(ViewNode::new("p").child(ViewNode::text(config.description.as_str())))
        .child(ViewNode::new("h2").class("md-h2").child(ViewNode::text("Documents")))
        .child(docs_list)
        .child(ViewNode::new("h2").class("md-h2").child(ViewNode::text("Catalogs")))
        .child(catalogs);

    layout(config, &config.title, &body.to_html())
}

/// Page for one viewer state
pub fn viewer_page(config: &SiteConfig, view: &View<'_>) -> String {
    let title = match view {
        View::Loading => "Loading",
        View::Error { .. } => "Error",
        View::Document { title, document } => title
            .or(document.title.as_deref())
            .unwrap_or("Document"),
    };
    layout(config, title, &view.to_html())
}

pub fn not_found_page(config: &SiteConfig, message: &str) -> String {
    let body = ViewNode::new("div")
        .class("no-results")
        .child(ViewNode::new("strong").child(ViewNode::text("Not found")))
        .child(ViewNode::new("p").child(ViewNode::text(message)));
    layout(config, "Not found", &body.to_html())
}

/// Catalog search page with category chips and the result list
pub fn catalog_page(
    config: &SiteConfig,
    query: &QueryState,
    outcome: &SearchOutcome,
    categories: &IndexMap<String, usize>,
) -> String {
    let kind = outcome.kind;
    let base = url_for(config, &format!("/catalog/{}", kind.name()));

    let form = ViewNode::new("form")
        .class("search-form")
        .attr("method", "get")
        .attr("action", base.as_str())
        .child(
            ViewNode::new("input")
                .attr("type", "search")
                .attr("name", "q")
                .attr("placeholder", format!("Search {}…", kind.title().to_lowercase()))
                .attr("value", query.text.as_str()),
        )
        .child(
            ViewNode::new("input")
                .attr("type", "hidden")
                .attr("name", "category")
                .attr("value", join_categories(query.categories.iter())),
        )
        .child(
            ViewNode::new("button")
                .attr("type", "submit")
                .child(ViewNode::text("Search")),
        );

    let chips = ViewNode::new("div").class("chips").children(
        categories
            .iter()
            .map(|(category, count)| {
                let mut toggled = query.clone();
                toggled.toggle_category(category);
                let chip = ViewNode::new("a")
                    .class("chip")
                    .attr("href", query_href(&base, &toggled))
                    .child(ViewNode::text(format!("{} ({})", category, count)));
                if query.categories.contains(category) {
                    chip.class("active")
                } else {
                    chip
                }
            })
            .collect(),
    );

    let results = if outcome.is_empty() {
        let message = if query.text.trim().is_empty() {
            "No results for the selected categories.".to_string()
        } else {
            format!("No results for “{}”.", query.text.trim())
        };
        ViewNode::new("div")
            .class("no-results")
            .child(ViewNode::text(message))
    } else {
        ViewNode::new("div")
            .class("results")
            .child(
                ViewNode::new("p").class("result-count").child(ViewNode::text(format!(
                    "Showing {} of {}",
                    outcome.cards.len(),
                    outcome.total
                ))),
            )
            .append(outcome.cards.clone())
    };

    let body = ViewNode::new("div")
        .child(ViewNode::new("h1").class("md-h1").child(ViewNode::text(kind.title())))
        .child(form)
        .child(chips)
        .child(results);

    layout(config, kind.title(), &body.to_html())
}

/// Catalog page for static hosting.
///
/// No query string reaches a static host, so every card is rendered and
/// the embedded script filters them in place under the same policy.
pub fn static_catalog_page(config: &SiteConfig, kind: CatalogKind, policy: &SearchPolicy) -> String {
    let outcome = search(kind, &QueryState::new(), policy);

    let input = ViewNode::new("div").class("search-form").child(
        ViewNode::new("input")
            .attr("type", "search")
            .attr("data-filter-input", "")
            .attr("placeholder", format!("Search {}…", kind.title().to_lowercase())),
    );

    let chips = ViewNode::new("div").class("chips").children(
        kind.categories()
            .iter()
            .map(|(category, count)| {
                ViewNode::new("button")
                    .class("chip")
                    .attr("type", "button")
                    .attr("data-category", category.as_str())
                    .child(ViewNode::text(format!("{} ({})", category, count)))
            })
            .collect(),
    );

    let match_mode = match policy.match_mode {
        MatchMode::Any => "any",
        MatchMode::All => "all",
    };
    let results = ViewNode::new("div")
        .class("results")
        .child(ViewNode::new("p").class("result-count").child(ViewNode::text(format!(
            "Showing {} of {}",
            outcome.cards.len(),
            outcome.total
        ))))
        .append(outcome.cards)
        .child(
            ViewNode::new("div")
                .class("no-results")
                .attr("hidden", "")
                .child(ViewNode::text("No results.")),
        );

    let body = ViewNode::new("div")
        .attr("data-catalog", kind.name())
        .attr("data-trim", policy.trim_query.to_string())
        .attr("data-match", match_mode)
        .child(ViewNode::new("h1").class("md-h1").child(ViewNode::text(kind.title())))
        .child(input)
        .child(chips)
        .child(results);

    let page = format!("{}\n<script>{}</script>", body.to_html(), FILTER_SCRIPT);
    layout(config, kind.title(), &page)
}

fn join_categories<'a>(categories: impl Iterator<Item = &'a String>) -> String {
    categories.map(String::as_str).collect::<Vec<_>>().join(",")
}

/// Link to `base` carrying the given query state
pub fn query_href(base: &str, query: &QueryState) -> String {
    let mut params = Vec::new();
    if !query.text.is_empty() {
        params.push(format!("q={}", utf8_percent_encode(&query.text, NON_ALPHANUMERIC)));
    }
    if !query.categories.is_empty() {
        let joined = join_categories(query.categories.iter());
        params.push(format!(
            "category={}",
            utf8_percent_encode(&joined, NON_ALPHANUMERIC)
        ));
    }
    if params.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, params.join("&"))
    }
}
