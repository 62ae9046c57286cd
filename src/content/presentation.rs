//! Fixed mapping from semantic elements to presentation nodes
//!
//! Every [`ElementKind`] has exactly one treatment here. The CSS for the
//! classes lives in the embedded stylesheet (`templates::STYLESHEET`).

use super::highlight::{plain_lines, Highlighter};
use super::tree::{Align, DocNode, ElementKind, ViewNode};

/// Presentation stage of the render pipeline
pub struct Presentation {
    highlighter: Option<Highlighter>,
    line_numbers: bool,
}

impl Presentation {
    pub fn new(highlighter: Option<Highlighter>, line_numbers: bool) -> Self {
        Self {
            highlighter,
            line_numbers,
        }
    }

    /// Map a parsed node (and its subtree) onto presentation nodes
    pub fn present(&self, node: &DocNode) -> ViewNode {
        match node {
            DocNode::Text(text) => ViewNode::text(text.as_str()),
            DocNode::Element { kind, children } => self.present_element(kind, children),
        }
    }

    fn present_children(&self, children: &[DocNode]) -> Vec<ViewNode> {
        children.iter().map(|child| self.present(child)).collect()
    }

    fn present_element(&self, kind: &ElementKind, children: &[DocNode]) -> ViewNode {
        match kind {
            ElementKind::Document => ViewNode::new("article")
                .class("md-document")
                .children(self.present_children(children)),
            ElementKind::Heading { level, id } => self.heading(*level, id.as_deref(), children),
            ElementKind::Paragraph => ViewNode::new("p")
                .class("md-paragraph")
                .children(self.present_children(children)),
            ElementKind::BlockQuote => ViewNode::new("blockquote")
                .class("md-blockquote")
                .children(self.present_children(children)),
            ElementKind::List { ordered, start } => self.list(*ordered, *start, children),
            ElementKind::ListItem => ViewNode::new("li")
                .class("md-list-item")
                .children(self.present_children(children)),
            ElementKind::TaskMarker { checked } => {
                let input = ViewNode::new("input")
                    .class("md-task")
                    .attr("type", "checkbox")
                    .attr("disabled", "disabled");
                if *checked {
                    input.attr("checked", "checked")
                } else {
                    input
                }
            }
            ElementKind::CodeBlock { lang } => self.code_block(lang.as_deref(), children),
            ElementKind::InlineCode => ViewNode::new("code")
                .class("md-code-inline")
                .children(self.present_children(children)),
            ElementKind::Emphasis => ViewNode::new("em")
                .class("md-emphasis")
                .children(self.present_children(children)),
            ElementKind::Strong => ViewNode::new("strong")
                .class("md-strong")
                .children(self.present_children(children)),
            ElementKind::Strikethrough => ViewNode::new("del")
                .class("md-strike")
                .children(self.present_children(children)),
            ElementKind::Link { href, title } => self.link(href, title, children),
            ElementKind::Image { src, title } => {
                let alt: String = children.iter().map(DocNode::text_content).collect();
                let img = ViewNode::new("img")
                    .class("md-image")
                    .attr("src", src.as_str())
                    .attr("alt", alt);
                if title.is_empty() {
                    img
                } else {
                    img.attr("title", title.as_str())
                }
            }
            ElementKind::Table => ViewNode::new("div").class("md-table-scroll").child(
                ViewNode::new("table")
                    .class("md-table")
                    .children(self.present_children(children)),
            ),
            ElementKind::TableHead => ViewNode::new("thead").child(
                ViewNode::new("tr")
                    .class("md-row")
                    .children(self.present_children(children)),
            ),
            ElementKind::TableBody => {
                let rows = children
                    .iter()
                    .enumerate()
                    .map(|(i, row)| {
                        let row = self.present(row);
                        if i % 2 == 1 {
                            row.class("md-row-striped")
                        } else {
                            row
                        }
                    })
                    .collect();
                ViewNode::new("tbody").children(rows)
            }
            ElementKind::TableRow => ViewNode::new("tr")
                .class("md-row")
                .children(self.present_children(children)),
            ElementKind::TableCell { align, header } => {
                let cell = ViewNode::new(if *header { "th" } else { "td" })
                    .class("md-cell")
                    .children(self.present_children(children));
                match align {
                    Align::None => cell,
                    Align::Left => cell.attr("style", "text-align:left"),
                    Align::Center => cell.attr("style", "text-align:center"),
                    Align::Right => cell.attr("style", "text-align:right"),
                }
            }
            ElementKind::Rule => ViewNode::new("hr").class("md-rule"),
            ElementKind::HardBreak => ViewNode::new("br"),
            ElementKind::Html => {
                ViewNode::Raw(children.iter().map(DocNode::text_content).collect())
            }
            ElementKind::FootnoteReference { label } => ViewNode::new("sup")
                .class("md-footnote-ref")
                .child(
                    ViewNode::new("a")
                        .attr("href", format!("#fn-{}", slug::slugify(label)))
                        .child(ViewNode::text(label.as_str())),
                ),
            ElementKind::FootnoteDefinition { label } => ViewNode::new("div")
                .class("md-footnote")
                .attr("id", format!("fn-{}", slug::slugify(label)))
                .child(
                    ViewNode::new("sup")
                        .class("md-footnote-label")
                        .child(ViewNode::text(label.as_str())),
                )
                .append(self.present_children(children)),
        }
    }

    fn heading(&self, level: u8, id: Option<&str>, children: &[DocNode]) -> ViewNode {
        let (tag, class) = match level {
            1 => ("h1", "md-h1"),
            2 => ("h2", "md-h2"),
            3 => ("h3", "md-h3"),
            4 => ("h4", "md-h4"),
            5 => ("h5", "md-h5"),
            _ => ("h6", "md-h6"),
        };
        let node = ViewNode::new(tag)
            .class("md-heading")
            .class(class)
            .children(self.present_children(children));
        match id {
            Some(id) => node.attr("id", id),
            None => node,
        }
    }

    fn list(&self, ordered: bool, start: Option<u64>, children: &[DocNode]) -> ViewNode {
        let node = if ordered {
            let ol = ViewNode::new("ol").class("md-list").class("md-list-ordered");
            match start {
                Some(n) if n != 1 => ol.attr("start", n.to_string()),
                _ => ol,
            }
        } else {
            ViewNode::new("ul").class("md-list")
        };
        node.children(self.present_children(children))
    }

    fn link(&self, href: &str, title: &str, children: &[DocNode]) -> ViewNode {
        let mut link = ViewNode::new("a").class("md-link");
        if is_safe_href(href) {
            link = link.attr("href", href);
        } else {
            tracing::debug!("Dropping link target with unsupported scheme: {}", href);
        }
        link = link.children(self.present_children(children));
        if !title.is_empty() {
            link = link.attr("title", title);
        }
        if href.starts_with("http://") || href.starts_with("https://") {
            link = link.attr("target", "_blank").attr("rel", "noopener");
        }
        link
    }

    fn code_block(&self, lang: Option<&str>, children: &[DocNode]) -> ViewNode {
        let code: String = children.iter().map(DocNode::text_content).collect();
        let body = match &self.highlighter {
            Some(highlighter) => highlighter.highlight(&code, lang),
            None => plain_lines(&code, self.line_numbers),
        };

        let mut code_node = ViewNode::new("code");
        if let Some(lang) = lang {
            code_node = code_node.class(&format!("language-{}", lang));
        }
        let pre = ViewNode::new("pre")
            .class("md-code-block")
            .child(code_node.children(body));
        match lang {
            Some(lang) => pre.attr("data-lang", lang),
            None => pre,
        }
    }
}

/// Relative references, fragments and http(s)/mailto URLs; anything with
/// another scheme (`javascript:`, `data:`, ...) is not linked.
fn is_safe_href(href: &str) -> bool {
    let Some(colon) = href.find(':') else {
        return true;
    };
    let scheme = &href[..colon];
    if scheme.contains(['/', '?', '#']) {
        // the colon sits in a path, query or fragment
        return true;
    }
    matches!(
        scheme.trim().to_ascii_lowercase().as_str(),
        "http" | "https" | "mailto"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> DocNode {
        DocNode::Text(s.to_string())
    }

    fn el(kind: ElementKind, children: Vec<DocNode>) -> DocNode {
        DocNode::Element { kind, children }
    }

    fn plain() -> Presentation {
        Presentation::new(None, false)
    }

    #[test]
    fn test_h1_gets_underlined_heading_class() {
        let node = el(
            ElementKind::Heading {
                level: 1,
                id: Some("title".to_string()),
            },
            vec![text("Title")],
        );
        let view = plain().present(&node);
        assert_eq!(view.tag(), Some("h1"));
        assert!(view.has_class("md-h1"));
        assert_eq!(view.get_attr("id"), Some("title"));
    }

    #[test]
    fn test_code_block_is_dark_pre() {
        let node = el(
            ElementKind::CodeBlock {
                lang: Some("jsx".to_string()),
            },
            vec![text("<App />\n")],
        );
        let view = plain().present(&node);
        assert_eq!(view.tag(), Some("pre"));
        assert!(view.has_class("md-code-block"));
        let code = view.find("code").unwrap();
        assert!(code.has_class("language-jsx"));
        assert_eq!(view.text_content(), "<App />\n");
        assert!(view.to_html().contains("&lt;App /&gt;"));
    }

    #[test]
    fn test_table_is_scroll_wrapped_and_striped() {
        let row = |s: &str| {
            el(
                ElementKind::TableRow,
                vec![el(
                    ElementKind::TableCell {
                        align: Align::Right,
                        header: false,
                    },
                    vec![text(s)],
                )],
            )
        };
        let node = el(
            ElementKind::Table,
            vec![el(ElementKind::TableBody, vec![row("a"), row("b"), row("c")])],
        );
        let view = plain().present(&node);
        assert!(view.has_class("md-table-scroll"));
        let mut rows = Vec::new();
        view.find_all("tr", &mut rows);
        assert_eq!(rows.len(), 3);
        assert!(!rows[0].has_class("md-row-striped"));
        assert!(rows[1].has_class("md-row-striped"));
        assert!(!rows[2].has_class("md-row-striped"));
        let cell = view.find("td").unwrap();
        assert_eq!(cell.get_attr("style"), Some("text-align:right"));
    }

    #[test]
    fn test_external_links_open_in_new_tab() {
        let external = el(
            ElementKind::Link {
                href: "https://react.dev".to_string(),
                title: String::new(),
            },
            vec![text("React")],
        );
        let internal = el(
            ElementKind::Link {
                href: "/docs/hooks.md".to_string(),
                title: "Hooks".to_string(),
            },
            vec![text("Hooks")],
        );
        let view = plain().present(&external);
        assert!(view.has_class("md-link"));
        assert_eq!(view.get_attr("target"), Some("_blank"));
        let view = plain().present(&internal);
        assert_eq!(view.get_attr("target"), None);
        assert_eq!(view.get_attr("title"), Some("Hooks"));
    }

    #[test]
    fn test_blockquote_and_inline_code_classes() {
        let node = el(
            ElementKind::BlockQuote,
            vec![el(
                ElementKind::Paragraph,
                vec![el(ElementKind::InlineCode, vec![text("useMemo")])],
            )],
        );
        let view = plain().present(&node);
        assert!(view.has_class("md-blockquote"));
        assert!(view.find("code").unwrap().has_class("md-code-inline"));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let node = el(ElementKind::Html, vec![text("<kbd>Ctrl</kbd>")]);
        assert_eq!(plain().present(&node).to_html(), "<kbd>Ctrl</kbd>");
    }

    #[test]
    fn test_unsafe_link_scheme_is_not_linked() {
        let presentation = Presentation::new(None, false);
        let node = DocNode::Element {
            kind: ElementKind::Link {
                href: "JavaScript:alert(1)".to_string(),
                title: String::new(),
            },
            children: vec![text("click")],
        };
        let view = presentation.present(&node);
        assert_eq!(view.tag(), Some("a"));
        assert_eq!(view.get_attr("href"), None);
        assert_eq!(view.text_content(), "click");
    }

    #[test]
    fn test_safe_hrefs() {
        for href in [
            "https://react.dev",
            "http://localhost:4000",
            "mailto:team@example.com",
            "/docs/hooks.md",
            "hooks.md#use-state",
            "#usestate",
            "./a:b.md",
            "?tab=1:2",
        ] {
            assert!(is_safe_href(href), "{}", href);
        }
        for href in ["javascript:alert(1)", "data:text/html,x", "vbscript:x", " javascript :x"] {
            assert!(!is_safe_href(href), "{}", href);
        }
    }
}
