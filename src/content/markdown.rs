//! Markdown rendering: text -> semantic tree -> presentation tree

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;

use super::highlight::Highlighter;
use super::presentation::Presentation;
use super::tree::{Align, DocNode, ElementKind, ViewNode};
use super::{DocumentError, FrontMatter};
use crate::config::HighlightConfig;

/// One entry of a document outline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRef {
    pub level: u8,
    pub text: String,
    pub id: String,
}

/// Result of a render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Front-matter title, else the first top-level heading
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub headings: Vec<HeadingRef>,
    pub tree: ViewNode,
}

impl RenderedDocument {
    pub fn to_html(&self) -> String {
        self.tree.to_html()
    }
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    presentation: Presentation,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::from_config(&HighlightConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            presentation: Presentation::new(
                Some(Highlighter::new(theme, line_numbers)),
                line_numbers,
            ),
        }
    }

    pub fn from_config(config: &HighlightConfig) -> Self {
        if config.enable {
            Self::with_options(&config.theme, config.line_number)
        } else {
            Self {
                presentation: Presentation::new(None, config.line_number),
            }
        }
    }

    /// Render a document. Only a malformed front-matter block can fail.
    pub fn render(&self, markdown: &str) -> Result<RenderedDocument, DocumentError> {
        let (fm, body) = FrontMatter::parse(markdown)
            .map_err(|e| DocumentError::runtime(format!("invalid front-matter: {}", e)))?;

        let tree = parse(body);
        let headings = outline(&tree);
        let title = fm.title.or_else(|| {
            headings
                .iter()
                .find(|h| h.level == 1)
                .map(|h| h.text.clone())
        });

        Ok(RenderedDocument {
            title,
            description: fm.description,
            tags: fm.tags,
            headings,
            tree: self.presentation.present(&tree),
        })
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse markdown into the semantic tree
pub fn parse(markdown: &str) -> DocNode {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;
    let parser = Parser::new_ext(markdown, options);

    let mut builder = TreeBuilder::new();
    for event in parser {
        match event {
            Event::Start(tag) => {
                let kind = builder.kind_for(tag);
                builder.open(kind);
            }
            Event::End(end) => builder.close(end),
            Event::Text(text) => builder.push(DocNode::Text(text.into_string())),
            Event::Code(code) => builder.push(DocNode::Element {
                kind: ElementKind::InlineCode,
                children: vec![DocNode::Text(code.into_string())],
            }),
            Event::Html(html) | Event::InlineHtml(html) => builder.push(DocNode::Element {
                kind: ElementKind::Html,
                children: vec![DocNode::Text(html.into_string())],
            }),
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                builder.push(DocNode::Text(math.into_string()))
            }
            Event::SoftBreak => builder.push(DocNode::Text("\n".to_string())),
            Event::HardBreak => builder.push(DocNode::element(ElementKind::HardBreak)),
            Event::Rule => builder.push(DocNode::element(ElementKind::Rule)),
            Event::FootnoteReference(label) => {
                builder.push(DocNode::element(ElementKind::FootnoteReference {
                    label: label.into_string(),
                }))
            }
            Event::TaskListMarker(checked) => {
                builder.push(DocNode::element(ElementKind::TaskMarker { checked }))
            }
        }
    }
    builder.finish()
}

struct TreeBuilder {
    stack: Vec<DocNode>,
    aligns: Vec<Align>,
    cell: usize,
    in_head: bool,
    used_ids: HashMap<String, usize>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![DocNode::element(ElementKind::Document)],
            aligns: Vec::new(),
            cell: 0,
            in_head: false,
            used_ids: HashMap::new(),
        }
    }

    fn kind_for(&mut self, tag: Tag<'_>) -> ElementKind {
        match tag {
            Tag::Paragraph => ElementKind::Paragraph,
            Tag::Heading { level, id, .. } => ElementKind::Heading {
                level: heading_level(level),
                id: id.map(|id| id.into_string()),
            },
            Tag::BlockQuote(_) => ElementKind::BlockQuote,
            Tag::CodeBlock(kind) => ElementKind::CodeBlock {
                lang: match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .filter(|lang| !lang.is_empty())
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                },
            },
            Tag::HtmlBlock => ElementKind::Html,
            Tag::List(start) => ElementKind::List {
                ordered: start.is_some(),
                start,
            },
            Tag::Item => ElementKind::ListItem,
            Tag::FootnoteDefinition(label) => ElementKind::FootnoteDefinition {
                label: label.into_string(),
            },
            Tag::Table(aligns) => {
                self.aligns = aligns.into_iter().map(align).collect();
                ElementKind::Table
            }
            Tag::TableHead => {
                self.in_head = true;
                self.cell = 0;
                ElementKind::TableHead
            }
            Tag::TableRow => {
                self.cell = 0;
                ElementKind::TableRow
            }
            Tag::TableCell => {
                let align = self.aligns.get(self.cell).copied().unwrap_or(Align::None);
                self.cell += 1;
                ElementKind::TableCell {
                    align,
                    header: self.in_head,
                }
            }
            Tag::Emphasis => ElementKind::Emphasis,
            Tag::Strong => ElementKind::Strong,
            Tag::Strikethrough => ElementKind::Strikethrough,
            Tag::Link {
                dest_url, title, ..
            } => ElementKind::Link {
                href: dest_url.into_string(),
                title: title.into_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => ElementKind::Image {
                src: dest_url.into_string(),
                title: title.into_string(),
            },
            // Extensions not enabled above; keep their text as a plain block
            _ => ElementKind::Paragraph,
        }
    }

    fn open(&mut self, kind: ElementKind) {
        self.stack.push(DocNode::element(kind));
    }

    fn push(&mut self, node: DocNode) {
        if let Some(DocNode::Element { children, .. }) = self.stack.last_mut() {
            children.push(node);
        }
    }

    fn close(&mut self, end: TagEnd) {
        // The document root is never closed by an event
        if self.stack.len() < 2 {
            return;
        }
        let Some(mut node) = self.stack.pop() else {
            return;
        };
        match end {
            TagEnd::TableHead => self.in_head = false,
            TagEnd::Table => group_table_body(&mut node),
            TagEnd::Heading(_) => self.assign_heading_id(&mut node),
            _ => {}
        }
        self.push(node);
    }

    /// Explicit `{#id}` wins; otherwise slugify the text, deduplicating
    fn assign_heading_id(&mut self, node: &mut DocNode) {
        let text = node.text_content();
        if let DocNode::Element {
            kind: ElementKind::Heading { id, .. },
            ..
        } = node
        {
            let base = match id.take() {
                Some(explicit) => explicit,
                None => slug::slugify(&text),
            };
            if base.is_empty() {
                return;
            }
            // suffixes skip ids already taken, including natural ones
            let mut suffix = self.used_ids.get(&base).copied().unwrap_or(0);
            let mut candidate = base.clone();
            while self.used_ids.contains_key(&candidate) {
                suffix = suffix.max(1);
                candidate = format!("{}-{}", base, suffix);
                suffix += 1;
            }
            self.used_ids.insert(base, suffix);
            self.used_ids.entry(candidate.clone()).or_insert(0);
            *id = Some(candidate);
        }
    }

    fn finish(mut self) -> DocNode {
        while self.stack.len() > 1 {
            if let Some(node) = self.stack.pop() {
                self.push(node);
            }
        }
        self.stack
            .pop()
            .unwrap_or_else(|| DocNode::element(ElementKind::Document))
    }
}

/// Body rows arrive as siblings of the head; gather them under one body node
fn group_table_body(table: &mut DocNode) {
    if let DocNode::Element { children, .. } = table {
        let (head, rows): (Vec<DocNode>, Vec<DocNode>) = std::mem::take(children)
            .into_iter()
            .partition(|child| child.kind() == Some(&ElementKind::TableHead));
        children.extend(head);
        if !rows.is_empty() {
            children.push(DocNode::Element {
                kind: ElementKind::TableBody,
                children: rows,
            });
        }
    }
}

/// Collect headings in document order
fn outline(tree: &DocNode) -> Vec<HeadingRef> {
    let mut headings = Vec::new();
    collect_headings(tree, &mut headings);
    headings
}

fn collect_headings(node: &DocNode, out: &mut Vec<HeadingRef>) {
    if let Some(ElementKind::Heading { level, id }) = node.kind() {
        out.push(HeadingRef {
            level: *level,
            text: node.text_content(),
            id: id.clone().unwrap_or_default(),
        });
        return;
    }
    for child in node.children() {
        collect_headings(child, out);
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn align(alignment: Alignment) -> Align {
    match alignment {
        Alignment::None => Align::None,
        Alignment::Left => Align::Left,
        Alignment::Center => Align::Center,
        Alignment::Right => Align::Right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::from_config(&HighlightConfig {
            enable: false,
            ..HighlightConfig::default()
        })
    }

    #[test]
    fn test_title_heading_and_emphasis() {
        let doc = renderer().render("# Title\n\nSome *text*.").unwrap();
        assert_eq!(doc.title.as_deref(), Some("Title"));

        let blocks = doc.tree.child_nodes();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].tag(), Some("h1"));
        assert!(blocks[0].has_class("md-h1"));
        assert_eq!(blocks[0].text_content(), "Title");
        assert_eq!(blocks[1].tag(), Some("p"));
        let em = blocks[1].find("em").unwrap();
        assert_eq!(em.text_content(), "text");
    }

    #[test]
    fn test_render_is_deterministic() {
        let md = "# Hooks\n\n| Hook | Use |\n|:-----|----:|\n| useState | state |\n| useRef | refs |\n\n```js\nconst x = 1;\n```\n";
        let r = MarkdownRenderer::new();
        let a = r.render(md).unwrap();
        let b = r.render(md).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_html(), b.to_html());
    }

    #[test]
    fn test_table_structure() {
        let md = "| a | b |\n|---|:-:|\n| 1 | 2 |\n| 3 | 4 |\n| 5 | 6 |\n";
        let doc = renderer().render(md).unwrap();
        let table = doc.tree.find("table").unwrap();
        assert!(table.find("thead").unwrap().find("th").is_some());
        let body = table.find("tbody").unwrap();
        let rows = body.child_nodes();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].has_class("md-row-striped"));
        let mut cells = Vec::new();
        body.find_all("td", &mut cells);
        assert_eq!(cells[1].get_attr("style"), Some("text-align:center"));
    }

    #[test]
    fn test_code_block_language() {
        let doc = renderer()
            .render("```jsx title=\"App\"\n<App />\n```\n")
            .unwrap();
        let pre = doc.tree.find("pre").unwrap();
        assert_eq!(pre.get_attr("data-lang"), Some("jsx"));
        assert_eq!(pre.text_content(), "<App />\n");
    }

    #[test]
    fn test_heading_ids_are_unique() {
        let doc = renderer()
            .render("## Example\n\n## Example\n\n## Custom {#mine}\n")
            .unwrap();
        let ids: Vec<_> = doc.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["example", "example-1", "mine"]);
        assert!(doc.title.is_none());
    }

    #[test]
    fn test_heading_suffix_skips_natural_slugs() {
        let doc = renderer()
            .render("## Example\n\n## Example\n\n## Example 1\n\n## Example\n")
            .unwrap();
        let ids: Vec<_> = doc.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["example", "example-1", "example-1-1", "example-2"]);

        let doc = renderer()
            .render("## Example 1\n\n## Example\n\n## Example\n")
            .unwrap();
        let ids: Vec<_> = doc.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["example-1", "example", "example-2"]);
    }

    #[test]
    fn test_frontmatter_title_wins() {
        let doc = renderer()
            .render("---\ntitle: useEffect Guide\ntags: hooks\n---\n# Effects\n")
            .unwrap();
        assert_eq!(doc.title.as_deref(), Some("useEffect Guide"));
        assert_eq!(doc.tags, vec!["hooks"]);
        assert_eq!(doc.headings.len(), 1);
    }

    #[test]
    fn test_bad_frontmatter_is_runtime_error() {
        let err = renderer().render("---\ntitle: [oops\n---\nbody").unwrap_err();
        assert!(!err.is_load());
        assert!(err.to_string().starts_with("invalid front-matter"));
    }

    #[test]
    fn test_lists_tasks_and_quotes() {
        let md = "> note\n\n3. three\n4. four\n\n- [x] done\n- [ ] todo\n";
        let doc = renderer().render(md).unwrap();
        assert!(doc.tree.find("blockquote").unwrap().has_class("md-blockquote"));
        assert_eq!(doc.tree.find("ol").unwrap().get_attr("start"), Some("3"));
        let mut boxes = Vec::new();
        doc.tree.find_all("input", &mut boxes);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].get_attr("checked"), Some("checked"));
        assert_eq!(boxes[1].get_attr("checked"), None);
    }

    #[test]
    fn test_inline_code_and_links() {
        let doc = renderer()
            .render("Use `useState` from [React](https://react.dev).")
            .unwrap();
        let html = doc.to_html();
        assert!(html.contains(r#"<code class="md-code-inline">useState</code>"#));
        assert!(html.contains(r#"class="md-link""#));
        assert!(html.contains(r#"target="_blank""#));
    }

    #[test]
    fn test_footnotes() {
        let doc = renderer()
            .render("Hooks rule[^1].\n\n[^1]: Only call at top level.\n")
            .unwrap();
        let html = doc.to_html();
        assert!(html.contains(r##"href="#fn-1""##));
        assert!(html.contains(r#"id="fn-1""#));
    }
}
