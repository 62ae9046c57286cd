//! Syntax highlighting for fenced code blocks

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::ViewNode;

/// Turns code into coloured span nodes
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    line_numbers: bool,
}

impl Highlighter {
    /// Create a highlighter using one of syntect's bundled themes
    pub fn new(theme_name: &str, line_numbers: bool) -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .remove(theme_name)
            .or_else(|| {
                tracing::warn!("Unknown highlight theme {:?}, using default", theme_name);
                theme_set.themes.remove("base16-ocean.dark")
            })
            .unwrap_or_default();

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            line_numbers,
        }
    }

    /// Highlight `code`, falling back to plain text when the grammar fails
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> Vec<ViewNode> {
        let lang = lang.unwrap_or("text");
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut lines = Vec::new();
        for line in LinesWithEndings::from(code) {
            let ranges = match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => ranges,
                Err(e) => {
                    tracing::debug!("Highlighting {} failed: {}", lang, e);
                    return plain_lines(code, self.line_numbers);
                }
            };
            let spans = ranges
                .into_iter()
                .map(|(style, text)| {
                    let fg = style.foreground;
                    ViewNode::new("span")
                        .attr("style", format!("color:#{:02x}{:02x}{:02x}", fg.r, fg.g, fg.b))
                        .child(ViewNode::text(text))
                })
                .collect();
            lines.push(spans);
        }

        number_lines(lines, self.line_numbers)
    }
}

/// Unhighlighted code, still split per line when numbering
pub fn plain_lines(code: &str, line_numbers: bool) -> Vec<ViewNode> {
    if !line_numbers {
        return vec![ViewNode::text(code)];
    }
    let lines = LinesWithEndings::from(code)
        .map(|line| vec![ViewNode::text(line)])
        .collect();
    number_lines(lines, true)
}

fn number_lines(lines: Vec<Vec<ViewNode>>, line_numbers: bool) -> Vec<ViewNode> {
    if !line_numbers {
        return lines.into_iter().flatten().collect();
    }
    lines
        .into_iter()
        .enumerate()
        .map(|(i, spans)| {
            ViewNode::new("span")
                .class("code-line")
                .attr("data-line", (i + 1).to_string())
                .children(spans)
        })
        .collect()
}
