//! Content module - fetching documents and rendering markdown

mod error;
pub mod fetcher;
mod frontmatter;
mod highlight;
pub mod loader;
mod markdown;
pub mod presentation;
pub mod tree;

pub use error::{DocumentError, LOAD_FAILED_MESSAGE};
pub use fetcher::{DocumentSource, Fetcher, FileSource, HttpSource};
pub use frontmatter::FrontMatter;
pub use highlight::Highlighter;
pub use markdown::{parse, HeadingRef, MarkdownRenderer, RenderedDocument};
pub use tree::{DocNode, ElementKind, ViewNode};
