//! Helper functions for page chrome
//!
//! URL generation and HTML escaping shared by the viewer, the catalog
//! pages and the static export.

mod html;
mod url;

pub use html::*;
pub use url::*;
