//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub docs_dir: String,
    pub public_dir: String,

    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "React Handbook".to_string(),
            description: "React, JavaScript and Node.js notes, cheat sheets and interview prep"
                .to_string(),
            author: String::new(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            docs_dir: "docs".to_string(),
            public_dir: "public".to_string(),

            viewer: ViewerConfig::default(),
            highlight: HighlightConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Document viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// URL prefix the docs directory is served under
    pub mount: String,
    /// Resolve relative locations against this URL and fetch over HTTP
    pub base_url: Option<String>,
    /// HTTP request timeout; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            mount: "/docs".to_string(),
            base_url: None,
            timeout_secs: None,
        }
    }
}

/// Code block highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// How multi-field records are matched against a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// At least one field contains the query
    #[default]
    Any,
    /// Every field contains the query
    All,
}

/// Catalog search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub trim_query: bool,
    pub match_mode: MatchMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            trim_query: true,
            match_mode: MatchMode::Any,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "React Handbook");
        assert_eq!(config.docs_dir, "docs");
        assert_eq!(config.viewer.mount, "/docs");
        assert!(config.viewer.timeout_secs.is_none());
        assert!(config.search.trim_query);
        assert_eq!(config.search.match_mode, MatchMode::Any);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Hooks Notes
docs_dir: notes
viewer:
  base_url: http://127.0.0.1:8080
  timeout_secs: 5
search:
  match_mode: all
highlight:
  line_number: true
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Hooks Notes");
        assert_eq!(config.docs_dir, "notes");
        assert_eq!(config.viewer.mount, "/docs");
        assert_eq!(
            config.viewer.base_url.as_deref(),
            Some("http://127.0.0.1:8080")
        );
        assert_eq!(config.viewer.timeout_secs, Some(5));
        assert_eq!(config.search.match_mode, MatchMode::All);
        assert!(config.search.trim_query);
        assert!(config.highlight.line_number);
        assert!(config.highlight.enable);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "title: From Disk\npublic_dir: out\n").unwrap();
        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.title, "From Disk");
        assert_eq!(config.public_dir, "out");
    }
}
