//! handbook-rs: a React/JavaScript/Node.js learning handbook
//!
//! Markdown documents are fetched by location and rendered through a fixed
//! presentation mapping; interview questions, snippets and hooks live in
//! built-in catalogs with free-text and category search.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod server;
pub mod templates;
pub mod viewer;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use content::{Fetcher, MarkdownRenderer};

/// The main Handbook application
#[derive(Clone)]
pub struct Handbook {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Markdown documents
    pub docs_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Handbook {
    /// Create a new Handbook instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let docs_dir = base_dir.join(&config.docs_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            docs_dir,
            public_dir,
        }
    }

    /// Fetcher for document locations
    pub fn fetcher(&self) -> Result<Fetcher> {
        Ok(Fetcher::new(&self.config, &self.docs_dir)?)
    }

    /// Renderer configured from the highlight settings
    pub fn renderer(&self) -> Arc<MarkdownRenderer> {
        Arc::new(MarkdownRenderer::from_config(&self.config.highlight))
    }

    /// Search policy configured from the search settings
    pub fn search_policy(&self) -> catalog::SearchPolicy {
        catalog::SearchPolicy::from(&self.config.search)
    }

    /// Export every document to the public directory
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
