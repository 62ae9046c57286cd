//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Handbook;

/// Remove the exported site
pub fn run(handbook: &Handbook) -> Result<()> {
    if handbook.public_dir.exists() {
        fs::remove_dir_all(&handbook.public_dir)?;
        tracing::info!("Deleted: {:?}", handbook.public_dir);
    }
    Ok(())
}
