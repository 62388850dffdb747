use std::path::Path;

use anyhow::{anyhow, Result};

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a candidate datastore file path
    pub fn validate_datastore_path(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(anyhow!("datastore path does not exist: {path:?}"));
        }

        if !path.is_file() {
            return Err(anyhow!("datastore path is not a file: {path:?}"));
        }

        Ok(())
    }

    /// Validate an output directory path
    pub fn validate_output_dir(path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();
        if path_str.is_empty() {
            return Err(anyhow!("output directory cannot be empty"));
        }

        // Check for path traversal attempts
        if path_str.contains("..") || path_str.contains('~') {
            return Err(anyhow!(
                "output directory contains potentially dangerous characters"
            ));
        }

        if path_str.len() > 4096 {
            return Err(anyhow!("output directory path too long (max 4096 characters)"));
        }

        Ok(())
    }

    /// Validate the top-K ranking size
    pub fn validate_top_k(top_k: usize) -> Result<()> {
        if top_k == 0 {
            return Err(anyhow!("top-k must be greater than 0"));
        }

        if top_k > 1000 {
            return Err(anyhow!("top-k too large (max 1000)"));
        }

        Ok(())
    }

    /// Validate a snapshot file path for the report/stats consumers
    pub fn validate_snapshot_path(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(anyhow!("snapshot does not exist: {path:?}"));
        }

        if !path.is_file() {
            return Err(anyhow!("snapshot path is not a file: {path:?}"));
        }

        Ok(())
    }

    /// Sanitize text destined for the terminal
    #[must_use]
    pub fn sanitize_text(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect::<String>()
            .trim()
            .to_string()
    }
}
