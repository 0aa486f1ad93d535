//! Scanner configuration: built-in exclusion rules, optionally overridden
//! from a TOML file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const EXCLUDED_DIRS: &[&str] = &[
    ".git", ".github", ".gitlab", ".svn", ".hg", "__pycache__", ".mypy_cache", ".pytest_cache",
    ".idea", ".vscode", "node_modules", "dist", "build", "out", ".next", ".nuxt", ".expo",
    ".parcel-cache", ".sass-cache", ".cache", "coverage", "target", "bin", "obj", ".gradle",
    ".terraform", ".serverless",
];

const EXCLUDED_FILES: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

const EXCLUDED_SUFFIXES: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".svg", ".ico", ".icns", // images
    ".jar", ".war", ".ear", ".class", ".pyc", ".pyo", // build outputs
    ".zip", ".tar", ".gz", ".tgz", ".bz2", ".xz", // archives
    ".log", ".tmp", ".swp", ".swo", // logs, temp files
    ".lock",
];

const ALLOWED_HIDDEN: &[&str] = &[".gitignore", ".env.example", ".env.sample"];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Directory names never descended into.
    pub excluded_dirs: Vec<String>,
    /// Exact file names skipped.
    pub excluded_files: Vec<String>,
    /// File suffixes (with the leading dot) skipped.
    pub excluded_suffixes: Vec<String>,
    /// Dot-prefixed names that are still listed.
    pub allowed_hidden: Vec<String>,
    pub respect_gitignore: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            excluded_dirs: owned(EXCLUDED_DIRS),
            excluded_files: owned(EXCLUDED_FILES),
            excluded_suffixes: owned(EXCLUDED_SUFFIXES),
            allowed_hidden: owned(ALLOWED_HIDDEN),
            respect_gitignore: true,
        }
    }
}

impl ScanConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(ScanConfig::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed reading config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed parsing config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn is_hidden_allowed(&self, name: &str) -> bool {
        !name.starts_with('.') || self.allowed_hidden.iter().any(|a| a == name)
    }

    pub fn is_dir_excluded(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|d| d == name)
    }

    pub fn is_file_excluded(&self, name: &str, suffix: &str) -> bool {
        self.excluded_files.iter().any(|f| f == name)
            || (!suffix.is_empty() && self.excluded_suffixes.iter().any(|s| s == suffix))
    }
}
