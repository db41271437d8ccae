//! Configuration module
//!
//! Extraction settings for a single source plus the scan configuration and
//! ignore filtering used when walking a project directory.

use crate::reader::READ_BUF_SIZE;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Settings for extracting the interface of one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Chunk size of the buffered reader
    pub read_buffer_size: usize,

    /// Spaces per nesting level
    pub indent_width: usize,

    /// Ignore regex-literal failures inside skipped bodies
    pub lenient_bodies: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: READ_BUF_SIZE,
            indent_width: 4,
            lenient_bodies: false,
        }
    }
}

impl ExtractConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set reader chunk size (builder pattern)
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Set indentation width (builder pattern)
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set lenient body skipping (builder pattern)
    pub fn with_lenient_bodies(mut self, lenient: bool) -> Self {
        self.lenient_bodies = lenient;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.read_buffer_size == 0 {
            return Err(ConfigError::InvalidConfig(
                "read buffer size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for scanning a directory of sources
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root directory to scan
    pub root: PathBuf,

    /// File extensions to extract (without the dot)
    pub extensions: Vec<String>,

    /// Custom ignore patterns
    pub ignore_patterns: Vec<String>,

    /// Path to custom ignore file
    pub ignore_file: Option<PathBuf>,

    /// Number of threads for parallel processing
    pub threads: usize,

    /// Maximum file size to process (bytes)
    pub max_file_size: usize,

    /// Whether to follow symlinks
    pub follow_symlinks: bool,

    /// Whether to include hidden files
    pub include_hidden: bool,

    /// Per-file extraction settings
    pub extract: ExtractConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extensions: vec!["swift".to_string()],
            ignore_patterns: Vec::new(),
            ignore_file: None,
            threads: num_cpus(),
            max_file_size: 10 * 1024 * 1024, // 10 MB
            follow_symlinks: false,
            include_hidden: false,
            extract: ExtractConfig::default(),
        }
    }
}

impl ScanConfig {
    /// Create new config with root directory
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }

    /// Set extensions (builder pattern)
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Set ignore patterns (builder pattern)
    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Set ignore file path (builder pattern)
    pub fn with_ignore_file(mut self, path: PathBuf) -> Self {
        self.ignore_file = Some(path);
        self
    }

    /// Set number of threads (builder pattern)
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set max file size (builder pattern)
    pub fn with_max_file_size(mut self, size: usize) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set follow symlinks (builder pattern)
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set include hidden files (builder pattern)
    pub fn with_include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Set extraction settings (builder pattern)
    pub fn with_extract(mut self, extract: ExtractConfig) -> Self {
        self.extract = extract;
        self
    }
}

/// Get number of available CPUs
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(4)
}

/// Filter for ignoring files and directories.
///
/// Globs are matched against paths relative to the scan root, so the
/// directories above the root never cause a match.
pub struct IgnoreFilter {
    /// Scan root that walked paths are relative to
    root: PathBuf,

    /// Gitignore rules (root .gitignore plus the configured ignore file)
    gitignore: Option<Gitignore>,

    /// Custom glob patterns
    custom_globs: GlobSet,

    /// Default ignore patterns
    default_ignores: GlobSet,

    /// Whether to include hidden files
    include_hidden: bool,

    /// Accepted extensions
    extensions: Vec<String>,
}

impl IgnoreFilter {
    /// Create a new ignore filter from config
    pub fn new(config: &ScanConfig) -> Result<Self, ConfigError> {
        let gitignore = Self::build_gitignore(&config.root, config.ignore_file.as_deref())?;
        let custom_globs = Self::build_globset(&config.ignore_patterns)?;

        let default_patterns: Vec<String> = [
            "**/.git/**",
            "**/.build/**",
            "**/.swiftpm/**",
            "**/Pods/**",
            "**/Carthage/**",
            "**/DerivedData/**",
            "**/xcuserdata/**",
            "**/fastlane/**",
            "**/node_modules/**",
            "**/target/**",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let default_ignores = Self::build_globset(&default_patterns)?;

        Ok(Self {
            root: config.root.clone(),
            gitignore,
            custom_globs,
            default_ignores,
            include_hidden: config.include_hidden,
            extensions: config.extensions.iter().map(|e| e.to_lowercase()).collect(),
        })
    }

    /// Build gitignore rules from the root directory and an optional extra file
    fn build_gitignore(root: &Path, extra: Option<&Path>) -> Result<Option<Gitignore>, ConfigError> {
        let gitignore_path = root.join(".gitignore");
        let has_root = gitignore_path.exists();
        if !has_root && extra.is_none() {
            return Ok(None);
        }

        let mut builder = GitignoreBuilder::new(root);
        if has_root {
            builder.add(&gitignore_path);
        }
        if let Some(path) = extra {
            if !path.exists() {
                return Err(ConfigError::InvalidConfig(format!(
                    "ignore file not found: {}",
                    path.display()
                )));
            }
            if let Some(err) = builder.add(path) {
                return Err(ConfigError::InvalidConfig(err.to_string()));
            }
        }

        match builder.build() {
            Ok(gi) => Ok(Some(gi)),
            Err(_) => Ok(None), // Ignore gitignore errors
        }
    }

    /// Build a globset from patterns
    fn build_globset(patterns: &[String]) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidGlob(e.to_string()))?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| ConfigError::InvalidGlob(e.to_string()))
    }

    /// Check if a walked path should be ignored
    pub fn should_ignore(&self, path: &Path, is_dir: bool) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let path_str = relative.to_string_lossy();

        if !self.include_hidden {
            if let Some(name) = relative.file_name() {
                let name = name.to_string_lossy();
                if name.starts_with('.') && name != "." && name != ".." {
                    return true;
                }
            }
        }

        if self.default_ignores.is_match(&*path_str) {
            return true;
        }

        if self.custom_globs.is_match(&*path_str) {
            return true;
        }

        if let Some(ref gi) = self.gitignore {
            if gi.matched(path, is_dir).is_ignore() {
                return true;
            }
        }

        false
    }

    /// Check if the path has one of the configured extensions
    pub fn matches_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension() else {
            return false;
        };
        let ext = ext.to_string_lossy().to_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }
}
