//! Extraction engine module
//!
//! File-level entry points (token dump, interface extraction) and the
//! directory scanner that extracts every matching source under a root.

use crate::config::{ExtractConfig, IgnoreFilter, ScanConfig};
use crate::interface::{extract_with_config, InterfaceError};
use crate::lexer::{LexError, Tokenizer};
use crate::models::{
    FileFailure, FileInterface, Interface, InterfaceMap, ScanMetadata, ScanStats, TokenRecord,
};
use crate::reader::BufferedReader;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use walkdir::WalkDir;

/// Scanner errors
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),

    #[error("Tokenizer error: {0}")]
    LexError(#[from] LexError),

    #[error("Interface error: {0}")]
    InterfaceError(#[from] InterfaceError),

    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),
}

/// Extract the public interface of a single file.
///
/// The file is opened for the duration of the call and closed on both
/// success and failure.
pub fn extract_file(path: &Path, config: &ExtractConfig) -> Result<Interface, ScanError> {
    config.validate()?;

    let mut reader = BufferedReader::open_with_capacity(path, config.read_buffer_size)?;
    let result = extract_with_config(&mut reader, config);
    reader.close();

    let interface = result?;
    tracing::debug!(
        path = %path.display(),
        lines = interface.lines,
        "extracted interface"
    );
    Ok(interface)
}

/// Tokenize a single file, ending with the `EndOfFile` token
pub fn tokenize_file(path: &Path, config: &ExtractConfig) -> Result<Vec<TokenRecord>, ScanError> {
    let mut tokens = Vec::new();
    visit_tokens(path, config, |record| tokens.push(record))?;
    Ok(tokens)
}

/// Hand every token of a file to `visit` as soon as it is read.
///
/// Tokens preceding a lexing failure have already been visited when the
/// error is returned. Returns the number of tokens visited.
pub fn visit_tokens<F>(path: &Path, config: &ExtractConfig, mut visit: F) -> Result<usize, ScanError>
where
    F: FnMut(TokenRecord),
{
    config.validate()?;

    let mut reader = BufferedReader::open_with_capacity(path, config.read_buffer_size)?;
    let mut count = 0usize;
    let mut result: Result<(), LexError> = Ok(());
    for tok in Tokenizer::new(&mut reader) {
        match tok {
            Ok(tok) => {
                visit(TokenRecord::from(&tok));
                count += 1;
            }
            Err(err) => {
                result = Err(err);
                break;
            }
        }
    }
    reader.close();

    result?;
    tracing::debug!(path = %path.display(), tokens = count, "tokenized file");
    Ok(count)
}

/// Directory scanner extracting interfaces from every matching file
pub struct InterfaceScanner {
    config: ScanConfig,
    ignore_filter: IgnoreFilter,
}

impl InterfaceScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        config.extract.validate()?;
        let ignore_filter = IgnoreFilter::new(&config)?;
        Ok(Self {
            config,
            ignore_filter,
        })
    }

    /// Scan the configured directory and return the interface map
    pub fn scan(&self) -> Result<InterfaceMap, ScanError> {
        let start = Instant::now();

        let source_files = self.find_source_files()?;
        tracing::info!(
            root = %self.config.root.display(),
            files = source_files.len(),
            "scanning sources"
        );

        let results: Vec<Result<FileInterface, FileFailure>> = if self.config.threads == 1 {
            source_files.iter().map(|path| self.extract(path)).collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .build()
                .map_err(|e| ScanError::ThreadPoolError(e.to_string()))?;

            pool.install(|| source_files.par_iter().map(|path| self.extract(path)).collect())
        };

        let mut files = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(file) => files.push(file),
                Err(failure) => failures.push(failure),
            }
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));
        failures.sort_by(|a, b| a.path.cmp(&b.path));

        let stats = Self::calculate_stats(&files, &failures);

        let duration = start.elapsed();
        let processed = files.len() + failures.len();
        let metadata = ScanMetadata {
            scan_duration_ms: duration.as_millis() as u64,
            files_per_second: if duration.as_secs_f64() > 0.0 {
                processed as f64 / duration.as_secs_f64()
            } else {
                processed as f64
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        };

        Ok(InterfaceMap {
            root: self.config.root.clone(),
            files,
            failures,
            stats,
            metadata,
        })
    }

    /// Find all source files matching the configuration
    fn find_source_files(&self) -> Result<Vec<PathBuf>, ScanError> {
        if !self.config.root.exists() {
            return Err(ScanError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Path does not exist: {}", self.config.root.display()),
            )));
        }

        let mut files = Vec::new();

        let walker = WalkDir::new(&self.config.root)
            .follow_links(self.config.follow_symlinks)
            .into_iter()
            .filter_entry(|e| {
                // The root itself is never filtered
                if e.depth() > 0 && e.file_type().is_dir() {
                    return !self.ignore_filter.should_ignore(e.path(), true);
                }
                true
            });

        for entry in walker.filter_map(|e| e.ok()) {
            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();

            if entry.depth() > 0 && self.ignore_filter.should_ignore(path, false) {
                continue;
            }

            if !self.ignore_filter.matches_extension(path) {
                continue;
            }

            if let Ok(metadata) = entry.metadata() {
                if metadata.len() > self.config.max_file_size as u64 {
                    tracing::debug!(path = %path.display(), size = metadata.len(), "skipping large file");
                    continue;
                }
            }

            files.push(path.to_path_buf());
        }

        Ok(files)
    }

    /// Extract one file, turning errors into a failure record
    fn extract(&self, path: &Path) -> Result<FileInterface, FileFailure> {
        let relative_path = match path.strip_prefix(&self.config.root) {
            // The root is the file itself
            Ok(rel) if rel.as_os_str().is_empty() => path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| path.to_path_buf()),
            Ok(rel) => rel.to_path_buf(),
            Err(_) => path.to_path_buf(),
        };

        let interface = extract_file(path, &self.config.extract).map_err(|err| {
            tracing::warn!(path = %path.display(), error = %err, "extraction failed");
            FileFailure {
                path: relative_path.clone(),
                message: err.to_string(),
            }
        })?;

        let size_bytes = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let absolute_path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        Ok(FileInterface {
            path: relative_path,
            absolute_path,
            size_bytes,
            interface,
        })
    }

    /// Calculate scan statistics
    fn calculate_stats(files: &[FileInterface], failures: &[FileFailure]) -> ScanStats {
        ScanStats {
            total_files: files.len(),
            failed_files: failures.len(),
            files_with_public_api: files.iter().filter(|f| !f.interface.is_empty()).count(),
            total_lines: files.iter().map(|f| f.interface.lines).sum(),
            total_bytes: files.iter().map(|f| f.size_bytes).sum(),
        }
    }
}
