//! Device-local document cache.
//!
//! A best-effort, single-slot mirror of the portfolio document so the tool
//! stays usable offline or without a configured remote. Caching is an
//! optimization, not a guarantee: a corrupt cache reads as a miss, and a
//! failed write is logged and swallowed.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::document::PortfolioDocument;

/// Single-slot JSON file cache for the portfolio document.
#[derive(Debug)]
pub struct LocalCache {
    /// Path to the cache file.
    path: PathBuf,
}

impl LocalCache {
    /// Create a cache backed by the given file path.
    ///
    /// The file (and its parent directories) are created lazily on the
    /// first [`store`](Self::store).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the path to the cache file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the last cached document.
    ///
    /// Returns `None` if the cache was never written or cannot be read or
    /// parsed; a corrupt entry is a cache miss, not an error.
    #[must_use]
    pub fn load(&self) -> Option<PortfolioDocument> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("failed to read cache at {}: {err}", self.path.display());
                }
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(document) => {
                debug!("loaded cached document from {}", self.path.display());
                Some(document)
            }
            Err(err) => {
                warn!(
                    "cache at {} is corrupt, treating as miss: {err}",
                    self.path.display()
                );
                None
            }
        }
    }

    /// Persist the document to the cache slot.
    ///
    /// Failures are logged and swallowed; callers never observe them.
    pub fn store(&self, document: &PortfolioDocument) {
        if let Err(err) = self.try_store(document) {
            warn!("failed to write cache at {}: {err}", self.path.display());
        }
    }

    fn try_store(&self, document: &PortfolioDocument) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(document)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        std::fs::write(&self.path, json)?;
        debug!("cached document to {}", self.path.display());
        Ok(())
    }
}
