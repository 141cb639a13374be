//! Startup document resolution.
//!
//! Applies the load precedence rule exactly once per process: remote
//! persisted copy (when a token is configured and the remote is reachable),
//! then the local cache, then the bundled default. Later refreshes happen
//! only through explicit writes.

use tracing::{debug, info, warn};

use crate::cache::LocalCache;
use crate::document::PortfolioDocument;
use crate::error::Result;
use crate::remote::SyncClient;
use crate::transfer;

/// Resolve the initial document for this process.
///
/// Remote failures of any kind degrade to the next source; only a broken
/// bundled asset is a hard error (a packaging defect).
///
/// # Errors
///
/// Returns an error if every source is unavailable and the embedded
/// default cannot be parsed.
pub async fn resolve_initial_document(
    cache: &LocalCache,
    remote: Option<(&SyncClient, &str)>,
) -> Result<PortfolioDocument> {
    if let Some((sync, token)) = remote {
        match sync.fetch(token).await {
            Ok(Some(file)) => match transfer::import_json(&file.content) {
                Ok(document) => {
                    info!("loaded document from remote, revision {}", file.revision);
                    return Ok(document);
                }
                Err(err) => {
                    warn!("remote document is not parseable ({err}), falling back");
                }
            },
            Ok(None) => {
                debug!("remote file does not exist yet, falling back");
            }
            Err(err) => {
                warn!("remote fetch failed ({err}), falling back");
            }
        }
    }

    if let Some(document) = cache.load() {
        info!("loaded document from local cache");
        return Ok(document);
    }

    debug!("using bundled default document");
    PortfolioDocument::bundled()
}
