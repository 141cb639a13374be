//! Remote sync client.
//!
//! Durably persists the portfolio document to a remote JSON blob through a
//! token-authenticated contents API. Saves are totally ordered: one async
//! mutex serializes callers FIFO, a cooldown window paces the start of
//! consecutive remote calls, throttling is absorbed by bounded waits
//! computed from provider hints, and transient failures retry with
//! exponential backoff. Updates carry the revision marker fetched at the
//! start of the attempt so a stale write surfaces as a conflict instead of
//! silently overwriting.

pub mod api;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::document::PortfolioDocument;
use crate::error::{Error, Result};
use crate::transfer;

use api::{ApiResult, ContentsApi, FileUpdate, GitHubContentsApi, RemoteFile, Revision};

/// Pacing and retry settings for the sync client.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Minimum gap between the start of consecutive remote calls.
    pub cooldown: Duration,
    /// Base delay for exponential backoff.
    pub backoff_base: Duration,
    /// Upper bound on any single wait.
    pub max_wait: Duration,
    /// Retry ceiling for transient failures.
    pub max_transient_retries: u32,
    /// Maximum rate-limit waits before surfacing the failure.
    pub max_rate_limit_waits: u32,
}

impl From<&Config> for SyncSettings {
    fn from(config: &Config) -> Self {
        Self {
            cooldown: config.cooldown(),
            backoff_base: config.backoff_base(),
            max_wait: config.max_wait(),
            max_transient_retries: config.sync.max_transient_retries,
            max_rate_limit_waits: config.sync.max_rate_limit_waits,
        }
    }
}

/// Confirmation of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    /// Revision marker of the newly written remote file.
    pub revision: Revision,
}

/// Pacing state shared by all callers; guarded by the in-flight lock.
#[derive(Debug, Default)]
struct Gate {
    /// Start time of the most recent remote call.
    last_attempt: Option<Instant>,
}

/// States of one save attempt.
///
/// Transitions are driven only by response classification; there are no
/// hidden attempt-number branches outside the state payloads.
#[derive(Debug)]
enum SaveState {
    /// Fetching the current remote revision marker.
    Fetching { attempt: u32 },
    /// Sleeping out a throttling signal, then resuming the same step.
    Throttled { wait: Duration, resume: Box<SaveState> },
    /// Submitting the update with the previously fetched marker.
    Updating {
        revision: Option<Revision>,
        attempt: u32,
    },
    /// Terminal: the update was committed.
    Succeeded(Revision),
    /// Terminal: the save failed.
    Failed(Error),
}

/// Token-authenticated remote persistence with request serialization.
///
/// Constructed once per process; cheap to share behind an `Arc`. At most
/// one save is actively talking to the remote endpoint at a time; the rest
/// queue on the in-flight lock in FIFO order.
pub struct SyncClient {
    api: Arc<dyn ContentsApi>,
    settings: SyncSettings,
    gate: Mutex<Gate>,
}

impl std::fmt::Debug for SyncClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncClient")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SyncClient {
    /// Build a client against the configured GitHub repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        let api = GitHubContentsApi::new(&config.remote)?;
        Ok(Self::with_api(Arc::new(api), SyncSettings::from(config)))
    }

    /// Build a client over an arbitrary contents API (used by tests).
    #[must_use]
    pub fn with_api(api: Arc<dyn ContentsApi>, settings: SyncSettings) -> Self {
        Self {
            api,
            settings,
            gate: Mutex::new(Gate::default()),
        }
    }

    /// Fetch the current remote file, if it exists.
    ///
    /// A single paced attempt with no retries; bootstrap falls back to the
    /// local cache on any failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the call fails.
    pub async fn fetch(&self, token: &str) -> Result<Option<RemoteFile>> {
        if token.is_empty() {
            return Err(Error::TokenMissing);
        }
        let mut gate = self.gate.lock().await;
        self.pace(&mut gate).await;

        match self.api.get_file(token).await? {
            ApiResult::Success(file) => Ok(Some(file)),
            ApiResult::NotFound => Ok(None),
            ApiResult::Unauthorized { message } => Err(Error::auth(message)),
            ApiResult::Conflict { message } => Err(Error::conflict(message)),
            ApiResult::RateLimited { .. } => Err(Error::RateLimited { waits: 0 }),
            ApiResult::ServerError { status, message } => {
                Err(Error::network(format!("HTTP {status}: {message}")))
            }
        }
    }

    /// Persist the document to the remote file.
    ///
    /// Serializes the document, fetches the current revision marker
    /// (treating an absent file as a valid initial state), and submits the
    /// update bound to that marker. The in-flight lock is held for the
    /// whole pipeline and released on every exit path, so a failed save
    /// never blocks the next queued caller.
    ///
    /// # Errors
    ///
    /// Fails with an auth error if the token is absent or rejected, a
    /// conflict error if the remote changed concurrently, a rate-limit
    /// error once the backoff budget is exhausted, and a network error
    /// after the transient retry ceiling.
    pub async fn save(
        &self,
        document: &PortfolioDocument,
        token: &str,
        message: &str,
    ) -> Result<SaveReceipt> {
        if token.is_empty() {
            return Err(Error::TokenMissing);
        }
        let content = transfer::export_json(document)?;

        let mut gate = self.gate.lock().await;
        let mut waits_used: u32 = 0;
        let mut state = SaveState::Fetching { attempt: 0 };

        loop {
            state = match state {
                SaveState::Fetching { attempt } => {
                    self.pace(&mut gate).await;
                    match self.api.get_file(token).await {
                        Ok(ApiResult::Success(file)) => SaveState::Updating {
                            revision: Some(file.revision),
                            attempt: 0,
                        },
                        // Resource absent is a valid initial state.
                        Ok(ApiResult::NotFound) => SaveState::Updating {
                            revision: None,
                            attempt: 0,
                        },
                        Ok(ApiResult::Unauthorized { message }) => {
                            SaveState::Failed(Error::auth(message))
                        }
                        Ok(ApiResult::Conflict { message }) => {
                            SaveState::Failed(Error::conflict(message))
                        }
                        Ok(ApiResult::RateLimited { wait_hint }) => self.throttle(
                            wait_hint,
                            &mut waits_used,
                            SaveState::Fetching { attempt },
                        ),
                        Ok(ApiResult::ServerError { status, message }) => self.transient(
                            attempt,
                            Error::network(format!("HTTP {status}: {message}")),
                            |attempt| SaveState::Fetching { attempt },
                        ),
                        Err(err) => {
                            self.transient(attempt, err, |attempt| SaveState::Fetching { attempt })
                        }
                    }
                }

                SaveState::Throttled { wait, resume } => {
                    warn!("remote throttled, waiting {wait:?} before retrying");
                    sleep(wait).await;
                    *resume
                }

                SaveState::Updating { revision, attempt } => {
                    self.pace(&mut gate).await;
                    let update = FileUpdate {
                        message: message.to_string(),
                        content: content.clone(),
                        revision: revision.clone(),
                    };
                    match self.api.put_file(token, update).await {
                        Ok(ApiResult::Success(new_revision)) => SaveState::Succeeded(new_revision),
                        Ok(ApiResult::NotFound) => {
                            SaveState::Failed(Error::network("remote path not found on update"))
                        }
                        Ok(ApiResult::Unauthorized { message }) => {
                            SaveState::Failed(Error::auth(message))
                        }
                        Ok(ApiResult::Conflict { message }) => {
                            SaveState::Failed(Error::conflict(message))
                        }
                        Ok(ApiResult::RateLimited { wait_hint }) => self.throttle(
                            wait_hint,
                            &mut waits_used,
                            SaveState::Updating { revision, attempt },
                        ),
                        Ok(ApiResult::ServerError { status, message }) => self.transient(
                            attempt,
                            Error::network(format!("HTTP {status}: {message}")),
                            |attempt| SaveState::Updating {
                                revision: revision.clone(),
                                attempt,
                            },
                        ),
                        Err(err) => self.transient(attempt, err, |attempt| SaveState::Updating {
                            revision: revision.clone(),
                            attempt,
                        }),
                    }
                }

                SaveState::Succeeded(revision) => {
                    info!("saved document to remote, revision {revision}");
                    return Ok(SaveReceipt { revision });
                }

                SaveState::Failed(err) => {
                    debug!("save failed: {err}");
                    return Err(err);
                }
            };
        }
    }

    /// Sleep out the remainder of the cooldown window, then stamp the
    /// start of the next remote call.
    async fn pace(&self, gate: &mut Gate) {
        if let Some(last) = gate.last_attempt {
            let elapsed = last.elapsed();
            if elapsed < self.settings.cooldown {
                let wait = self.settings.cooldown - elapsed;
                debug!("cooldown: waiting {wait:?} before next remote call");
                sleep(wait).await;
            }
        }
        gate.last_attempt = Some(Instant::now());
    }

    /// Classify a throttling signal into the next state.
    ///
    /// Charges one wait against the budget and resumes the same step, or
    /// fails once the budget is spent. The wait comes from the provider
    /// hint, capped by `max_wait`.
    fn throttle(&self, wait_hint: Option<Duration>, waits_used: &mut u32, resume: SaveState) -> SaveState {
        if *waits_used >= self.settings.max_rate_limit_waits {
            return SaveState::Failed(Error::RateLimited {
                waits: *waits_used,
            });
        }
        *waits_used += 1;
        let wait = wait_hint
            .unwrap_or(self.settings.backoff_base)
            .min(self.settings.max_wait);
        SaveState::Throttled {
            wait,
            resume: Box::new(resume),
        }
    }

    /// Classify a transient failure into the next state.
    ///
    /// Retries the same step with exponential backoff until the retry
    /// ceiling, then surfaces the error.
    fn transient(
        &self,
        attempt: u32,
        err: Error,
        next: impl FnOnce(u32) -> SaveState,
    ) -> SaveState {
        if attempt >= self.settings.max_transient_retries {
            return SaveState::Failed(err);
        }
        let backoff = self
            .settings
            .backoff_base
            .saturating_mul(2_u32.saturating_pow(attempt))
            .min(self.settings.max_wait);
        warn!("transient failure ({err}), retrying in {backoff:?}");
        SaveState::Throttled {
            wait: backoff,
            resume: Box::new(next(attempt + 1)),
        }
    }
}
