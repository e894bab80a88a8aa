//! Background front-page polling.
//!
//! [`PollingController`] runs as one tokio task and owns every piece of
//! polling state: the current subreddit/interval, the next-fetch deadline,
//! the in-flight request and the generation counter.  Successful results are
//! sent to the UI as [`FeedUpdate`]s over an mpsc channel.
//!
//! ```text
//!            prefs (watch)                      FeedUpdate (mpsc)
//!  App ───────────────────────► controller ───────────────────────► App
//!                                 │    ▲
//!                        spawn    │    │ FetchOutcome { generation }
//!                                 ▼    │
//!                              fetch task
//! ```
//!
//! ## Scheduling
//!
//! * On start, and whenever the subreddit or the refresh interval changes,
//!   the pending deadline is dropped, any in-flight request is aborted and a
//!   new fetch starts immediately.
//! * After a fetch settles (success or failure) the next one is due
//!   `interval` seconds later.  There is no faster retry after a failure.
//! * Every fetch gets a fresh generation.  Outcomes carrying any other
//!   generation are stale and dropped, so a superseded request can never
//!   overwrite the list.
//!
//! Theme and view-mode changes wake the controller too; it ignores them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::loading::LoadingSignal;
use crate::prefs::{Preferences, RefreshInterval, Subreddit};
use crate::source::{FeedItem, FeedSource, FetchError};

/// A successful poll, sent from the controller to the UI.
#[derive(Debug, Clone)]
pub struct FeedUpdate {
    /// Generation of the fetch that produced this list.
    pub generation: u64,
    pub subreddit: Subreddit,
    /// The complete new list, in source order.
    pub items: Vec<FeedItem>,
    pub fetched_at: DateTime<Utc>,
}

/// The two preferences that drive scheduling.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PollKey {
    subreddit: Subreddit,
    interval: RefreshInterval,
}

impl PollKey {
    fn of(prefs: &Preferences) -> Self {
        Self {
            subreddit: prefs.subreddit.clone(),
            interval: prefs.refresh_interval,
        }
    }
}

/// Result of one fetch task, tagged with the generation it was started for.
struct FetchOutcome {
    generation: u64,
    subreddit: Subreddit,
    result: Result<Vec<FeedItem>, FetchError>,
}

enum PollState {
    /// Nothing outstanding; the next fetch is due at `next_fetch`.
    Idle { next_fetch: Instant },
    /// Exactly one request in flight.
    Fetching { generation: u64, task: JoinHandle<()> },
}

pub struct PollingController {
    source: Arc<dyn FeedSource>,
    prefs: watch::Receiver<Preferences>,
    loading: LoadingSignal,
    updates: mpsc::UnboundedSender<FeedUpdate>,
    outcomes_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<FetchOutcome>,
    key: PollKey,
    generation: u64,
    state: PollState,
}

impl PollingController {
    pub fn new(
        source: Arc<dyn FeedSource>,
        mut prefs: watch::Receiver<Preferences>,
        loading: LoadingSignal,
        updates: mpsc::UnboundedSender<FeedUpdate>,
    ) -> Self {
        let key = PollKey::of(&prefs.borrow_and_update());
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            source,
            prefs,
            loading,
            updates,
            outcomes_tx,
            outcomes_rx,
            key,
            generation: 0,
            state: PollState::Idle {
                next_fetch: Instant::now(),
            },
        }
    }

    /// Drive the poll loop until the preference store or the update receiver
    /// goes away.
    pub async fn run(mut self) {
        info!(
            source = self.source.name(),
            subreddit = %self.key.subreddit,
            interval = %self.key.interval,
            "poller started"
        );
        self.start_fetch("startup");

        loop {
            let deadline = match &self.state {
                PollState::Idle { next_fetch } => Some(*next_fetch),
                PollState::Fetching { .. } => None,
            };

            tokio::select! {
                changed = self.prefs.changed() => {
                    if changed.is_err() {
                        debug!("preference store dropped, stopping poller");
                        break;
                    }
                    self.on_preferences_changed();
                }
                Some(outcome) = self.outcomes_rx.recv() => {
                    if !self.on_outcome(outcome) {
                        debug!("update receiver closed, stopping poller");
                        break;
                    }
                }
                () = self.updates.closed() => {
                    debug!("update receiver closed, stopping poller");
                    break;
                }
                () = wait_until(deadline) => self.start_fetch("timer"),
            }
        }

        self.cancel_in_flight();
        self.loading.settle();
    }

    fn on_preferences_changed(&mut self) {
        let key = PollKey::of(&self.prefs.borrow_and_update());
        if key == self.key {
            return;
        }
        self.key = key;
        self.start_fetch("preferences changed");
    }

    /// Cancel whatever is pending and fetch the current subreddit now.
    fn start_fetch(&mut self, reason: &'static str) {
        self.cancel_in_flight();

        self.generation += 1;
        let generation = self.generation;
        let subreddit = self.key.subreddit.clone();
        debug!(generation, %subreddit, reason, "fetch started");

        self.loading.begin();

        let source = Arc::clone(&self.source);
        let outcomes = self.outcomes_tx.clone();
        let task = tokio::spawn(async move {
            let result = source.fetch(&subreddit).await;
            // The controller owns the receiver; a send error means it is gone.
            let _ = outcomes.send(FetchOutcome {
                generation,
                subreddit,
                result,
            });
        });

        self.state = PollState::Fetching { generation, task };
    }

    fn cancel_in_flight(&self) {
        if let PollState::Fetching { generation, task } = &self.state {
            debug!(generation = *generation, "in-flight fetch abandoned");
            task.abort();
        }
    }

    /// Settle the current fetch.  Returns `false` once nobody is listening
    /// for updates any more.
    fn on_outcome(&mut self, outcome: FetchOutcome) -> bool {
        let current = matches!(
            self.state,
            PollState::Fetching { generation, .. } if generation == outcome.generation
        );
        if !current {
            debug!(
                generation = outcome.generation,
                current = self.generation,
                "stale fetch result discarded"
            );
            return true;
        }

        let mut listening = true;
        match outcome.result {
            Ok(items) => {
                info!(
                    generation = outcome.generation,
                    subreddit = %outcome.subreddit,
                    count = items.len(),
                    "front page fetched"
                );
                listening = self
                    .updates
                    .send(FeedUpdate {
                        generation: outcome.generation,
                        subreddit: outcome.subreddit,
                        items,
                        fetched_at: Utc::now(),
                    })
                    .is_ok();
            }
            Err(e) => {
                warn!(
                    generation = outcome.generation,
                    subreddit = %outcome.subreddit,
                    kind = ?e.kind(),
                    error = %e,
                    "fetch failed, keeping previous items"
                );
            }
        }

        self.loading.settle();
        self.state = PollState::Idle {
            next_fetch: Instant::now() + self.key.interval.duration(),
        };
        listening
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Spawn the polling task.
///
/// Returns the receiver the UI loop drains for new item lists, and the
/// task handle.  The task stops on its own when `prefs`' store is dropped or
/// the receiver is closed.
pub fn spawn(
    source: Arc<dyn FeedSource>,
    prefs: watch::Receiver<Preferences>,
    loading: LoadingSignal,
) -> (mpsc::UnboundedReceiver<FeedUpdate>, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let controller = PollingController::new(source, prefs, loading, tx);
    let handle = tokio::spawn(controller.run());
    (rx, handle)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
