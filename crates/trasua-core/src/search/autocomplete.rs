// ── Autocomplete search controller ──
//
// Turns keystrokes into at most one search per quiet period. Each
// controller instance owns its debounce task, cancellation token, cache
// and generation counter, so two address fields on one screen never
// clobber each other's pending requests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::cache::{SuggestionCache, normalize_query};
use super::dropdown::{OutsideClickTracker, PointerRegion};
use crate::backend::AddressBackend;
use crate::config::PipelineConfig;
use crate::error::CoreError;
use crate::model::PlaceSuggestion;

// ── Published state ──────────────────────────────────────────────

/// What the dropdown should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    /// Nothing searched for the current query (too short, or awaiting results).
    #[default]
    Idle,
    /// Results available.
    Results,
    /// The search succeeded with zero hits; the dropdown shows "no suggestions found".
    Empty,
}

/// Snapshot of the autocomplete field, published on every change.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionState {
    pub query: String,
    pub suggestions: Vec<PlaceSuggestion>,
    pub open: bool,
    pub status: SuggestionStatus,
}

impl SuggestionState {
    fn with_results(query: String, suggestions: Vec<PlaceSuggestion>) -> Self {
        let status = if suggestions.is_empty() {
            SuggestionStatus::Empty
        } else {
            SuggestionStatus::Results
        };
        Self {
            query,
            suggestions,
            open: true,
            status,
        }
    }
}

// ── Controller ───────────────────────────────────────────────────

/// Debounced, cancellable, cached place search for one input field.
///
/// Methods that schedule work (`input`) must be called from inside a
/// Tokio runtime. Dropping the controller cancels everything in flight
/// and clears its cache.
pub struct AutocompleteController<B: AddressBackend> {
    shared: Arc<Shared<B>>,
    debounce: Duration,
    min_query_chars: usize,
    pending: Mutex<Pending>,
    outside: Mutex<OutsideClickTracker>,
}

struct Shared<B> {
    backend: Arc<B>,
    cache: Mutex<SuggestionCache>,
    state: watch::Sender<SuggestionState>,
    /// Bumped on every keystroke; results from older generations are dropped.
    generation: AtomicU64,
}

#[derive(Default)]
struct Pending {
    token: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<B: AddressBackend> AutocompleteController<B> {
    pub fn new(backend: Arc<B>, config: &PipelineConfig) -> Self {
        let (state, _) = watch::channel(SuggestionState::default());
        Self {
            shared: Arc::new(Shared {
                backend,
                cache: Mutex::new(SuggestionCache::new(config.cache_capacity)),
                state,
                generation: AtomicU64::new(0),
            }),
            debounce: config.search_debounce,
            min_query_chars: config.min_query_chars,
            pending: Mutex::new(Pending::default()),
            outside: Mutex::new(OutsideClickTracker::new()),
        }
    }

    // ── Observation ──────────────────────────────────────────────

    /// Current snapshot.
    pub fn state(&self) -> SuggestionState {
        self.shared.state.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.shared.state.subscribe()
    }

    /// Number of cached queries.
    pub fn cache_len(&self) -> usize {
        lock(&self.shared.cache).len()
    }

    // ── Keystrokes ───────────────────────────────────────────────

    /// Feed the raw text of the input field after a keystroke.
    ///
    /// Cancels whatever the previous keystroke scheduled. Short queries
    /// close the dropdown; cached queries answer synchronously; anything
    /// else is searched once the debounce window passes without input.
    pub fn input(&self, raw: &str) {
        self.cancel_pending();
        let generation = self.shared.next_generation();

        if !self.is_searchable(raw) {
            self.shared.state.send_replace(SuggestionState {
                query: raw.to_owned(),
                ..SuggestionState::default()
            });
            return;
        }

        let key = normalize_query(raw);
        let cached = lock(&self.shared.cache).get(&key).map(<[_]>::to_vec);
        if let Some(suggestions) = cached {
            trace!(query = %key, hits = suggestions.len(), "suggestion cache hit");
            self.shared
                .state
                .send_replace(SuggestionState::with_results(raw.to_owned(), suggestions));
            return;
        }

        // Results for the previous query no longer describe the field.
        self.shared.state.send_replace(SuggestionState {
            query: raw.to_owned(),
            ..SuggestionState::default()
        });

        let token = CancellationToken::new();
        let task_token = token.clone();
        let shared = Arc::clone(&self.shared);
        let delay = self.debounce;
        let query = raw.to_owned();

        let task = tokio::spawn(async move {
            tokio::select! {
                biased;
                () = task_token.cancelled() => return,
                () = tokio::time::sleep(delay) => {}
            }
            shared.run_search(query, key, generation, &task_token).await;
        });

        let mut pending = lock(&self.pending);
        pending.token = Some(token);
        pending.task = Some(task);
    }

    /// Search immediately, bypassing the debounce window.
    ///
    /// Still consults and fills the cache, and still supersedes anything
    /// pending. Unlike `input`, failures are returned to the caller.
    pub async fn search(&self, raw: &str) -> Result<Vec<PlaceSuggestion>, CoreError> {
        self.cancel_pending();
        let generation = self.shared.next_generation();

        if !self.is_searchable(raw) {
            return Err(CoreError::ValidationEmpty {
                message: format!(
                    "Type at least {} characters to search",
                    self.min_query_chars
                ),
            });
        }

        let key = normalize_query(raw);
        let cached = lock(&self.shared.cache).get(&key).map(<[_]>::to_vec);
        let suggestions = if let Some(hit) = cached {
            hit
        } else {
            let token = CancellationToken::new();
            lock(&self.pending).token = Some(token.clone());
            let found = self.shared.backend.search_places(&key, &token).await?;
            if token.is_cancelled() {
                return Err(CoreError::Cancelled);
            }
            lock(&self.shared.cache).insert(key, found.clone());
            found
        };

        if self.shared.is_current(generation) {
            self.shared.state.send_replace(SuggestionState::with_results(
                raw.to_owned(),
                suggestions.clone(),
            ));
        }
        Ok(suggestions)
    }

    // ── Selection & dismissal ────────────────────────────────────

    /// Pick a suggestion by id. Closes the dropdown and puts the label in the field.
    pub fn select(&self, id: &str) -> Option<PlaceSuggestion> {
        let chosen = self
            .shared
            .state
            .borrow()
            .suggestions
            .iter()
            .find(|s| s.id == id)
            .cloned()?;

        self.cancel_pending();
        self.shared.next_generation();
        self.shared.state.send_replace(SuggestionState {
            query: chosen.label.clone(),
            ..SuggestionState::default()
        });
        debug!(id, label = %chosen.label, "suggestion selected");
        Some(chosen)
    }

    /// Close the dropdown, keeping the query and results.
    pub fn dismiss(&self) {
        self.shared.state.send_if_modified(|state| {
            let was_open = state.open;
            state.open = false;
            was_open
        });
    }

    /// Pointer pressed somewhere on screen.
    pub fn pointer_down(&self, region: PointerRegion) {
        lock(&self.outside).pointer_down(region);
    }

    /// Pointer released; closes the dropdown on a genuine outside click.
    pub fn pointer_up(&self, region: PointerRegion) {
        let dismiss = lock(&self.outside).pointer_up(region);
        if dismiss {
            self.dismiss();
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Abort the pending debounce timer and any in-flight request.
    ///
    /// Published state is left untouched.
    pub fn cancel_pending(&self) {
        let mut pending = lock(&self.pending);
        if let Some(token) = pending.token.take() {
            token.cancel();
        }
        if let Some(task) = pending.task.take() {
            task.abort();
        }
    }

    /// Release everything the field owns: timer, request, cache.
    pub fn shutdown(&self) {
        self.cancel_pending();
        self.shared.next_generation();
        lock(&self.shared.cache).clear();
    }

    fn is_searchable(&self, raw: &str) -> bool {
        raw.trim().chars().count() >= self.min_query_chars
    }
}

impl<B: AddressBackend> Drop for AutocompleteController<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<B: AddressBackend> Shared<B> {
    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn run_search(
        &self,
        query: String,
        key: String,
        generation: u64,
        token: &CancellationToken,
    ) {
        debug!(query = %key, "searching places");

        match self.backend.search_places(&key, token).await {
            Ok(suggestions) => {
                if token.is_cancelled() || !self.is_current(generation) {
                    trace!("dropping results of a superseded search");
                    return;
                }
                lock(&self.cache).insert(key, suggestions.clone());
                self.state
                    .send_replace(SuggestionState::with_results(query, suggestions));
            }
            Err(e) if e.is_cancelled() => {
                trace!(query = %key, "search superseded");
            }
            Err(e) => {
                warn!(query = %key, error = %e, "place search failed");
                if self.is_current(generation) {
                    self.state.send_replace(SuggestionState {
                        query,
                        ..SuggestionState::default()
                    });
                }
            }
        }
    }
}
