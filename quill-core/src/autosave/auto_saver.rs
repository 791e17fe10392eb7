//! Debounced saving of a single document.
//!
//! Every edit restarts a timer; when the timer runs out the latest content is
//! handed to a [`SaveHandler`]. Saves never overlap: a save that becomes due
//! while another one is in flight waits for it to finish.
use super::save_status::SaveStatus;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(5000);

/// Persists one version of the document.
#[async_trait]
pub trait SaveHandler: Send + Sync {
    async fn save(&self, content: String) -> anyhow::Result<()>;
}

pub struct AutoSaver {
    inner: Arc<Inner>,
}

struct Inner {
    handler: Arc<dyn SaveHandler>,
    delay: Duration,
    state: Mutex<State>,
    status: watch::Sender<SaveStatus>,
    save_lock: tokio::sync::Mutex<()>,
}

#[derive(Default)]
struct State {
    latest: String,
    /// Content of the last successful save.
    baseline: String,
    timer: Option<JoinHandle<()>>,
    closed: bool,
}

impl AutoSaver {
    pub fn new<H: SaveHandler + 'static>(handler: H, delay: Duration) -> Self {
        Self::with_handler(Arc::new(handler), delay)
    }

    pub fn with_handler(handler: Arc<dyn SaveHandler>, delay: Duration) -> Self {
        let (status, _) = watch::channel(SaveStatus::Saved);
        Self {
            inner: Arc::new(Inner {
                handler,
                delay,
                state: Mutex::new(State::default()),
                status,
                save_lock: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Treats `content` as already saved, e.g. when editing an existing entry.
    pub fn starting_from(self, content: impl Into<String>) -> Self {
        {
            let mut state = self.inner.state();
            state.baseline = content.into();
            state.latest = state.baseline.clone();
        }
        self
    }

    /// Records an edit and (re)starts the debounce timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_change(&self, content: impl Into<String>) {
        let mut state = self.inner.state();
        if state.closed {
            return;
        }
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.latest = content.into();

        if state.latest == state.baseline {
            if *self.inner.status.borrow() == SaveStatus::Pending {
                self.inner.publish(&state, SaveStatus::Saved);
            }
            return;
        }

        self.inner.publish(&state, SaveStatus::Pending);
        let inner = Arc::clone(&self.inner);
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.delay).await;
            // The save runs in its own task so cancelling the timer never interrupts it.
            tokio::spawn(Inner::save_latest(inner));
        }));
    }

    /// Cancels the timer and saves the latest content right away.
    pub async fn save_now(&self) {
        {
            let mut state = self.inner.state();
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
        }
        Inner::save_latest(Arc::clone(&self.inner)).await;
    }

    /// Cancels any pending save. Nothing is saved or published afterwards;
    /// a save already in flight is left to finish.
    pub fn shutdown(&self) {
        let mut state = self.inner.state();
        if state.closed {
            return;
        }
        state.closed = true;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        debug!("auto-saver shut down");
    }

    pub fn status(&self) -> SaveStatus {
        *self.inner.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.inner.status.subscribe()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        let state = self.inner.state();
        state.latest != state.baseline
    }
}

impl Drop for AutoSaver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, state: &State, status: SaveStatus) {
        if !state.closed {
            self.status.send_replace(status);
        }
    }

    async fn save_latest(inner: Arc<Inner>) {
        let _serialized = inner.save_lock.lock().await;

        let content = {
            let state = inner.state();
            if state.closed || state.latest == state.baseline {
                return;
            }
            inner.publish(&state, SaveStatus::Saving);
            state.latest.clone()
        };

        debug!(size = content.len(), "auto-saving");
        let result = inner.handler.save(content.clone()).await;

        let mut state = inner.state();
        match result {
            Ok(()) => {
                state.baseline = content;
                let next = if state.latest == state.baseline {
                    SaveStatus::Saved
                } else {
                    SaveStatus::Pending
                };
                inner.publish(&state, next);
            }
            Err(e) => {
                warn!(error = %e, "auto-save failed");
                inner.publish(&state, SaveStatus::Error);
            }
        }
    }
}
