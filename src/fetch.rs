//! Per-view fetch lifecycle
//!
//! Every dashboard view owns one `FetchSlot`: a mutex-held `FetchState`
//! plus a generation counter. `begin()` opens a request window (loading on,
//! prior data and error cleared) and hands back a generation token;
//! `complete()` applies a result only if that token is still current, so a
//! response from a superseded request can never overwrite a newer one.

use std::sync::Mutex;

use serde::Serialize;

/// Lifecycle phase of a view's fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Renderable state of one view's fetch. Invariant: `data` is set exactly
/// in `Success`, `error` exactly in `Error`, neither during `Idle`/`Loading`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchState<T> {
    pub status: FetchStatus,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> FetchState<T> {
    pub fn idle() -> Self {
        Self {
            status: FetchStatus::Idle,
            data: None,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }
}

struct Inner<T> {
    state: FetchState<T>,
    generation: u64,
}

/// Owner of one view's fetch lifecycle. All mutation goes through the slot;
/// views and the shell only ever see snapshots.
pub struct FetchSlot<T> {
    inner: Mutex<Inner<T>>,
}

impl<T: Clone> FetchSlot<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: FetchState::idle(),
                generation: 0,
            }),
        }
    }

    /// Open a new request window. Clears prior data and error so stale
    /// state never leaks into the new request's rendering window, and
    /// invalidates every in-flight completion from earlier generations.
    pub fn begin(&self) -> u64 {
        match self.inner.lock() {
            Ok(mut guard) => {
                guard.generation += 1;
                guard.state = FetchState {
                    status: FetchStatus::Loading,
                    data: None,
                    error: None,
                };
                guard.generation
            }
            Err(_) => {
                log::warn!("fetch slot lock poisoned on begin");
                0
            }
        }
    }

    /// Close the request window opened by `begin`. Returns false (and leaves
    /// the slot untouched) when `generation` has been superseded.
    pub fn complete(&self, generation: u64, result: Result<T, String>) -> bool {
        let Ok(mut guard) = self.inner.lock() else {
            log::warn!("fetch slot lock poisoned on complete");
            return false;
        };
        if guard.generation != generation || guard.state.status != FetchStatus::Loading {
            return false;
        }
        guard.state = match result {
            Ok(data) => FetchState {
                status: FetchStatus::Success,
                data: Some(data),
                error: None,
            },
            Err(message) => FetchState {
                status: FetchStatus::Error,
                data: None,
                error: Some(message),
            },
        };
        true
    }

    /// Return the slot to `Idle`, dropping any data or error. Also bumps the
    /// generation so in-flight completions are discarded.
    pub fn reset(&self) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.generation += 1;
            guard.state = FetchState::idle();
        }
    }

    pub fn snapshot(&self) -> FetchState<T> {
        self.inner
            .lock()
            .map(|guard| guard.state.clone())
            .unwrap_or_else(|_| FetchState::idle())
    }

    pub fn has_data(&self) -> bool {
        self.inner
            .lock()
            .map(|guard| guard.state.data.is_some())
            .unwrap_or(false)
    }
}

impl<T: Clone> Default for FetchSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
