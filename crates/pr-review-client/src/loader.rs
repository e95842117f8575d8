//! Background loads with stale-result suppression
//!
//! Each view owns one [`ViewLoader`]. Starting a load supersedes whatever
//! load the view had in flight: the older task stops before parsing, or its
//! result is dropped if it finishes anyway. Only the most recently started
//! load can change the [`ViewState`].

use log::debug;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;

/// Result of one completed load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<P> {
    Loaded(P),
    /// Transport failure, reported to the user instead of a partial result
    Failed(String),
}

/// What a view currently shows
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<P> {
    /// Generation of the load that produced `outcome` (0 before any load)
    pub generation: u64,
    pub loading: bool,
    pub outcome: Option<LoadOutcome<P>>,
}

impl<P> Default for ViewState<P> {
    fn default() -> Self {
        Self {
            generation: 0,
            loading: false,
            outcome: None,
        }
    }
}

impl<P> ViewState<P> {
    pub fn loaded(&self) -> Option<&P> {
        match &self.outcome {
            Some(LoadOutcome::Loaded(payload)) => Some(payload),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Some(LoadOutcome::Failed(message)) => Some(message),
            _ => None,
        }
    }
}

struct Shared<P> {
    latest_started: u64,
    state: ViewState<P>,
}

/// Supervises the loads of a single view
pub struct ViewLoader<P> {
    name: String,
    shared: Arc<Mutex<Shared<P>>>,
}

impl<P> Clone for ViewLoader<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            shared: Arc::clone(&self.shared),
        }
    }
}

fn lock<P>(shared: &Mutex<Shared<P>>) -> MutexGuard<'_, Shared<P>> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<P: Send + 'static> ViewLoader<P> {
    /// Create a loader; `name` only appears in logs
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shared: Arc::new(Mutex::new(Shared {
                latest_started: 0,
                state: ViewState::default(),
            })),
        }
    }

    /// Start a load, superseding any load already in flight
    ///
    /// `fetch` yields the raw response body; `parse` turns it into the view
    /// payload and is skipped when the load was superseded in the meantime.
    /// Must be called within a tokio runtime.
    pub fn start<F, Parse>(&self, fetch: F, parse: Parse) -> JoinHandle<()>
    where
        F: Future<Output = anyhow::Result<String>> + Send + 'static,
        Parse: FnOnce(&str) -> P + Send + 'static,
    {
        let generation = {
            let mut shared = lock(&self.shared);
            shared.latest_started += 1;
            shared.state.loading = true;
            shared.latest_started
        };
        debug!("{}: load {} started", self.name, generation);

        let name = self.name.clone();
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let outcome = match fetch.await {
                Ok(body) => {
                    if lock(&shared).latest_started != generation {
                        debug!("{}: load {} superseded before parsing", name, generation);
                        return;
                    }
                    LoadOutcome::Loaded(parse(&body))
                }
                Err(err) => {
                    log::warn!("{}: load {} failed: {:#}", name, generation, err);
                    LoadOutcome::Failed(format!("{:#}", err))
                }
            };

            let mut shared = lock(&shared);
            if shared.latest_started != generation {
                debug!("{}: dropping stale result of load {}", name, generation);
                return;
            }
            shared.state = ViewState {
                generation,
                loading: false,
                outcome: Some(outcome),
            };
        })
    }

    /// Supersede the load in flight without starting a new one
    pub fn cancel(&self) {
        let mut shared = lock(&self.shared);
        if shared.state.loading {
            debug!("{}: load {} cancelled", self.name, shared.latest_started);
        }
        shared.latest_started += 1;
        shared.state.loading = false;
    }

    /// Generation of the most recently started (or cancelled) load
    pub fn current_generation(&self) -> u64 {
        lock(&self.shared).latest_started
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.shared).state.loading
    }

    /// Run `f` against the current state without cloning it
    pub fn with_state<R>(&self, f: impl FnOnce(&ViewState<P>) -> R) -> R {
        f(&lock(&self.shared).state)
    }
}

impl<P: Clone + Send + 'static> ViewLoader<P> {
    pub fn snapshot(&self) -> ViewState<P> {
        lock(&self.shared).state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::oneshot;

    fn word_count(body: &str) -> usize {
        body.split_whitespace().count()
    }

    #[tokio::test]
    async fn test_successful_load_is_applied() {
        let loader = ViewLoader::new("files");
        let handle = loader.start(async { Ok::<_, anyhow::Error>("a b c".to_string()) }, word_count);
        handle.await.unwrap();

        let state = loader.snapshot();
        assert_eq!(state.generation, 1);
        assert!(!state.loading);
        assert_eq!(state.loaded(), Some(&3));
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported() {
        let loader: ViewLoader<usize> = ViewLoader::new("files");
        let handle = loader.start(
            async { Err::<String, _>(anyhow::anyhow!("401 Unauthorized")) },
            word_count,
        );
        handle.await.unwrap();

        let state = loader.snapshot();
        assert_eq!(state.error(), Some("401 Unauthorized"));
        assert_eq!(state.loaded(), None);
    }

    #[tokio::test]
    async fn test_superseded_load_is_never_parsed() {
        let loader = ViewLoader::new("comments");
        let (release_first, first_body) = oneshot::channel::<String>();
        let first_parsed = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&first_parsed);
        let first = loader.start(
            async move { Ok::<_, anyhow::Error>(first_body.await?) },
            move |body: &str| {
                flag.store(true, Ordering::SeqCst);
                word_count(body)
            },
        );
        assert!(loader.is_loading());

        let second = loader.start(async { Ok::<_, anyhow::Error>("one two".to_string()) }, word_count);
        second.await.unwrap();
        assert_eq!(loader.snapshot().loaded(), Some(&2));

        release_first.send("x y z w".to_string()).unwrap();
        first.await.unwrap();

        let state = loader.snapshot();
        assert!(!first_parsed.load(Ordering::SeqCst));
        assert_eq!(state.generation, 2);
        assert_eq!(state.loaded(), Some(&2));
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_replace_newer_result() {
        let loader = ViewLoader::new("prs");
        let (fail_first, first_signal) = oneshot::channel::<()>();

        let first = loader.start(
            async move {
                first_signal.await?;
                Err::<String, anyhow::Error>(anyhow::anyhow!("timed out"))
            },
            word_count,
        );
        let second = loader.start(async { Ok::<_, anyhow::Error>("fresh".to_string()) }, word_count);
        second.await.unwrap();

        fail_first.send(()).unwrap();
        first.await.unwrap();

        assert_eq!(loader.snapshot().loaded(), Some(&1));
    }

    #[tokio::test]
    async fn test_cancel_discards_in_flight_load() {
        let loader = ViewLoader::new("files");
        let (release, body) = oneshot::channel::<String>();
        let handle = loader.start(async move { Ok::<_, anyhow::Error>(body.await?) }, word_count);

        loader.cancel();
        assert!(!loader.is_loading());
        assert_eq!(loader.current_generation(), 2);

        release.send("late".to_string()).unwrap();
        handle.await.unwrap();

        loader.with_state(|state| {
            assert_eq!(state.outcome, None);
            assert_eq!(state.generation, 0);
        });
    }
}
