//! View controller.
//!
//! Orchestrates one view: parse the fragment, fetch, classify, prepare, and
//! publish the result. State is published on a `watch` channel:
//!
//! ```text
//! open(id) ──► Loading ──► Ready(view)
//!                    └───► Error(message)
//! ```
//!
//! Every `open` (and `close`) starts a new generation. A fetch only publishes
//! its result if its generation is still current, so a slow fetch for a
//! superseded identifier can never overwrite the state of the current one.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use maud::Markup;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::adapters::ContentSource;
use crate::domain::{Classifier, ContentId, MediaVariant, RetrievedArtifact, ViewFragmentState};
use crate::render::{self, Renderable};

/// Message for waiters on a closed view
const VIEW_CLOSED: &str = "View closed";

/// A fully prepared view, ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub id: ContentId,
    pub filename: Option<String>,
    pub content_type: String,
    pub variant: MediaVariant,
    /// Fragment parsed once when the view was opened
    pub fragment: ViewFragmentState,
    /// Fragment text as given, forwarded to video and PDF embeds
    pub raw_fragment: String,
    pub content: Renderable,
}

impl View {
    /// Build a view from a retrieved artifact
    pub fn from_artifact(
        id: ContentId,
        artifact: RetrievedArtifact,
        classifier: &Classifier,
        fragment: ViewFragmentState,
        raw_fragment: impl Into<String>,
    ) -> Self {
        let variant = classifier.classify(&artifact.content_type, artifact.filename.as_deref());
        let content = Renderable::prepare(variant.clone(), &artifact);

        Self {
            id,
            filename: artifact.filename,
            content_type: artifact.content_type,
            variant,
            fragment,
            raw_fragment: raw_fragment.into(),
            content,
        }
    }

    /// Page title: the filename when known, otherwise the identifier
    pub fn title(&self) -> String {
        self.filename
            .clone()
            .unwrap_or_else(|| self.id.to_string())
    }

    /// Render the content through the dispatcher
    pub fn render(&self) -> Markup {
        render::render(&self.content, &self.fragment, &self.raw_fragment)
    }
}

/// Observable controller state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Error(String),
    Ready(View),
}

impl ViewState {
    /// Whether the state is terminal for the current identifier
    pub fn is_settled(&self) -> bool {
        !matches!(self, ViewState::Loading)
    }
}

/// Controller owning the state of one viewer
pub struct ViewController<S: ContentSource + 'static> {
    source: Arc<S>,
    classifier: Arc<Classifier>,
    generation: Arc<AtomicU64>,
    /// Set by `close` until the next `open`
    closed: AtomicBool,
    state_tx: Arc<watch::Sender<ViewState>>,
    task: Option<JoinHandle<()>>,
}

impl<S: ContentSource + 'static> ViewController<S> {
    /// Create a controller with the built-in classifier
    pub fn new(source: S) -> Self {
        Self::with_classifier(source, Classifier::new())
    }

    /// Create a controller with a custom classifier
    pub fn with_classifier(source: S, classifier: Classifier) -> Self {
        let (state_tx, _) = watch::channel(ViewState::Loading);
        Self {
            source: Arc::new(source),
            classifier: Arc::new(classifier),
            generation: Arc::new(AtomicU64::new(0)),
            closed: AtomicBool::new(false),
            state_tx: Arc::new(state_tx),
            task: None,
        }
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state_tx.subscribe()
    }

    /// Current state snapshot
    pub fn state(&self) -> ViewState {
        self.state_tx.borrow().clone()
    }

    /// Open a view for a raw hash and fragment.
    ///
    /// Resets state to `Loading`, supersedes any outstanding fetch, and
    /// starts a new one. An invalid or missing hash settles immediately as
    /// `Error` without touching the content source.
    pub fn open(&mut self, hash: &str, raw_fragment: &str) {
        self.cancel_task();
        let generation = self.next_generation();

        let raw_fragment = raw_fragment.strip_prefix('#').unwrap_or(raw_fragment).to_string();
        let fragment = ViewFragmentState::parse(&raw_fragment);

        let id = match ContentId::parse(hash) {
            Ok(id) => id,
            Err(e) => {
                warn!(hash, "Rejected identifier: {}", e);
                publish(&self.state_tx, &self.generation, generation, ViewState::Error(e.to_string()));
                return;
            }
        };

        info!(hash = %id, source = self.source.name(), "Opening view");

        let source = Arc::clone(&self.source);
        let classifier = Arc::clone(&self.classifier);
        let current = Arc::clone(&self.generation);
        let state_tx = Arc::clone(&self.state_tx);

        self.task = Some(tokio::spawn(async move {
            let result = source.fetch(&id).await;
            let state = match result {
                Ok(artifact) => {
                    let view = View::from_artifact(id, artifact, &classifier, fragment, raw_fragment);
                    info!(hash = %view.id, variant = view.variant.name(), "View ready");
                    ViewState::Ready(view)
                }
                Err(e) => {
                    warn!(hash = %id, "Fetch failed: {}", e);
                    ViewState::Error(e.to_string())
                }
            };

            if !publish(&state_tx, &current, generation, state) {
                debug!(generation, "Discarded result for superseded view");
            }
        }));
    }

    /// Tear down the view. Any outstanding fetch result is suppressed.
    ///
    /// Waiters in [`settled`](Self::settled) are woken and see the view as
    /// closed.
    pub fn close(&mut self) {
        self.cancel_task();
        let mut generation = 0;
        self.state_tx.send_modify(|_| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            self.closed.store(true, Ordering::SeqCst);
        });
        debug!(generation, "View closed");
    }

    /// Wait for the current generation to settle.
    ///
    /// Returns the ready view, or the user-visible error message. Returns
    /// an error instead of waiting when the view has been closed.
    pub async fn settled(&self) -> Result<View, String> {
        let mut rx = self.subscribe();
        let state = rx
            .wait_for(|state| state.is_settled() || self.closed.load(Ordering::SeqCst))
            .await
            .map_err(|_| VIEW_CLOSED.to_string())?
            .clone();

        match state {
            ViewState::Ready(view) => Ok(view),
            ViewState::Error(message) => Err(message),
            ViewState::Loading => Err(VIEW_CLOSED.to_string()),
        }
    }

    /// Start a new generation and publish `Loading` for it
    fn next_generation(&self) -> u64 {
        let mut generation = 0;
        self.state_tx.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            self.closed.store(false, Ordering::SeqCst);
            *state = ViewState::Loading;
        });
        debug!(generation, "View generation started");
        generation
    }

    fn cancel_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<S: ContentSource + 'static> Drop for ViewController<S> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Publish a terminal state if `generation` is still current.
///
/// The generation check runs under the channel's lock, the same lock
/// `next_generation` holds while advancing, so check-and-set is atomic.
fn publish(
    state_tx: &watch::Sender<ViewState>,
    current: &AtomicU64,
    generation: u64,
    state: ViewState,
) -> bool {
    let mut state = Some(state);
    state_tx.send_if_modified(|slot| {
        if current.load(Ordering::SeqCst) != generation {
            return false;
        }
        match state.take() {
            Some(next) => {
                *slot = next;
                true
            }
            None => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::adapters::FetchError;
    use crate::domain::ArtifactBody;

    const HASH: &str = "0123456789abcdef0123456789abcdef";

    struct StaticSource {
        content_type: &'static str,
        filename: Option<&'static str>,
        body: &'static str,
    }

    #[async_trait]
    impl ContentSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        fn content_url(&self, id: &ContentId) -> String {
            format!("/content/{}", id)
        }

        async fn fetch(&self, id: &ContentId) -> Result<RetrievedArtifact, FetchError> {
            Ok(RetrievedArtifact::new(
                self.content_type,
                self.filename.map(String::from),
                self.content_url(id),
                ArtifactBody::Text(self.body.to_string()),
            ))
        }
    }

    fn code_source() -> StaticSource {
        StaticSource {
            content_type: "text/plain",
            filename: Some("main.go"),
            body: "package main\n\nfunc main() {}\n",
        }
    }

    #[tokio::test]
    async fn test_open_reaches_ready() {
        let mut controller = ViewController::new(code_source());
        controller.open(HASH, "#L1-L2");

        let view = controller.settled().await.unwrap();
        assert_eq!(
            view.variant,
            MediaVariant::Code {
                language: "go".to_string()
            }
        );
        assert_eq!(view.fragment, ViewFragmentState::LineRange { start: 1, end: 2 });
        assert_eq!(view.raw_fragment, "L1-L2");
        assert_eq!(view.title(), "main.go");
        assert!(matches!(controller.state(), ViewState::Ready(_)));
    }

    #[tokio::test]
    async fn test_missing_hash_is_error() {
        let mut controller = ViewController::new(code_source());
        controller.open("", "");
        assert_eq!(
            controller.settled().await.unwrap_err(),
            "No hash provided in the URL."
        );
    }

    #[tokio::test]
    async fn test_invalid_hash_is_error() {
        let mut controller = ViewController::new(code_source());
        controller.open("not-a-hash", "");
        let message = controller.settled().await.unwrap_err();
        assert!(message.starts_with("Invalid MD5 hash"));
    }

    #[tokio::test]
    async fn test_close_suppresses_result() {
        let mut controller = ViewController::new(code_source());
        let mut rx = controller.subscribe();
        controller.open(HASH, "");
        controller.close();

        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(controller.state(), ViewState::Loading);
        // No terminal state was ever published
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), ViewState::Loading);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_settled_after_close_is_error() {
        let mut controller = ViewController::new(code_source());
        controller.open(HASH, "");
        controller.close();

        let outcome = tokio::time::timeout(std::time::Duration::from_secs(1), controller.settled())
            .await
            .expect("settled() waited on a closed view");
        assert_eq!(outcome.unwrap_err(), "View closed");

        // Reopening clears the closed mark
        controller.open(HASH, "");
        assert!(controller.settled().await.is_ok());
    }

    #[test]
    fn test_stale_publish_is_rejected() {
        let (tx, _rx) = watch::channel(ViewState::Loading);
        let current = AtomicU64::new(2);

        assert!(!publish(&tx, &current, 1, ViewState::Error("stale".to_string())));
        assert_eq!(*tx.borrow(), ViewState::Loading);

        assert!(publish(&tx, &current, 2, ViewState::Error("fresh".to_string())));
        assert_eq!(*tx.borrow(), ViewState::Error("fresh".to_string()));
    }
}
