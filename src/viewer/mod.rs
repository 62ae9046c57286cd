//! Document viewer - the display surface for a single document location
//!
//! A viewer owns one location at a time and walks a small lifecycle:
//! `pending` until the fetch for the current location resolves, then
//! `loaded` or `failed`. Each fetch carries a [`Ticket`]; results for a
//! ticket that is no longer current are dropped, so a slow response for an
//! old location can never replace a newer one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::{AbortHandle, JoinHandle};

use crate::content::{DocumentError, DocumentSource, MarkdownRenderer, RenderedDocument, ViewNode};

/// Fetch status of the current document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Pending,
    Loaded,
    Failed,
}

/// Lifecycle state of a viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// No location has been set yet
    Idle,
    Pending,
    Loaded(RenderedDocument),
    Failed(String),
}

impl ViewState {
    pub fn status(&self) -> Option<FetchStatus> {
        match self {
            ViewState::Idle => None,
            ViewState::Pending => Some(FetchStatus::Pending),
            ViewState::Loaded(_) => Some(FetchStatus::Loaded),
            ViewState::Failed(_) => Some(FetchStatus::Failed),
        }
    }
}

/// Identifies one fetch request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    location: String,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

/// The three mutually exclusive views a viewer can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View<'a> {
    Loading,
    Error {
        message: &'a str,
    },
    Document {
        title: Option<&'a str>,
        document: &'a RenderedDocument,
    },
}

impl View<'_> {
    pub fn to_node(&self) -> ViewNode {
        match self {
            View::Loading => ViewNode::new("div")
                .class("viewer-loading")
                .attr("role", "status")
                .child(ViewNode::new("span").class("viewer-spinner"))
                .child(ViewNode::text("Loading documentation…")),
            View::Error { message } => ViewNode::new("div")
                .class("viewer-error")
                .attr("role", "alert")
                .child(
                    ViewNode::new("span")
                        .class("viewer-error-icon")
                        .attr("aria-hidden", "true")
                        .child(ViewNode::text("⚠")),
                )
                .child(
                    ViewNode::new("div")
                        .child(
                            ViewNode::new("strong")
                                .class("viewer-error-title")
                                .child(ViewNode::text("Error")),
                        )
                        .child(
                            ViewNode::new("p")
                                .class("viewer-error-message")
                                .child(ViewNode::text(*message)),
                        ),
                ),
            View::Document { title, document } => {
                let mut node = ViewNode::new("div").class("viewer-document");
                if let Some(title) = title {
                    node = node.child(
                        ViewNode::new("h1")
                            .class("viewer-title")
                            .child(ViewNode::text(*title)),
                    );
                }
                if !document.tags.is_empty() {
                    node = node.child(ViewNode::new("ul").class("viewer-tags").children(
                        document
                            .tags
                            .iter()
                            .map(|tag| {
                                ViewNode::new("li")
                                    .class("chip")
                                    .child(ViewNode::text(tag.as_str()))
                            })
                            .collect(),
                    ));
                }
                if document.headings.len() > 1 {
                    node = node.child(outline_nav(document));
                }
                node.child(document.tree.clone())
            }
        }
    }

    pub fn to_html(&self) -> String {
        self.to_node().to_html()
    }
}

fn outline_nav(document: &RenderedDocument) -> ViewNode {
    let items = document
        .headings
        .iter()
        .filter(|h| h.level <= 3 && !h.id.is_empty())
        .map(|h| {
            ViewNode::new("li")
                .class(&format!("toc-level-{}", h.level))
                .child(
                    ViewNode::new("a")
                        .attr("href", format!("#{}", h.id))
                        .child(ViewNode::text(h.text.as_str())),
                )
        })
        .collect();
    ViewNode::new("nav")
        .class("viewer-toc")
        .child(ViewNode::new("ul").children(items))
}

/// Display surface for one document location at a time
pub struct DocumentViewer {
    renderer: Arc<MarkdownRenderer>,
    title: Option<String>,
    location: Option<String>,
    generation: u64,
    state: ViewState,
}

impl DocumentViewer {
    pub fn new(renderer: Arc<MarkdownRenderer>) -> Self {
        Self {
            renderer,
            title: None,
            location: None,
            generation: 0,
            state: ViewState::Idle,
        }
    }

    /// Display title shown above the document
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn status(&self) -> Option<FetchStatus> {
        self.state.status()
    }

    /// Switch to `location` and enter `pending`. Any earlier ticket is now stale.
    pub fn begin(&mut self, location: &str) -> Ticket {
        self.generation += 1;
        self.location = Some(location.to_string());
        self.state = ViewState::Pending;
        tracing::debug!("Viewer request #{} for {}", self.generation, location);
        Ticket {
            generation: self.generation,
            location: location.to_string(),
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply a fetch result. Returns false when the ticket is stale or the
    /// request already resolved.
    pub fn complete(&mut self, ticket: &Ticket, result: Result<String, DocumentError>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                "Discarding stale response #{} for {}",
                ticket.generation,
                ticket.location
            );
            return false;
        }
        if self.state != ViewState::Pending {
            return false;
        }

        self.state = match result.and_then(|text| self.renderer.render(&text)) {
            Ok(document) => {
                tracing::info!("Loaded {}", ticket.location);
                ViewState::Loaded(document)
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", ticket.location, e);
                ViewState::Failed(e.to_string())
            }
        };
        true
    }

    /// Fetch and render `location`; one request per call
    pub async fn navigate<S: DocumentSource>(&mut self, source: &S, location: &str) -> &ViewState {
        let ticket = self.begin(location);
        let result = source.fetch(location).await;
        self.complete(&ticket, result);
        &self.state
    }

    /// Current view; an idle viewer shows the loading indicator
    pub fn view(&self) -> View<'_> {
        match &self.state {
            ViewState::Idle | ViewState::Pending => View::Loading,
            ViewState::Failed(message) => View::Error { message },
            ViewState::Loaded(document) => View::Document {
                title: self.title.as_deref(),
                document,
            },
        }
    }
}

/// A viewer shared with background fetch tasks.
///
/// Starting a navigation aborts any older in-flight fetch; the ticket
/// check still covers a response that lands before the abort does.
/// Only a task with a lower generation is ever aborted, so concurrent
/// callers cannot cancel the request that owns the current ticket.
pub struct SharedViewer<S> {
    viewer: Arc<Mutex<DocumentViewer>>,
    source: Arc<S>,
    in_flight: Arc<Mutex<Option<(u64, AbortHandle)>>>,
}

impl<S> Clone for SharedViewer<S> {
    fn clone(&self) -> Self {
        Self {
            viewer: self.viewer.clone(),
            source: self.source.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<S> SharedViewer<S>
where
    S: DocumentSource + Send + Sync + 'static,
{
    pub fn new(viewer: DocumentViewer, source: Arc<S>) -> Self {
        Self {
            viewer: Arc::new(Mutex::new(viewer)),
            source,
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    /// Start loading `location` in the background.
    /// The task resolves to whether its result was applied.
    pub fn navigate(&self, location: impl Into<String>) -> JoinHandle<bool> {
        let location = location.into();
        let ticket = lock(&self.viewer).begin(&location);
        let generation = ticket.generation();

        let viewer = self.viewer.clone();
        let source = self.source.clone();
        let handle = tokio::spawn(async move {
            let result = source.fetch(ticket.location()).await;
            lock(&viewer).complete(&ticket, result)
        });

        let mut in_flight = lock(&self.in_flight);
        match in_flight.as_ref() {
            // a newer navigation already registered; this one is superseded
            Some((newest, _)) if *newest > generation => handle.abort(),
            _ => {
                if let Some((_, previous)) = in_flight.replace((generation, handle.abort_handle())) {
                    previous.abort();
                }
            }
        }
        drop(in_flight);
        handle
    }

    pub fn state(&self) -> ViewState {
        lock(&self.viewer).state().clone()
    }

    pub fn to_html(&self) -> String {
        lock(&self.viewer).view().to_html()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HighlightConfig;
    use std::collections::HashMap;
    use std::time::Duration;

    /// In-memory source with optional per-location latency
    #[derive(Default)]
    struct FakeSource {
        docs: HashMap<String, (Result<String, DocumentError>, u64)>,
    }

    impl FakeSource {
        fn with(mut self, location: &str, result: Result<&str, DocumentError>, delay_ms: u64) -> Self {
            self.docs.insert(
                location.to_string(),
                (result.map(str::to_string), delay_ms),
            );
            self
        }
    }

    impl DocumentSource for FakeSource {
        async fn fetch(&self, location: &str) -> Result<String, DocumentError> {
            match self.docs.get(location) {
                Some((result, delay)) => {
                    tokio::time::sleep(Duration::from_millis(*delay)).await;
                    result.clone()
                }
                None => Err(DocumentError::Load { status: 404 }),
            }
        }
    }

    fn renderer() -> Arc<MarkdownRenderer> {
        Arc::new(MarkdownRenderer::from_config(&HighlightConfig {
            enable: false,
            ..HighlightConfig::default()
        }))
    }

    #[test]
    fn test_begin_enters_pending() {
        let mut viewer = DocumentViewer::new(renderer());
        assert_eq!(viewer.state(), &ViewState::Idle);
        assert_eq!(viewer.view(), View::Loading);
        viewer.begin("/docs/a.md");
        assert_eq!(viewer.status(), Some(FetchStatus::Pending));
        assert_eq!(viewer.location(), Some("/docs/a.md"));
    }

    #[test]
    fn test_complete_resolves_exactly_once() {
        let mut viewer = DocumentViewer::new(renderer());
        let ticket = viewer.begin("/docs/a.md");
        assert!(viewer.complete(&ticket, Ok("# A".to_string())));
        assert_eq!(viewer.status(), Some(FetchStatus::Loaded));
        // a second resolution for the same request is ignored
        assert!(!viewer.complete(&ticket, Err(DocumentError::Load { status: 500 })));
        assert_eq!(viewer.status(), Some(FetchStatus::Loaded));
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut viewer = DocumentViewer::new(renderer());
        let old = viewer.begin("/docs/old.md");
        let new = viewer.begin("/docs/new.md");
        assert!(!viewer.complete(&old, Ok("# Old".to_string())));
        assert_eq!(viewer.status(), Some(FetchStatus::Pending));
        assert!(viewer.complete(&new, Ok("# New".to_string())));
        match viewer.state() {
            ViewState::Loaded(doc) => assert_eq!(doc.title.as_deref(), Some("New")),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_navigate_missing_shows_error_panel() {
        let source = FakeSource::default();
        let mut viewer = DocumentViewer::new(renderer());
        let state = viewer.navigate(&source, "/docs/missing.md").await;
        assert_eq!(
            state,
            &ViewState::Failed("Failed to load documentation".to_string())
        );
        let html = viewer.view().to_html();
        assert!(html.contains("viewer-error"));
        assert!(html.contains("Failed to load documentation"));
    }

    #[tokio::test]
    async fn test_navigate_runtime_error_keeps_message() {
        let source = FakeSource::default().with(
            "/docs/broken.md",
            Err(DocumentError::runtime("connection reset by peer")),
            0,
        );
        let mut viewer = DocumentViewer::new(renderer());
        viewer.navigate(&source, "/docs/broken.md").await;
        assert_eq!(
            viewer.view(),
            View::Error {
                message: "connection reset by peer"
            }
        );
    }

    #[tokio::test]
    async fn test_navigate_renders_document() {
        let source =
            FakeSource::default().with("/docs/valid.md", Ok("# Title\n\nSome *text*."), 0);
        let mut viewer = DocumentViewer::new(renderer()).with_title("Hooks");
        viewer.navigate(&source, "/docs/valid.md").await;
        match viewer.view() {
            View::Document { title, document } => {
                assert_eq!(title, Some("Hooks"));
                let h1 = document.tree.find("h1").unwrap();
                assert_eq!(h1.text_content(), "Title");
                let p = document.tree.find("p").unwrap();
                assert_eq!(p.find("em").unwrap().text_content(), "text");
            }
            other => panic!("unexpected view {:?}", other),
        }
        let html = viewer.view().to_html();
        assert!(html.contains(r#"<h1 class="viewer-title">Hooks</h1>"#));
    }

    #[tokio::test]
    async fn test_shared_viewer_keeps_latest_location() {
        let source = FakeSource::default()
            .with("/docs/slow.md", Ok("# Slow"), 200)
            .with("/docs/fast.md", Ok("# Fast"), 0);
        let shared = SharedViewer::new(DocumentViewer::new(renderer()), Arc::new(source));

        let slow = shared.navigate("/docs/slow.md");
        let fast = shared.navigate("/docs/fast.md");
        assert!(fast.await.unwrap());
        // the superseded task was aborted
        assert!(slow.await.unwrap_err().is_cancelled());

        match shared.state() {
            ViewState::Loaded(doc) => assert_eq!(doc.title.as_deref(), Some("Fast")),
            other => panic!("unexpected state {:?}", other),
        }
        assert!(shared.to_html().contains("Fast"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_navigations_always_settle() {
        let source = Arc::new(
            FakeSource::default()
                .with("/docs/x.md", Ok("# X"), 1)
                .with("/docs/y.md", Ok("# Y"), 1),
        );
        let runtime = tokio::runtime::Handle::current();

        for round in 0..200 {
            let shared = SharedViewer::new(DocumentViewer::new(renderer()), source.clone());
            let barrier = Arc::new(std::sync::Barrier::new(2));
            let threads: Vec<_> = ["/docs/x.md", "/docs/y.md"]
                .into_iter()
                .map(|location| {
                    let shared = shared.clone();
                    let barrier = barrier.clone();
                    let runtime = runtime.clone();
                    std::thread::spawn(move || {
                        let _guard = runtime.enter();
                        barrier.wait();
                        shared.navigate(location)
                    })
                })
                .collect();

            for thread in threads {
                let _ = thread.join().unwrap().await;
            }
            assert_eq!(
                shared.state().status(),
                Some(FetchStatus::Loaded),
                "round {} left the viewer unresolved",
                round
            );
        }
    }
}
