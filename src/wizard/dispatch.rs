//! Background suggestion requests.
//!
//! Requests run on a tokio runtime owned by the dispatcher. Results come back
//! over a channel that the UI drains on each tick, tagged with the ticket
//! they were issued under so stale results can be recognised.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Runtime;

use super::suggest::FeatureFetch;
use crate::ai::{DifferentiatorRequest, FollowUpRequest, SuggestionOutcome, SuggestionService};

/// What a request was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    FollowUp,
    Differentiators(FeatureFetch),
}

/// Identifies the step mount a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub step_id: &'static str,
    pub mount: u64,
    pub kind: FetchKind,
}

/// A request to run in the background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionRequest {
    FollowUp(FollowUpRequest),
    Differentiators(DifferentiatorRequest),
}

/// A settled request.
#[derive(Debug, Clone)]
pub struct SuggestionEvent {
    pub ticket: Ticket,
    pub outcome: SuggestionOutcome,
}

/// Runs suggestion requests off the UI thread.
pub struct SuggestionDispatcher {
    runtime: Runtime,
    service: Arc<SuggestionService>,
    event_tx: Sender<SuggestionEvent>,
    event_rx: Receiver<SuggestionEvent>,
}

impl SuggestionDispatcher {
    /// Create a dispatcher with its own runtime.
    pub fn new(service: SuggestionService) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("blueprint-ai")
            .enable_all()
            .build()?;
        let (event_tx, event_rx) = mpsc::channel();

        Ok(Self { runtime, service: Arc::new(service), event_tx, event_rx })
    }

    pub fn service(&self) -> &SuggestionService {
        &self.service
    }

    /// Spawn a request. The result arrives through [`SuggestionDispatcher::poll`].
    pub fn dispatch(&self, ticket: Ticket, request: SuggestionRequest) {
        let service = Arc::clone(&self.service);
        let event_tx = self.event_tx.clone();
        tracing::debug!(step = ticket.step_id, mount = ticket.mount, kind = ?ticket.kind, "Dispatching suggestion request");

        self.runtime.spawn(async move {
            let outcome = match request {
                SuggestionRequest::FollowUp(req) => service.follow_up(&req).await,
                SuggestionRequest::Differentiators(req) => service.differentiators(&req).await,
            };
            // The receiver is gone once the app shuts down
            let _ = event_tx.send(SuggestionEvent { ticket, outcome });
        });
    }

    /// Drain settled requests without blocking.
    pub fn poll(&self) -> Vec<SuggestionEvent> {
        self.event_rx.try_iter().collect()
    }

    /// Block until one request settles or the timeout passes.
    pub fn wait(&self, timeout: Duration) -> Option<SuggestionEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

impl std::fmt::Debug for SuggestionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionDispatcher").field("service", &self.service).finish()
    }
}
