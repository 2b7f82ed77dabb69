//! Conversation state: chat log, the active visualization and the single
//! in-flight query.

mod view;
mod viewport;

use std::{pin::pin, sync::Arc};

use futures::future::{self, Either};

use crate::{
    backend::{DashboardResponse, MapResponse, QueryBackend, QueryResponse},
    boundary::{BoundaryCollection, BoundarySource, BoundaryStore},
    diagnostics::DiagnosticsSink,
    error::{BackendError, CensusError},
    geography::GeoType,
};

pub use view::{DashboardView, MapView, VariableDisplay, View, ViewKind};
pub use viewport::{state_center, Viewport, NATIONAL_ZOOM, STATE_ZOOM};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// Ticket for a dispatched query. Hand it back to `Session::complete_query`
/// together with the backend's answer.
#[derive(Debug)]
pub struct PendingQuery {
    id: RequestId,
    epoch: u64,
    query: String,
}

impl PendingQuery {
    pub fn id(&self) -> RequestId { self.id }

    pub fn query(&self) -> &str { &self.query }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Blank input; nothing was sent.
    Ignored,
    Replied,
    ShowedMap,
    ShowedDashboard,
    /// The failure was reported in the chat log; the session stays usable.
    Failed(CensusError),
    /// The user navigated away before the answer arrived.
    Discarded,
}

const BACKEND_FAILURE_MESSAGE: &str = "Sorry, I couldn't connect to the AI. Please try again.";

pub struct Session {
    store: Arc<BoundaryStore>,
    backend: Arc<dyn QueryBackend>,
    sink: Arc<dyn DiagnosticsSink>,
    messages: Vec<ChatMessage>,
    view: View,
    in_flight: Option<RequestId>,
    epoch: u64,
    next_request: u64,
}

impl Session {
    pub fn new(store: Arc<BoundaryStore>, backend: Arc<dyn QueryBackend>, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            store,
            backend,
            sink,
            messages: Vec::new(),
            view: View::Chat,
            in_flight: None,
            epoch: 0,
            next_request: 0,
        }
    }

    /// Load every boundary level while pinging the backend awake. The session
    /// only exists once all levels have loaded; the ping never holds it back
    /// and is abandoned if still outstanding when the load resolves.
    pub async fn launch(
        source: &dyn BoundarySource,
        backend: Arc<dyn QueryBackend>,
        sink: Arc<dyn DiagnosticsSink>,
    ) -> Result<Self, CensusError> {
        let store = {
            let ping = pin!(warm_up(Arc::clone(&backend)));
            let load = pin!(BoundaryStore::load_all(source));
            match future::select(ping, load).await {
                Either::Left(((), load)) => load.await,
                Either::Right((store, _)) => {
                    tracing::debug!("boundaries loaded before warm-up ping returned");
                    store
                }
            }
        };
        Ok(Self::new(Arc::new(store?), backend, sink))
    }

    pub fn view(&self) -> &View { &self.view }

    pub fn messages(&self) -> &[ChatMessage] { &self.messages }

    /// True while a query is outstanding; input should be disabled.
    pub fn is_busy(&self) -> bool { self.in_flight.is_some() }

    pub fn backend(&self) -> Arc<dyn QueryBackend> { Arc::clone(&self.backend) }

    pub fn store(&self) -> &BoundaryStore { &self.store }

    /// Submit `text` and apply the answer.
    pub async fn ask(&mut self, text: &str) -> Result<QueryOutcome, CensusError> {
        let Some(pending) = self.begin_query(text)? else { return Ok(QueryOutcome::Ignored) };
        let backend = self.backend();
        tracing::debug!(request = pending.id.0, "dispatching query");
        let result = backend.ask(pending.query()).await;
        Ok(self.complete_query(pending, result))
    }

    /// Take the in-flight slot for `text`. Blank input yields `None`.
    pub fn begin_query(&mut self, text: &str) -> Result<Option<PendingQuery>, CensusError> {
        if self.in_flight.is_some() { return Err(CensusError::QueryInFlight) }

        let query = text.trim();
        if query.is_empty() { return Ok(None) }

        self.next_request += 1;
        let id = RequestId(self.next_request);
        self.in_flight = Some(id);
        self.push(Sender::User, query, false);

        Ok(Some(PendingQuery { id, epoch: self.epoch, query: query.to_string() }))
    }

    /// Apply the backend's answer to `pending`, unless the user navigated away
    /// since it was dispatched.
    pub fn complete_query(&mut self, pending: PendingQuery, result: Result<QueryResponse, BackendError>) -> QueryOutcome {
        if self.in_flight != Some(pending.id) {
            tracing::debug!(request = pending.id.0, "ignoring completion of an unknown request");
            return QueryOutcome::Discarded;
        }
        self.in_flight = None;

        if pending.epoch != self.epoch {
            tracing::info!(request = pending.id.0, "discarding response for a view that is gone");
            return QueryOutcome::Discarded;
        }

        let outcome = match result {
            Err(e) => Err(CensusError::from(e)),
            Ok(QueryResponse::Text { response }) => {
                self.push(Sender::Assistant, &response, false);
                Ok(QueryOutcome::Replied)
            }
            Ok(QueryResponse::Map(map)) => self.show_map(map).map(|_| QueryOutcome::ShowedMap),
            Ok(QueryResponse::Dashboard(dashboard)) => {
                self.show_dashboard(dashboard).map(|_| QueryOutcome::ShowedDashboard)
            }
        };

        outcome.unwrap_or_else(|e| {
            tracing::warn!(request = pending.id.0, error = %e, "query failed");
            self.push(Sender::Assistant, &failure_message(&e), true);
            QueryOutcome::Failed(e)
        })
    }

    /// Return to the chat view. Answers to queries dispatched before this
    /// point are discarded when they arrive.
    pub fn back(&mut self) {
        if self.view.kind() == ViewKind::Chat { return }
        self.view = View::Chat;
        self.epoch += 1;
    }

    /// Switch the dashboard to another of its available variables. Uses the
    /// records already held; no backend call is made.
    pub fn select_variable(&mut self, variable_id: &str) -> Result<(), CensusError> {
        let View::Dashboard(dashboard) = &mut self.view else { return Err(CensusError::NotInDashboard) };
        dashboard.select(variable_id, self.sink.as_ref())
    }

    fn boundaries_for(&self, geography_level: &str) -> Result<(GeoType, Arc<BoundaryCollection>), CensusError> {
        let level: GeoType = geography_level.parse()?;
        if !level.is_joinable() {
            return Err(CensusError::UnsupportedGeographyLevel(level.to_string()));
        }
        Ok((level, self.store.get(level)?))
    }

    fn show_map(&mut self, response: MapResponse) -> Result<(), CensusError> {
        self.view = View::Chat;
        let (level, boundaries) = self.boundaries_for(&response.metadata.geography_level)?;
        let summary = response.summary.clone();

        let map = MapView::build(response, &boundaries, level, self.sink.as_ref())?;
        self.view = View::SingleMap(map);
        if let Some(summary) = summary.filter(|s| !s.trim().is_empty()) {
            self.push(Sender::Assistant, &summary, false);
        }
        Ok(())
    }

    fn show_dashboard(&mut self, response: DashboardResponse) -> Result<(), CensusError> {
        self.view = View::Chat;
        let (level, boundaries) = self.boundaries_for(&response.metadata.geography_level)?;
        let summary = response.summary_text.clone();

        let dashboard = DashboardView::build(response, boundaries, level, self.sink.as_ref())?;
        self.view = View::Dashboard(dashboard);
        if let Some(summary) = summary.filter(|s| !s.trim().is_empty()) {
            self.push(Sender::Assistant, &summary, false);
        }
        Ok(())
    }

    fn push(&mut self, sender: Sender, text: &str, is_error: bool) {
        self.messages.push(ChatMessage { sender, text: text.to_string(), is_error });
    }
}

fn failure_message(error: &CensusError) -> String {
    match error {
        CensusError::BackendUnreachable(_) => BACKEND_FAILURE_MESSAGE.to_string(),
        CensusError::UnsupportedGeographyLevel(level) => {
            format!("Sorry, maps at the \"{level}\" geography level are not supported.")
        }
        CensusError::NoDashboardVariables => {
            "Sorry, the dashboard came back without any variables to show.".to_string()
        }
        other => format!("Sorry, something went wrong: {other}"),
    }
}

async fn warm_up(backend: Arc<dyn QueryBackend>) {
    if let Err(e) = backend.ping().await {
        tracing::debug!(error = %e, "backend warm-up ping failed");
    }
}

/// Startup phases around a `Session`.
pub enum AppState {
    /// Boundaries are loading; nothing is interactive.
    Loading,
    Ready(Session),
    /// A boundary level failed to load. The whole load must be retried.
    Failed(CensusError),
}

impl AppState {
    pub async fn boot(
        source: &dyn BoundarySource,
        backend: Arc<dyn QueryBackend>,
        sink: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        match Session::launch(source, backend, sink).await {
            Ok(session) => AppState::Ready(session),
            Err(e) => AppState::Failed(e),
        }
    }

    pub fn is_interactive(&self) -> bool { matches!(self, AppState::Ready(_)) }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match self {
            AppState::Ready(session) => Some(session),
            _ => None,
        }
    }
}
