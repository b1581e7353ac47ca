use parking_lot::RwLock;
use std::sync::Arc;
use telemetry::tinygs::fetcher::StationFetcher;
use telemetry::tinygs::load_station_view;
use telemetry::tinygs::view::StationView;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What the panel shows. Exactly one state is active at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PanelState {
    #[default]
    Idle,
    Loading,
    Loaded(StationView),
    Failed(String),
}

struct InFlight {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Drives fetches for one station view, keeping at most one request in flight.
pub struct PanelController {
    fetcher: Arc<StationFetcher>,
    station: Arc<str>,
    state: Arc<RwLock<PanelState>>,
    changed: Arc<Notify>,
    shutdown: CancellationToken,
    in_flight: Option<InFlight>,
}

impl PanelController {
    pub fn new(fetcher: StationFetcher, station: &str, shutdown: CancellationToken) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            station: Arc::from(station),
            state: Arc::new(RwLock::new(PanelState::Idle)),
            changed: Arc::new(Notify::new()),
            shutdown,
            in_flight: None,
        }
    }

    pub fn state(&self) -> PanelState {
        self.state.read().clone()
    }

    /// Signalled every time the state changes.
    pub fn changed(&self) -> Arc<Notify> {
        Arc::clone(&self.changed)
    }

    /// Cancels any in-flight fetch, switches to `Loading`, and starts a new fetch.
    pub fn refresh(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            debug!("cancelling in-flight station fetch");
            previous.token.cancel();
        }

        *self.state.write() = PanelState::Loading;
        self.changed.notify_one();

        let token = self.shutdown.child_token();
        let handle = tokio::spawn(run_fetch(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.station),
            Arc::clone(&self.state),
            Arc::clone(&self.changed),
            token.clone(),
        ));
        self.in_flight = Some(InFlight { token, handle });
    }

    /// Waits for the current fetch, if any, to finish or be cancelled.
    pub async fn settle(&mut self) -> Result<(), tokio::task::JoinError> {
        match self.in_flight.take() {
            Some(in_flight) => in_flight.handle.await,
            None => Ok(()),
        }
    }
}

async fn run_fetch(
    fetcher: Arc<StationFetcher>,
    station: Arc<str>,
    state: Arc<RwLock<PanelState>>,
    changed: Arc<Notify>,
    token: CancellationToken,
) {
    let outcome = tokio::select! {
        _ = token.cancelled() => {
            debug!(station = %station, "station fetch cancelled");
            return;
        }
        res = load_station_view(&fetcher, &station) => res,
    };

    let next = match outcome {
        Ok(view) => {
            info!(station = %station, "loaded station details");
            PanelState::Loaded(view)
        }
        Err(e) => {
            warn!(station = %station, error = ?e, "failed to load station details");
            PanelState::Failed(e.user_message().to_string())
        }
    };

    // Checked under the lock so a superseded fetch can never overwrite a newer state.
    let mut guard = state.write();
    if token.is_cancelled() {
        debug!(station = %station, "discarding result of superseded station fetch");
        return;
    }
    *guard = next;
    drop(guard);
    changed.notify_one();
}
