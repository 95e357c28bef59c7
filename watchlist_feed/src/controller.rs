//! Acquisition controller.
//!
//! Owns the authoritative instrument snapshot and the `Idle → Loading → {Ready | Failed}`
//! state machine around the repository. An acquisition only starts through an explicit
//! trigger; there is no polling and no automatic retry.
//!
//! The state lives in a `tokio::sync::watch` channel. The `Loading` guard is a single
//! `send_if_modified` call, so checking the phase and entering `Loading` happen under
//! one lock and at most one repository call is ever outstanding. Every transition is
//! published to subscribers as one consistent value. An acquisition that ends without
//! a result, because its trigger was cancelled or the repository panicked, settles as
//! `Failed` so a new trigger is always accepted.

use std::sync::{Arc, Weak};

use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use watchlist_common::{Instrument, Result, WatchlistError};

use crate::repository::InstrumentRepository;

/// Error message recorded when an acquisition ends without a result.
pub const ABANDONED_MESSAGE: &str = "Acquisition was cancelled before it settled";

/// Phase of the acquisition state machine.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Phase {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    /// A repository call is outstanding.
    Loading,
    /// The last acquisition succeeded.
    Ready,
    /// The last acquisition failed; the previous snapshot, if any, is still held.
    Failed,
}

/// Whole observable state of the controller.
#[derive(Debug, Clone, Default)]
pub struct AcquisitionState {
    /// Current phase.
    pub phase: Phase,
    /// Last successfully acquired snapshot.
    pub snapshot: Option<Arc<[Instrument]>>,
    /// Error of the last acquisition, cleared when a new one starts.
    pub last_error: Option<WatchlistError>,
}

impl AcquisitionState {
    /// `true` while a repository call is outstanding.
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Rows of the last good snapshot, empty if none was ever acquired.
    pub fn rows(&self) -> &[Instrument] {
        self.snapshot.as_deref().unwrap_or(&[])
    }
}

/// Result of a trigger request.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TriggerOutcome {
    /// An acquisition was already in flight; nothing was started.
    AlreadyLoading,
    /// The acquisition ran and settled in the given phase.
    Settled(Phase),
}

/// Drives acquisitions against a repository and exposes their state.
pub struct AcquisitionController<R> {
    repository: Arc<R>,
    state: Arc<watch::Sender<AcquisitionState>>,
}

impl<R: InstrumentRepository + 'static> AcquisitionController<R> {
    /// Create an idle controller over `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        let (state, _) = watch::channel(AcquisitionState::default());
        Self {
            repository,
            state: Arc::new(state),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    /// Last good snapshot, or an empty slice.
    pub fn snapshot(&self) -> Arc<[Instrument]> {
        self.state
            .borrow()
            .snapshot
            .clone()
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    /// Error of the last acquisition, if it failed.
    pub fn last_error(&self) -> Option<WatchlistError> {
        self.state.borrow().last_error.clone()
    }

    /// Consistent copy of phase, snapshot and error.
    pub fn state(&self) -> AcquisitionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<AcquisitionState> {
        self.state.subscribe()
    }

    /// Run one acquisition unless one is already in flight.
    ///
    /// Suspends only while awaiting the repository. A failure is recorded in the state
    /// and never returned to the caller.
    pub async fn trigger(&self) -> TriggerOutcome {
        let Some(flight) = begin(&self.state) else {
            debug!("Acquisition already in flight; trigger ignored");
            return TriggerOutcome::AlreadyLoading;
        };
        let result = self.repository.acquire().await;
        TriggerOutcome::Settled(flight.settle(result).unwrap_or(Phase::Failed))
    }

    /// Start an acquisition on a background task.
    ///
    /// Returns `None` when one is already in flight. The task keeps only a weak handle to
    /// the controller state: if the controller is dropped before the repository settles,
    /// the result is discarded.
    pub fn spawn_trigger(&self) -> Option<JoinHandle<()>> {
        let Some(flight) = begin(&self.state) else {
            debug!("Acquisition already in flight; trigger ignored");
            return None;
        };

        let repository = Arc::clone(&self.repository);
        Some(tokio::spawn(async move {
            let result = repository.acquire().await;
            if flight.settle(result).is_none() {
                debug!("Controller dropped before acquisition settled; result discarded");
            }
        }))
    }
}

/// One outstanding repository call.
///
/// Dropped without [`InFlight::settle`] (the trigger future was cancelled or the
/// repository panicked), it moves the state to `Failed` so the controller never stays
/// in `Loading` with nothing outstanding.
struct InFlight {
    state: Weak<watch::Sender<AcquisitionState>>,
    settled: bool,
}

impl InFlight {
    /// Record `result`. `None` if the controller is gone.
    fn settle(mut self, result: Result<Vec<Instrument>>) -> Option<Phase> {
        self.settled = true;
        let state = self.state.upgrade()?;
        Some(settle(&state, result))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if let Some(state) = self.state.upgrade() {
            settle(
                &state,
                Err(WatchlistError::AcquisitionFailure(ABANDONED_MESSAGE.to_string())),
            );
        }
    }
}

/// Enter `Loading` unless already there.
fn begin(state: &Arc<watch::Sender<AcquisitionState>>) -> Option<InFlight> {
    let started = state.send_if_modified(|s| {
        if s.phase == Phase::Loading {
            return false;
        }
        s.phase = Phase::Loading;
        s.last_error = None;
        true
    });
    if !started {
        return None;
    }
    info!("Acquisition started");
    Some(InFlight {
        state: Arc::downgrade(state),
        settled: false,
    })
}

fn settle(state: &watch::Sender<AcquisitionState>, result: Result<Vec<Instrument>>) -> Phase {
    let phase = match &result {
        Ok(rows) => {
            info!("Acquisition succeeded with {} instruments", rows.len());
            Phase::Ready
        }
        Err(err) => {
            warn!("Acquisition failed: {}", err);
            Phase::Failed
        }
    };
    state.send_modify(|s| {
        s.phase = phase;
        match result {
            Ok(rows) => {
                s.snapshot = Some(Arc::from(rows));
                s.last_error = None;
            }
            Err(err) => s.last_error = Some(err),
        }
    });
    phase
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use watchlist_common::instrument::base_instruments;

    use std::time::Duration;

    struct Fixed(Result<Vec<Instrument>>);

    struct Slow(Duration);

    #[async_trait]
    impl InstrumentRepository for Slow {
        async fn acquire(&self) -> Result<Vec<Instrument>> {
            tokio::time::sleep(self.0).await;
            Ok(base_instruments(Utc::now()))
        }
    }

    struct Panicking;

    #[async_trait]
    impl InstrumentRepository for Panicking {
        async fn acquire(&self) -> Result<Vec<Instrument>> {
            panic!("feed blew up")
        }
    }

    #[async_trait]
    impl InstrumentRepository for Fixed {
        async fn acquire(&self) -> Result<Vec<Instrument>> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn starts_idle_and_empty() {
        let controller = AcquisitionController::new(Arc::new(Fixed(Ok(Vec::new()))));
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.snapshot().is_empty());
        assert!(controller.last_error().is_none());
    }

    #[tokio::test]
    async fn success_replaces_snapshot() {
        let rows = base_instruments(Utc::now());
        let controller = AcquisitionController::new(Arc::new(Fixed(Ok(rows.clone()))));
        assert_eq!(controller.trigger().await, TriggerOutcome::Settled(Phase::Ready));
        assert_eq!(&*controller.snapshot(), rows.as_slice());
    }

    #[tokio::test]
    async fn failure_surfaces_error() {
        let err = WatchlistError::AcquisitionFailure("down".into());
        let controller = AcquisitionController::new(Arc::new(Fixed(Err(err.clone()))));
        assert_eq!(controller.trigger().await, TriggerOutcome::Settled(Phase::Failed));
        assert_eq!(controller.last_error(), Some(err));
        assert!(controller.state().rows().is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_transitions() {
        let controller = AcquisitionController::new(Arc::new(Fixed(Ok(base_instruments(Utc::now())))));
        let mut rx = controller.subscribe();
        controller.trigger().await;
        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.phase, Phase::Ready);
        assert_eq!(seen.rows().len(), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_trigger_can_be_retried() {
        let controller = AcquisitionController::new(Arc::new(Slow(Duration::from_secs(1))));
        let timed_out = tokio::time::timeout(Duration::from_millis(100), controller.trigger()).await;
        assert!(timed_out.is_err());

        assert_eq!(controller.phase(), Phase::Failed);
        assert_eq!(
            controller.last_error(),
            Some(WatchlistError::AcquisitionFailure(ABANDONED_MESSAGE.to_string()))
        );

        assert_eq!(controller.trigger().await, TriggerOutcome::Settled(Phase::Ready));
        assert_eq!(controller.snapshot().len(), 12);
        assert!(controller.last_error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_refresh_keeps_previous_snapshot() {
        let controller = AcquisitionController::new(Arc::new(Slow(Duration::from_secs(1))));
        controller.trigger().await;
        let before = controller.snapshot();

        let _ = tokio::time::timeout(Duration::from_millis(10), controller.trigger()).await;
        assert_eq!(controller.phase(), Phase::Failed);
        assert!(Arc::ptr_eq(&before, &controller.snapshot()));
    }

    #[tokio::test]
    async fn panicking_repository_does_not_wedge_loading() {
        let controller = AcquisitionController::new(Arc::new(Panicking));
        let handle = controller.spawn_trigger().unwrap();
        assert!(handle.await.unwrap_err().is_panic());

        assert_eq!(controller.phase(), Phase::Failed);
        assert!(controller.spawn_trigger().is_some());
    }
}
