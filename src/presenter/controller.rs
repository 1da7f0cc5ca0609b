use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{Clock, RefreshState, Slot, SystemClock, UiUpdate};
use crate::calendar::{DateWindow, DayZone};
use crate::error::WindowError;
use crate::health::{
    AuthorizationOutcome, HealthDataType, HealthStore, StatisticsQuery, StepCountResult,
};
use crate::settings::AppSettings;

// Set to false to silence refresh/query chatter from this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenterConfig {
    pub refresh_interval: Duration,
    pub zone: DayZone,
}

impl PresenterConfig {
    pub fn from_settings(settings: &AppSettings) -> Result<Self> {
        Ok(Self {
            refresh_interval: settings.refresh_interval(),
            zone: DayZone::from_setting(settings.time_zone.as_deref())?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenterSnapshot {
    pub refresh: RefreshState,
    pub zone: String,
    pub refresh_interval_ms: u64,
}

struct Ticker {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl Ticker {
    fn shutdown(self) {
        self.cancel_token.cancel();
        self.handle.abort();
    }
}

/// Queries step totals for picked days and keeps a live count for today.
///
/// Finished queries are never rendered here: each one is sent as a [`UiUpdate`]
/// to the receiver returned by [`StepCountPresenter::new`], and whoever owns the
/// display applies it.
#[derive(Clone)]
pub struct StepCountPresenter {
    store: Arc<dyn HealthStore>,
    clock: Arc<dyn Clock>,
    config: PresenterConfig,
    updates: mpsc::UnboundedSender<UiUpdate>,
    state: Arc<Mutex<RefreshState>>,
    ticker: Arc<Mutex<Option<Ticker>>>,
}

impl StepCountPresenter {
    pub fn new(
        store: Arc<dyn HealthStore>,
        config: PresenterConfig,
    ) -> (Self, mpsc::UnboundedReceiver<UiUpdate>) {
        let (updates, receiver) = mpsc::unbounded_channel();
        let presenter = Self {
            store,
            clock: Arc::new(SystemClock),
            config,
            updates,
            state: Arc::new(Mutex::new(RefreshState::new())),
            ticker: Arc::new(Mutex::new(None)),
        };
        (presenter, receiver)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Request read access once, then start the live refresh.
    ///
    /// The answer is recorded and logged but does not gate any query.
    pub async fn activate(&self) -> AuthorizationOutcome {
        let outcome = AuthorizationOutcome::from(
            self.store
                .request_authorization(&[HealthDataType::StepCount])
                .await,
        );

        match &outcome {
            AuthorizationOutcome::Granted => log_info!("Step count read access granted"),
            AuthorizationOutcome::Denied => {
                log_warn!("Step count read access denied; live queries will report no data")
            }
            AuthorizationOutcome::Failed(reason) => {
                log_warn!("Step count authorization request failed: {reason}")
            }
            AuthorizationOutcome::Pending => {}
        }

        self.state.lock().await.authorization = outcome.clone();
        self.start_live_refresh().await;
        outcome
    }

    /// Start (or restart) the repeating live query. The first fire is immediate.
    pub async fn start_live_refresh(&self) -> RefreshState {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(previous) = ticker_guard.take() {
            log_info!("Replacing running live refresh");
            previous.shutdown();
        }

        let generation = self.state.lock().await.begin(self.clock.now());
        let cancel_token = CancellationToken::new();

        let refresh = LiveRefresh {
            store: self.store.clone(),
            clock: self.clock.clone(),
            zone: self.config.zone,
            interval: self.config.refresh_interval.max(MIN_REFRESH_INTERVAL),
            updates: self.updates.clone(),
            state: self.state.clone(),
        };
        let handle = tokio::spawn(live_refresh_loop(
            refresh,
            generation,
            cancel_token.clone(),
        ));

        *ticker_guard = Some(Ticker {
            handle,
            cancel_token,
        });

        log_info!(
            "Live refresh started (generation {generation}, every {:?})",
            self.config.refresh_interval
        );

        self.state.lock().await.clone()
    }

    /// Cancel the live refresh. Queries already in flight still deliver their result.
    pub async fn stop_live_refresh(&self) -> bool {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(ticker) = ticker_guard.take() {
            ticker.shutdown();
        }

        let was_running = self.state.lock().await.stop();
        if was_running {
            log_info!("Live refresh stopped");
        }
        was_running
    }

    /// One-shot query for `day`, rendered into the selected-day slot.
    pub fn select_day(&self, day: NaiveDate) -> Uuid {
        self.dispatch(Slot::SelectedDay, self.config.zone.window_for_day(day))
    }

    /// One-shot query for the calendar day that `picked` falls on.
    pub fn select_date(&self, picked: DateTime<Utc>) -> Uuid {
        self.dispatch(Slot::SelectedDay, self.config.zone.window_containing(picked))
    }

    pub async fn teardown(&self) {
        self.stop_live_refresh().await;
        log_debug!("Presenter torn down");
    }

    pub async fn snapshot(&self) -> PresenterSnapshot {
        PresenterSnapshot {
            refresh: self.state.lock().await.clone(),
            zone: self.config.zone.to_string(),
            refresh_interval_ms: u64::try_from(self.config.refresh_interval.as_millis())
                .unwrap_or(u64::MAX),
        }
    }

    fn dispatch(&self, slot: Slot, window: Result<DateWindow, WindowError>) -> Uuid {
        dispatch_query(self.store.clone(), self.updates.clone(), slot, window)
    }
}

struct LiveRefresh {
    store: Arc<dyn HealthStore>,
    clock: Arc<dyn Clock>,
    zone: DayZone,
    interval: Duration,
    updates: mpsc::UnboundedSender<UiUpdate>,
    state: Arc<Mutex<RefreshState>>,
}

async fn live_refresh_loop(refresh: LiveRefresh, generation: u64, cancel_token: CancellationToken) {
    let mut ticker = time::interval(refresh.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => break,
            _ = ticker.tick() => {
                if refresh.updates.is_closed() {
                    let mut state = refresh.state.lock().await;
                    if state.generation == generation {
                        state.stop();
                    }
                    log_info!("Display closed; live refresh exiting");
                    break;
                }

                // Today is recomputed on every fire so the window rolls over at midnight.
                let now = refresh.clock.now();
                if !refresh.state.lock().await.record_fire(generation, now) {
                    break;
                }

                dispatch_query(
                    refresh.store.clone(),
                    refresh.updates.clone(),
                    Slot::Live,
                    refresh.zone.window_containing(now),
                );
            }
        }
    }
}

fn dispatch_query(
    store: Arc<dyn HealthStore>,
    updates: mpsc::UnboundedSender<UiUpdate>,
    slot: Slot,
    window: Result<DateWindow, WindowError>,
) -> Uuid {
    let (query_id, day, pending) = match window {
        Ok(window) => {
            let query = StatisticsQuery::step_count_sum(window);
            (query.id, Some(window.day), Ok(query))
        }
        Err(err) => (Uuid::new_v4(), None, Err(err)),
    };

    tokio::spawn(async move {
        let result = match pending {
            Ok(query) => {
                log_debug!(
                    "Query {} for {:?}: [{}, {})",
                    query.id,
                    slot,
                    query.window.start,
                    query.window.end
                );
                StepCountResult::from_sum(store.execute_statistics(&query).await)
            }
            Err(err) => {
                log_warn!("Could not resolve day window for {:?}: {err}", slot);
                StepCountResult::Error(err.into())
            }
        };

        log_debug!("Query {query_id} finished: {result:?}");

        let update = UiUpdate {
            slot,
            query_id,
            day,
            result,
        };
        if updates.send(update).is_err() {
            log_debug!("Display closed before query {query_id} completed");
        }
    });

    query_id
}
