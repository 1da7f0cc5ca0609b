use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use stepwatch_lib::{
    apply_update, AuthorizationStatus, Clock, DateWindow, DayZone, HealthDataType, HealthStore,
    HealthStoreError, LabelBoard, LabelRenderer, LabelSettings, PresenterConfig, RefreshStatus,
    Slot, SqliteHealthStore, StatisticsQuery, StepCountPresenter,
};
use tempfile::TempDir;

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn instant(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .unwrap()
        .with_timezone(&Utc)
}

fn new_york_config() -> PresenterConfig {
    PresenterConfig {
        refresh_interval: Duration::from_secs(5),
        zone: DayZone::Named(chrono_tz::America::New_York),
    }
}

#[tokio::test]
async fn spring_forward_day_end_to_end() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = SqliteHealthStore::open(dir.path().join("health.sqlite3"))?;

    store.record_steps(800.0, instant("2024-03-10T00:00:00-05:00")).await?;
    store.record_steps(434.7, instant("2024-03-10T23:59:59-04:00")).await?;
    store.record_steps(999.0, instant("2024-03-11T00:00:00-04:00")).await?;

    let clock = Arc::new(FixedClock(instant("2024-03-10T12:00:00-04:00")));
    let (presenter, mut updates) =
        StepCountPresenter::new(Arc::new(store.clone()), new_york_config());
    let presenter = presenter.with_clock(clock);

    let renderer = LabelRenderer::new(LabelSettings::default());
    let mut board = LabelBoard::default();

    presenter.activate().await;
    let live = updates.recv().await.expect("live update");
    apply_update(&mut board, &renderer, &live);
    assert_eq!(board.text(Slot::Live), Some("Now: 1234 steps"));
    assert_eq!(board.text(Slot::SelectedDay), None);

    let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    presenter.select_day(day);
    let picked = loop {
        let update = updates.recv().await.expect("selected-day update");
        if update.slot == Slot::SelectedDay {
            break update;
        }
    };
    apply_update(&mut board, &renderer, &picked);
    assert_eq!(board.text(Slot::SelectedDay), Some("2024-03-10\n 1234 steps"));

    let window = DateWindow::for_day(day, &chrono_tz::America::New_York)?;
    assert_eq!(window.duration(), chrono::Duration::hours(23));

    presenter.teardown().await;
    assert_eq!(
        presenter.snapshot().await.refresh.status,
        RefreshStatus::Stopped
    );
    Ok(())
}

struct CountingStore {
    calls: AtomicUsize,
}

#[async_trait]
impl HealthStore for CountingStore {
    async fn request_authorization(
        &self,
        _read: &[HealthDataType],
    ) -> Result<AuthorizationStatus, HealthStoreError> {
        Ok(AuthorizationStatus::Granted)
    }

    async fn execute_statistics(
        &self,
        _query: &StatisticsQuery,
    ) -> Result<Option<f64>, HealthStoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

#[tokio::test(start_paused = true)]
async fn teardown_cancels_the_live_refresh() {
    let store = Arc::new(CountingStore {
        calls: AtomicUsize::new(0),
    });
    let (presenter, _updates) = StepCountPresenter::new(store.clone(), new_york_config());

    presenter.activate().await;
    tokio::time::sleep(Duration::from_millis(5_500)).await;
    assert_eq!(store.calls.load(Ordering::SeqCst), 2);

    presenter.teardown().await;
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(store.calls.load(Ordering::SeqCst), 2);
}
