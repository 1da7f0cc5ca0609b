mod calendar;
mod console;
mod db;
mod error;
mod health;
mod presenter;
mod settings;
mod utils;

use std::{env, ffi::OsString, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use log::{error, info};
use tokio::io::BufReader;

pub use calendar::{DateWindow, DayZone};
pub use console::{ConsoleApp, ConsoleCommand, ConsoleDisplay, Flow};
pub use error::{HealthStoreError, WindowError};
pub use health::{
    AuthorizationOutcome, AuthorizationStatus, FailureKind, HealthDataType, HealthStore,
    QueryFailure, SqliteHealthStore, StatisticsOption, StatisticsQuery, StepCountResult,
};
pub use presenter::{
    apply_update, Clock, LabelBoard, LabelRenderer, PresenterConfig, PresenterSnapshot,
    RefreshState, RefreshStatus, Slot, StepCountPresenter, StepDisplay, SystemClock, UiUpdate,
};
pub use settings::{AppSettings, ErrorRendering, LabelSettings, SettingsStore};

const DATA_DIR_ENV: &str = "STEPWATCH_DATA_DIR";
const DEFAULT_DATA_DIR: &str = ".stepwatch";

fn data_dir() -> PathBuf {
    data_dir_from(env::var_os(DATA_DIR_ENV))
}

fn data_dir_from(value: Option<OsString>) -> PathBuf {
    value
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

async fn start() -> Result<()> {
    let data_dir = data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let settings = Arc::new(SettingsStore::new(data_dir.join("settings.json"))?);
    let config = PresenterConfig::from_settings(&settings.snapshot())?;
    info!(
        "Counting days in zone {}, live refresh every {:?}",
        config.zone, config.refresh_interval
    );

    let store = SqliteHealthStore::open(data_dir.join("health.sqlite3"))?;
    info!("Health samples stored at {}", store.database().path().display());

    let (presenter, updates) = StepCountPresenter::new(Arc::new(store.clone()), config);
    let app = ConsoleApp::new(presenter, store, settings, config.zone, std::io::stdout());

    app.run(BufReader::new(tokio::io::stdin()), updates).await
}

pub fn run() {
    utils::logging::init_logging();

    info!("Stepwatch starting up...");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("error while starting the tokio runtime");

    if let Err(err) = runtime.block_on(start()) {
        error!("Stepwatch exited with an error: {err:#}");
        std::process::exit(1);
    }

    info!("Stepwatch stopped");
}
