use std::{io::Write, sync::Arc};

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc,
};

use super::{commands::HELP, ConsoleCommand, ConsoleDisplay};
use crate::calendar::DayZone;
use crate::health::{AuthorizationStatus, SqliteHealthStore};
use crate::presenter::{
    apply_update, LabelBoard, LabelRenderer, PresenterSnapshot, StepCountPresenter, UiUpdate,
};
use crate::settings::SettingsStore;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport<'a> {
    presenter: PresenterSnapshot,
    labels: &'a LabelBoard,
}

/// Owns the display and is the only place labels are written.
pub struct ConsoleApp<W: Write> {
    presenter: StepCountPresenter,
    store: SqliteHealthStore,
    settings: Arc<SettingsStore>,
    renderer: LabelRenderer,
    zone: DayZone,
    display: ConsoleDisplay<W>,
}

impl<W: Write> ConsoleApp<W> {
    pub fn new(
        presenter: StepCountPresenter,
        store: SqliteHealthStore,
        settings: Arc<SettingsStore>,
        zone: DayZone,
        out: W,
    ) -> Self {
        let renderer = LabelRenderer::new(settings.labels());
        Self {
            presenter,
            store,
            settings,
            renderer,
            zone,
            display: ConsoleDisplay::new(out),
        }
    }

    pub fn display(&self) -> &ConsoleDisplay<W> {
        &self.display
    }

    /// Activate the presenter, then serve commands until `quit`, end of input or ctrl-c.
    pub async fn run<R>(
        mut self,
        input: R,
        mut updates: mpsc::UnboundedReceiver<UiUpdate>,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        self.presenter.activate().await;
        self.display.println("type 'help' for commands");

        loop {
            tokio::select! {
                Some(update) = updates.recv() => self.render(&update),
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        log_info!("Input closed");
                        break;
                    };
                    if self.handle_line(&line).await == Flow::Quit {
                        break;
                    }
                }
                _ = &mut shutdown => {
                    log_info!("Interrupted");
                    break;
                }
            }
        }

        self.presenter.teardown().await;
        Ok(())
    }

    pub fn render(&mut self, update: &UiUpdate) {
        apply_update(&mut self.display, &self.renderer, update);
    }

    /// Parse and run one line; failures are printed and never end the session.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let command = match ConsoleCommand::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Flow::Continue,
            Err(err) => {
                self.display.println(&format!("error: {err:#}"));
                return Flow::Continue;
            }
        };

        match self.handle(command).await {
            Ok(flow) => flow,
            Err(err) => {
                log_error!("Command '{}' failed: {err:#}", line.trim());
                self.display.println(&format!("error: {err:#}"));
                Flow::Continue
            }
        }
    }

    pub async fn handle(&mut self, command: ConsoleCommand) -> Result<Flow> {
        match command {
            ConsoleCommand::Start => {
                self.presenter.start_live_refresh().await;
                self.display.println("live count running");
            }
            ConsoleCommand::Stop => {
                if self.presenter.stop_live_refresh().await {
                    self.display.println("live count stopped");
                } else {
                    self.display.println("live count was not running");
                }
            }
            ConsoleCommand::Pick(day) => {
                self.presenter.select_day(day);
            }
            ConsoleCommand::Add { count, at } => {
                let sample = self
                    .store
                    .record_steps(count, at.unwrap_or_else(Utc::now))
                    .await?;
                self.display.println(&format!(
                    "recorded {} steps at {}",
                    sample.count,
                    sample.recorded_at.to_rfc3339()
                ));
            }
            ConsoleCommand::List(day) => {
                let window = self.zone.window_for_day(day)?;
                let samples = self.store.samples_in(&window).await?;
                if samples.is_empty() {
                    self.display.println(&format!("no samples on {day}"));
                }
                for sample in samples {
                    self.display.println(&format!(
                        "{}  {:>8}  {}",
                        sample.recorded_at.to_rfc3339(),
                        sample.count,
                        sample.source
                    ));
                }
            }
            ConsoleCommand::Grant => {
                self.store
                    .set_authorization(AuthorizationStatus::Granted)
                    .await?;
                self.display.println("step count access granted");
            }
            ConsoleCommand::Revoke => {
                self.store
                    .set_authorization(AuthorizationStatus::Denied)
                    .await?;
                self.display.println("step count access revoked");
            }
            ConsoleCommand::Errors(mode) => {
                let labels = self.settings.update_error_rendering(mode)?;
                self.renderer = LabelRenderer::new(labels);
                self.display.println(&format!("error rendering: {mode:?}"));
            }
            ConsoleCommand::Status => {
                let report = StatusReport {
                    presenter: self.presenter.snapshot().await,
                    labels: self.display.board(),
                };
                let text = serde_json::to_string_pretty(&report)?;
                self.display.println(&text);
            }
            ConsoleCommand::Help => self.display.println(HELP),
            ConsoleCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }
}
