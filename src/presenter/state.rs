use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::health::AuthorizationOutcome;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum RefreshStatus {
    #[default]
    Stopped,
    Running,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshState {
    pub status: RefreshStatus,
    /// Bumped on every start so a replaced ticker can tell it is stale.
    pub generation: u64,
    /// Live queries issued since the presenter was created.
    pub fires: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub last_fired_at: Option<DateTime<Utc>>,
    pub authorization: AuthorizationOutcome,
}

impl Default for RefreshState {
    fn default() -> Self {
        Self {
            status: RefreshStatus::Stopped,
            generation: 0,
            fires: 0,
            started_at: None,
            last_fired_at: None,
            authorization: AuthorizationOutcome::Pending,
        }
    }
}

impl RefreshState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.status == RefreshStatus::Running
    }

    /// Enter `Running` under a fresh generation and return it.
    pub fn begin(&mut self, now: DateTime<Utc>) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.status = RefreshStatus::Running;
        self.started_at = Some(now);
        self.generation
    }

    /// Count a fire from `generation`; returns false if that ticker has been superseded or stopped.
    pub fn record_fire(&mut self, generation: u64, now: DateTime<Utc>) -> bool {
        if !self.is_running() || generation != self.generation {
            return false;
        }
        self.fires = self.fires.saturating_add(1);
        self.last_fired_at = Some(now);
        true
    }

    pub fn stop(&mut self) -> bool {
        let was_running = self.is_running();
        self.status = RefreshStatus::Stopped;
        self.started_at = None;
        was_running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_from_superseded_generation_are_ignored() {
        let now = Utc::now();
        let mut state = RefreshState::new();
        let first = state.begin(now);
        let second = state.begin(now);

        assert!(!state.record_fire(first, now));
        assert!(state.record_fire(second, now));
        assert_eq!(state.fires, 1);
    }

    #[test]
    fn stopped_state_rejects_fires() {
        let now = Utc::now();
        let mut state = RefreshState::new();
        let generation = state.begin(now);

        assert!(state.stop());
        assert!(!state.stop());
        assert!(!state.record_fire(generation, now));
        assert_eq!(state.status, RefreshStatus::Stopped);
        assert_eq!(state.fires, 0);
    }
}
