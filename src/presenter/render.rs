use chrono::NaiveDate;
use serde::Serialize;

use crate::health::StepCountResult;
use crate::settings::{ErrorRendering, LabelSettings};

/// The two text labels a presenter writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Slot {
    /// Result for a day picked by the user.
    SelectedDay,
    /// Periodically refreshed count for today.
    Live,
}

impl Slot {
    pub fn label_id(&self) -> &'static str {
        match self {
            Slot::SelectedDay => "selectedDayCount",
            Slot::Live => "liveCount",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LabelRenderer {
    labels: LabelSettings,
}

impl LabelRenderer {
    pub fn new(labels: LabelSettings) -> Self {
        Self { labels }
    }

    pub fn render(&self, slot: Slot, day: Option<NaiveDate>, result: &StepCountResult) -> String {
        match (result, slot, day) {
            (StepCountResult::Success { count }, Slot::SelectedDay, Some(day)) => {
                format!("{}\n {} {}", day.format("%Y-%m-%d"), count, self.labels.unit)
            }
            (StepCountResult::Success { count }, Slot::SelectedDay, None) => {
                format!("{} {}", count, self.labels.unit)
            }
            (StepCountResult::Success { count }, Slot::Live, _) => {
                format!("{}: {} {}", self.labels.live_prefix, count, self.labels.unit)
            }
            (StepCountResult::Unavailable, _, _) => self.labels.unavailable_text.clone(),
            (StepCountResult::Error(failure), _, _) => match self.labels.error_rendering {
                ErrorRendering::Collapsed => self.labels.unavailable_text.clone(),
                ErrorRendering::Detailed => {
                    format!("{} ({})", self.labels.unavailable_text, failure.reason)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HealthStoreError;
    use crate::health::HealthDataType;

    fn day() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 3, 10)
    }

    fn denied() -> StepCountResult {
        StepCountResult::from_sum(Err(HealthStoreError::AuthorizationDenied(
            HealthDataType::StepCount,
        )))
    }

    #[test]
    fn renders_truncated_count_in_both_slots() {
        let renderer = LabelRenderer::new(LabelSettings::default());
        let result = StepCountResult::from_sum(Ok(Some(1234.7)));

        assert_eq!(
            renderer.render(Slot::SelectedDay, day(), &result),
            "2024-03-10\n 1234 steps"
        );
        assert_eq!(renderer.render(Slot::Live, day(), &result), "Now: 1234 steps");
    }

    #[test]
    fn unavailable_uses_placeholder_in_both_slots() {
        let renderer = LabelRenderer::new(LabelSettings::default());
        let placeholder = LabelSettings::default().unavailable_text;

        for slot in [Slot::SelectedDay, Slot::Live] {
            assert_eq!(
                renderer.render(slot, day(), &StepCountResult::Unavailable),
                placeholder
            );
        }
    }

    #[test]
    fn collapsed_mode_hides_failure_kind() {
        let renderer = LabelRenderer::new(LabelSettings::default());
        assert_eq!(
            renderer.render(Slot::Live, day(), &denied()),
            renderer.render(Slot::Live, day(), &StepCountResult::Unavailable)
        );
    }

    #[test]
    fn detailed_mode_appends_reason() {
        let renderer = LabelRenderer::new(LabelSettings {
            error_rendering: ErrorRendering::Detailed,
            ..LabelSettings::default()
        });

        let text = renderer.render(Slot::Live, day(), &denied());
        assert_eq!(
            text,
            "Could not retrieve step count (read access to stepCount was denied)"
        );
        assert_eq!(
            renderer.render(Slot::Live, day(), &StepCountResult::Unavailable),
            "Could not retrieve step count"
        );
    }

    #[test]
    fn custom_labels_are_used() {
        let renderer = LabelRenderer::new(LabelSettings {
            unit: "歩".into(),
            live_prefix: "Live".into(),
            unavailable_text: "取得できませんでした".into(),
            error_rendering: ErrorRendering::Collapsed,
        });
        let result = StepCountResult::Success { count: 8 };

        assert_eq!(renderer.render(Slot::Live, None, &result), "Live: 8 歩");
        assert_eq!(
            renderer.render(Slot::SelectedDay, None, &StepCountResult::Unavailable),
            "取得できませんでした"
        );
    }
}
