use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::{LabelRenderer, Slot};
use crate::health::StepCountResult;

/// A finished query on its way to the task that owns the display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiUpdate {
    pub slot: Slot,
    pub query_id: Uuid,
    pub day: Option<NaiveDate>,
    pub result: StepCountResult,
}

/// Something with one text label per [`Slot`].
pub trait StepDisplay {
    fn show(&mut self, slot: Slot, text: &str);
}

/// In-memory pair of labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelBoard {
    pub selected_day_count: Option<String>,
    pub live_count: Option<String>,
}

impl LabelBoard {
    pub fn text(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::SelectedDay => self.selected_day_count.as_deref(),
            Slot::Live => self.live_count.as_deref(),
        }
    }
}

impl StepDisplay for LabelBoard {
    fn show(&mut self, slot: Slot, text: &str) {
        let label = match slot {
            Slot::SelectedDay => &mut self.selected_day_count,
            Slot::Live => &mut self.live_count,
        };
        *label = Some(text.to_string());
    }
}

/// Renders `update` into its slot. Must only be called from the display-owning task.
pub fn apply_update(display: &mut dyn StepDisplay, renderer: &LabelRenderer, update: &UiUpdate) {
    let text = renderer.render(update.slot, update.day, &update.result);
    display.show(update.slot, &text);
}
