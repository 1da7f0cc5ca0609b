pub mod clock;
pub mod controller;
pub mod display;
pub mod render;
pub mod state;

pub use clock::{Clock, SystemClock};
pub use controller::{PresenterConfig, PresenterSnapshot, StepCountPresenter};
pub use display::{apply_update, LabelBoard, StepDisplay, UiUpdate};
pub use render::{LabelRenderer, Slot};
pub use state::{RefreshState, RefreshStatus};
