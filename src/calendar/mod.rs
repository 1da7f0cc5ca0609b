pub mod window;
pub mod zone;

pub use window::DateWindow;
pub use zone::DayZone;
