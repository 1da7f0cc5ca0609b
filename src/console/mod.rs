pub mod app;
pub mod commands;
pub mod display;

pub use app::{ConsoleApp, Flow};
pub use commands::ConsoleCommand;
pub use display::ConsoleDisplay;
