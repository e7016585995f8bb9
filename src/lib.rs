// Library surface for the binary, headless tests and the share pipeline.
pub mod app;
pub mod app_dirs;
pub mod assets;
pub mod clock;
pub mod config;
pub mod export;
pub mod input;
pub mod logging;
pub mod recorder;
pub mod results;
pub mod round;
pub mod runtime;
pub mod session;
pub mod share;
pub mod time_series;
pub mod timer;
pub mod ui;
pub mod util;

pub use app::{App, AppState};
