//! Process glue: configuration, logging and the run itself.
mod app;
mod config;
mod logging;

pub use app::run_app;
