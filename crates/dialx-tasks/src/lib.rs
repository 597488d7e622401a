pub mod config;
pub mod logging;
pub mod output;
pub mod runner;
pub mod scenarios;

pub use config::TaskConfig;
pub use logging::init_logging;
pub use runner::{run_all, Runner};
