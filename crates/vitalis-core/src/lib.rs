//! Vitalis Core - Shared functionality for all Vitalis tools
//!
//! Wellness tracking from the terminal: workouts, cycle, sleep and mood.

pub mod assist;
pub mod config;
pub mod format;
pub mod gemini;
pub mod paths;
pub mod store;

pub use assist::Assistant;
pub use config::VitalisConfig;
pub use paths::Paths;
pub use store::KvStore;
