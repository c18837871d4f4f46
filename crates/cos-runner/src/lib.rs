pub mod config;
pub mod runner;
pub mod scenario;

pub use config::*;
pub use runner::*;
