//! tablealter_client - command-line shell around `tablealter_core`.

pub mod admin;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod propagator;
pub mod storage;

pub use admin::{Admin, AlterOptions, AlterOutcome};
pub use config::Config;
pub use error::{ClientError, Result};
