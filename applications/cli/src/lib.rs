//! Greenroom CLI
//!
//! Terminal front end for the Greenroom client libraries: sign in, record
//! plays into the offline queue, sync them, and browse the recently-played
//! feed.

pub mod app;
pub mod commands;
pub mod config;
pub mod error;

pub use app::App;
pub use config::GreenroomConfig;
pub use error::{CliError, Result};
