pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod output;
pub mod services;

pub use app::{App, launch, launch_with};
pub use cli::Tool;
pub use config::{ConfigStore, Settings};
pub use error::{Error, Result};
