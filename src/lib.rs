pub mod classify;
pub mod cli;
pub mod config;
pub mod controller;
pub mod domain;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod ui;

pub use controller::HookController;
pub use error::{HookError, Result};
