pub mod config;
pub mod logging;

pub mod badge;
pub mod error;
pub mod fetch;
pub mod history;
pub mod repo;
pub mod store;
pub mod update;

pub use error::{Result, TrafficError};
