pub mod api;
pub mod backend;
pub mod classifier;
pub mod config;
pub mod credentials;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod request;

pub use error::{EdgeMetricsError, Result};
