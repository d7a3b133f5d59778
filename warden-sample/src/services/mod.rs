//! Services the sample host watches

/// This module contains the HTTP health service
pub mod http;

pub use http::HttpService;
