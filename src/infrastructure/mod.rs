//! Infrastructure layer providing external service integrations.
//!
//! This module contains the HTTP clients for the pricing and address
//! services, the worker dispatcher, the clipboard and the log sink.

pub mod clipboard;
pub mod config;
pub mod dispatcher;
pub mod http;
pub mod logging;

pub use clipboard::ClipboardSink;
pub use config::{ConfigError, ServiceConfig};
pub use dispatcher::Dispatcher;
pub use http::HttpGateway;
