//! Transport implementations.
//!
//! [`HyperTransport`] is the default [`tether_core::Transport`]: a pooled
//! hyper-util client with rustls TLS, per-request timeouts, and tracing
//! instrumentation.

mod config;
mod connector;
mod hyper;

pub use config::{TransportConfig, TransportConfigBuilder};
pub use connector::https_connector;
pub use hyper::HyperTransport;
