//! Blocking client for the auto.ria.com developer API.
//!
//! # Overview
//! Wraps the read-only reference endpoints of the auto.ria.com classifieds
//! API (categories, marks, models, regions and so on). Each call builds a
//! query-string GET against the configured base URL, appends the API key,
//! executes it through a `Transport` and returns the decoded JSON.
//!
//! # Design
//! - `AutoRiaClient` holds only immutable configuration and a transport.
//! - `Resource` describes one request; `build` and `parse` are public so
//!   callers can run the HTTP round-trip themselves.
//! - Response bodies are returned as `serde_json::Value` because upstream
//!   shapes differ per endpoint and per listing mode.
//!
//! ```no_run
//! use autoria_core::{AutoRiaClient, ListOptions};
//!
//! let client = AutoRiaClient::new("your-api-key")?;
//! let marks = client.marks("1")?;
//! let grouped = client.models("1", "9", ListOptions::grouped())?;
//! # Ok::<(), autoria_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::AutoRiaClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, Result};
pub use http::{HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{AveragePriceQuery, ListMode, ListOptions, Resource};
