//! Synchronous client for the Klout social-influence API.
//!
//! # Overview
//! `KloutClient` resolves request paths against a base URL, attaches the API
//! key and the fixed header set, performs the round-trip through a
//! `Transport`, and maps the status code to a typed `ApiError`.
//!
//! # Design
//! - The client is an explicit value built from a `ClientConfig`; there is no
//!   process-wide state.
//! - `build_request` and `parse_response` are public so a host can perform
//!   the I/O itself (see the FFI crate).
//! - Typed records (`Identity`, `User`, ...) sit on top of the raw
//!   `serde_json::Value` API.
//! - TLS certificate verification is on unless
//!   `ClientConfig::danger_accept_invalid_certs` is set.

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod resolve;
pub mod transport;
pub mod types;

pub use client::KloutClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DISABLED_BODY, USER_AGENT};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Identity, Influence, InfluenceEntity, InfluenceEntry, Score, ScoreDeltas, Topic, User,
    UserScore,
};
