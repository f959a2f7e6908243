//! Read-only client for the TeamCity REST API.
//!
//! # Overview
//! Fetches projects, build configurations and builds as XML from a TeamCity
//! server and maps them into typed records. `Project` values can answer
//! which build types and builds belong to them by filtering fresh fetches
//! of the full collections.
//!
//! # Design
//! - `TeamcityClient` is synchronous and stateless between calls — it holds
//!   only host, port and the authentication mode fixed at construction.
//! - Exactly two access modes exist: anonymous guest access and HTTP Basic
//!   against the server's `/httpAuth` namespace.
//! - No pagination (`nextHref` is ignored), no caching, no retries, no write
//!   operations.

pub mod auth;
pub mod client;
pub mod error;
pub mod types;
pub mod xml;

pub use auth::Authentication;
pub use client::TeamcityClient;
pub use error::Error;
pub use types::{Build, BuildStatus, BuildType, Project};
