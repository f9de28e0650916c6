//! # API Shared
//!
//! Shared definitions for the Carevault HTTP API.
//!
//! Contains:
//! - Request/response wire types (`wire` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `api-rest`; kept separate so the wire contract does not depend on the HTTP framework.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
