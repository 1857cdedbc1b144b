//! HTTP API layer for the KPI engine.
//!
//! Provides REST endpoints for the KPI catalog, KPI computation and event ingestion.

pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
