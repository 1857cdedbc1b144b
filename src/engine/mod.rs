//! KPI engine.
//!
//! - Request Normalizer: validates windows and clamps options
//! - Query Builder: compiles a KPI request into a store query
//! - Result Parser: reads aggregation responses into typed results
//! - Dispatcher: runs one KPI end to end against the store
//! - Registry: static catalog of KPI definitions

mod dispatcher;
mod normalizer;
mod parser;
mod plan;
mod query;
mod registry;

pub use dispatcher::*;
pub use normalizer::*;
pub use registry::*;
