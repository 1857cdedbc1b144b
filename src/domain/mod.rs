//! Domain types for the KPI engine.
//!
//! KPI identifiers, requests, result shapes and the event record they are computed over.

mod event;
mod kpi;
mod request;
mod results;

pub use event::*;
pub use kpi::*;
pub use request::*;
pub use results::*;
