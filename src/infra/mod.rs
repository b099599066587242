//! Infrastructure adapters and runtime bootstrap.

pub mod api;
pub mod drafts;
pub mod error;
pub mod notify;
pub mod render;
pub mod telemetry;
