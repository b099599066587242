//! Post-authoring engine for Soffio-style blogs.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub(crate) mod util;
