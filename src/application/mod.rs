//! Authoring engine: draft persistence, uploads, the form and its flows.

pub mod drafts;
pub mod error;
pub mod flows;
pub mod form;
pub mod metrics;
pub mod ports;
pub mod preview;
pub mod search;
pub mod uploads;

#[cfg(test)]
pub(crate) mod testing;
