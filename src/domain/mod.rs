//! Domain layer types and invariants.

pub mod draft;
pub mod error;
pub mod image;
pub mod posts;
pub mod slug;
pub mod submission;
pub mod tags;
