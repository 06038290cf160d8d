//! Live adapters for real external interactions.

pub mod backend;
pub mod clock;
pub mod filesystem;
