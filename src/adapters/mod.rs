//! Port implementations.
//!
//! - `live`: real clock, disk and HTTP backend.
//! - `recording`: wrap a live adapter and write every interaction to a cassette.
//! - `replaying`: serve interactions from a cassette.
//! - `memory`: in-process stand-ins used by tests.

pub mod live;
pub mod memory;
pub mod recording;
pub mod replaying;
