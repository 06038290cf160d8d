//! Cassette format for recording and replaying port interactions.
//!
//! Setting `APPGEN_RECORD=<dir>` captures a real backend session into
//! per-port cassettes; tests and `APPGEN_REPLAY=<file>` serve them back.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
