//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system (time, filesystem, generator backend). Implementations
//! live in `src/adapters/`.

pub mod backend;
pub mod clock;
pub mod filesystem;

pub use backend::{
    BackendClient, BackendFuture, ChatReply, GenerateRequest, GeneratedProject, StoreRequest,
};
pub use clock::Clock;
pub use filesystem::FileSystem;

/// Error type returned by the synchronous ports.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
