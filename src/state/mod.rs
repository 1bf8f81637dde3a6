//! In-memory state for interactive use
//!
//! Stores hold fetched records along with a loading flag and the message of
//! the last failure. They are plain values passed around explicitly.

pub mod store;
pub mod workspace;

pub use store::Store;
pub use workspace::EventWorkspace;
