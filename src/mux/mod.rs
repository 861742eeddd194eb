//! Container muxing
//!
//! The writer seam for the external muxer service and the coordinator
//! that gates and serializes access to it.

pub mod coordinator;
pub mod writer;

pub use coordinator::MuxCoordinator;
pub use writer::ContainerWriter;
