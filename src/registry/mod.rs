//! Read-only view of the metrics registry collaborator.

pub mod snapshot;

pub use snapshot::*;
