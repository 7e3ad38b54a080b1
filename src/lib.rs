//! Library exports for the Stackdriver reporter, shared between the
//! scheduled driver and tests.

pub mod backend;
pub mod config;
pub mod registry;
pub mod reporter;
pub mod utils;
