//! Monitoring backend surface: the time-series wire model, the client seam
//! and the reqwest implementation of it.

pub mod client;
pub mod http;
pub mod model;

pub use client::*;
pub use http::*;
pub use model::*;
