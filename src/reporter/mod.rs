//! The export pipeline: value conversion, series construction, per-kind
//! translation and the batching scheduled reporter.

pub mod reporter;
pub mod series;
pub mod translate;
pub mod value;

pub use reporter::*;
pub use series::*;
pub use translate::*;
pub use value::*;
