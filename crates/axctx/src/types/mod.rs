/*! Core types for the context serializer. */

#![allow(missing_docs)]

mod cancel;
mod detail;
mod error;
mod geometry;
mod ids;

pub use cancel::CancelToken;
pub use detail::{DetailLevel, OutputFormat};
pub use error::{ContextError, ContextResult};
pub use geometry::Bounds;
pub use ids::NodeRef;
