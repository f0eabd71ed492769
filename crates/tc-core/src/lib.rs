//! tc-core: stable foundation for tankcascade.
//!
//! Contains:
//! - numeric (Real + finiteness and sign guards)
//! - ids (stable compact IDs for tanks and pipes)
//! - geometry (points, tank rectangles, pipe routes)
//! - error (shared error types)

pub mod error;
pub mod geometry;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{TcError, TcResult};
pub use geometry::*;
pub use ids::*;
pub use numeric::*;
