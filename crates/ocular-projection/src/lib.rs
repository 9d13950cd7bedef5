//! Camera projection model.
//!
//! Builds GL-style perspective projections either from full view angles or
//! from the four imaged corners of a planar marker, composes them with a
//! viewer rotation and provides the forward/inverse transforms between
//! camera space and normalized device coordinates.
//!
//! Conventions:
//! - Matrices are column-major `glam::Mat4` (same layout GL uniforms expect).
//! - Angles are in degrees at the API surface.
//! - Unprojection happens at the near plane.

mod error;
mod frustum;
mod projection;

pub use error::ProjectionError;
pub use frustum::{ClipPlanes, Frustum};
pub use projection::{Projection, Quad};
