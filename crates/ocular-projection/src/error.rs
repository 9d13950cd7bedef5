/// Failure while building or updating a [`Projection`](crate::Projection).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    /// Marker corners collapse to a zero-length (or non-finite) basis axis.
    #[error("degenerate quadrilateral: {axis} basis axis has zero length")]
    DegenerateQuad { axis: &'static str },

    /// Frustum bounds violate `left < right`, `bottom < top`, `0 < near < far`.
    #[error(
        "invalid frustum (left {left}, right {right}, bottom {bottom}, top {top}, near {near}, far {far})"
    )]
    InvalidFrustum {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },

    /// A matrix that has to be inverted is singular.
    #[error("{what} matrix is not invertible")]
    Singular { what: &'static str },
}
