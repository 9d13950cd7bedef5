use glam::{Mat4, Vec4};

use crate::ProjectionError;

/// Near/far clip distances used by the convenience constructors.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClipPlanes {
    pub near: f32,
    pub far: f32,
}

impl Default for ClipPlanes {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Viewing volume bounds; left/right/bottom/top are measured at the near plane.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Frustum {
    #[inline]
    pub const fn new(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
            near,
            far,
        }
    }

    /// Symmetric frustum covering the given full view angles (degrees).
    pub fn from_view_angles(horizontal: f32, vertical: f32, clip: ClipPlanes) -> Self {
        // Half angle gives the right triangle; doubling the tangent gives the full extent.
        let width = (horizontal.to_radians() / 2.0).tan() * 2.0 * clip.near;
        let height = (vertical.to_radians() / 2.0).tan() * 2.0 * clip.near;
        Self::new(
            -width / 2.0,
            width / 2.0,
            -height / 2.0,
            height / 2.0,
            clip.near,
            clip.far,
        )
    }

    pub fn is_valid(&self) -> bool {
        let finite = [self.left, self.right, self.bottom, self.top, self.near, self.far]
            .iter()
            .all(|v| v.is_finite());
        finite
            && self.left < self.right
            && self.bottom < self.top
            && self.near > 0.0
            && self.near < self.far
    }

    /// Perspective matrix with the `glFrustum` layout.
    pub fn to_matrix(&self) -> Result<Mat4, ProjectionError> {
        if !self.is_valid() {
            return Err(ProjectionError::InvalidFrustum {
                left: self.left,
                right: self.right,
                bottom: self.bottom,
                top: self.top,
                near: self.near,
                far: self.far,
            });
        }

        let r_width = 1.0 / (self.right - self.left);
        let r_height = 1.0 / (self.top - self.bottom);
        let r_depth = 1.0 / (self.near - self.far);

        let x = 2.0 * self.near * r_width;
        let y = 2.0 * self.near * r_height;
        let a = (self.right + self.left) * r_width;
        let b = (self.top + self.bottom) * r_height;
        let c = (self.far + self.near) * r_depth;
        let d = 2.0 * self.far * self.near * r_depth;

        Ok(Mat4::from_cols(
            Vec4::new(x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, y, 0.0, 0.0),
            Vec4::new(a, b, c, -1.0),
            Vec4::new(0.0, 0.0, d, 0.0),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn default_clip_planes() {
        let clip = ClipPlanes::default();
        assert_eq!(clip.near, 0.1);
        assert_eq!(clip.far, 100.0);
    }

    #[test]
    fn near_plane_corners_map_to_ndc_corners() {
        let f = Frustum::new(-0.2, 0.1, -0.05, 0.15, 0.1, 100.0);
        let m = f.to_matrix().unwrap();

        let p = m * Vec3::new(f.left, f.bottom, -f.near).extend(1.0);
        let ndc = p.truncate() / p.w;
        assert!((ndc - Vec3::new(-1.0, -1.0, -1.0)).abs().max_element() < 1e-4);

        let p = m * Vec3::new(f.right, f.top, -f.near).extend(1.0);
        let ndc = p.truncate() / p.w;
        assert!((ndc - Vec3::new(1.0, 1.0, -1.0)).abs().max_element() < 1e-4);
    }

    #[test]
    fn far_plane_maps_to_depth_one() {
        let f = Frustum::new(-1.0, 1.0, -1.0, 1.0, 1.0, 10.0);
        let p = f.to_matrix().unwrap() * Vec4::new(0.0, 0.0, -10.0, 1.0);
        assert!((p.z / p.w - 1.0).abs() < 1e-5);
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(Frustum::new(1.0, -1.0, -1.0, 1.0, 0.1, 100.0).to_matrix().is_err());
        assert!(Frustum::new(-1.0, 1.0, 1.0, 1.0, 0.1, 100.0).to_matrix().is_err());
    }

    #[test]
    fn rejects_bad_clip_planes() {
        assert!(Frustum::new(-1.0, 1.0, -1.0, 1.0, 0.0, 100.0).to_matrix().is_err());
        assert!(Frustum::new(-1.0, 1.0, -1.0, 1.0, 5.0, 5.0).to_matrix().is_err());
        assert!(Frustum::new(-1.0, f32::INFINITY, -1.0, 1.0, 0.1, 1.0).to_matrix().is_err());
    }

    #[test]
    fn view_angles_ninety_degrees_span_twice_near() {
        let f = Frustum::from_view_angles(90.0, 90.0, ClipPlanes::default());
        assert!((f.right - 0.1).abs() < 1e-6);
        assert!((f.left + 0.1).abs() < 1e-6);
        assert!((f.top - 0.1).abs() < 1e-6);
        assert!((f.bottom + 0.1).abs() < 1e-6);
    }
}
