use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::{ClipPlanes, Frustum, ProjectionError};

/// Four imaged corners of a planar marker.
///
/// Layout: `a` bottom-left, `b` bottom-right, `c` top-left, `d` top-right.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quad {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    pub d: Vec3,
}

impl Quad {
    #[inline]
    pub const fn new(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Self {
        Self { a, b, c, d }
    }

    /// Builds a quad from a flat vertex array and the starting offsets of each corner.
    ///
    /// Returns `None` if any offset runs past the end of `vertices`.
    pub fn from_offsets(vertices: &[f32], a: usize, b: usize, c: usize, d: usize) -> Option<Self> {
        let corner = |off: usize| {
            off.checked_add(3)
                .and_then(|end| vertices.get(off..end))
                .map(Vec3::from_slice)
        };
        Some(Self::new(corner(a)?, corner(b)?, corner(c)?, corner(d)?))
    }
}

/// Camera projection plus viewer rotation.
///
/// `view = projection * rotation`. The derived pair (`view`, `inverse_view`) is
/// recomputed on every mutation; a mutation that would leave either matrix
/// non-invertible is rejected and the previous state is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    clip: ClipPlanes,
    projection: Mat4,
    inverse_projection: Mat4,
    rotation: Mat4,
    view: Mat4,
    inverse_view: Mat4,
}

impl Default for Projection {
    fn default() -> Self {
        Self::with_clip_planes(ClipPlanes::default())
    }
}

impl Projection {
    /// Identity projection, rotation and view.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clip_planes(clip: ClipPlanes) -> Self {
        Self {
            clip,
            projection: Mat4::IDENTITY,
            inverse_projection: Mat4::IDENTITY,
            rotation: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            inverse_view: Mat4::IDENTITY,
        }
    }

    /// Frustum mapping the marker quad onto the near plane, rotated by `rotation`
    /// degrees about the forward axis.
    pub fn from_quad(quad: &Quad, rotation: f32) -> Result<Self, ProjectionError> {
        Self::from_quad_with_clip(quad, rotation, ClipPlanes::default())
    }

    pub fn from_quad_with_clip(
        quad: &Quad,
        rotation: f32,
        clip: ClipPlanes,
    ) -> Result<Self, ProjectionError> {
        let u = unit_axis((quad.b - quad.a) + (quad.d - quad.c), "horizontal")?;
        let v = unit_axis((quad.c - quad.a) + (quad.d - quad.b), "vertical")?;
        let w = unit_axis(u.cross(v), "depth")?;

        // Basis vectors as rows.
        let viewer = Mat4::from_cols(u.extend(0.0), v.extend(0.0), w.extend(0.0), Vec4::W).transpose();

        let scaled = |p: Vec3| {
            let z = p.dot(w);
            Vec2::new(p.dot(u), p.dot(v)) * (clip.near / z)
        };
        let (a, b, c, d) = (scaled(quad.a), scaled(quad.b), scaled(quad.c), scaled(quad.d));

        let frustum = Frustum::new(
            a.x.min(c.x),
            b.x.max(d.x),
            a.y.min(b.y),
            c.y.max(d.y),
            clip.near,
            clip.far,
        );

        let mut projection = Self::with_clip_planes(clip);
        projection.commit(rotated(frustum, rotation)?, viewer)?;
        Ok(projection)
    }

    /// Symmetric frustum from full horizontal/vertical view angles (degrees).
    pub fn from_view_angles(
        horizontal: f32,
        vertical: f32,
        rotation: f32,
    ) -> Result<Self, ProjectionError> {
        let mut projection = Self::new();
        projection.set_view_angles(horizontal, vertical, rotation)?;
        Ok(projection)
    }

    pub fn set_view_angles(
        &mut self,
        horizontal: f32,
        vertical: f32,
        rotation: f32,
    ) -> Result<(), ProjectionError> {
        let frustum = Frustum::from_view_angles(horizontal, vertical, self.clip);
        self.set_frustum(frustum, rotation)
    }

    /// Replaces the projection with `frustum`, rotated by `rotation` degrees about
    /// the forward axis (portrait/landscape switching).
    pub fn set_frustum(&mut self, frustum: Frustum, rotation: f32) -> Result<(), ProjectionError> {
        self.set_projection_matrix(rotated(frustum, rotation)?)
    }

    pub fn set_projection_matrix(&mut self, projection: Mat4) -> Result<(), ProjectionError> {
        self.commit(projection, self.rotation)
    }

    pub fn set_rotation_matrix(&mut self, rotation: Mat4) -> Result<(), ProjectionError> {
        self.commit(self.projection, rotation)
    }

    #[inline]
    pub fn clip_planes(&self) -> ClipPlanes {
        self.clip
    }

    #[inline]
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    #[inline]
    pub fn inverse_projection_matrix(&self) -> &Mat4 {
        &self.inverse_projection
    }

    #[inline]
    pub fn rotation_matrix(&self) -> &Mat4 {
        &self.rotation
    }

    #[inline]
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }

    #[inline]
    pub fn inverse_view_matrix(&self) -> &Mat4 {
        &self.inverse_view
    }

    /// Unprojects an NDC point at the near plane through the inverse projection.
    ///
    /// The result is homogeneous (no perspective divide).
    pub fn inverse_project(&self, x: f32, y: f32) -> Vec4 {
        self.inverse_projection * Vec4::new(x, y, self.clip.near, 1.0)
    }

    /// Projects a camera-space point through the view matrix to 2-D NDC.
    pub fn view(&self, point: Vec3) -> Vec2 {
        let p = self.view * point.extend(1.0);
        Vec2::new(p.x / p.w, p.y / p.w)
    }

    /// Unprojects an NDC point at the near plane through the inverse view matrix.
    pub fn inverse_view(&self, x: f32, y: f32) -> Vec3 {
        let p = self.inverse_view * Vec4::new(x, y, self.clip.near, 1.0);
        p.truncate() / p.w
    }

    /// Lazily unprojects a sequence of NDC points, preserving order.
    pub fn inverse_view_iter<'a, I>(&'a self, points: I) -> impl Iterator<Item = Vec3> + 'a
    where
        I: IntoIterator<Item = Vec2>,
        I::IntoIter: 'a,
    {
        points.into_iter().map(|p| self.inverse_view(p.x, p.y))
    }

    /// Flat-buffer form: `[x0, y0, x1, y1, ..]` into `[x0, y0, z0, ..]`.
    ///
    /// Processes as many points as both buffers hold and returns that count.
    pub fn inverse_view_into(&self, xy: &[f32], out: &mut [f32]) -> usize {
        let mut count = 0;
        for (src, dst) in xy.chunks_exact(2).zip(out.chunks_exact_mut(3)) {
            dst.copy_from_slice(&self.inverse_view(src[0], src[1]).to_array());
            count += 1;
        }
        count
    }

    fn commit(&mut self, projection: Mat4, rotation: Mat4) -> Result<(), ProjectionError> {
        let inverse_projection = invert(projection, "projection")?;
        let view = projection * rotation;
        let inverse_view = invert(view, "view")?;

        self.projection = projection;
        self.inverse_projection = inverse_projection;
        self.rotation = rotation;
        self.view = view;
        self.inverse_view = inverse_view;
        Ok(())
    }
}

fn rotated(frustum: Frustum, degrees: f32) -> Result<Mat4, ProjectionError> {
    Ok(frustum.to_matrix()? * Mat4::from_rotation_z(degrees.to_radians()))
}

fn unit_axis(v: Vec3, axis: &'static str) -> Result<Vec3, ProjectionError> {
    v.try_normalize().ok_or(ProjectionError::DegenerateQuad { axis })
}

fn invert(m: Mat4, what: &'static str) -> Result<Mat4, ProjectionError> {
    let det = m.determinant();
    if det == 0.0 || !det.is_finite() {
        return Err(ProjectionError::Singular { what });
    }
    let inverse = m.inverse();
    if !inverse.is_finite() {
        return Err(ProjectionError::Singular { what });
    }
    Ok(inverse)
}
