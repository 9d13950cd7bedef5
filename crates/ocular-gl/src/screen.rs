use crate::driver::{Gl, consts as gl};
use crate::error::{Result, check};

/// Edges of a viewport in window pixels (top-left origin, exclusive right/bottom).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScreenRect {
    #[inline]
    pub const fn width(self) -> i32 {
        self.right - self.left
    }

    #[inline]
    pub const fn height(self) -> i32 {
        self.bottom - self.top
    }
}

/// The default framebuffer as a draw destination, restricted to a viewport.
///
/// Also maps window coordinates inside the viewport to normalized device
/// coordinates: x grows right, y grows up, both in `[-1, 1]` across the viewport.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct ScreenTarget {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ScreenTarget {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Viewport anchored at the origin.
    #[inline]
    pub const fn sized(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, width: i32, height: i32) {
        *self = Self::new(x, y, width, height);
    }

    #[inline]
    pub fn set_size(&mut self, width: i32, height: i32) {
        *self = Self::sized(width, height);
    }

    /// Centres a viewport of the given aspect (width / height) that covers a
    /// `width` x `height` surface; the overflowing axis gets a negative offset
    /// and is cropped by the window.
    ///
    /// A non-positive or non-finite `aspect` falls back to the whole surface.
    pub fn fit_aspect(&mut self, width: i32, height: i32, aspect: f64) {
        if !(aspect.is_finite() && aspect > 0.0) {
            log::warn!("ignoring invalid viewport aspect {aspect}");
            self.set_size(width, height);
            return;
        }

        let surface = f64::from(width) / f64::from(height);
        if surface < aspect {
            let fitted = (aspect * f64::from(height)) as i32;
            self.set((width - fitted) / 2, 0, fitted, height);
        } else {
            let fitted = (f64::from(width) / aspect) as i32;
            self.set(0, (height - fitted) / 2, width, fitted);
        }
    }

    /// Binds the default framebuffer and applies this viewport.
    pub fn render_to(&self, gl: &dyn Gl) -> Result<()> {
        gl.bind_framebuffer(gl::FRAMEBUFFER, 0);
        check(gl, "glBindFramebuffer")?;
        gl.viewport(self.x, self.y, self.width, self.height);
        check(gl, "glViewport")
    }

    #[inline]
    pub fn to_gl_x(&self, screen_x: f32) -> f32 {
        (screen_x - self.x as f32) * 2.0 / self.width as f32 - 1.0
    }

    #[inline]
    pub fn to_gl_y(&self, screen_y: f32) -> f32 {
        1.0 - (screen_y - self.y as f32) * 2.0 / self.height as f32
    }

    #[inline]
    pub fn rect(&self) -> ScreenRect {
        ScreenRect {
            left: self.x,
            top: self.y,
            right: self.x + self.width,
            bottom: self.y + self.height,
        }
    }
}
