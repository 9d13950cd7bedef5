//! Texture objects.
//!
//! [`Texture`] owns one driver handle and its sampling state. The specialised
//! textures embed it:
//! - [`BitmapTexture`]: immutable RGBA image upload
//! - [`TargetTexture`]: colour attachment of an offscreen framebuffer
//! - [`CameraTexture`]: external-OES texture fed by a camera preview surface
//!
//! Lifecycle: allocated at construction, bound/unbound through [`Texture::bind`]
//! and [`Texture::with_bound`], released exactly once (explicitly or on drop).

mod bitmap;
mod camera;
mod target;

pub use bitmap::{BitmapTexture, decode_bitmap, load_bitmap};
pub use camera::{CameraTexture, FrameSignal, FrameSource, LatchPolicy};
pub use target::TargetTexture;

use std::fmt;

use glam::Mat4;

use crate::driver::{Gl, GlContext, Handle, consts as gl};
use crate::error::{GlError, Result, check, created};

/// Binding point a texture is created for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureTarget {
    Texture2d,
    /// `GL_TEXTURE_EXTERNAL_OES`, sampled through `samplerExternalOES`.
    ExternalOes,
}

impl TextureTarget {
    #[inline]
    pub const fn gl_enum(self) -> u32 {
        match self {
            TextureTarget::Texture2d => gl::TEXTURE_2D,
            TextureTarget::ExternalOes => gl::TEXTURE_EXTERNAL_OES,
        }
    }

    /// `glGetIntegerv` query returning the texture bound to this target.
    #[inline]
    pub const fn binding_query(self) -> u32 {
        match self {
            TextureTarget::Texture2d => gl::TEXTURE_BINDING_2D,
            TextureTarget::ExternalOes => gl::TEXTURE_BINDING_EXTERNAL_OES,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Wrap {
    #[default]
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

impl Wrap {
    #[inline]
    pub const fn gl_enum(self) -> u32 {
        match self {
            Wrap::ClampToEdge => gl::CLAMP_TO_EDGE,
            Wrap::Repeat => gl::REPEAT,
            Wrap::MirroredRepeat => gl::MIRRORED_REPEAT,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Filter {
    #[default]
    Nearest,
    Linear,
}

impl Filter {
    #[inline]
    pub const fn gl_enum(self) -> u32 {
        match self {
            Filter::Nearest => gl::NEAREST,
            Filter::Linear => gl::LINEAR,
        }
    }
}

/// Sampling parameters applied when a texture is allocated.
///
/// Defaults to clamp-to-edge wrapping with nearest filtering, which every
/// target (including external-OES) accepts.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct TextureOptions {
    pub wrap: Wrap,
    pub filter: Filter,
}

impl TextureOptions {
    #[inline]
    pub const fn with_wrap(mut self, wrap: Wrap) -> Self {
        self.wrap = wrap;
        self
    }

    #[inline]
    pub const fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }
}

/// A texture handle plus its sampling state.
pub struct Texture {
    ctx: GlContext,
    id: Handle,
    target: TextureTarget,
    options: TextureOptions,
    transform: Mat4,
}

impl Texture {
    /// Allocates a texture and applies `options` while it is temporarily bound.
    pub fn new(ctx: GlContext, target: TextureTarget, options: TextureOptions) -> Result<Self> {
        let id = created(ctx.create_texture(), "glGenTextures")?;
        let texture = Self {
            ctx,
            id,
            target,
            options,
            transform: Mat4::IDENTITY,
        };
        check(texture.gl(), "glGenTextures")?;

        let t = target.gl_enum();
        texture.with_bound(|gl| {
            let wrap = options.wrap.gl_enum() as i32;
            let filter = options.filter.gl_enum() as i32;
            for (parameter, value) in [
                (gl::TEXTURE_WRAP_S, wrap),
                (gl::TEXTURE_WRAP_T, wrap),
                (gl::TEXTURE_MAG_FILTER, filter),
                (gl::TEXTURE_MIN_FILTER, filter),
            ] {
                gl.tex_parameter_i32(t, parameter, value);
                check(gl, "glTexParameteri")?;
            }
            Ok(())
        })?;

        log::debug!("allocated texture {id} ({target:?})");
        Ok(texture)
    }

    #[inline]
    pub fn id(&self) -> Handle {
        self.id
    }

    #[inline]
    pub fn target(&self) -> TextureTarget {
        self.target
    }

    #[inline]
    pub fn options(&self) -> TextureOptions {
        self.options
    }

    /// Texture-coordinate transform; identity unless the producer supplies one.
    #[inline]
    pub fn transform_matrix(&self) -> &Mat4 {
        &self.transform
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.id == 0
    }

    /// Binds the texture to texture unit `unit` (0-based) for the next draw.
    pub fn bind(&self, unit: u32) -> Result<()> {
        let texture_unit = gl::TEXTURE0
            .checked_add(unit)
            .ok_or(GlError::InvalidTextureUnit { unit })?;
        let gl = self.gl();
        gl.active_texture(texture_unit);
        check(gl, "glActiveTexture")?;
        gl.bind_texture(self.target.gl_enum(), self.id);
        check(gl, "glBindTexture")
    }

    /// Runs `f` with this texture bound to its target on the active unit, then
    /// rebinds whatever was bound before (including nothing).
    pub fn with_bound<R>(&self, f: impl FnOnce(&dyn Gl) -> Result<R>) -> Result<R> {
        let gl = self.gl();
        let target = self.target.gl_enum();

        let previous = gl.get_integer(self.target.binding_query()) as Handle;
        check(gl, "glGetIntegerv")?;
        gl.bind_texture(target, self.id);
        check(gl, "glBindTexture")?;

        let result = f(gl);

        gl.bind_texture(target, previous);
        let restored = check(gl, "glBindTexture");
        let value = result?;
        restored?;
        Ok(value)
    }

    /// Deletes the texture handle. Further calls are no-ops.
    pub fn release(&mut self) -> Result<()> {
        if self.id == 0 {
            return Ok(());
        }
        let id = std::mem::take(&mut self.id);
        self.ctx.delete_texture(id);
        log::debug!("deleted texture {id}");
        check(self.gl(), "glDeleteTextures")
    }

    #[inline]
    pub(crate) fn gl(&self) -> &dyn Gl {
        self.ctx.as_ref()
    }

    #[inline]
    pub(crate) fn context(&self) -> &GlContext {
        &self.ctx
    }

    pub(crate) fn set_transform_matrix(&mut self, transform: Mat4) {
        self.transform = transform;
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::warn!("texture release failed: {e}");
        }
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
