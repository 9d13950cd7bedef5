use std::fmt;
use std::ops::Deref;

use super::{Texture, TextureOptions, TextureTarget};
use crate::driver::{Gl, GlContext, Handle, consts as gl};
use crate::error::{GlError, Result, check, created};

/// 2-D texture attached as the colour buffer of its own framebuffer.
///
/// Resizing is lazy: [`TargetTexture::set_size`] only records the new size.
/// Storage is re-specified by the next [`render_to`](TargetTexture::render_to)
/// (RGBA colour storage) or [`set_data`](TargetTexture::set_data) (luminance
/// upload); later uploads at the same size go through sub-image updates.
pub struct TargetTexture {
    texture: Texture,
    framebuffer: Handle,
    width: i32,
    height: i32,
    resize_pending: bool,
    storage_resize_pending: bool,
}

impl TargetTexture {
    pub fn new(ctx: GlContext, width: i32, height: i32, options: TextureOptions) -> Result<Self> {
        let texture = Texture::new(ctx, TextureTarget::Texture2d, options)?;
        let framebuffer = created(texture.context().create_framebuffer(), "glGenFramebuffers")?;
        let mut target = Self {
            texture,
            framebuffer,
            width: 0,
            height: 0,
            resize_pending: false,
            storage_resize_pending: false,
        };
        check(target.gl(), "glGenFramebuffers")?;

        let texture_id = target.texture.id();
        target.with_framebuffer(|gl| {
            gl.framebuffer_texture_2d(gl::FRAMEBUFFER, gl::COLOR_ATTACHMENT0, gl::TEXTURE_2D, texture_id);
            check(gl, "glFramebufferTexture2D")
        })?;

        target.set_size(width, height);
        log::debug!(
            "allocated render target: framebuffer {} -> texture {texture_id}",
            target.framebuffer
        );
        Ok(target)
    }

    #[inline]
    pub fn framebuffer_id(&self) -> Handle {
        self.framebuffer
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// A [`set_data`](Self::set_data) upload must re-specify the whole image.
    #[inline]
    pub fn resize_pending(&self) -> bool {
        self.resize_pending
    }

    /// [`render_to`](Self::render_to) must reallocate colour storage.
    #[inline]
    pub fn storage_resize_pending(&self) -> bool {
        self.storage_resize_pending
    }

    /// Records a new logical size; GPU storage follows on the next render or upload.
    pub fn set_size(&mut self, width: i32, height: i32) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.resize_pending = true;
            self.storage_resize_pending = true;
        }
    }

    /// Directs subsequent draws into this texture and sets the viewport to its size.
    ///
    /// The framebuffer stays bound afterwards.
    pub fn render_to(&mut self) -> Result<()> {
        if self.storage_resize_pending {
            let (width, height) = (self.width, self.height);
            self.texture.with_bound(|gl| {
                gl.tex_image_2d(
                    gl::TEXTURE_2D,
                    gl::RGBA as i32,
                    width,
                    height,
                    gl::RGBA,
                    gl::UNSIGNED_BYTE,
                    None,
                );
                check(gl, "glTexImage2D")
            })?;
            self.storage_resize_pending = false;
        }

        let gl = self.gl();
        gl.bind_framebuffer(gl::FRAMEBUFFER, self.framebuffer);
        check(gl, "glBindFramebuffer")?;
        let status = gl.check_framebuffer_status(gl::FRAMEBUFFER);
        if status != gl::FRAMEBUFFER_COMPLETE {
            return Err(GlError::IncompleteFramebuffer { status });
        }
        gl.viewport(0, 0, self.width, self.height);
        check(gl, "glViewport")
    }

    /// Uploads one byte per texel (luminance).
    ///
    /// `data` must hold at least `width * height` bytes; extra bytes are ignored.
    pub fn set_data(&mut self, data: &[u8]) -> Result<()> {
        let expected = (self.width.max(0) as usize) * (self.height.max(0) as usize);
        if data.len() < expected {
            return Err(GlError::DataTooShort {
                expected,
                actual: data.len(),
            });
        }
        let pixels = &data[..expected];
        let (width, height) = (self.width, self.height);
        let full = self.resize_pending;

        self.texture.with_bound(|gl| {
            if full {
                gl.tex_image_2d(
                    gl::TEXTURE_2D,
                    gl::LUMINANCE as i32,
                    width,
                    height,
                    gl::LUMINANCE,
                    gl::UNSIGNED_BYTE,
                    Some(pixels),
                );
                check(gl, "glTexImage2D")
            } else {
                gl.tex_sub_image_2d(
                    gl::TEXTURE_2D,
                    0,
                    0,
                    width,
                    height,
                    gl::LUMINANCE,
                    gl::UNSIGNED_BYTE,
                    pixels,
                );
                check(gl, "glTexSubImage2D")
            }
        })?;

        self.resize_pending = false;
        Ok(())
    }

    /// Deletes the framebuffer, then the texture. Further calls are no-ops.
    pub fn release(&mut self) -> Result<()> {
        self.release_framebuffer()?;
        self.texture.release()
    }

    #[inline]
    fn gl(&self) -> &dyn Gl {
        self.texture.gl()
    }

    fn release_framebuffer(&mut self) -> Result<()> {
        if self.framebuffer == 0 {
            return Ok(());
        }
        let id = std::mem::take(&mut self.framebuffer);
        self.gl().delete_framebuffer(id);
        log::debug!("deleted framebuffer {id}");
        check(self.gl(), "glDeleteFramebuffers")
    }

    /// Runs `f` with this framebuffer bound, then rebinds the previous one.
    fn with_framebuffer<R>(&self, f: impl FnOnce(&dyn Gl) -> Result<R>) -> Result<R> {
        let gl = self.gl();
        let previous = gl.get_integer(gl::FRAMEBUFFER_BINDING) as Handle;
        check(gl, "glGetIntegerv")?;
        gl.bind_framebuffer(gl::FRAMEBUFFER, self.framebuffer);
        check(gl, "glBindFramebuffer")?;

        let result = f(gl);

        gl.bind_framebuffer(gl::FRAMEBUFFER, previous);
        let restored = check(gl, "glBindFramebuffer");
        let value = result?;
        restored?;
        Ok(value)
    }
}

impl Drop for TargetTexture {
    // The embedded texture releases itself afterwards.
    fn drop(&mut self) {
        if let Err(e) = self.release_framebuffer() {
            log::warn!("framebuffer release failed: {e}");
        }
    }
}

impl Deref for TargetTexture {
    type Target = Texture;

    fn deref(&self) -> &Texture {
        &self.texture
    }
}

impl fmt::Debug for TargetTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetTexture")
            .field("texture", &self.texture)
            .field("framebuffer", &self.framebuffer)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("resize_pending", &self.resize_pending)
            .field("storage_resize_pending", &self.storage_resize_pending)
            .finish()
    }
}
