use std::ops::Deref;
use std::path::Path;

use image::RgbaImage;

use super::{Texture, TextureOptions, TextureTarget};
use crate::driver::{GlContext, consts as gl};
use crate::error::{Result, check};

/// Decodes an encoded image for texture upload.
///
/// Decoding is fixed: native resolution (no density scaling) and 8-bit RGBA
/// pixels regardless of the source format.
pub fn decode_bitmap(bytes: &[u8]) -> Result<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.into_rgba8())
}

/// [`decode_bitmap`] for a file on disk.
pub fn load_bitmap(path: impl AsRef<Path>) -> Result<RgbaImage> {
    Ok(image::open(path)?.into_rgba8())
}

/// 2-D texture holding an uploaded RGBA image.
#[derive(Debug)]
pub struct BitmapTexture {
    texture: Texture,
    width: u32,
    height: u32,
}

impl BitmapTexture {
    pub fn new(ctx: GlContext, image: &RgbaImage, options: TextureOptions) -> Result<Self> {
        let texture = Texture::new(ctx, TextureTarget::Texture2d, options)?;
        let (width, height) = image.dimensions();

        texture.with_bound(|gl| {
            gl.tex_image_2d(
                gl::TEXTURE_2D,
                gl::RGBA as i32,
                width as i32,
                height as i32,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                Some(image.as_raw()),
            );
            check(gl, "glTexImage2D")
        })?;

        log::debug!("uploaded {width}x{height} bitmap into texture {}", texture.id());
        Ok(Self {
            texture,
            width,
            height,
        })
    }

    pub fn from_memory(ctx: GlContext, bytes: &[u8], options: TextureOptions) -> Result<Self> {
        Self::new(ctx, &decode_bitmap(bytes)?, options)
    }

    pub fn from_path(ctx: GlContext, path: impl AsRef<Path>, options: TextureOptions) -> Result<Self> {
        Self::new(ctx, &load_bitmap(path)?, options)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn release(&mut self) -> Result<()> {
        self.texture.release()
    }
}

impl Deref for BitmapTexture {
    type Target = Texture;

    fn deref(&self) -> &Texture {
        &self.texture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GlError;
    use crate::driver::fake::{FakeGl, Upload};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decode_produces_rgba8_at_native_size() {
        let decoded = decode_bitmap(&png(3, 2)).unwrap();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode_bitmap(b"not an image"), Err(GlError::Image(_))));
    }

    #[test]
    fn upload_specifies_full_rgba_image() {
        let fake = FakeGl::new();
        let t = BitmapTexture::from_memory(fake.context(), &png(4, 2), TextureOptions::default()).unwrap();

        assert_eq!((t.width(), t.height()), (4, 2));
        let s = fake.state();
        assert_eq!(
            s.uploads,
            vec![Upload::Full {
                texture: t.id(),
                format: gl::RGBA,
                width: 4,
                height: 2,
                has_pixels: true,
            }]
        );
        assert_eq!(s.texture_bindings[&(0, gl::TEXTURE_2D)], 0);
    }

    #[test]
    fn failed_upload_releases_texture() {
        let fake = FakeGl::new();
        let image = RgbaImage::new(1, 1);
        // Allocation: 1 + 2 + 4 parameter checks + restore; upload scope: 2, then glTexImage2D.
        fake.state_mut().errors.extend([0; 10]);
        fake.push_error(gl::OUT_OF_MEMORY);

        let err = BitmapTexture::new(fake.context(), &image, TextureOptions::default()).unwrap_err();
        assert!(matches!(err, GlError::Driver { call: "glTexImage2D", .. }));
        assert_eq!(fake.deleted("texture").len(), 1);
    }
}
