//! OpenGL ES 2.0 object layer.
//!
//! Thin owning wrappers around driver objects: shaders, linked programs,
//! 2-D / render-target / camera-fed textures, and the on-screen viewport.
//! Every wrapper holds a shared [`GlContext`], checks the driver error flag
//! after each call it issues, and releases its handles exactly once.
//!
//! All objects live on the render thread. The only value meant to cross
//! threads is [`FrameSignal`], through which a camera producer announces new
//! frames.

pub mod driver;
pub mod logging;

mod error;
mod program;
mod screen;
mod shader;
mod texture;

pub use driver::{Gl, GlContext, Handle, consts};
pub use error::{BoxError, GlError, Result, check, error_name};
pub use program::{AttribElement, Program, UniformValue};
pub use screen::{ScreenRect, ScreenTarget};
pub use shader::{FragmentShader, Shader, ShaderKind, VertexShader};
pub use texture::{
    BitmapTexture, CameraTexture, Filter, FrameSignal, FrameSource, LatchPolicy, TargetTexture,
    Texture, TextureOptions, TextureTarget, Wrap, decode_bitmap, load_bitmap,
};
