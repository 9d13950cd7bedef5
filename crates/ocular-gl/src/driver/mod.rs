//! Driver call surface.
//!
//! The object layer never talks to a GL binding directly; it goes through the
//! [`Gl`] trait so every call site can be checked (and, in tests, recorded).
//!
//! Object names are raw `u32` handles with `0` meaning "none", exactly as the
//! driver reports them through `glGetIntegerv`.

pub mod consts;
#[cfg(test)]
pub(crate) mod fake;
#[cfg(not(target_arch = "wasm32"))]
mod native;

use std::rc::Rc;

/// Raw driver object name. `0` is the null object.
pub type Handle = u32;

/// Shared, single-threaded driver context held by every wrapper object.
pub type GlContext = Rc<dyn Gl>;

/// Subset of the GLES 2.0 API used by the object layer.
///
/// Calls mirror the driver entry points one-to-one. Errors are not reported
/// per call; callers query [`Gl::get_error`] afterwards (see
/// [`check`](crate::check)). Object creation is the exception because bindings
/// surface allocation failure directly.
pub trait Gl {
    fn get_error(&self) -> u32;
    fn get_integer(&self, parameter: u32) -> i32;

    // ── textures ──────────────────────────────────────────────────────────

    fn create_texture(&self) -> Result<Handle, String>;
    fn delete_texture(&self, texture: Handle);
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, target: u32, texture: Handle);
    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32);
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: u32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    );
    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image_2d(
        &self,
        target: u32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: &[u8],
    );

    // ── framebuffers ──────────────────────────────────────────────────────

    fn create_framebuffer(&self) -> Result<Handle, String>;
    fn delete_framebuffer(&self, framebuffer: Handle);
    fn bind_framebuffer(&self, target: u32, framebuffer: Handle);
    fn framebuffer_texture_2d(&self, target: u32, attachment: u32, texture_target: u32, texture: Handle);
    fn check_framebuffer_status(&self, target: u32) -> u32;
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);

    // ── shaders & programs ────────────────────────────────────────────────

    fn create_shader(&self, kind: u32) -> Result<Handle, String>;
    fn shader_source(&self, shader: Handle, source: &str);
    fn compile_shader(&self, shader: Handle);
    fn shader_compile_status(&self, shader: Handle) -> bool;
    fn shader_info_log(&self, shader: Handle) -> String;
    fn delete_shader(&self, shader: Handle);

    fn create_program(&self) -> Result<Handle, String>;
    fn attach_shader(&self, program: Handle, shader: Handle);
    fn detach_shader(&self, program: Handle, shader: Handle);
    fn link_program(&self, program: Handle);
    fn program_link_status(&self, program: Handle) -> bool;
    fn program_info_log(&self, program: Handle) -> String;
    fn use_program(&self, program: Handle);
    fn delete_program(&self, program: Handle);

    fn uniform_location(&self, program: Handle, name: &str) -> Option<u32>;
    fn uniform_1_f32(&self, location: u32, x: f32);
    fn uniform_2_f32(&self, location: u32, x: f32, y: f32);
    fn uniform_3_f32(&self, location: u32, x: f32, y: f32, z: f32);
    fn uniform_4_f32(&self, location: u32, x: f32, y: f32, z: f32, w: f32);
    fn uniform_1_i32(&self, location: u32, x: i32);
    fn uniform_matrix_4_f32(&self, location: u32, transpose: bool, values: &[f32; 16]);

    // ── vertex attributes ─────────────────────────────────────────────────

    fn attrib_location(&self, program: Handle, name: &str) -> Option<u32>;
    fn create_buffer(&self) -> Result<Handle, String>;
    fn delete_buffer(&self, buffer: Handle);
    fn bind_buffer(&self, target: u32, buffer: Handle);
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]);
    fn enable_vertex_attrib_array(&self, index: u32);
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
}
