//! [`Gl`] for `glow::Context` on native targets.

use std::num::NonZeroU32;

use ::glow::{self as gl, HasContext, PixelUnpackData};

use super::{Gl, Handle};

fn texture(handle: Handle) -> Option<gl::NativeTexture> {
    NonZeroU32::new(handle).map(gl::NativeTexture)
}

fn framebuffer(handle: Handle) -> Option<gl::NativeFramebuffer> {
    NonZeroU32::new(handle).map(gl::NativeFramebuffer)
}

fn buffer(handle: Handle) -> Option<gl::NativeBuffer> {
    NonZeroU32::new(handle).map(gl::NativeBuffer)
}

fn program(handle: Handle) -> Option<gl::NativeProgram> {
    NonZeroU32::new(handle).map(gl::NativeProgram)
}

fn shader(handle: Handle) -> Option<gl::NativeShader> {
    NonZeroU32::new(handle).map(gl::NativeShader)
}

fn location(location: u32) -> gl::NativeUniformLocation {
    gl::NativeUniformLocation(location)
}

// Every glow entry point is `unsafe` because it calls straight into the
// driver; the context must be current on this thread, which the host render
// loop guarantees before handing us the context.
impl Gl for gl::Context {
    fn get_error(&self) -> u32 {
        unsafe { HasContext::get_error(self) }
    }

    fn get_integer(&self, parameter: u32) -> i32 {
        unsafe { HasContext::get_parameter_i32(self, parameter) }
    }

    fn create_texture(&self) -> Result<Handle, String> {
        unsafe { HasContext::create_texture(self).map(|t| t.0.get()) }
    }

    fn delete_texture(&self, handle: Handle) {
        if let Some(t) = texture(handle) {
            unsafe { HasContext::delete_texture(self, t) }
        }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { HasContext::active_texture(self, unit) }
    }

    fn bind_texture(&self, target: u32, handle: Handle) {
        unsafe { HasContext::bind_texture(self, target, texture(handle)) }
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        unsafe { HasContext::tex_parameter_i32(self, target, parameter, value) }
    }

    fn tex_image_2d(
        &self,
        target: u32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    ) {
        unsafe {
            HasContext::tex_image_2d(
                self,
                target,
                0,
                internal_format,
                width,
                height,
                0,
                format,
                ty,
                pixels,
            )
        }
    }

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
    ) {
        unsafe {
            HasContext::tex_sub_image_2d(
                self,
                target,
                0,
                x,
                y,
                width,
                height,
                format,
                ty,
                PixelUnpackData::Slice(pixels),
            )
        }
    }

    fn create_framebuffer(&self) -> Result<Handle, String> {
        unsafe { HasContext::create_framebuffer(self).map(|f| f.0.get()) }
    }

    fn delete_framebuffer(&self, handle: Handle) {
        if let Some(f) = framebuffer(handle) {
            unsafe { HasContext::delete_framebuffer(self, f) }
        }
    }

    fn bind_framebuffer(&self, target: u32, handle: Handle) {
        unsafe { HasContext::bind_framebuffer(self, target, framebuffer(handle)) }
    }

    fn framebuffer_texture_2d(&self, target: u32, attachment: u32, texture_target: u32, handle: Handle) {
        unsafe {
            HasContext::framebuffer_texture_2d(
                self,
                target,
                attachment,
                texture_target,
                texture(handle),
                0,
            )
        }
    }

    fn check_framebuffer_status(&self, target: u32) -> u32 {
        unsafe { HasContext::check_framebuffer_status(self, target) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { HasContext::viewport(self, x, y, width, height) }
    }

    fn create_shader(&self, kind: u32) -> Result<Handle, String> {
        unsafe { HasContext::create_shader(self, kind).map(|s| s.0.get()) }
    }

    fn shader_source(&self, handle: Handle, source: &str) {
        if let Some(s) = shader(handle) {
            unsafe { HasContext::shader_source(self, s, source) }
        }
    }

    fn compile_shader(&self, handle: Handle) {
        if let Some(s) = shader(handle) {
            unsafe { HasContext::compile_shader(self, s) }
        }
    }

    fn shader_compile_status(&self, handle: Handle) -> bool {
        shader(handle).is_some_and(|s| unsafe { HasContext::get_shader_compile_status(self, s) })
    }

    fn shader_info_log(&self, handle: Handle) -> String {
        shader(handle)
            .map(|s| unsafe { HasContext::get_shader_info_log(self, s) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, handle: Handle) {
        if let Some(s) = shader(handle) {
            unsafe { HasContext::delete_shader(self, s) }
        }
    }

    fn create_program(&self) -> Result<Handle, String> {
        unsafe { HasContext::create_program(self).map(|p| p.0.get()) }
    }

    fn attach_shader(&self, program_handle: Handle, shader_handle: Handle) {
        if let (Some(p), Some(s)) = (program(program_handle), shader(shader_handle)) {
            unsafe { HasContext::attach_shader(self, p, s) }
        }
    }

    fn detach_shader(&self, program_handle: Handle, shader_handle: Handle) {
        if let (Some(p), Some(s)) = (program(program_handle), shader(shader_handle)) {
            unsafe { HasContext::detach_shader(self, p, s) }
        }
    }

    fn link_program(&self, handle: Handle) {
        if let Some(p) = program(handle) {
            unsafe { HasContext::link_program(self, p) }
        }
    }

    fn program_link_status(&self, handle: Handle) -> bool {
        program(handle).is_some_and(|p| unsafe { HasContext::get_program_link_status(self, p) })
    }

    fn program_info_log(&self, handle: Handle) -> String {
        program(handle)
            .map(|p| unsafe { HasContext::get_program_info_log(self, p) })
            .unwrap_or_default()
    }

    fn use_program(&self, handle: Handle) {
        unsafe { HasContext::use_program(self, program(handle)) }
    }

    fn delete_program(&self, handle: Handle) {
        if let Some(p) = program(handle) {
            unsafe { HasContext::delete_program(self, p) }
        }
    }

    fn uniform_location(&self, handle: Handle, name: &str) -> Option<u32> {
        let p = program(handle)?;
        unsafe { HasContext::get_uniform_location(self, p, name) }.map(|l| l.0)
    }

    fn uniform_1_f32(&self, l: u32, x: f32) {
        unsafe { HasContext::uniform_1_f32(self, Some(&location(l)), x) }
    }

    fn uniform_2_f32(&self, l: u32, x: f32, y: f32) {
        unsafe { HasContext::uniform_2_f32(self, Some(&location(l)), x, y) }
    }

    fn uniform_3_f32(&self, l: u32, x: f32, y: f32, z: f32) {
        unsafe { HasContext::uniform_3_f32(self, Some(&location(l)), x, y, z) }
    }

    fn uniform_4_f32(&self, l: u32, x: f32, y: f32, z: f32, w: f32) {
        unsafe { HasContext::uniform_4_f32(self, Some(&location(l)), x, y, z, w) }
    }

    fn uniform_1_i32(&self, l: u32, x: i32) {
        unsafe { HasContext::uniform_1_i32(self, Some(&location(l)), x) }
    }

    fn uniform_matrix_4_f32(&self, l: u32, transpose: bool, values: &[f32; 16]) {
        unsafe { HasContext::uniform_matrix_4_f32_slice(self, Some(&location(l)), transpose, values) }
    }

    fn attrib_location(&self, handle: Handle, name: &str) -> Option<u32> {
        let p = program(handle)?;
        unsafe { HasContext::get_attrib_location(self, p, name) }
    }

    fn create_buffer(&self) -> Result<Handle, String> {
        unsafe { HasContext::create_buffer(self).map(|b| b.0.get()) }
    }

    fn delete_buffer(&self, handle: Handle) {
        if let Some(b) = buffer(handle) {
            unsafe { HasContext::delete_buffer(self, b) }
        }
    }

    fn bind_buffer(&self, target: u32, handle: Handle) {
        unsafe { HasContext::bind_buffer(self, target, buffer(handle)) }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { HasContext::buffer_data_u8_slice(self, target, data, usage) }
    }

    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]) {
        unsafe { HasContext::buffer_sub_data_u8_slice(self, target, offset, data) }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, index) }
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe { HasContext::vertex_attrib_pointer_f32(self, index, size, ty, normalized, stride, offset) }
    }
}
