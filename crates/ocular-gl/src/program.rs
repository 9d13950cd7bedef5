//! Linked shader programs.
//!
//! Every setter here is scoped: the previously current program (possibly none)
//! is current again when the call returns, on success and on error.

use std::collections::HashMap;
use std::fmt;

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::driver::{Gl, GlContext, Handle, consts as gl};
use crate::error::{GlError, Result, check, created};
use crate::shader::{FragmentShader, VertexShader};

/// A value that can be written to a uniform location.
pub trait UniformValue {
    fn upload(&self, gl: &dyn Gl, location: u32);
}

impl UniformValue for f32 {
    fn upload(&self, gl: &dyn Gl, location: u32) {
        gl.uniform_1_f32(location, *self);
    }
}

impl UniformValue for [f32; 2] {
    fn upload(&self, gl: &dyn Gl, location: u32) {
        gl.uniform_2_f32(location, self[0], self[1]);
    }
}

impl UniformValue for [f32; 3] {
    fn upload(&self, gl: &dyn Gl, location: u32) {
        gl.uniform_3_f32(location, self[0], self[1], self[2]);
    }
}

impl UniformValue for [f32; 4] {
    fn upload(&self, gl: &dyn Gl, location: u32) {
        gl.uniform_4_f32(location, self[0], self[1], self[2], self[3]);
    }
}

impl UniformValue for Vec2 {
    fn upload(&self, gl: &dyn Gl, location: u32) {
        self.to_array().upload(gl, location);
    }
}

impl UniformValue for Vec3 {
    fn upload(&self, gl: &dyn Gl, location: u32) {
        self.to_array().upload(gl, location);
    }
}

impl UniformValue for Vec4 {
    fn upload(&self, gl: &dyn Gl, location: u32) {
        self.to_array().upload(gl, location);
    }
}

impl UniformValue for i32 {
    fn upload(&self, gl: &dyn Gl, location: u32) {
        gl.uniform_1_i32(location, *self);
    }
}

impl UniformValue for Mat4 {
    fn upload(&self, gl: &dyn Gl, location: u32) {
        gl.uniform_matrix_4_f32(location, false, &self.to_cols_array());
    }
}

/// Element types accepted for vertex attribute uploads.
pub trait AttribElement: bytemuck::Pod {
    const GL_TYPE: u32;
}

impl AttribElement for f32 {
    const GL_TYPE: u32 = gl::FLOAT;
}

impl AttribElement for i16 {
    const GL_TYPE: u32 = gl::SHORT;
}

/// Array buffer reused for one attribute name.
#[derive(Debug, Copy, Clone)]
struct TransferBuffer {
    id: Handle,
    capacity: usize,
}

/// A linked vertex + fragment shader pair.
pub struct Program {
    ctx: GlContext,
    id: Handle,
    vertex: VertexShader,
    fragment: FragmentShader,
    buffers: HashMap<String, TransferBuffer>,
}

impl Program {
    /// Creates the program, attaches both stages and links.
    ///
    /// A link failure deletes the program before [`GlError::Link`] is returned.
    pub fn new(ctx: GlContext, vertex: VertexShader, fragment: FragmentShader) -> Result<Self> {
        let id = created(ctx.create_program(), "glCreateProgram")?;
        let program = Self {
            ctx,
            id,
            vertex,
            fragment,
            buffers: HashMap::new(),
        };

        check(program.gl(), "glCreateProgram")?;
        program.attach(program.vertex.id())?;
        program.attach(program.fragment.id())?;
        program.link()?;

        log::debug!("linked program {id}");
        Ok(program)
    }

    #[inline]
    pub fn id(&self) -> Handle {
        self.id
    }

    #[inline]
    pub fn vertex_shader(&self) -> &VertexShader {
        &self.vertex
    }

    #[inline]
    pub fn fragment_shader(&self) -> &FragmentShader {
        &self.fragment
    }

    /// Swaps the vertex stage and re-links.
    pub fn set_vertex_shader(&mut self, vertex: VertexShader) -> Result<()> {
        self.detach(self.vertex.id())?;
        self.vertex = vertex;
        self.attach(self.vertex.id())?;
        self.link()
    }

    /// Swaps the fragment stage and re-links.
    pub fn set_fragment_shader(&mut self, fragment: FragmentShader) -> Result<()> {
        self.detach(self.fragment.id())?;
        self.fragment = fragment;
        self.attach(self.fragment.id())?;
        self.link()
    }

    /// Makes this program current. Not scoped.
    pub fn use_program(&self) -> Result<()> {
        self.gl().use_program(self.id);
        check(self.gl(), "glUseProgram")
    }

    /// Writes `value` to the uniform `name`.
    ///
    /// Unknown names are ignored, matching the driver's behaviour for location -1.
    pub fn set_uniform<V: UniformValue + ?Sized>(&self, name: &str, value: &V) -> Result<()> {
        self.scoped(|gl| {
            match gl.uniform_location(self.id, name) {
                Some(location) => {
                    value.upload(gl, location);
                    check(gl, "glUniform")?;
                }
                None => log::trace!("program {} has no uniform `{name}`", self.id),
            }
            Ok(())
        })
    }

    /// Uploads `values` as the vertex attribute `name`, `components` values per vertex.
    ///
    /// Data is copied through the transfer buffer cached for `name`; the buffer
    /// only grows, so repeated uploads of the same or smaller size overwrite it
    /// in place.
    pub fn set_vertex_attrib<T: AttribElement>(
        &mut self,
        name: &str,
        values: &[T],
        components: i32,
    ) -> Result<()> {
        let bytes: &[u8] = bytemuck::cast_slice(values);
        let buffer = self.transfer_buffer(name)?;
        let id = self.id;

        self.scoped(|gl| {
            let Some(index) = gl.attrib_location(id, name) else {
                return Err(GlError::UnknownAttribute { name: name.to_owned() });
            };

            let previous = gl.get_integer(gl::ARRAY_BUFFER_BINDING) as Handle;
            check(gl, "glGetIntegerv")?;
            gl.bind_buffer(gl::ARRAY_BUFFER, buffer.id);
            let result = upload_attrib::<T>(gl, buffer, bytes, index, components);
            gl.bind_buffer(gl::ARRAY_BUFFER, previous);
            result?;
            check(gl, "glBindBuffer")
        })?;

        if let Some(cached) = self.buffers.get_mut(name) {
            cached.capacity = cached.capacity.max(bytes.len());
        }
        Ok(())
    }

    /// Deletes transfer buffers and the program. Further calls are no-ops.
    ///
    /// The program is deleted even when deleting the buffers fails; the first
    /// driver error is returned.
    pub fn release(&mut self) -> Result<()> {
        let buffers = if self.buffers.is_empty() {
            Ok(())
        } else {
            for (_, buffer) in self.buffers.drain() {
                self.ctx.delete_buffer(buffer.id);
            }
            check(self.gl(), "glDeleteBuffers")
        };
        if self.id == 0 {
            return buffers;
        }
        let id = std::mem::take(&mut self.id);
        self.ctx.delete_program(id);
        log::debug!("deleted program {id}");
        let program = check(self.gl(), "glDeleteProgram");
        buffers.and(program)
    }

    #[inline]
    fn gl(&self) -> &dyn Gl {
        self.ctx.as_ref()
    }

    fn attach(&self, shader: Handle) -> Result<()> {
        self.gl().attach_shader(self.id, shader);
        check(self.gl(), "glAttachShader")
    }

    fn detach(&self, shader: Handle) -> Result<()> {
        self.gl().detach_shader(self.id, shader);
        check(self.gl(), "glDetachShader")
    }

    fn link(&self) -> Result<()> {
        let gl = self.gl();
        gl.link_program(self.id);
        check(gl, "glLinkProgram")?;
        if !gl.program_link_status(self.id) {
            return Err(GlError::Link {
                log: gl.program_info_log(self.id),
            });
        }
        Ok(())
    }

    /// Runs `f` with this program current, then restores the previous one.
    fn scoped<R>(&self, f: impl FnOnce(&dyn Gl) -> Result<R>) -> Result<R> {
        let gl = self.gl();
        let previous = gl.get_integer(gl::CURRENT_PROGRAM) as Handle;
        check(gl, "glGetIntegerv")?;
        gl.use_program(self.id);
        check(gl, "glUseProgram")?;

        let result = f(gl);

        gl.use_program(previous);
        let restored = check(gl, "glUseProgram");
        let value = result?;
        restored?;
        Ok(value)
    }

    /// Returns the buffer for `name`, creating it on first use.
    fn transfer_buffer(&mut self, name: &str) -> Result<TransferBuffer> {
        if let Some(existing) = self.buffers.get(name) {
            return Ok(*existing);
        }
        let id = created(self.ctx.create_buffer(), "glCreateBuffer")?;
        log::trace!("program {} allocated transfer buffer {id} for `{name}`", self.id);
        let buffer = TransferBuffer { id, capacity: 0 };
        self.buffers.insert(name.to_owned(), buffer);
        Ok(buffer)
    }
}

fn upload_attrib<T: AttribElement>(
    gl: &dyn Gl,
    buffer: TransferBuffer,
    bytes: &[u8],
    index: u32,
    components: i32,
) -> Result<()> {
    check(gl, "glBindBuffer")?;
    if bytes.len() > buffer.capacity {
        gl.buffer_data(gl::ARRAY_BUFFER, bytes, gl::DYNAMIC_DRAW);
        check(gl, "glBufferData")?;
    } else {
        gl.buffer_sub_data(gl::ARRAY_BUFFER, 0, bytes);
        check(gl, "glBufferSubData")?;
    }

    let stride = components * std::mem::size_of::<T>() as i32;
    gl.vertex_attrib_pointer(index, components, T::GL_TYPE, false, stride, 0);
    check(gl, "glVertexAttribPointer")?;
    gl.enable_vertex_attrib_array(index);
    check(gl, "glEnableVertexAttribArray")
}

impl Drop for Program {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::warn!("program release failed: {e}");
        }
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("id", &self.id)
            .field("vertex", &self.vertex.id())
            .field("fragment", &self.fragment.id())
            .field("buffers", &self.buffers)
            .finish_non_exhaustive()
    }
}
