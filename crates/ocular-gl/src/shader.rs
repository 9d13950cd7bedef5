use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::driver::{GlContext, Handle, consts as gl};
use crate::error::{GlError, Result, check, created};

/// Pipeline stage a shader is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    #[inline]
    pub const fn gl_enum(self) -> u32 {
        match self {
            ShaderKind::Vertex => gl::VERTEX_SHADER,
            ShaderKind::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderKind::Vertex => "vertex",
            ShaderKind::Fragment => "fragment",
        })
    }
}

/// A compiled shader object.
///
/// Immutable once compiled. The driver handle is deleted on drop (or by an
/// explicit [`Shader::release`]).
pub struct Shader {
    ctx: GlContext,
    id: Handle,
    kind: ShaderKind,
}

impl Shader {
    /// Compiles `source` for `kind`.
    ///
    /// On a compile failure the handle is deleted before the driver log is
    /// returned in [`GlError::Compile`].
    pub fn compile(ctx: GlContext, kind: ShaderKind, source: &str) -> Result<Self> {
        let id = created(ctx.create_shader(kind.gl_enum()), "glCreateShader")?;
        let shader = Self { ctx, id, kind };

        let gl = shader.ctx.as_ref();
        check(gl, "glCreateShader")?;
        gl.shader_source(id, source);
        check(gl, "glShaderSource")?;
        gl.compile_shader(id);
        check(gl, "glCompileShader")?;

        if !gl.shader_compile_status(id) {
            let log = gl.shader_info_log(id);
            log::debug!("{kind} shader {id} failed to compile");
            return Err(GlError::Compile { kind, log });
        }

        log::debug!("compiled {kind} shader {id}");
        Ok(shader)
    }

    #[inline]
    pub fn id(&self) -> Handle {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    /// Deletes the shader handle. Further calls are no-ops.
    pub fn release(&mut self) -> Result<()> {
        if self.id == 0 {
            return Ok(());
        }
        let id = std::mem::take(&mut self.id);
        self.ctx.delete_shader(id);
        log::debug!("deleted {} shader {id}", self.kind);
        check(self.ctx.as_ref(), "glDeleteShader")
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::warn!("shader release failed: {e}");
        }
    }
}

impl fmt::Debug for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

macro_rules! stage_shader {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        ///
        /// Cheap to clone; clones share one driver handle, deleted with the last clone.
        #[derive(Debug, Clone)]
        pub struct $name(Rc<Shader>);

        impl $name {
            pub fn new(ctx: GlContext, source: &str) -> Result<Self> {
                Shader::compile(ctx, $kind, source).map(|s| Self(Rc::new(s)))
            }
        }

        impl Deref for $name {
            type Target = Shader;

            fn deref(&self) -> &Shader {
                &self.0
            }
        }
    };
}

stage_shader!(
    /// Shader compiled for the vertex stage.
    VertexShader,
    ShaderKind::Vertex
);
stage_shader!(
    /// Shader compiled for the fragment stage.
    FragmentShader,
    ShaderKind::Fragment
);
