use crate::driver::{Gl, consts};
use crate::shader::ShaderKind;

/// Boxed error returned by external collaborators such as a [`FrameSource`](crate::FrameSource).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = GlError> = std::result::Result<T, E>;

/// Failure surfaced by the GL object layer.
///
/// Nothing is retried internally; the caller decides how to recover
/// (typically by tearing down the context).
#[derive(Debug, thiserror::Error)]
pub enum GlError {
    /// The driver flagged an error after `call`.
    #[error("{call} raised {}", describe_code(.code))]
    Driver { call: &'static str, code: u32 },

    /// The driver refused to allocate an object.
    #[error("{call} failed: {message}")]
    Create { call: &'static str, message: String },

    #[error("{kind} shader failed to compile: {log}")]
    Compile { kind: ShaderKind, log: String },

    #[error("program failed to link: {log}")]
    Link { log: String },

    #[error("framebuffer incomplete (status {status:#06x})")]
    IncompleteFramebuffer { status: u32 },

    #[error("program has no active attribute named `{name}`")]
    UnknownAttribute { name: String },

    #[error("texture unit {unit} is out of range")]
    InvalidTextureUnit { unit: u32 },

    #[error("texture data too short: {actual} bytes supplied, {expected} required")]
    DataTooShort { expected: usize, actual: usize },

    #[error("failed to decode bitmap")]
    Image(#[from] image::ImageError),

    #[error("failed to attach camera frame source")]
    Attach(#[source] BoxError),

    #[error("camera frame source failed to latch an image")]
    Latch(#[source] BoxError),
}

static ERROR_NAMES: &[(u32, &str)] = &[
    (consts::INVALID_ENUM, "GL_INVALID_ENUM"),
    (consts::INVALID_VALUE, "GL_INVALID_VALUE"),
    (consts::INVALID_OPERATION, "GL_INVALID_OPERATION"),
    (consts::OUT_OF_MEMORY, "GL_OUT_OF_MEMORY"),
    (consts::INVALID_FRAMEBUFFER_OPERATION, "GL_INVALID_FRAMEBUFFER_OPERATION"),
];

/// Symbolic name of a driver error code, if it is one we know.
pub fn error_name(code: u32) -> Option<&'static str> {
    ERROR_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

fn describe_code(code: &u32) -> String {
    match error_name(*code) {
        Some(name) => name.to_owned(),
        None => format!("error {code}"),
    }
}

/// Reads the driver error flag and converts a raised error into [`GlError::Driver`].
///
/// `call` names the entry point that was just issued.
pub fn check(gl: &dyn Gl, call: &'static str) -> Result<()> {
    match gl.get_error() {
        consts::NO_ERROR => Ok(()),
        code => {
            log::trace!("{call} raised {}", describe_code(&code));
            Err(GlError::Driver { call, code })
        }
    }
}

pub(crate) fn created(result: std::result::Result<u32, String>, call: &'static str) -> Result<u32> {
    result.map_err(|message| GlError::Create { call, message })
}
