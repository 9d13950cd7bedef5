//! GLES 2.0 enum values used by the object layer (plus `OES_EGL_image_external`).

pub const NO_ERROR: u32 = 0;
pub const INVALID_ENUM: u32 = 0x0500;
pub const INVALID_VALUE: u32 = 0x0501;
pub const INVALID_OPERATION: u32 = 0x0502;
pub const OUT_OF_MEMORY: u32 = 0x0505;
pub const INVALID_FRAMEBUFFER_OPERATION: u32 = 0x0506;

pub const TEXTURE_2D: u32 = 0x0DE1;
pub const TEXTURE_EXTERNAL_OES: u32 = 0x8D65;
pub const TEXTURE_BINDING_2D: u32 = 0x8069;
pub const TEXTURE_BINDING_EXTERNAL_OES: u32 = 0x8D67;
pub const TEXTURE0: u32 = 0x84C0;

pub const TEXTURE_MAG_FILTER: u32 = 0x2800;
pub const TEXTURE_MIN_FILTER: u32 = 0x2801;
pub const TEXTURE_WRAP_S: u32 = 0x2802;
pub const TEXTURE_WRAP_T: u32 = 0x2803;
pub const NEAREST: u32 = 0x2600;
pub const LINEAR: u32 = 0x2601;
pub const REPEAT: u32 = 0x2901;
pub const CLAMP_TO_EDGE: u32 = 0x812F;
pub const MIRRORED_REPEAT: u32 = 0x8370;

pub const RGBA: u32 = 0x1908;
pub const LUMINANCE: u32 = 0x1909;
pub const UNSIGNED_BYTE: u32 = 0x1401;
pub const SHORT: u32 = 0x1402;
pub const FLOAT: u32 = 0x1406;

pub const FRAMEBUFFER: u32 = 0x8D40;
pub const FRAMEBUFFER_BINDING: u32 = 0x8CA6;
pub const COLOR_ATTACHMENT0: u32 = 0x8CE0;
pub const FRAMEBUFFER_COMPLETE: u32 = 0x8CD5;

pub const FRAGMENT_SHADER: u32 = 0x8B30;
pub const VERTEX_SHADER: u32 = 0x8B31;
pub const CURRENT_PROGRAM: u32 = 0x8B8D;

pub const ARRAY_BUFFER: u32 = 0x8892;
pub const ARRAY_BUFFER_BINDING: u32 = 0x8894;
pub const DYNAMIC_DRAW: u32 = 0x88E8;
