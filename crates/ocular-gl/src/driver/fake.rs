//! In-memory driver used by unit tests.
//!
//! Tracks object lifetimes, bindings and uploads closely enough to assert on
//! binding restoration and release behaviour without a real context.
//!
//! Compilation fails for any source containing `#error`; linking fails when an
//! attached source contains `@unlinkable`. Uniform and attribute names starting
//! with `missing` have no location.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::rc::Rc;

use super::consts as gl;
use super::{Gl, GlContext, Handle};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Upload {
    Full { texture: Handle, format: u32, width: i32, height: i32, has_pixels: bool },
    Sub { texture: Handle, format: u32, width: i32, height: i32 },
}

#[derive(Debug, Default)]
pub(crate) struct FakeState {
    next_handle: Handle,
    pub errors: VecDeque<u32>,

    pub active_unit: u32,
    pub texture_bindings: HashMap<(u32, u32), Handle>,
    pub framebuffer: Handle,
    pub array_buffer: Handle,
    pub current_program: Handle,
    pub viewport: (i32, i32, i32, i32),
    pub framebuffer_status: Option<u32>,

    pub textures: HashSet<Handle>,
    pub framebuffers: HashSet<Handle>,
    pub shaders: HashMap<Handle, String>,
    pub programs: HashSet<Handle>,
    pub buffers: HashMap<Handle, usize>,
    pub deleted: Vec<(&'static str, Handle)>,

    pub tex_params: HashMap<(Handle, u32), i32>,
    pub uploads: Vec<Upload>,
    pub attachments: HashMap<Handle, Handle>,

    pub attached: HashMap<Handle, Vec<Handle>>,
    pub link_count: HashMap<Handle, usize>,
    pub linked: HashMap<Handle, bool>,
    locations: Vec<String>,
    /// Uniform values keyed by (program current at upload, uniform name).
    pub uniforms: BTreeMap<(Handle, String), Vec<f32>>,

    pub buffer_data_calls: usize,
    pub buffer_sub_data_calls: usize,
    pub attrib_pointers: Vec<(u32, i32, u32, i32, Handle)>,
    pub enabled_attribs: HashSet<u32>,
}

impl FakeState {
    fn alloc(&mut self) -> Handle {
        self.next_handle += 1;
        self.next_handle
    }

    fn bound_texture(&self, target: u32) -> Handle {
        self.texture_bindings
            .get(&(self.active_unit, target))
            .copied()
            .unwrap_or(0)
    }

    fn location(&mut self, name: &str) -> Option<u32> {
        if name.starts_with("missing") {
            return None;
        }
        let index = match self.locations.iter().position(|n| n == name) {
            Some(i) => i,
            None => {
                self.locations.push(name.to_owned());
                self.locations.len() - 1
            }
        };
        Some(index as u32)
    }

    fn set_uniform(&mut self, location: u32, values: Vec<f32>) {
        if self.current_program == 0 {
            self.errors.push_back(gl::INVALID_OPERATION);
            return;
        }
        let name = self.locations[location as usize].clone();
        self.uniforms.insert((self.current_program, name), values);
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeGl {
    pub state: RefCell<FakeState>,
}

impl FakeGl {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn context(self: &Rc<Self>) -> GlContext {
        self.clone()
    }

    pub(crate) fn state(&self) -> std::cell::Ref<'_, FakeState> {
        self.state.borrow()
    }

    pub(crate) fn state_mut(&self) -> std::cell::RefMut<'_, FakeState> {
        self.state.borrow_mut()
    }

    pub(crate) fn push_error(&self, code: u32) {
        self.state.borrow_mut().errors.push_back(code);
    }

    pub(crate) fn deleted(&self, kind: &str) -> Vec<Handle> {
        self.state()
            .deleted
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, h)| *h)
            .collect()
    }
}

impl Gl for FakeGl {
    fn get_error(&self) -> u32 {
        self.state.borrow_mut().errors.pop_front().unwrap_or(gl::NO_ERROR)
    }

    fn get_integer(&self, parameter: u32) -> i32 {
        let s = self.state.borrow();
        let value = match parameter {
            gl::TEXTURE_BINDING_2D => s.bound_texture(gl::TEXTURE_2D),
            gl::TEXTURE_BINDING_EXTERNAL_OES => s.bound_texture(gl::TEXTURE_EXTERNAL_OES),
            gl::FRAMEBUFFER_BINDING => s.framebuffer,
            gl::ARRAY_BUFFER_BINDING => s.array_buffer,
            gl::CURRENT_PROGRAM => s.current_program,
            _ => 0,
        };
        value as i32
    }

    fn create_texture(&self) -> Result<Handle, String> {
        let mut s = self.state.borrow_mut();
        let h = s.alloc();
        s.textures.insert(h);
        Ok(h)
    }

    fn delete_texture(&self, texture: Handle) {
        let mut s = self.state.borrow_mut();
        s.textures.remove(&texture);
        s.texture_bindings.retain(|_, bound| *bound != texture);
        s.deleted.push(("texture", texture));
    }

    fn active_texture(&self, unit: u32) {
        let mut s = self.state.borrow_mut();
        if unit < gl::TEXTURE0 {
            s.errors.push_back(gl::INVALID_ENUM);
            return;
        }
        s.active_unit = unit - gl::TEXTURE0;
    }

    fn bind_texture(&self, target: u32, texture: Handle) {
        let mut s = self.state.borrow_mut();
        if texture != 0 && !s.textures.contains(&texture) {
            s.errors.push_back(gl::INVALID_OPERATION);
            return;
        }
        let unit = s.active_unit;
        s.texture_bindings.insert((unit, target), texture);
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        let mut s = self.state.borrow_mut();
        let texture = s.bound_texture(target);
        s.tex_params.insert((texture, parameter), value);
    }

    fn tex_image_2d(
        &self,
        target: u32,
        _internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        _ty: u32,
        pixels: Option<&[u8]>,
    ) {
        let mut s = self.state.borrow_mut();
        let texture = s.bound_texture(target);
        s.uploads.push(Upload::Full {
            texture,
            format,
            width,
            height,
            has_pixels: pixels.is_some(),
        });
    }

    fn tex_sub_image_2d(
        &self,
        target: u32,
        _x: i32,
        _y: i32,
        width: i32,
        height: i32,
        format: u32,
        _ty: u32,
        _pixels: &[u8],
    ) {
        let mut s = self.state.borrow_mut();
        let texture = s.bound_texture(target);
        s.uploads.push(Upload::Sub {
            texture,
            format,
            width,
            height,
        });
    }

    fn create_framebuffer(&self) -> Result<Handle, String> {
        let mut s = self.state.borrow_mut();
        let h = s.alloc();
        s.framebuffers.insert(h);
        Ok(h)
    }

    fn delete_framebuffer(&self, framebuffer: Handle) {
        let mut s = self.state.borrow_mut();
        s.framebuffers.remove(&framebuffer);
        if s.framebuffer == framebuffer {
            s.framebuffer = 0;
        }
        s.deleted.push(("framebuffer", framebuffer));
    }

    fn bind_framebuffer(&self, _target: u32, framebuffer: Handle) {
        self.state.borrow_mut().framebuffer = framebuffer;
    }

    fn framebuffer_texture_2d(&self, _target: u32, _attachment: u32, _texture_target: u32, texture: Handle) {
        let mut s = self.state.borrow_mut();
        let fb = s.framebuffer;
        s.attachments.insert(fb, texture);
    }

    fn check_framebuffer_status(&self, _target: u32) -> u32 {
        self.state
            .borrow()
            .framebuffer_status
            .unwrap_or(gl::FRAMEBUFFER_COMPLETE)
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.state.borrow_mut().viewport = (x, y, width, height);
    }

    fn create_shader(&self, _kind: u32) -> Result<Handle, String> {
        let mut s = self.state.borrow_mut();
        let h = s.alloc();
        s.shaders.insert(h, String::new());
        Ok(h)
    }

    fn shader_source(&self, shader: Handle, source: &str) {
        self.state
            .borrow_mut()
            .shaders
            .insert(shader, source.to_owned());
    }

    fn compile_shader(&self, _shader: Handle) {}

    fn shader_compile_status(&self, shader: Handle) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|src| !src.contains("#error"))
    }

    fn shader_info_log(&self, _shader: Handle) -> String {
        "0:1: error: '#error' : forced failure".to_owned()
    }

    fn delete_shader(&self, shader: Handle) {
        let mut s = self.state.borrow_mut();
        s.shaders.remove(&shader);
        s.deleted.push(("shader", shader));
    }

    fn create_program(&self) -> Result<Handle, String> {
        let mut s = self.state.borrow_mut();
        let h = s.alloc();
        s.programs.insert(h);
        Ok(h)
    }

    fn attach_shader(&self, program: Handle, shader: Handle) {
        self.state
            .borrow_mut()
            .attached
            .entry(program)
            .or_default()
            .push(shader);
    }

    fn detach_shader(&self, program: Handle, shader: Handle) {
        if let Some(list) = self.state.borrow_mut().attached.get_mut(&program) {
            list.retain(|s| *s != shader);
        }
    }

    fn link_program(&self, program: Handle) {
        let mut s = self.state.borrow_mut();
        let ok = s
            .attached
            .get(&program)
            .map(|list| {
                list.iter()
                    .all(|sh| s.shaders.get(sh).is_some_and(|src| !src.contains("@unlinkable")))
            })
            .unwrap_or(false);
        s.linked.insert(program, ok);
        *s.link_count.entry(program).or_default() += 1;
    }

    fn program_link_status(&self, program: Handle) -> bool {
        self.state.borrow().linked.get(&program).copied().unwrap_or(false)
    }

    fn program_info_log(&self, _program: Handle) -> String {
        "L0001: unresolved varying".to_owned()
    }

    fn use_program(&self, program: Handle) {
        self.state.borrow_mut().current_program = program;
    }

    fn delete_program(&self, program: Handle) {
        let mut s = self.state.borrow_mut();
        s.programs.remove(&program);
        s.deleted.push(("program", program));
    }

    fn uniform_location(&self, _program: Handle, name: &str) -> Option<u32> {
        self.state.borrow_mut().location(name)
    }

    fn uniform_1_f32(&self, location: u32, x: f32) {
        self.state.borrow_mut().set_uniform(location, vec![x]);
    }

    fn uniform_2_f32(&self, location: u32, x: f32, y: f32) {
        self.state.borrow_mut().set_uniform(location, vec![x, y]);
    }

    fn uniform_3_f32(&self, location: u32, x: f32, y: f32, z: f32) {
        self.state.borrow_mut().set_uniform(location, vec![x, y, z]);
    }

    fn uniform_4_f32(&self, location: u32, x: f32, y: f32, z: f32, w: f32) {
        self.state.borrow_mut().set_uniform(location, vec![x, y, z, w]);
    }

    fn uniform_1_i32(&self, location: u32, x: i32) {
        self.state.borrow_mut().set_uniform(location, vec![x as f32]);
    }

    fn uniform_matrix_4_f32(&self, location: u32, _transpose: bool, values: &[f32; 16]) {
        self.state.borrow_mut().set_uniform(location, values.to_vec());
    }

    fn attrib_location(&self, _program: Handle, name: &str) -> Option<u32> {
        self.state.borrow_mut().location(name)
    }

    fn create_buffer(&self) -> Result<Handle, String> {
        let mut s = self.state.borrow_mut();
        let h = s.alloc();
        s.buffers.insert(h, 0);
        Ok(h)
    }

    fn delete_buffer(&self, buffer: Handle) {
        let mut s = self.state.borrow_mut();
        s.buffers.remove(&buffer);
        if s.array_buffer == buffer {
            s.array_buffer = 0;
        }
        s.deleted.push(("buffer", buffer));
    }

    fn bind_buffer(&self, _target: u32, buffer: Handle) {
        self.state.borrow_mut().array_buffer = buffer;
    }

    fn buffer_data(&self, _target: u32, data: &[u8], _usage: u32) {
        let mut s = self.state.borrow_mut();
        let bound = s.array_buffer;
        s.buffers.insert(bound, data.len());
        s.buffer_data_calls += 1;
    }

    fn buffer_sub_data(&self, _target: u32, offset: i32, data: &[u8]) {
        let mut s = self.state.borrow_mut();
        let bound = s.array_buffer;
        let size = s.buffers.get(&bound).copied().unwrap_or(0);
        if offset as usize + data.len() > size {
            s.errors.push_back(gl::INVALID_VALUE);
            return;
        }
        s.buffer_sub_data_calls += 1;
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.state.borrow_mut().enabled_attribs.insert(index);
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        ty: u32,
        _normalized: bool,
        stride: i32,
        _offset: i32,
    ) {
        let mut s = self.state.borrow_mut();
        let bound = s.array_buffer;
        s.attrib_pointers.push((index, size, ty, stride, bound));
    }
}
