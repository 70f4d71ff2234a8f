use std::num::NonZeroU64;

use glow::HasContext;

use super::error::ShaderError;
use super::Gfx;
use crate::shader;

/// Opaque, stable program identity.
///
/// Issued by [`Gfx`] from a monotonic counter, never reused within a
/// context's lifetime. Vertex-array caches key on this instead of the
/// driver handle or object address, so identity survives wherever the
/// `Program` value moves.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramId(NonZeroU64);

impl ProgramId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
    }
}

/// A linked shader program plus its reflected vertex inputs.
pub struct Program {
    id: ProgramId,
    raw: glow::Program,
    attributes: Vec<String>,
}

impl Program {
    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn raw(&self) -> glow::Program {
        self.raw
    }

    /// Active vertex input names, `gl_*` builtins excluded, in the order
    /// the driver reports them.
    pub fn attribute_names(&self) -> &[String] {
        &self.attributes
    }
}

impl Gfx {
    /// Compiles and links a program from vertex/fragment sources.
    ///
    /// Fragment interface outputs scraped from the source are bound to
    /// color locations in declaration order before linking; active vertex
    /// inputs are reflected once after linking.
    pub fn create_program(
        &self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Program, ShaderError> {
        let gl = self.gl();
        unsafe {
            let program = gl.create_program().map_err(ShaderError::Allocation)?;

            let vert = match compile(gl, glow::VERTEX_SHADER, "vertex", vertex_src) {
                Ok(shader) => shader,
                Err(e) => {
                    gl.delete_program(program);
                    return Err(e);
                }
            };
            let frag = match compile(gl, glow::FRAGMENT_SHADER, "fragment", fragment_src) {
                Ok(shader) => shader,
                Err(e) => {
                    gl.delete_shader(vert);
                    gl.delete_program(program);
                    return Err(e);
                }
            };

            gl.attach_shader(program, vert);
            gl.attach_shader(program, frag);

            for (slot, name) in shader::interface_outputs(fragment_src).iter().enumerate() {
                gl.bind_frag_data_location(program, slot as u32, name);
            }

            gl.link_program(program);
            let linked = gl.get_program_link_status(program);
            gl.detach_shader(program, vert);
            gl.detach_shader(program, frag);
            gl.delete_shader(vert);
            gl.delete_shader(frag);
            if !linked {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(ShaderError::Link { log });
            }

            let attributes = reflect_attributes(gl, program);
            log::debug!("program linked; inputs: {attributes:?}");

            Ok(Program { id: self.next_program_id(), raw: program, attributes })
        }
    }

    /// Frees the driver object. Vertex-array cache entries keyed on this
    /// program's id should be invalidated by their owners.
    pub fn delete_program(&self, program: Program) {
        unsafe {
            self.gl().delete_program(program.raw);
        }
    }
}

unsafe fn compile(
    gl: &glow::Context,
    kind: u32,
    stage: &'static str,
    src: &str,
) -> Result<glow::Shader, ShaderError> {
    unsafe {
        let shader = gl.create_shader(kind).map_err(ShaderError::Allocation)?;
        gl.shader_source(shader, src);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(ShaderError::Compile { stage, log });
        }
        Ok(shader)
    }
}

unsafe fn reflect_attributes(gl: &glow::Context, program: glow::Program) -> Vec<String> {
    unsafe {
        let count = gl.get_active_attributes(program);
        let mut names = Vec::with_capacity(count as usize);
        for index in 0..count {
            if let Some(attribute) = gl.get_active_attribute(program, index) {
                if !attribute.name.starts_with("gl_") {
                    names.push(attribute.name);
                }
            }
        }
        names
    }
}
