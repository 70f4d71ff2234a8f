use glow::HasContext;

use sill_vertex::{AttributeFormat, BaseType};

use super::error::BindingError;
use super::program::Program;
use super::vertex_source::IndexBinding;
use super::Gfx;

/// One slot in a reconciled buffer layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutSlot {
    /// Bound to a named program input.
    Attribute { format: AttributeFormat, name: String },
    /// Consumes stride space without binding anything; rendered as `<n>x`.
    Skip { bytes: u32 },
}

impl LayoutSlot {
    pub fn byte_len(&self) -> u32 {
        match self {
            LayoutSlot::Attribute { format, .. } => format.byte_len(),
            LayoutSlot::Skip { bytes } => *bytes,
        }
    }
}

/// A reconciled (buffer, layout, attribute names) triple, ready to be
/// turned into GPU vertex-array state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferBinding {
    pub buffer: glow::Buffer,
    pub slots: Vec<LayoutSlot>,
    /// Names bound from this buffer, in slot order.
    pub attributes: Vec<String>,
}

impl BufferBinding {
    /// Vertex stride covered by this buffer's slots, in bytes.
    pub fn stride(&self) -> u32 {
        self.slots.iter().map(LayoutSlot::byte_len).sum()
    }

    /// Token form of the reconciled layout, e.g. `"3f 16x 2f/i"`.
    pub fn layout_string(&self) -> String {
        let tokens: Vec<String> = self
            .slots
            .iter()
            .map(|slot| match slot {
                LayoutSlot::Attribute { format, .. } => format.token.clone(),
                LayoutSlot::Skip { bytes } => format!("{bytes}x"),
            })
            .collect();
        tokens.join(" ")
    }
}

/// A GPU vertex-array object together with the bindings that produced it.
///
/// Owned by the [`VertexSource`](super::VertexSource) that instantiated
/// it; the driver object dies with the context, or earlier via
/// [`Gfx::delete_vertex_array`].
#[derive(Debug)]
pub struct VertexArrayObject {
    pub(crate) raw: glow::VertexArray,
    pub bindings: Vec<BufferBinding>,
}

impl VertexArrayObject {
    pub fn raw(&self) -> glow::VertexArray {
        self.raw
    }
}

impl Gfx {
    /// Records the reconciled bindings (and the optional index buffer)
    /// into a fresh GPU vertex-array object.
    pub(crate) fn create_vertex_array(
        &self,
        program: &Program,
        bindings: &[BufferBinding],
        index: Option<&IndexBinding>,
    ) -> Result<glow::VertexArray, BindingError> {
        let gl = self.gl();
        unsafe {
            let vao = gl.create_vertex_array().map_err(BindingError::Allocation)?;
            gl.bind_vertex_array(Some(vao));

            for binding in bindings {
                gl.bind_buffer(glow::ARRAY_BUFFER, Some(binding.buffer));
                let stride = binding.stride() as i32;
                let mut offset = 0i32;

                for slot in &binding.slots {
                    match slot {
                        LayoutSlot::Skip { bytes } => offset += *bytes as i32,
                        LayoutSlot::Attribute { format, name } => {
                            let Some(location) = gl.get_attrib_location(program.raw(), name)
                            else {
                                gl.bind_vertex_array(None);
                                gl.delete_vertex_array(vao);
                                return Err(BindingError::NoLocation { name: name.clone() });
                            };
                            bind_attribute(gl, location, format, stride, offset);
                            offset += format.byte_len() as i32;
                        }
                    }
                }
            }

            if let Some(index) = index {
                // Recorded into the vertex-array state while it is bound.
                gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index.buffer));
            }

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
            Ok(vao)
        }
    }

    /// Frees a vertex-array object returned by
    /// [`VertexSource::invalidate`](super::VertexSource::invalidate).
    pub fn delete_vertex_array(&self, vao: VertexArrayObject) {
        unsafe {
            self.gl().delete_vertex_array(vao.raw);
        }
    }
}

unsafe fn bind_attribute(
    gl: &glow::Context,
    location: u32,
    format: &AttributeFormat,
    stride: i32,
    offset: i32,
) {
    let size = format.components as i32;
    let scalar = gl_scalar_type(format);
    unsafe {
        gl.enable_vertex_attrib_array(location);
        if format.base != BaseType::Float && !format.normalized {
            // Integer data stays integer in the shader (ivec/uvec inputs).
            gl.vertex_attrib_pointer_i32(location, size, scalar, stride, offset);
        } else {
            gl.vertex_attrib_pointer_f32(location, size, scalar, format.normalized, stride, offset);
        }
        if format.per_instance {
            gl.vertex_attrib_divisor(location, 1);
        }
    }
}

fn gl_scalar_type(format: &AttributeFormat) -> u32 {
    match (format.base, format.bytes_per_component) {
        (BaseType::Float, 1) => glow::BYTE, // promoted to float on fetch
        (BaseType::Float, 2) => glow::HALF_FLOAT,
        (BaseType::Float, 8) => glow::DOUBLE,
        (BaseType::Float, _) => glow::FLOAT,

        (BaseType::Int, 1) => glow::BYTE,
        (BaseType::Int, 2) => glow::SHORT,
        (BaseType::Int, _) => glow::INT,

        (BaseType::UInt, 1) => glow::UNSIGNED_BYTE,
        (BaseType::UInt, 2) => glow::UNSIGNED_SHORT,
        (BaseType::UInt, _) => glow::UNSIGNED_INT,

        // Padding never reaches attribute binding; reconciliation turns it
        // into a Skip slot.
        (BaseType::Padding, _) => unreachable!("padding slots are never bound"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sill_vertex::parse;
    use std::num::NonZeroU32;

    fn buffer(id: u32) -> glow::Buffer {
        glow::NativeBuffer(NonZeroU32::new(id).unwrap())
    }

    fn binding(layout: &str, names: &[&str]) -> BufferBinding {
        let mut names = names.iter();
        let slots: Vec<LayoutSlot> = parse(layout)
            .unwrap()
            .into_iter()
            .map(|format| {
                if format.is_padding() {
                    LayoutSlot::Skip { bytes: format.byte_len() }
                } else {
                    LayoutSlot::Attribute {
                        format,
                        name: names.next().unwrap().to_string(),
                    }
                }
            })
            .collect();
        let attributes = slots
            .iter()
            .filter_map(|slot| match slot {
                LayoutSlot::Attribute { name, .. } => Some(name.clone()),
                LayoutSlot::Skip { .. } => None,
            })
            .collect();
        BufferBinding { buffer: buffer(1), slots, attributes }
    }

    #[test]
    fn stride_counts_skips_and_attributes() {
        let b = binding("3f 16x 2f", &["position", "uv"]);
        assert_eq!(b.stride(), 12 + 16 + 8);
    }

    #[test]
    fn layout_string_round_trips_tokens() {
        let b = binding("3f 16x 2f/i", &["position", "offset"]);
        assert_eq!(b.layout_string(), "3f 16x 2f/i");
    }

    #[test]
    fn skip_slot_footprint() {
        assert_eq!(LayoutSlot::Skip { bytes: 24 }.byte_len(), 24);
    }
}
