use std::collections::hash_map::Entry;
use std::collections::HashMap;

use glow::HasContext;

use sill_vertex::{parse, AttributeFormat};

use super::binding::{BufferBinding, LayoutSlot, VertexArrayObject};
use super::error::BindingError;
use super::program::{Program, ProgramId};
use super::Gfx;

/// Primitive assembly mode for draw calls.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveMode {
    fn to_gl(self) -> u32 {
        match self {
            PrimitiveMode::Points => glow::POINTS,
            PrimitiveMode::Lines => glow::LINES,
            PrimitiveMode::LineStrip => glow::LINE_STRIP,
            PrimitiveMode::Triangles => glow::TRIANGLES,
            PrimitiveMode::TriangleStrip => glow::TRIANGLE_STRIP,
            PrimitiveMode::TriangleFan => glow::TRIANGLE_FAN,
        }
    }
}

/// Width of one index element.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IndexElement {
    U8,
    U16,
    U32,
}

impl IndexElement {
    pub fn byte_len(self) -> u32 {
        match self {
            IndexElement::U8 => 1,
            IndexElement::U16 => 2,
            IndexElement::U32 => 4,
        }
    }

    fn to_gl(self) -> u32 {
        match self {
            IndexElement::U8 => glow::UNSIGNED_BYTE,
            IndexElement::U16 => glow::UNSIGNED_SHORT,
            IndexElement::U32 => glow::UNSIGNED_INT,
        }
    }
}

/// An index buffer attachment.
#[derive(Debug, Copy, Clone)]
pub struct IndexBinding {
    pub buffer: glow::Buffer,
    pub element: IndexElement,
}

/// One registered data buffer: handle, parsed layout, and a name per
/// non-padding slot.
#[derive(Debug, Clone)]
pub struct BufferDescriptor {
    pub buffer: glow::Buffer,
    pub formats: Vec<AttributeFormat>,
    pub names: Vec<String>,
}

/// A named, mutable vertex-array description with a per-program cache of
/// instantiated GPU vertex-array objects.
///
/// Buffers (and optionally an index buffer) are registered before first
/// use; [`instance`](Self::instance) then reconciles them against a
/// specific program's inputs and materializes at most one driver object
/// per program for this source's lifetime. One physical buffer can serve
/// programs consuming different attribute subsets: slots a program does
/// not use become stride-preserving skips.
///
/// Mutating buffers after a program's entry has been instantiated is a
/// contract violation and is not detected; call
/// [`invalidate`](Self::invalidate) or [`clear_instances`](Self::clear_instances)
/// when a layout genuinely changes or a program is destroyed.
#[derive(Debug)]
pub struct VertexSource {
    name: String,
    primitive: PrimitiveMode,
    buffers: Vec<BufferDescriptor>,
    index: Option<IndexBinding>,
    instances: HashMap<ProgramId, VertexArrayObject>,
}

impl VertexSource {
    pub fn new(name: impl Into<String>, primitive: PrimitiveMode) -> Self {
        Self {
            name: name.into(),
            primitive,
            buffers: Vec::new(),
            index: None,
            instances: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primitive(&self) -> PrimitiveMode {
        self.primitive
    }

    /// Registers a data buffer with its layout and attribute names.
    ///
    /// `format` is a descriptor in the vertex-format mini-language; `names`
    /// must supply exactly one name per non-padding slot, in slot order.
    pub fn buffer(
        &mut self,
        buffer: glow::Buffer,
        format: &str,
        names: &[&str],
    ) -> Result<&mut Self, BindingError> {
        let formats = parse(format)?;
        let named_slots = formats.iter().filter(|f| !f.is_padding()).count();
        if named_slots != names.len() {
            return Err(BindingError::NameCount {
                buffer: self.buffers.len(),
                names: names.len(),
                slots: named_slots,
            });
        }
        self.buffers.push(BufferDescriptor {
            buffer,
            formats,
            names: names.iter().map(|s| s.to_string()).collect(),
        });
        Ok(self)
    }

    /// Attaches an index buffer; draws become indexed from then on.
    pub fn index_buffer(&mut self, buffer: glow::Buffer, element: IndexElement) -> &mut Self {
        self.index = Some(IndexBinding { buffer, element });
        self
    }

    /// Returns the vertex-array object for `program`, instantiating it on
    /// first use and serving the identical cached object afterwards.
    pub fn instance(
        &mut self,
        gfx: &Gfx,
        program: &Program,
    ) -> Result<&VertexArrayObject, BindingError> {
        match self.instances.entry(program.id()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let bindings = reconcile(&self.buffers, program.attribute_names())?;
                log::debug!(
                    "instantiating vertex array {:?} for program inputs {:?}",
                    self.name,
                    program.attribute_names(),
                );
                let raw = gfx.create_vertex_array(program, &bindings, self.index.as_ref())?;
                Ok(entry.insert(VertexArrayObject { raw, bindings }))
            }
        }
    }

    /// Issues one draw call through `program`.
    ///
    /// `count` is the number of indices (when an index buffer is attached)
    /// or vertices to assemble; `instances` above 1 switches to instanced
    /// drawing.
    pub fn draw(
        &mut self,
        gfx: &Gfx,
        program: &Program,
        count: u32,
        instances: u32,
    ) -> Result<(), BindingError> {
        let mode = self.primitive.to_gl();
        let element = self.index.map(|i| i.element);
        let vao = self.instance(gfx, program)?;

        let gl = gfx.gl();
        unsafe {
            gl.use_program(Some(program.raw()));
            gl.bind_vertex_array(Some(vao.raw()));
            match (element, instances) {
                (Some(e), 0..=1) => gl.draw_elements(mode, count as i32, e.to_gl(), 0),
                (Some(e), n) => {
                    gl.draw_elements_instanced(mode, count as i32, e.to_gl(), 0, n as i32)
                }
                (None, 0..=1) => gl.draw_arrays(mode, 0, count as i32),
                (None, n) => gl.draw_arrays_instanced(mode, 0, count as i32, n as i32),
            }
            gl.bind_vertex_array(None);
        }
        Ok(())
    }

    /// Drops the cached entry for one program, handing the driver object
    /// back to the caller (pass it to [`Gfx::delete_vertex_array`], or
    /// drop it and let it die with the context).
    pub fn invalidate(&mut self, program: ProgramId) -> Option<VertexArrayObject> {
        self.instances.remove(&program)
    }

    /// Drops every cached entry; driver objects die with the context.
    pub fn clear_instances(&mut self) {
        self.instances.clear();
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    #[cfg(test)]
    pub(crate) fn seed_instance(&mut self, id: ProgramId, vao: VertexArrayObject) {
        self.instances.insert(id, vao);
    }

    #[cfg(test)]
    pub(crate) fn cached(&self, id: ProgramId) -> Option<&VertexArrayObject> {
        self.instances.get(&id)
    }
}

/// Reconciles registered buffers against a program's attribute set.
///
/// Walks buffers in registration order and slots in layout order. A slot
/// whose name the program does not consume (or an explicit padding slot)
/// becomes a stride-preserving skip; every consumed name is removed from
/// the working set, which must be empty by the end.
pub(crate) fn reconcile(
    buffers: &[BufferDescriptor],
    program_attributes: &[String],
) -> Result<Vec<BufferBinding>, BindingError> {
    let mut needed: Vec<String> = program_attributes.to_vec();

    // Cheap early check while debug assertions are on: every program input
    // must be named by at least one buffer before the full walk bothers.
    #[cfg(debug_assertions)]
    {
        let missing: Vec<String> = needed
            .iter()
            .filter(|n| !buffers.iter().any(|b| b.names.iter().any(|bn| bn == *n)))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(BindingError::Unsatisfied { missing });
        }
    }

    let mut bindings = Vec::with_capacity(buffers.len());
    for (buffer_index, descriptor) in buffers.iter().enumerate() {
        let mut slots = Vec::with_capacity(descriptor.formats.len());
        let mut used = Vec::new();
        let mut names = descriptor.names.iter();

        for format in &descriptor.formats {
            if format.is_padding() {
                slots.push(LayoutSlot::Skip { bytes: format.byte_len() });
                continue;
            }
            let Some(name) = names.next() else {
                // Guarded at registration; kept as an error rather than a
                // panic in case a descriptor was built by hand.
                return Err(BindingError::NameCount {
                    buffer: buffer_index,
                    names: descriptor.names.len(),
                    slots: descriptor.formats.iter().filter(|f| !f.is_padding()).count(),
                });
            };

            if let Some(position) = needed.iter().position(|n| n == name) {
                needed.remove(position);
                used.push(name.clone());
                slots.push(LayoutSlot::Attribute { format: format.clone(), name: name.clone() });
            } else {
                // This program does not consume the attribute; keep its
                // stride footprint, bind nothing.
                slots.push(LayoutSlot::Skip { bytes: format.byte_len() });
            }
        }

        bindings.push(BufferBinding { buffer: descriptor.buffer, slots, attributes: used });
    }

    if !needed.is_empty() {
        return Err(BindingError::Unsatisfied { missing: needed });
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;

    fn buf(id: u32) -> glow::Buffer {
        glow::NativeBuffer(NonZeroU32::new(id).unwrap())
    }

    fn descriptor(id: u32, format: &str, names: &[&str]) -> BufferDescriptor {
        BufferDescriptor {
            buffer: buf(id),
            formats: parse(format).unwrap(),
            names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn owned(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    // ── reconcile ─────────────────────────────────────────────────────────

    #[test]
    fn subset_of_one_buffer_binds_with_skips() {
        let buffers = [descriptor(1, "3f 4nu1 2f", &["position", "color", "uv"])];
        let bindings = reconcile(&buffers, &owned(&["position", "uv"])).unwrap();

        assert_eq!(bindings.len(), 1);
        let b = &bindings[0];
        assert_eq!(b.attributes, owned(&["position", "uv"]));
        // The unused color slot keeps its 4-byte footprint.
        assert_eq!(b.layout_string(), "3f 4x 2f");
        assert_eq!(b.stride(), 12 + 4 + 8);
    }

    #[test]
    fn full_match_has_no_skips() {
        let buffers = [descriptor(1, "3f 2f", &["position", "uv"])];
        let bindings = reconcile(&buffers, &owned(&["position", "uv"])).unwrap();
        assert_eq!(bindings[0].layout_string(), "3f 2f");
        assert_eq!(bindings[0].attributes.len(), 2);
    }

    #[test]
    fn attributes_split_across_two_buffers() {
        let buffers = [
            descriptor(1, "3f 3f", &["position", "normal"]),
            descriptor(2, "2f/i", &["offset"]),
        ];
        let bindings = reconcile(&buffers, &owned(&["position", "offset"])).unwrap();

        assert_eq!(bindings[0].attributes, owned(&["position"]));
        assert_eq!(bindings[0].layout_string(), "3f 12x");
        assert_eq!(bindings[1].attributes, owned(&["offset"]));
        assert_eq!(bindings[1].layout_string(), "2f/i");
    }

    #[test]
    fn unsatisfied_attribute_reports_the_missing_set() {
        let buffers = [descriptor(1, "3f", &["position"])];
        let err = reconcile(&buffers, &owned(&["position", "tangent"])).unwrap_err();
        match err {
            BindingError::Unsatisfied { missing } => assert_eq!(missing, owned(&["tangent"])),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_program_input_set_binds_everything_as_skips() {
        let buffers = [descriptor(1, "3f 2f", &["position", "uv"])];
        let bindings = reconcile(&buffers, &[]).unwrap();
        assert_eq!(bindings[0].attributes.len(), 0);
        assert_eq!(bindings[0].layout_string(), "12x 8x");
    }

    #[test]
    fn explicit_padding_slots_stay_skips() {
        let buffers = [descriptor(1, "3f 4x 2f", &["position", "uv"])];
        let bindings = reconcile(&buffers, &owned(&["position", "uv"])).unwrap();
        assert_eq!(bindings[0].layout_string(), "3f 4x 2f");
        assert_eq!(bindings[0].stride(), 12 + 4 + 8);
    }

    #[test]
    fn first_registered_buffer_wins_duplicate_names() {
        let buffers = [
            descriptor(1, "3f", &["position"]),
            descriptor(2, "3f", &["position"]),
        ];
        let bindings = reconcile(&buffers, &owned(&["position"])).unwrap();
        assert_eq!(bindings[0].attributes, owned(&["position"]));
        // The second buffer's slot is already satisfied, so it skips.
        assert_eq!(bindings[1].attributes.len(), 0);
        assert_eq!(bindings[1].layout_string(), "12x");
    }

    // ── registration ──────────────────────────────────────────────────────

    #[test]
    fn registration_rejects_name_count_mismatch() {
        let mut source = VertexSource::new("quad", PrimitiveMode::Triangles);
        let err = source.buffer(buf(1), "3f 2f", &["position"]).unwrap_err();
        assert!(matches!(err, BindingError::NameCount { names: 1, slots: 2, .. }));
    }

    #[test]
    fn registration_ignores_padding_when_counting_names() {
        let mut source = VertexSource::new("quad", PrimitiveMode::Triangles);
        source.buffer(buf(1), "3f 4x 2f", &["position", "uv"]).unwrap();
    }

    #[test]
    fn registration_rejects_malformed_format() {
        let mut source = VertexSource::new("quad", PrimitiveMode::Triangles);
        let err = source.buffer(buf(1), "3f 7q", &["position", "huh"]).unwrap_err();
        assert!(matches!(err, BindingError::Format(_)));
    }

    // ── instance cache bookkeeping ────────────────────────────────────────

    fn fake_vao(id: u32) -> VertexArrayObject {
        VertexArrayObject {
            raw: glow::NativeVertexArray(NonZeroU32::new(id).unwrap()),
            bindings: Vec::new(),
        }
    }

    #[test]
    fn cached_lookups_return_the_identical_object() {
        let mut source = VertexSource::new("tri", PrimitiveMode::Triangles);
        let id = ProgramId::new(7);
        source.seed_instance(id, fake_vao(42));

        let first = source.cached(id).unwrap() as *const VertexArrayObject;
        let second = source.cached(id).unwrap() as *const VertexArrayObject;
        assert!(std::ptr::eq(first, second));
        assert_eq!(source.cached(id).unwrap().raw().0.get(), 42);
    }

    #[test]
    fn one_entry_per_program() {
        let mut source = VertexSource::new("tri", PrimitiveMode::Triangles);
        source.seed_instance(ProgramId::new(1), fake_vao(10));
        source.seed_instance(ProgramId::new(1), fake_vao(10));
        source.seed_instance(ProgramId::new(2), fake_vao(11));
        assert_eq!(source.instance_count(), 2);
    }

    #[test]
    fn invalidate_removes_only_the_given_program() {
        let mut source = VertexSource::new("tri", PrimitiveMode::Triangles);
        source.seed_instance(ProgramId::new(1), fake_vao(10));
        source.seed_instance(ProgramId::new(2), fake_vao(11));

        let removed = source.invalidate(ProgramId::new(1)).unwrap();
        assert_eq!(removed.raw().0.get(), 10);
        assert_eq!(source.instance_count(), 1);
        assert!(source.invalidate(ProgramId::new(1)).is_none());
    }

    #[test]
    fn clear_instances_empties_the_cache() {
        let mut source = VertexSource::new("tri", PrimitiveMode::Triangles);
        source.seed_instance(ProgramId::new(1), fake_vao(10));
        source.clear_instances();
        assert_eq!(source.instance_count(), 0);
    }
}
