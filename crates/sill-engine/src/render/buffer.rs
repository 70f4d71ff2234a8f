use bytemuck::NoUninit;
use glow::HasContext;

use super::error::BindingError;
use super::Gfx;

/// Upload-frequency hint, mapped onto the GL usage enum.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferUsage {
    /// Uploaded once, drawn many times.
    Static,
    /// Re-uploaded now and then.
    Dynamic,
    /// Re-uploaded roughly every frame.
    Stream,
}

impl BufferUsage {
    fn to_gl(self) -> u32 {
        match self {
            BufferUsage::Static => glow::STATIC_DRAW,
            BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
            BufferUsage::Stream => glow::STREAM_DRAW,
        }
    }
}

impl Gfx {
    /// Creates an array buffer filled with `data`.
    pub fn create_vertex_buffer<T: NoUninit>(
        &self,
        data: &[T],
        usage: BufferUsage,
    ) -> Result<glow::Buffer, BindingError> {
        self.create_buffer_raw(bytemuck::cast_slice(data), usage)
    }

    /// Creates a buffer holding index data.
    ///
    /// GL buffers are untyped; the element width is declared where the
    /// buffer is attached to a [`VertexSource`](super::VertexSource). The
    /// upload goes through the `ARRAY_BUFFER` target so no vertex array
    /// needs to be bound.
    pub fn create_index_buffer<T: NoUninit>(
        &self,
        data: &[T],
        usage: BufferUsage,
    ) -> Result<glow::Buffer, BindingError> {
        self.create_buffer_raw(bytemuck::cast_slice(data), usage)
    }

    fn create_buffer_raw(&self, bytes: &[u8], usage: BufferUsage) -> Result<glow::Buffer, BindingError> {
        unsafe {
            let buffer = self.gl.create_buffer().map_err(BindingError::Allocation)?;
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytes, usage.to_gl());
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(buffer)
        }
    }

    /// Overwrites part of an existing buffer.
    ///
    /// Must not grow the buffer; the caller keeps `offset_bytes + data`
    /// within the allocation made at creation.
    pub fn update_buffer<T: NoUninit>(&self, buffer: glow::Buffer, offset_bytes: i32, data: &[T]) {
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl
                .buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, offset_bytes, bytemuck::cast_slice(data));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    /// Frees a buffer. Vertex arrays referencing it must not be drawn
    /// afterwards.
    pub fn delete_buffer(&self, buffer: glow::Buffer) {
        unsafe {
            self.gl.delete_buffer(buffer);
        }
    }
}
