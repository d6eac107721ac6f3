//! Immutable or dynamic vertex and index data.

use crate::errors::*;
use crate::video::MAX_VERTEX_ATTRIBUTES;

impl_handle!(MeshHandle);

/// The setup parameters of mesh object.
#[derive(Debug, Copy, Clone)]
pub struct MeshParams {
    /// Usage hints.
    pub hint: MeshHint,
    /// How a single vertex structure looks like.
    pub layout: VertexLayout,
    /// Index format
    pub index_format: IndexFormat,
    /// How the input vertex data is used to assemble primitives.
    pub primitive: MeshPrimitive,
    /// The number of vertices in this mesh.
    pub num_verts: usize,
    /// The number of indices in this mesh.
    pub num_idxes: usize,
}

impl Default for MeshParams {
    fn default() -> Self {
        MeshParams {
            hint: MeshHint::Immutable,
            layout: VertexLayout::default(),
            index_format: IndexFormat::U32,
            primitive: MeshPrimitive::Triangles,
            num_verts: 0,
            num_idxes: 0,
        }
    }
}

impl MeshParams {
    #[inline]
    pub fn vertex_buffer_len(&self) -> usize {
        self.num_verts * self.layout.stride() as usize
    }

    #[inline]
    pub fn index_buffer_len(&self) -> usize {
        self.num_idxes * self.index_format.stride()
    }

    /// Checks that `data` has exactly the byte sizes these parameters describe.
    pub fn validate(&self, data: &MeshData) -> Result<()> {
        if self.layout.is_empty() {
            return Err(Error::LayoutInvalid(
                "vertex layout has no attributes.".into(),
            ));
        }

        if data.vptr.len() != self.vertex_buffer_len() {
            return Err(Error::OutOfBounds(format!(
                "vertex buffer holds {} bytes, {} vertices of stride {} need {}.",
                data.vptr.len(),
                self.num_verts,
                self.layout.stride(),
                self.vertex_buffer_len()
            )));
        }

        if data.iptr.len() != self.index_buffer_len() {
            return Err(Error::OutOfBounds(format!(
                "index buffer holds {} bytes, {} indices need {}.",
                data.iptr.len(),
                self.num_idxes,
                self.index_buffer_len()
            )));
        }

        Ok(())
    }
}

/// Raw bytes of the vertex and index buffers.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vptr: Vec<u8>,
    pub iptr: Vec<u8>,
}

impl MeshData {
    /// Packs interleaved float vertices and 32-bit indices.
    pub fn new(vertices: &[f32], indices: &[u32]) -> Self {
        MeshData {
            vptr: bytemuck::cast_slice(vertices).to_vec(),
            iptr: bytemuck::cast_slice(indices).to_vec(),
        }
    }

    /// Packs interleaved float vertices and 16-bit indices.
    pub fn with_u16_indices(vertices: &[f32], indices: &[u16]) -> Self {
        MeshData {
            vptr: bytemuck::cast_slice(vertices).to_vec(),
            iptr: bytemuck::cast_slice(indices).to_vec(),
        }
    }

    /// Decodes the index buffer back into indices.
    pub fn indices(&self, format: IndexFormat) -> Vec<u32> {
        match format {
            IndexFormat::U16 => self
                .iptr
                .chunks_exact(2)
                .map(|v| u32::from(u16::from_ne_bytes([v[0], v[1]])))
                .collect(),
            IndexFormat::U32 => self
                .iptr
                .chunks_exact(4)
                .map(|v| u32::from_ne_bytes([v[0], v[1], v[2], v[3]]))
                .collect(),
        }
    }
}

/// Specifies which part of the index buffer a draw call consumes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MeshIndex {
    /// `len` indices starting at index `from`.
    Ptr(usize, usize),
    All,
}

/// Hint abouts the intended update strategy of the data.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MeshHint {
    /// The resource is initialized with data and cannot be changed later, this
    /// is the most common and most efficient usage.
    Immutable,
    /// The resource is initialized without data, but will be be updated by the
    /// CPU in each frame.
    Stream,
    /// The resource is initialized without data and will be written by the CPU
    /// before use, updates will be infrequent.
    Dynamic,
}

/// Defines how the input vertex data is used to assemble primitives.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MeshPrimitive {
    /// Separate points.
    Points,
    /// Separate lines.
    Lines,
    /// Line strips.
    LineStrip,
    /// Separate triangles.
    Triangles,
    /// Triangle strips.
    TriangleStrip,
}

impl MeshPrimitive {
    /// Number of primitives assembled from `indices` indices.
    pub fn assemble(self, indices: u32) -> u32 {
        match self {
            MeshPrimitive::Points => indices,
            MeshPrimitive::Lines => indices / 2,
            MeshPrimitive::LineStrip => indices.saturating_sub(1),
            MeshPrimitive::Triangles => indices / 3,
            MeshPrimitive::TriangleStrip => indices.saturating_sub(2),
        }
    }
}

/// Splits a triangle list into its triangles. Trailing indices that do not form a
/// whole triangle are ignored, as the rasterizer does.
pub fn triangles(indices: &[u32]) -> Vec<[u32; 3]> {
    indices
        .chunks_exact(3)
        .map(|v| [v[0], v[1], v[2]])
        .collect()
}

/// Vertex indices can be either 16- or 32-bit.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum IndexFormat {
    U16,
    U32,
}

impl IndexFormat {
    #[inline]
    pub fn stride(self) -> usize {
        match self {
            IndexFormat::U16 => 2,
            IndexFormat::U32 => 4,
        }
    }
}

/// The data type in the vertex component.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum VertexFormat {
    Byte,
    UByte,
    Short,
    UShort,
    Float,
}

impl VertexFormat {
    /// Size of a single component in bytes.
    #[inline]
    pub fn size(self) -> u8 {
        match self {
            VertexFormat::Byte | VertexFormat::UByte => 1,
            VertexFormat::Short | VertexFormat::UShort => 2,
            VertexFormat::Float => 4,
        }
    }
}

/// The details of a vertex attribute.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct VertexAttribute {
    /// The attribute location declared in the vertex stage, `layout(location = N)`.
    pub location: u8,
    /// The data type of each component of this element.
    pub format: VertexFormat,
    /// The number of components per generic vertex element.
    pub size: u8,
    /// Whether fixed-point data values should be normalized.
    pub normalized: bool,
}

impl Default for VertexAttribute {
    fn default() -> Self {
        VertexAttribute {
            location: 0,
            format: VertexFormat::Float,
            size: 0,
            normalized: false,
        }
    }
}

/// `VertexLayout` defines how a single vertex structure looks like. Attributes are
/// packed in declaration order; the stride is the sum of their sizes and the offset
/// of each is the sum of the sizes declared before it.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct VertexLayout {
    stride: u32,
    len: u8,
    offset: [u32; MAX_VERTEX_ATTRIBUTES],
    elements: [VertexAttribute; MAX_VERTEX_ATTRIBUTES],
}

impl VertexLayout {
    /// Creates a new an empty `VertexLayoutBuilder`.
    #[inline]
    pub fn build() -> VertexLayoutBuilder {
        VertexLayoutBuilder::new()
    }

    /// Stride of single vertex structure, in bytes.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Returns the number of elements in the layout.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Relative byte offset of the attribute bound to `location`.
    pub fn offset(&self, location: u8) -> Option<u32> {
        self.position(location).map(|i| self.offset[i])
    }

    /// Returns the attribute bound to `location`.
    pub fn element(&self, location: u8) -> Option<VertexAttribute> {
        self.position(location).map(|i| self.elements[i])
    }

    /// Iterates `(attribute, offset)` pairs in declaration order.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (VertexAttribute, u32)> + 'a {
        (0..self.len())
            .map(move |i| (self.elements[i], self.offset[i]))
    }

    fn position(&self, location: u8) -> Option<usize> {
        self.elements[..self.len()]
            .iter()
            .position(|v| v.location == location)
    }
}

/// Helper structure to build a vertex layout.
#[derive(Default)]
pub struct VertexLayoutBuilder(VertexLayout);

impl VertexLayoutBuilder {
    #[inline]
    pub fn new() -> Self {
        Default::default()
    }

    /// Declares an attribute. Declaring the same location twice replaces the
    /// earlier declaration in place.
    pub fn with(
        &mut self,
        location: u8,
        format: VertexFormat,
        size: u8,
        normalized: bool,
    ) -> &mut Self {
        assert!(size > 0 && size <= 4);
        assert!((location as usize) < MAX_VERTEX_ATTRIBUTES);

        let desc = VertexAttribute {
            location,
            format,
            size,
            normalized,
        };

        if let Some(i) = self.0.position(location) {
            self.0.elements[i] = desc;
            return self;
        }

        assert!((self.0.len as usize) < MAX_VERTEX_ATTRIBUTES);
        self.0.elements[self.0.len as usize] = desc;
        self.0.len += 1;
        self
    }

    pub fn finish(&mut self) -> VertexLayout {
        self.0.stride = 0;
        for i in 0..self.0.len() {
            let element = self.0.elements[i];
            let len = u32::from(element.size) * u32::from(element.format.size());
            self.0.offset[i] = self.0.stride;
            self.0.stride += len;
        }

        self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn basic() {
        let layout = VertexLayout::build()
            .with(0, VertexFormat::Float, 3, false)
            .with(2, VertexFormat::Float, 2, true)
            .finish();

        assert_eq!(layout.stride(), 20);
        assert_eq!(layout.offset(0), Some(0));
        assert_eq!(layout.offset(2), Some(12));
        assert_eq!(layout.offset(1), None);

        let element = layout.element(2).unwrap();
        assert_eq!(element.format, VertexFormat::Float);
        assert_eq!(element.size, 2);
        assert_eq!(element.normalized, true);
        assert_eq!(layout.element(1), None);
    }

    #[test]
    fn full_layout() {
        let mut builder = VertexLayout::build();
        for location in 0..MAX_VERTEX_ATTRIBUTES as u8 {
            builder.with(location, VertexFormat::Float, 4, false);
        }

        let layout = builder.finish();
        assert_eq!(layout.len(), MAX_VERTEX_ATTRIBUTES);
        assert_eq!(layout.stride(), 256);
        assert_eq!(layout.offset(15), Some(240));
    }

    #[test]
    fn rewrite() {
        let layout = VertexLayout::build()
            .with(0, VertexFormat::Byte, 1, false)
            .with(1, VertexFormat::Float, 2, true)
            .with(0, VertexFormat::Float, 3, true)
            .finish();

        assert_eq!(layout.len(), 2);
        assert_eq!(layout.stride(), 20);
        assert_eq!(layout.offset(0), Some(0));
        assert_eq!(layout.offset(1), Some(12));
    }

    #[test]
    fn validate_sizes() {
        let params = MeshParams {
            layout: VertexLayout::build()
                .with(0, VertexFormat::Float, 3, false)
                .finish(),
            num_verts: 4,
            num_idxes: 6,
            ..Default::default()
        };

        let vertices = [0.0f32; 12];
        assert!(params.validate(&MeshData::new(&vertices, &[0, 1, 2, 2, 3, 0])).is_ok());
        assert!(params.validate(&MeshData::new(&vertices, &[0, 1, 2])).is_err());
        assert!(params.validate(&MeshData::new(&vertices[..9], &[0, 1, 2, 2, 3, 0])).is_err());
    }

    #[test]
    fn decode_indices() {
        let data = MeshData::with_u16_indices(&[], &[4, 5, 6]);
        assert_eq!(data.indices(IndexFormat::U16), vec![4, 5, 6]);

        let data = MeshData::new(&[], &[7, 8, 9, 10]);
        assert_eq!(data.indices(IndexFormat::U32), vec![7, 8, 9, 10]);
        assert_eq!(triangles(&data.indices(IndexFormat::U32)), vec![[7, 8, 9]]);
    }
}
