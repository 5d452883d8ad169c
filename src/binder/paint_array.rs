//! Byte-level per-vertex paint storage.

/// Growable array of fixed-stride vertices stored as raw bytes, ready to be
/// handed to a vertex buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaintVertexArray {
    bytes: Vec<u8>,
    stride: usize,
}

impl PaintVertexArray {
    /// Empty array of `stride`-byte vertices, with room for `reserve`
    /// vertices.
    #[must_use]
    pub fn with_capacity(stride: usize, reserve: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(stride * reserve),
            stride,
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.bytes.len() / self.stride
        }
    }

    /// `true` when no vertex has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes per vertex.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Append copies of `vertex` until the array holds `length` vertices.
    /// Does nothing when it already holds that many.
    pub fn extend_to(&mut self, length: usize, vertex: &[u8]) {
        debug_assert_eq!(vertex.len(), self.stride);
        let start = self.len();
        if length <= start {
            return;
        }
        self.bytes.reserve((length - start) * self.stride);
        for _ in start..length {
            self.bytes.extend_from_slice(vertex);
        }
    }

    /// Overwrite vertices `start..end` with `vertex`. The range is clipped to
    /// the current length.
    pub fn write_range(&mut self, start: usize, end: usize, vertex: &[u8]) {
        debug_assert_eq!(vertex.len(), self.stride);
        let end = end.min(self.len());
        for i in start..end {
            let offset = i * self.stride;
            self.bytes[offset..offset + self.stride].copy_from_slice(vertex);
        }
    }

    /// Bytes of one vertex.
    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<&[u8]> {
        let offset = index.checked_mul(self.stride)?;
        self.bytes.get(offset..offset + self.stride)
    }

    /// All bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Drop the CPU-side copy and its allocation.
    pub fn release(&mut self) {
        self.bytes = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::floats;

    #[test]
    fn extend_is_incremental() {
        let mut array = PaintVertexArray::with_capacity(4, 0);
        array.extend_to(2, &1.0f32.to_ne_bytes());
        array.extend_to(5, &2.0f32.to_ne_bytes());
        array.extend_to(3, &9.0f32.to_ne_bytes());
        assert_eq!(array.len(), 5);
        assert_eq!(floats(array.as_bytes()), vec![1.0, 1.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn write_range_is_clipped() {
        let mut array = PaintVertexArray::with_capacity(4, 4);
        array.extend_to(3, &0.0f32.to_ne_bytes());
        array.write_range(1, 10, &5.0f32.to_ne_bytes());
        assert_eq!(floats(array.as_bytes()), vec![0.0, 5.0, 5.0]);
        assert_eq!(array.vertex(2), Some(&5.0f32.to_ne_bytes()[..]));
        assert_eq!(array.vertex(3), None);
    }

    #[test]
    fn release_empties() {
        let mut array = PaintVertexArray::with_capacity(8, 16);
        array.extend_to(4, &[0; 8]);
        array.release();
        assert!(array.is_empty());
        assert_eq!(array.stride(), 8);
    }
}
