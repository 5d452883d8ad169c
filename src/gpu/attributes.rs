//! Paint vertex layouts.
//!
//! A binder's vertex layout is picked from the (value type, binder kind)
//! table, unless the property has an entry in the exception table. Pattern
//! properties use a multi-slot layout of 8-byte slots.

use std::mem::size_of;

use bytemuck::{Pod, Zeroable};

use crate::{
    binder::BinderKind,
    error::BindError,
    style::{PaintProperty, ValueType},
};

/// Per-vertex storage shape of one paint binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintLayout {
    /// One float (source number).
    Float1,
    /// Two floats (source packed color, composite number).
    Float2,
    /// Four floats (composite packed color).
    Float4,
    /// [`PatternVertex`] (pattern ids and size).
    Pattern,
}

/// Properties whose layout does not come from the value-type table. Both
/// source and composite kinds use the listed layout.
const LAYOUT_EXCEPTIONS: &[(PaintProperty, PaintLayout)] =
    &[(PaintProperty::LinePattern, PaintLayout::Pattern)];

impl PaintLayout {
    /// Resolve the layout for a vertex-backed binder.
    ///
    /// # Errors
    ///
    /// `BindError::MissingLayout` when neither the exception table nor the
    /// value-type table covers the combination (including constant kinds,
    /// which have no vertex data).
    pub fn resolve(property: PaintProperty, kind: BinderKind) -> Result<Self, BindError> {
        let missing = || BindError::MissingLayout {
            property,
            value_type: property.value_type(),
            kind,
        };
        if kind == BinderKind::Constant {
            return Err(missing());
        }
        if let Some((_, layout)) = LAYOUT_EXCEPTIONS.iter().find(|(p, _)| *p == property) {
            return Ok(*layout);
        }
        match (property.value_type(), kind) {
            (ValueType::Number, BinderKind::Source) => Ok(Self::Float1),
            (ValueType::Number, BinderKind::Composite)
            | (ValueType::Color, BinderKind::Source) => Ok(Self::Float2),
            (ValueType::Color, BinderKind::Composite) => Ok(Self::Float4),
            _ => Err(missing()),
        }
    }

    /// Whether `property` has a dedicated layout and is populated by the
    /// geometry builder instead of the generic path.
    #[must_use]
    pub fn is_exception(property: PaintProperty) -> bool {
        LAYOUT_EXCEPTIONS.iter().any(|(p, _)| *p == property)
    }

    /// Bytes per vertex.
    #[must_use]
    pub fn stride(self) -> usize {
        match self {
            Self::Float1 => 4,
            Self::Float2 => 8,
            Self::Float4 => 16,
            Self::Pattern => size_of::<PatternVertex>(),
        }
    }

    /// Float components per vertex for the generic layouts.
    #[must_use]
    pub fn components(self) -> usize {
        match self {
            Self::Float1 => 1,
            Self::Float2 => 2,
            Self::Float4 => 4,
            Self::Pattern => 0,
        }
    }
}

/// One vertex of a pattern paint array. Each field occupies one 8-byte slot.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct PatternVertex {
    /// Atlas rectangle `[tl.x, tl.y, br.x, br.y]` of the pattern shown at
    /// the lower zoom.
    pub pattern_from: [u16; 4],
    /// Atlas rectangle of the pattern shown at the upper zoom.
    pub pattern_to: [u16; 4],
    /// Pattern size in pixels `[width, height]`.
    pub pattern_size: [f32; 2],
}

/// One named vertex attribute inside a paint buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintAttribute {
    /// Shader attribute name, e.g. `a_color`.
    pub name: String,
    /// Vertex format.
    pub format: wgpu::VertexFormat,
    /// Byte offset inside one vertex.
    pub offset: u64,
}

/// Attribute layout of one paint vertex buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintAttributeLayout {
    /// Attributes in slot order.
    pub attributes: Vec<PaintAttribute>,
    /// Bytes per vertex.
    pub stride: u64,
}

impl PaintAttributeLayout {
    /// Attribute layout for `layout` using the binder's base names.
    #[must_use]
    pub fn new(layout: PaintLayout, names: &[String]) -> Self {
        let attributes = match layout {
            PaintLayout::Pattern => {
                let formats = [
                    wgpu::VertexFormat::Uint16x4,
                    wgpu::VertexFormat::Uint16x4,
                    wgpu::VertexFormat::Float32x2,
                ];
                names
                    .iter()
                    .zip(formats)
                    .enumerate()
                    .map(|(i, (name, format))| PaintAttribute {
                        name: format!("a_{name}"),
                        format,
                        offset: 8 * i as u64,
                    })
                    .collect()
            }
            PaintLayout::Float1 | PaintLayout::Float2 | PaintLayout::Float4 => {
                let format = match layout {
                    PaintLayout::Float1 => wgpu::VertexFormat::Float32,
                    PaintLayout::Float2 => wgpu::VertexFormat::Float32x2,
                    _ => wgpu::VertexFormat::Float32x4,
                };
                names
                    .first()
                    .map(|name| PaintAttribute {
                        name: format!("a_{name}"),
                        format,
                        offset: 0,
                    })
                    .into_iter()
                    .collect()
            }
        };
        Self {
            attributes,
            stride: layout.stride() as u64,
        }
    }

    /// wgpu attributes with consecutive shader locations from
    /// `first_location`.
    #[must_use]
    pub fn vertex_attributes(&self, first_location: u32) -> Vec<wgpu::VertexAttribute> {
        self.attributes
            .iter()
            .enumerate()
            .map(|(i, a)| wgpu::VertexAttribute {
                format: a.format,
                offset: a.offset,
                shader_location: first_location + i as u32,
            })
            .collect()
    }
}

/// Owned vertex buffer layout for pipeline creation.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintVertexLayout {
    /// Bytes per vertex.
    pub array_stride: u64,
    /// Attributes with resolved shader locations.
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl PaintVertexLayout {
    /// Borrowed wgpu layout.
    #[must_use]
    pub fn as_wgpu(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}
