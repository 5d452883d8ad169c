//! Binder for feature-dependent, zoom-independent values.

use std::sync::Arc;

use super::{
    pack::pack_color, paint_array::PaintVertexArray, vertex::VertexBinding,
    Statistics,
};
use crate::{
    error::BindError,
    feature::Feature,
    gpu::{GpuContext, PaintAttributeLayout, PaintBuffer, PaintLayout, PatternVertex, UniformSink},
    options::BindingOptions,
    style::{EvaluationParameters, PaintProperty, StyleExpression, ValueType},
};

/// Binds a source expression as one vertex attribute.
///
/// The expression is evaluated once per feature and the result is written
/// to every vertex of that feature. The shader's interpolation uniform is
/// always 0.
#[derive(Debug)]
pub struct SourceExpressionBinder<B> {
    expression: Arc<dyn StyleExpression>,
    statistics: Statistics,
    vertex: VertexBinding<B>,
}

impl<B: PaintBuffer> SourceExpressionBinder<B> {
    /// Binder storing `layout`-shaped vertices for `property`.
    #[must_use]
    pub fn new(
        property: PaintProperty,
        expression: Arc<dyn StyleExpression>,
        layout: PaintLayout,
        reserve: usize,
    ) -> Self {
        Self {
            expression,
            statistics: Statistics::default(),
            vertex: VertexBinding::new(property, layout, reserve),
        }
    }

    /// The bound property.
    #[must_use]
    pub fn property(&self) -> PaintProperty {
        self.vertex.property
    }

    /// Shader base names.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.vertex.names
    }

    /// Running statistics of numeric values.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    /// The expression being bound.
    #[must_use]
    pub fn expression(&self) -> &Arc<dyn StyleExpression> {
        &self.expression
    }

    /// CPU-side vertex data.
    #[must_use]
    pub fn paint_array(&self) -> &PaintVertexArray {
        &self.vertex.array
    }

    /// Attribute layout of the vertex buffer.
    #[must_use]
    pub fn attribute_layout(&self) -> &PaintAttributeLayout {
        &self.vertex.attribute_layout
    }

    /// Append this feature's value for vertices up to `length`.
    ///
    /// # Errors
    ///
    /// `BindError::NotPatternLayout` for pattern-layout binders, which are
    /// filled through [`populate_pattern_array`](Self::populate_pattern_array).
    /// `BindError::PaintArrayReleased` once an upload dropped the CPU array.
    pub fn populate_paint_array(&mut self, length: usize, feature: &Feature) -> Result<(), BindError> {
        let (values, n) = self.encode(feature)?;
        self.vertex
            .extend_to(length, bytemuck::cast_slice(&values[..n]))
    }

    /// Overwrite vertices `start..end` with this feature's current value.
    /// Returns `false` if the CPU array was released.
    ///
    /// # Errors
    ///
    /// Same as [`populate_paint_array`](Self::populate_paint_array).
    pub fn update_paint_array(
        &mut self,
        start: usize,
        end: usize,
        feature: &Feature,
    ) -> Result<bool, BindError> {
        let (values, n) = self.encode(feature)?;
        Ok(self
            .vertex
            .write_range(start, end, bytemuck::cast_slice(&values[..n])))
    }

    /// Append one pattern vertex for vertices up to `length`.
    ///
    /// # Errors
    ///
    /// `BindError::NotPatternLayout` unless this binder uses the pattern
    /// layout. `BindError::PaintArrayReleased` once an upload dropped the
    /// CPU array.
    pub fn populate_pattern_array(
        &mut self,
        length: usize,
        pattern: &PatternVertex,
    ) -> Result<(), BindError> {
        if self.vertex.layout != PaintLayout::Pattern {
            return Err(BindError::NotPatternLayout(self.vertex.property));
        }
        self.vertex.extend_to(length, bytemuck::bytes_of(pattern))
    }

    /// Upload the paint array.
    pub fn upload<C: GpuContext<Buffer = B>>(&mut self, context: &C, options: &BindingOptions) {
        self.vertex.upload(context, options);
    }

    /// Release the GPU buffer, if any.
    pub fn destroy(&mut self) {
        self.vertex.destroy();
    }

    /// The uploaded buffer.
    #[must_use]
    pub fn vertex_buffer(&self) -> Option<&B> {
        self.vertex.buffer()
    }

    /// Interpolation uniform names.
    #[must_use]
    pub fn uniform_names(&self) -> &[String] {
        &self.vertex.uniform_names
    }

    /// Write `a_<name>_t = 0`; values are already resolved per vertex.
    pub fn set_uniforms(&self, program: &mut impl UniformSink) {
        for name in self.uniform_names() {
            program.set_uniform_f32(name, 0.0);
        }
    }

    /// Evaluate at zoom 0 and encode one vertex. Returns the float buffer and
    /// the number of components used.
    fn encode(&mut self, feature: &Feature) -> Result<([f32; 4], usize), BindError> {
        let property = self.vertex.property;
        if self.vertex.layout == PaintLayout::Pattern {
            return Err(BindError::NotPatternLayout(property));
        }
        let value = self
            .expression
            .evaluate(&EvaluationParameters::new(0.0), feature);
        let mut out = [0.0; 4];
        if property.value_type() == ValueType::Color {
            let [rg, ba] = pack_color(super::color_or_default(property, &value));
            out[0] = rg;
            out[1] = ba;
        } else {
            let v = super::number_or_default(property, &value);
            self.statistics.record(v);
            out[0] = v;
        }
        Ok((out, self.vertex.layout.components()))
    }
}
