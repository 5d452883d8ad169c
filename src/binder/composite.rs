//! Binder for values depending on both the feature and the zoom.

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

/// Binds a composite expression as a (min, max) vertex attribute pair.
///
/// Every vertex stores the value at the tile zoom and at the tile zoom + 1.
/// The shader blends the two with `a_<name>_t`, recomputed every frame from
/// the camera zoom, so geometry never has to be re-uploaded while zooming.
#[derive(Debug)]
pub struct CompositeExpressionBinder<B> {
    expression: Arc<dyn StyleExpression>,
    use_integer_zoom: bool,
    zoom: f32,
    statistics: Statistics,
    vertex: VertexBinding<B>,
}

impl<B: PaintBuffer> CompositeExpressionBinder<B> {
    /// Binder for a tile whose zoom floor is `zoom`.
    #[must_use]
    pub fn new(
        property: PaintProperty,
        expression: Arc<dyn StyleExpression>,
        layout: PaintLayout,
        use_integer_zoom: bool,
        zoom: f32,
        reserve: usize,
    ) -> Self {
        Self {
            expression,
            use_integer_zoom,
            zoom,
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

    /// Running statistics of numeric values (both bounds).
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    /// The tile's reference zoom.
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
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

    /// Append this feature's (min, max) pair for vertices up to `length`.
    ///
    /// # Errors
    ///
    /// `BindError::NotPatternLayout` for pattern-layout binders.
    /// `BindError::PaintArrayReleased` once an upload dropped the CPU array.
    pub fn populate_paint_array(&mut self, length: usize, feature: &Feature) -> Result<(), BindError> {
        let (values, n) = self.encode(feature)?;
        self.vertex
            .extend_to(length, bytemuck::cast_slice(&values[..n]))
    }

    /// Overwrite vertices `start..end` with this feature's current pair.
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

    /// Blend factor between the two stored values at `current_zoom`.
    /// Clamped to `[0, 1]` outside the tile's zoom range.
    #[must_use]
    pub fn interpolation_factor(&self, current_zoom: f32) -> f32 {
        let input = if self.use_integer_zoom {
            current_zoom.floor()
        } else {
            current_zoom
        };
        self.expression
            .interpolation_factor(input, self.zoom, self.zoom + 1.0)
            .clamp(0.0, 1.0)
    }

    /// Interpolation uniform names.
    #[must_use]
    pub fn uniform_names(&self) -> &[String] {
        &self.vertex.uniform_names
    }

    /// Write `a_<name>_t` for the global zoom.
    pub fn set_uniforms(&self, program: &mut impl UniformSink, globals: &EvaluationParameters) {
        let t = self.interpolation_factor(globals.zoom);
        for name in self.uniform_names() {
            program.set_uniform_f32(name, t);
        }
    }

    fn encode(&mut self, feature: &Feature) -> Result<([f32; 4], usize), BindError> {
        let property = self.vertex.property;
        if self.vertex.layout == PaintLayout::Pattern {
            return Err(BindError::NotPatternLayout(property));
        }
        let min = self
            .expression
            .evaluate(&EvaluationParameters::new(self.zoom), feature);
        let max = self
            .expression
            .evaluate(&EvaluationParameters::new(self.zoom + 1.0), feature);
        let out = if property.value_type() == ValueType::Color {
            let [min_rg, min_ba] = pack_color(super::color_or_default(property, &min));
            let [max_rg, max_ba] = pack_color(super::color_or_default(property, &max));
            [min_rg, min_ba, max_rg, max_ba]
        } else {
            let min = super::number_or_default(property, &min);
            let max = super::number_or_default(property, &max);
            self.statistics.record(min);
            self.statistics.record(max);
            [min, max, 0.0, 0.0]
        };
        Ok((out, self.vertex.layout.components()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        binder::pack::unpack_float,
        style::{Color, Expression, Interpolation, Value},
        testing::{floats, RecordingBuffer, RecordingContext, RecordingUniforms},
    };

    /// `width` at zoom 10 grows to `2 * width` at zoom 12.
    fn width_curve() -> Arc<Expression> {
        Arc::new(Expression::zoom_curve(
            Interpolation::Linear,
            vec![
                (10.0, Expression::get("width")),
                (
                    12.0,
                    Expression::property_curve(
                        Interpolation::Linear,
                        "width",
                        vec![(0.0, Expression::number(0.0)), (100.0, Expression::number(200.0))],
                    ),
                ),
            ],
        ))
    }

    fn binder(zoom: f32, use_integer_zoom: bool) -> CompositeExpressionBinder<RecordingBuffer> {
        CompositeExpressionBinder::new(
            PaintProperty::LineWidth,
            width_curve(),
            PaintLayout::Float2,
            use_integer_zoom,
            zoom,
            0,
        )
    }

    fn feature(width: f32) -> Feature {
        Feature::with_properties(serde_json::json!({ "width": width }))
    }

    #[test]
    fn stores_values_at_zoom_and_zoom_plus_one() {
        let mut binder = binder(10.0, false);
        let f = feature(4.0);
        binder.populate_paint_array(3, &f).unwrap();

        let expr = width_curve();
        let min = expr.evaluate(&EvaluationParameters::new(10.0), &f);
        let max = expr.evaluate(&EvaluationParameters::new(11.0), &f);
        assert_eq!(min, Value::Number(4.0));
        assert_eq!(max, Value::Number(6.0));
        assert_eq!(
            floats(binder.paint_array().as_bytes()),
            vec![4.0, 6.0, 4.0, 6.0, 4.0, 6.0]
        );
        assert_eq!(binder.statistics().max, 6.0);
    }

    #[test]
    fn color_pairs_pack_to_four_floats() {
        let expr = Arc::new(Expression::zoom_curve(
            Interpolation::Linear,
            vec![
                (5.0, Expression::get("color")),
                (6.0, Expression::literal(Value::Color(Color::WHITE))),
            ],
        ));
        let mut binder: CompositeExpressionBinder<RecordingBuffer> = CompositeExpressionBinder::new(
            PaintProperty::FillColor,
            expr,
            PaintLayout::Float4,
            false,
            5.0,
            0,
        );
        let f = Feature::with_properties(serde_json::json!({ "color": "#102030" }));
        binder.populate_paint_array(1, &f).unwrap();
        let values = floats(binder.paint_array().as_bytes());
        assert_eq!(values.len(), 4);
        assert_eq!(unpack_float(values[0]), [0x10, 0x20]);
        assert_eq!(unpack_float(values[1]), [0x30, 255]);
        assert_eq!(unpack_float(values[2]), [255, 255]);
        assert_eq!(unpack_float(values[3]), [255, 255]);
        assert_eq!(binder.statistics().max, f32::NEG_INFINITY);
    }

    #[test]
    fn integer_zoom_floors_the_camera_zoom() {
        let snapped = binder(14.0, true);
        let expr = width_curve();
        assert_eq!(
            snapped.interpolation_factor(14.7),
            expr.interpolation_factor(14.0, 14.0, 15.0)
        );
        assert_eq!(snapped.interpolation_factor(14.7), 0.0);

        let smooth = binder(14.0, false);
        assert!((smooth.interpolation_factor(14.7) - 0.7).abs() < 1e-5);
    }

    #[test]
    fn factor_is_clamped_outside_the_tile_zoom() {
        let overzoomed = binder(14.0, false);
        assert_eq!(overzoomed.interpolation_factor(18.0), 1.0);
        assert_eq!(overzoomed.interpolation_factor(13.5), 0.0);

        let snapped = binder(14.0, true);
        assert_eq!(snapped.interpolation_factor(18.0), 1.0);

        let mut program = RecordingUniforms::default();
        overzoomed.set_uniforms(&mut program, &EvaluationParameters::new(18.0));
        assert_eq!(program.floats, vec![("a_width_t".to_owned(), 1.0)]);
    }

    #[test]
    fn uniform_carries_interpolation_factor() {
        let binder = binder(3.0, false);
        let mut program = RecordingUniforms::default();
        binder.set_uniforms(&mut program, &EvaluationParameters::new(3.25));
        assert_eq!(program.floats.len(), 1);
        assert_eq!(program.floats[0].0, "a_width_t");
        assert!((program.floats[0].1 - 0.25).abs() < 1e-6);
    }

    #[test]
    fn upload_uses_doubled_components() {
        let context = RecordingContext::default();
        let mut binder = binder(10.0, false);
        binder.populate_paint_array(2, &feature(1.0)).unwrap();
        binder.upload(&context, &BindingOptions::default());
        let created = context.created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].stride, 8);
        assert_eq!(created[0].bytes, 16);
    }

    #[test]
    fn pattern_population_after_release_is_an_error() {
        let context = RecordingContext::default();
        let mut binder: CompositeExpressionBinder<RecordingBuffer> = CompositeExpressionBinder::new(
            PaintProperty::LinePattern,
            Arc::new(Expression::get("pattern")),
            PaintLayout::Pattern,
            false,
            4.0,
            0,
        );
        binder
            .populate_pattern_array(2, &PatternVertex::default())
            .unwrap();
        binder.upload(&context, &BindingOptions::default());
        assert!(matches!(
            binder.populate_pattern_array(4, &PatternVertex::default()),
            Err(BindError::PaintArrayReleased(PaintProperty::LinePattern))
        ));
        assert_eq!(context.created().len(), 1);
    }

    #[test]
    fn destroy_before_upload_is_a_no_op() {
        let context = RecordingContext::default();
        let mut binder = binder(10.0, false);
        binder.populate_paint_array(2, &feature(1.0)).unwrap();
        binder.destroy();
        assert_eq!(context.destroyed(), 0);
        assert_eq!(binder.paint_array().len(), 2);
    }
}
