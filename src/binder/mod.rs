//! Per-property binding strategies.
//!
//! A [`Binder`] decides how one paint property reaches the shader:
//!
//! - [`ConstantBinder`] - a uniform, set before each draw
//! - [`SourceExpressionBinder`] - one vertex attribute per feature
//! - [`CompositeExpressionBinder`] - a (min, max) vertex attribute pair plus
//!   an interpolation uniform
//!
//! The variant is chosen once per tile from the property's
//! [`PossiblyEvaluatedValue`].

mod composite;
mod constant;
pub mod pack;
pub mod paint_array;
mod source;
pub(crate) mod vertex;

pub use composite::CompositeExpressionBinder;
pub use constant::ConstantBinder;
pub use paint_array::PaintVertexArray;
pub use source::SourceExpressionBinder;

use crate::{
    error::BindError,
    feature::Feature,
    gpu::{GpuContext, PaintAttributeLayout, PaintBuffer, PaintLayout, PatternVertex, UniformSink},
    options::BindingOptions,
    style::{Color, EvaluationParameters, PaintProperty, PossiblyEvaluatedValue, Value},
};

/// How a property is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinderKind {
    /// Uniform.
    Constant,
    /// Per-feature vertex attribute.
    Source,
    /// Per-feature vertex attribute pair blended by zoom.
    Composite,
}

impl BinderKind {
    /// Prefix used in program cache keys.
    #[must_use]
    pub fn cache_key_prefix(self) -> char {
        match self {
            Self::Constant => 'u',
            Self::Source => 'a',
            Self::Composite => 'z',
        }
    }

    /// Cache-key token, e.g. `/z_fill-color`.
    #[must_use]
    pub fn cache_key_token(self, property: PaintProperty) -> String {
        format!("/{}_{}", self.cache_key_prefix(), property.name())
    }
}

/// Running statistics over the numeric values a binder has stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    /// Largest value seen; negative infinity until a number is recorded.
    pub max: f32,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            max: f32::NEG_INFINITY,
        }
    }
}

impl Statistics {
    /// Fold one value into the statistics.
    pub fn record(&mut self, value: f32) {
        self.max = self.max.max(value);
    }
}

/// `value` as a color, falling back to the property default, then black.
pub(crate) fn color_or_default(property: PaintProperty, value: &Value) -> Color {
    value
        .as_color()
        .or_else(|| property.default_value().as_color())
        .unwrap_or(Color::BLACK)
}

/// `value` as a number, falling back to the property default, then 0.
pub(crate) fn number_or_default(property: PaintProperty, value: &Value) -> f32 {
    value
        .as_number()
        .or_else(|| property.default_value().as_number())
        .unwrap_or(0.0)
}

/// Binding of one paint property.
#[derive(Debug)]
pub enum Binder<B> {
    /// Uniform binding.
    Constant(ConstantBinder),
    /// Feature-dependent vertex attribute.
    Source(SourceExpressionBinder<B>),
    /// Feature- and zoom-dependent vertex attribute pair.
    Composite(CompositeExpressionBinder<B>),
}

impl<B: PaintBuffer> Binder<B> {
    /// Build the binder for `value` on a tile at `zoom`.
    ///
    /// # Errors
    ///
    /// `BindError::MissingLayout` when the property has no vertex layout for
    /// the selected kind.
    pub fn create(
        property: PaintProperty,
        value: PossiblyEvaluatedValue,
        zoom: f32,
        reserve: usize,
    ) -> Result<Self, BindError> {
        Ok(match value {
            PossiblyEvaluatedValue::Constant(value) => {
                Self::Constant(ConstantBinder::new(property, value))
            }
            PossiblyEvaluatedValue::Source(expression) => {
                let layout = PaintLayout::resolve(property, BinderKind::Source)?;
                Self::Source(SourceExpressionBinder::new(property, expression, layout, reserve))
            }
            PossiblyEvaluatedValue::Composite(expression) => {
                let layout = PaintLayout::resolve(property, BinderKind::Composite)?;
                Self::Composite(CompositeExpressionBinder::new(
                    property,
                    expression,
                    layout,
                    property.use_integer_zoom(),
                    zoom,
                    reserve,
                ))
            }
        })
    }

    /// Binding kind.
    #[must_use]
    pub fn kind(&self) -> BinderKind {
        match self {
            Self::Constant(_) => BinderKind::Constant,
            Self::Source(_) => BinderKind::Source,
            Self::Composite(_) => BinderKind::Composite,
        }
    }

    /// The bound property.
    #[must_use]
    pub fn property(&self) -> PaintProperty {
        match self {
            Self::Constant(b) => b.property(),
            Self::Source(b) => b.property(),
            Self::Composite(b) => b.property(),
        }
    }

    /// Shader base names.
    #[must_use]
    pub fn names(&self) -> &[String] {
        match self {
            Self::Constant(b) => b.names(),
            Self::Source(b) => b.names(),
            Self::Composite(b) => b.names(),
        }
    }

    /// Running statistics; constants report the empty statistics.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        match self {
            Self::Constant(_) => Statistics::default(),
            Self::Source(b) => b.statistics(),
            Self::Composite(b) => b.statistics(),
        }
    }

    /// Cache-key token of this binding.
    #[must_use]
    pub fn cache_key_token(&self) -> String {
        self.kind().cache_key_token(self.property())
    }

    /// Append paint data for `feature` up to vertex `length`. No-op for
    /// constants.
    ///
    /// # Errors
    ///
    /// `BindError::NotPatternLayout` when called on a pattern-layout binder.
    /// `BindError::PaintArrayReleased` when an earlier upload dropped the
    /// CPU array.
    pub fn populate_paint_array(&mut self, length: usize, feature: &Feature) -> Result<(), BindError> {
        match self {
            Self::Constant(_) => Ok(()),
            Self::Source(b) => b.populate_paint_array(length, feature),
            Self::Composite(b) => b.populate_paint_array(length, feature),
        }
    }

    /// Append pattern vertices up to `length`. No-op for constants.
    ///
    /// # Errors
    ///
    /// `BindError::NotPatternLayout` unless the binder uses the pattern
    /// layout. `BindError::PaintArrayReleased` after a releasing upload.
    pub fn populate_pattern_array(
        &mut self,
        length: usize,
        pattern: &PatternVertex,
    ) -> Result<(), BindError> {
        match self {
            Self::Constant(_) => Ok(()),
            Self::Source(b) => b.populate_pattern_array(length, pattern),
            Self::Composite(b) => b.populate_pattern_array(length, pattern),
        }
    }

    /// Re-evaluate vertices `start..end` for `feature`. Returns whether data
    /// was rewritten.
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
        match self {
            Self::Constant(_) => Ok(false),
            Self::Source(b) => b.update_paint_array(start, end, feature),
            Self::Composite(b) => b.update_paint_array(start, end, feature),
        }
    }

    /// Whether stored values read feature state.
    #[must_use]
    pub fn is_state_dependent(&self) -> bool {
        match self {
            Self::Constant(_) => false,
            Self::Source(b) => b.expression().is_state_dependent(),
            Self::Composite(b) => b.expression().is_state_dependent(),
        }
    }

    /// Shader defines enabled by this binder.
    #[must_use]
    pub fn defines(&self) -> Vec<String> {
        match self {
            Self::Constant(b) => b.defines(),
            Self::Source(_) | Self::Composite(_) => Vec::new(),
        }
    }

    /// Uniforms written by [`set_uniforms`](Self::set_uniforms).
    #[must_use]
    pub fn uniform_names(&self) -> &[String] {
        match self {
            Self::Constant(b) => b.uniform_names(),
            Self::Source(b) => b.uniform_names(),
            Self::Composite(b) => b.uniform_names(),
        }
    }

    /// Write this binder's uniforms. `current` is the property's value for
    /// the frame being drawn; only constants consult it.
    pub fn set_uniforms(
        &self,
        program: &mut impl UniformSink,
        current: Option<&PossiblyEvaluatedValue>,
        globals: &EvaluationParameters,
    ) {
        match self {
            Self::Constant(b) => b.set_uniforms(program, current),
            Self::Source(b) => b.set_uniforms(program),
            Self::Composite(b) => b.set_uniforms(program, globals),
        }
    }

    /// Move the paint array to the GPU. No-op for constants.
    pub fn upload<C: GpuContext<Buffer = B>>(&mut self, context: &C, options: &BindingOptions) {
        match self {
            Self::Constant(_) => {}
            Self::Source(b) => b.upload(context, options),
            Self::Composite(b) => b.upload(context, options),
        }
    }

    /// Release GPU resources.
    pub fn destroy(&mut self) {
        match self {
            Self::Constant(_) => {}
            Self::Source(b) => b.destroy(),
            Self::Composite(b) => b.destroy(),
        }
    }

    /// The vertex buffer, once uploaded.
    #[must_use]
    pub fn vertex_buffer(&self) -> Option<&B> {
        match self {
            Self::Constant(_) => None,
            Self::Source(b) => b.vertex_buffer(),
            Self::Composite(b) => b.vertex_buffer(),
        }
    }

    /// Vertex attribute layout for vertex-backed binders.
    #[must_use]
    pub fn attribute_layout(&self) -> Option<&PaintAttributeLayout> {
        match self {
            Self::Constant(_) => None,
            Self::Source(b) => Some(b.attribute_layout()),
            Self::Composite(b) => Some(b.attribute_layout()),
        }
    }

    /// CPU paint array for vertex-backed binders.
    #[must_use]
    pub fn paint_array(&self) -> Option<&PaintVertexArray> {
        match self {
            Self::Constant(_) => None,
            Self::Source(b) => Some(b.paint_array()),
            Self::Composite(b) => Some(b.paint_array()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        style::{Expression, Interpolation},
        testing::RecordingBuffer,
    };

    fn create(property: PaintProperty, value: PossiblyEvaluatedValue) -> Binder<RecordingBuffer> {
        Binder::create(property, value, 10.0, 0).unwrap()
    }

    #[test]
    fn kinds_follow_the_evaluated_value() {
        let constant = create(PaintProperty::FillOpacity, Value::Number(0.5).into());
        assert_eq!(constant.kind(), BinderKind::Constant);
        assert_eq!(constant.cache_key_token(), "/u_fill-opacity");

        let source = create(
            PaintProperty::FillColor,
            PossiblyEvaluatedValue::Source(Arc::new(Expression::get("color"))),
        );
        assert_eq!(source.kind(), BinderKind::Source);
        assert_eq!(source.cache_key_token(), "/a_fill-color");

        let composite = create(
            PaintProperty::FillColor,
            PossiblyEvaluatedValue::Composite(Arc::new(Expression::zoom_curve(
                Interpolation::Linear,
                vec![(0.0, Expression::get("a")), (1.0, Expression::get("b"))],
            ))),
        );
        assert_eq!(composite.kind(), BinderKind::Composite);
        assert_eq!(composite.cache_key_token(), "/z_fill-color");
        assert_eq!(
            composite.attribute_layout().map(|l| l.stride),
            Some(16)
        );
    }

    #[test]
    fn missing_layout_is_an_error() {
        let result: Result<Binder<RecordingBuffer>, _> = Binder::create(
            PaintProperty::FillPattern,
            PossiblyEvaluatedValue::Source(Arc::new(Expression::get("pattern"))),
            0.0,
            0,
        );
        assert!(matches!(
            result,
            Err(BindError::MissingLayout {
                property: PaintProperty::FillPattern,
                kind: BinderKind::Source,
                ..
            })
        ));
    }

    #[test]
    fn line_pattern_uses_the_pattern_layout() {
        let binder = create(
            PaintProperty::LinePattern,
            PossiblyEvaluatedValue::Source(Arc::new(Expression::get("pattern"))),
        );
        assert_eq!(
            binder.names(),
            ["pattern_from", "pattern_to", "pattern_size"]
        );
        assert_eq!(
            binder.attribute_layout().map(|l| l.stride),
            Some(24)
        );
    }

    #[test]
    fn statistics_start_at_negative_infinity() {
        let mut stats = Statistics::default();
        assert_eq!(stats.max, f32::NEG_INFINITY);
        stats.record(-3.0);
        stats.record(-7.0);
        assert_eq!(stats.max, -3.0);
    }

    #[test]
    fn fallbacks_use_property_defaults() {
        assert_eq!(number_or_default(PaintProperty::CircleRadius, &Value::Null), 5.0);
        assert_eq!(
            color_or_default(PaintProperty::LineColor, &Value::String("nope".to_owned())),
            Color::BLACK
        );
        assert_eq!(number_or_default(PaintProperty::FillAntialias, &Value::Null), 0.0);
    }
}
