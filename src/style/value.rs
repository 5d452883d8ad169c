//! Evaluated property values and their binding classification.

use std::{fmt, sync::Arc};

use super::{color::Color, expression::StyleExpression};
use crate::feature::Feature;

/// Result of evaluating a paint property.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value.
    #[default]
    Null,
    /// Scalar.
    Number(f32),
    /// Color.
    Color(Color),
    /// String (pattern names, unparsed colors).
    String(String),
}

impl Value {
    /// The scalar value, if this is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The color value; strings are parsed as CSS colors.
    #[must_use]
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            Self::String(s) => Color::parse(s),
            _ => None,
        }
    }

    /// Convert a decoded feature attribute.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => {
                n.as_f64().map_or(Self::Null, |v| Self::Number(v as f32))
            }
            serde_json::Value::Bool(b) => {
                Self::Number(if *b { 1.0 } else { 0.0 })
            }
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Null
            | serde_json::Value::Array(_)
            | serde_json::Value::Object(_) => Self::Null,
        }
    }

    /// Interpolate toward `other`. Numbers and colors blend linearly;
    /// anything else steps (returns `self`).
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => Self::Number(a + (b - a) * t),
            _ => match (self.as_color(), other.as_color()) {
                (Some(a), Some(b)) => Self::Color(a.lerp(b, t)),
                _ => self.clone(),
            },
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Number(v)
    }
}

impl From<Color> for Value {
    fn from(c: Color) -> Self {
        Self::Color(c)
    }
}

/// Global evaluation inputs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EvaluationParameters {
    /// Zoom level.
    pub zoom: f32,
}

impl EvaluationParameters {
    /// Parameters at the given zoom.
    #[must_use]
    pub fn new(zoom: f32) -> Self {
        Self { zoom }
    }
}

/// How a property value depends on its inputs once camera-only parts have
/// been resolved for a zoom level.
#[derive(Clone)]
pub enum PossiblyEvaluatedValue {
    /// Same value for every feature and zoom.
    Constant(Value),
    /// Depends on the feature only.
    Source(Arc<dyn StyleExpression>),
    /// Depends on the feature and the zoom level.
    Composite(Arc<dyn StyleExpression>),
}

impl PossiblyEvaluatedValue {
    /// Classify an expression at the given zoom. Feature-independent
    /// expressions collapse to a constant evaluated at `globals`.
    #[must_use]
    pub fn from_expression(
        expression: Arc<dyn StyleExpression>,
        globals: &EvaluationParameters,
    ) -> Self {
        if expression.is_feature_constant() {
            Self::Constant(expression.evaluate(globals, &Feature::default()))
        } else if expression.is_zoom_constant() {
            Self::Source(expression)
        } else {
            Self::Composite(expression)
        }
    }

    /// The constant value, if this is one.
    #[must_use]
    pub fn constant(&self) -> Option<&Value> {
        match self {
            Self::Constant(v) => Some(v),
            Self::Source(_) | Self::Composite(_) => None,
        }
    }
}

impl fmt::Debug for PossiblyEvaluatedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Self::Source(e) => f.debug_tuple("Source").field(e).finish(),
            Self::Composite(e) => f.debug_tuple("Composite").field(e).finish(),
        }
    }
}

impl From<Value> for PossiblyEvaluatedValue {
    fn from(v: Value) -> Self {
        Self::Constant(v)
    }
}
