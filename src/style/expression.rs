//! Expression evaluation seam.
//!
//! The binding layer only needs [`StyleExpression`]: evaluate a value for a
//! feature at a zoom, and report how zoom interpolation is shaped. The
//! [`Expression`] tree is a small built-in implementation covering literals,
//! feature attribute lookup, feature state lookup and `interpolate` curves.

use std::fmt;

use super::value::{EvaluationParameters, Value};
use crate::feature::Feature;

/// A compiled property expression.
pub trait StyleExpression: fmt::Debug + Send + Sync {
    /// Evaluate for one feature.
    fn evaluate(&self, globals: &EvaluationParameters, feature: &Feature) -> Value;

    /// Progress of `input` between `lower` and `upper` along this
    /// expression's zoom curve, in `[0, 1]`. Stepped expressions return 0.
    fn interpolation_factor(&self, _input: f32, _lower: f32, _upper: f32) -> f32 {
        0.0
    }

    /// `true` if no feature data is read.
    fn is_feature_constant(&self) -> bool;

    /// `true` if the zoom level is not read.
    fn is_zoom_constant(&self) -> bool;

    /// `true` if feature state is read, so values can change after
    /// population.
    fn is_state_dependent(&self) -> bool {
        false
    }
}

/// Curve shape between two stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interpolation {
    /// Straight line.
    Linear,
    /// Exponential with the given base; base 1 is linear.
    Exponential(f32),
}

impl Interpolation {
    /// Progress of `input` within `[lower, upper]`, clamped to `[0, 1]`.
    #[must_use]
    pub fn factor(self, input: f32, lower: f32, upper: f32) -> f32 {
        let base = match self {
            Self::Linear => 1.0,
            Self::Exponential(base) => base,
        };
        let difference = upper - lower;
        let progress = input - lower;
        let t = if difference == 0.0 {
            0.0
        } else if base == 1.0 {
            progress / difference
        } else {
            (base.powf(progress) - 1.0) / (base.powf(difference) - 1.0)
        };
        t.clamp(0.0, 1.0)
    }
}

/// What an interpolation curve is keyed on.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveInput {
    /// The zoom level.
    Zoom,
    /// A numeric feature attribute.
    Property(String),
}

/// Built-in expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A fixed value.
    Literal(Value),
    /// Feature attribute lookup (`["get", key]`).
    Get(String),
    /// Feature state lookup (`["feature-state", key]`).
    FeatureState(String),
    /// Piecewise curve over zoom or a feature attribute. Stops are kept
    /// sorted by input.
    Interpolate {
        /// Curve shape.
        interpolation: Interpolation,
        /// Curve input.
        input: CurveInput,
        /// `(input, output)` stops.
        stops: Vec<(f32, Expression)>,
    },
}

impl Expression {
    /// Literal value.
    #[must_use]
    pub fn literal(value: Value) -> Self {
        Self::Literal(value)
    }

    /// Literal number.
    #[must_use]
    pub fn number(value: f32) -> Self {
        Self::Literal(Value::Number(value))
    }

    /// Feature attribute lookup.
    #[must_use]
    pub fn get(key: &str) -> Self {
        Self::Get(key.to_owned())
    }

    /// Feature state lookup.
    #[must_use]
    pub fn feature_state(key: &str) -> Self {
        Self::FeatureState(key.to_owned())
    }

    /// Curve over zoom.
    #[must_use]
    pub fn zoom_curve(interpolation: Interpolation, stops: Vec<(f32, Self)>) -> Self {
        Self::curve(interpolation, CurveInput::Zoom, stops)
    }

    /// Curve over a numeric feature attribute.
    #[must_use]
    pub fn property_curve(
        interpolation: Interpolation,
        key: &str,
        stops: Vec<(f32, Self)>,
    ) -> Self {
        Self::curve(interpolation, CurveInput::Property(key.to_owned()), stops)
    }

    fn curve(
        interpolation: Interpolation,
        input: CurveInput,
        mut stops: Vec<(f32, Self)>,
    ) -> Self {
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self::Interpolate {
            interpolation,
            input,
            stops,
        }
    }

    fn eval_curve(
        interpolation: Interpolation,
        input: f32,
        stops: &[(f32, Self)],
        globals: &EvaluationParameters,
        feature: &Feature,
    ) -> Value {
        let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
            return Value::Null;
        };
        if input <= first.0 {
            return first.1.evaluate(globals, feature);
        }
        if input >= last.0 {
            return last.1.evaluate(globals, feature);
        }
        let upper_idx = stops.partition_point(|(stop, _)| *stop <= input);
        let (lower_input, lower) = &stops[upper_idx - 1];
        let (upper_input, upper) = &stops[upper_idx];
        let t = interpolation.factor(input, *lower_input, *upper_input);
        lower
            .evaluate(globals, feature)
            .lerp(&upper.evaluate(globals, feature), t)
    }
}

impl StyleExpression for Expression {
    fn evaluate(&self, globals: &EvaluationParameters, feature: &Feature) -> Value {
        match self {
            Self::Literal(v) => v.clone(),
            Self::Get(key) => feature.property(key),
            Self::FeatureState(key) => feature.state_value(key),
            Self::Interpolate {
                interpolation,
                input,
                stops,
            } => {
                let input = match input {
                    CurveInput::Zoom => globals.zoom,
                    CurveInput::Property(key) => {
                        match feature.property(key).as_number() {
                            Some(v) => v,
                            None => return Value::Null,
                        }
                    }
                };
                Self::eval_curve(*interpolation, input, stops, globals, feature)
            }
        }
    }

    fn interpolation_factor(&self, input: f32, lower: f32, upper: f32) -> f32 {
        match self {
            Self::Interpolate {
                interpolation,
                input: CurveInput::Zoom,
                ..
            } => interpolation.factor(input, lower, upper),
            _ => 0.0,
        }
    }

    fn is_feature_constant(&self) -> bool {
        match self {
            Self::Literal(_) => true,
            Self::Get(_) | Self::FeatureState(_) => false,
            Self::Interpolate { input, stops, .. } => {
                *input == CurveInput::Zoom
                    && stops.iter().all(|(_, e)| e.is_feature_constant())
            }
        }
    }

    fn is_zoom_constant(&self) -> bool {
        match self {
            Self::Literal(_) | Self::Get(_) | Self::FeatureState(_) => true,
            Self::Interpolate { input, stops, .. } => {
                *input != CurveInput::Zoom
                    && stops.iter().all(|(_, e)| e.is_zoom_constant())
            }
        }
    }

    fn is_state_dependent(&self) -> bool {
        match self {
            Self::FeatureState(_) => true,
            Self::Literal(_) | Self::Get(_) => false,
            Self::Interpolate { stops, .. } => {
                stops.iter().any(|(_, e)| e.is_state_dependent())
            }
        }
    }
}
