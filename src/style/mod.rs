//! Style-side inputs to binding: properties, values, expressions, layers.

/// RGBA color value.
pub mod color;
/// Expression evaluation trait and built-in expression tree.
pub mod expression;
/// Style layers and their paint values.
pub mod layer;
/// Paint property identifiers and metadata.
pub mod property;
/// Evaluated values and binding classification.
pub mod value;

pub use color::Color;
pub use expression::{CurveInput, Expression, Interpolation, StyleExpression};
pub use layer::StyleLayer;
pub use property::{LayerType, PaintProperty, ValueType};
pub use value::{EvaluationParameters, PossiblyEvaluatedValue, Value};
