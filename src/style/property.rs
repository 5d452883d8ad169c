//! Paint property identifiers and their style-specification metadata.
//!
//! Everything the binding layer needs to know about a property (value type,
//! whether it may be data-driven, integer-zoom snapping, pattern-family
//! membership, shader attribute names and slot) is resolved here from the
//! `PaintProperty` enum. No free-text matching on property names happens
//! after a configuration is built.

use super::{color::Color, value::Value};

/// Style layer types that carry paint properties bound by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerType {
    /// Polygon fills.
    Fill,
    /// Stroked lines.
    Line,
    /// Point circles.
    Circle,
}

impl LayerType {
    /// Style-specification name (`"fill"`, `"line"`, `"circle"`).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Line => "line",
            Self::Circle => "circle",
        }
    }

    /// All paint properties of this layer type, in declaration order.
    #[must_use]
    pub fn paint_properties(self) -> &'static [PaintProperty] {
        match self {
            Self::Fill => &[
                PaintProperty::FillAntialias,
                PaintProperty::FillColor,
                PaintProperty::FillOpacity,
                PaintProperty::FillOutlineColor,
                PaintProperty::FillTranslate,
                PaintProperty::FillPattern,
            ],
            Self::Line => &[
                PaintProperty::LineColor,
                PaintProperty::LineOpacity,
                PaintProperty::LineWidth,
                PaintProperty::LineGapWidth,
                PaintProperty::LineOffset,
                PaintProperty::LineBlur,
                PaintProperty::LineTranslate,
                PaintProperty::LineDasharray,
                PaintProperty::LinePattern,
            ],
            Self::Circle => &[
                PaintProperty::CircleRadius,
                PaintProperty::CircleColor,
                PaintProperty::CircleBlur,
                PaintProperty::CircleOpacity,
                PaintProperty::CircleTranslate,
                PaintProperty::CircleStrokeWidth,
                PaintProperty::CircleStrokeColor,
                PaintProperty::CircleStrokeOpacity,
            ],
        }
    }
}

/// Declared value type of a paint property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Scalar float.
    Number,
    /// RGBA color.
    Color,
    /// Sprite pattern reference.
    Pattern,
    /// Anything else (booleans, arrays); never bound to the GPU here.
    Other,
}

/// A paint property known to the binding layer.
///
/// The derived ordering is the iteration order of binders inside a
/// [`ProgramConfiguration`](crate::program::ProgramConfiguration), and
/// therefore the order of paint uniform slots expected by the shaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum PaintProperty {
    FillAntialias,
    FillColor,
    FillOpacity,
    FillOutlineColor,
    FillTranslate,
    FillPattern,
    LineColor,
    LineOpacity,
    LineWidth,
    LineGapWidth,
    LineOffset,
    LineBlur,
    LineTranslate,
    LineDasharray,
    LinePattern,
    CircleRadius,
    CircleColor,
    CircleBlur,
    CircleOpacity,
    CircleTranslate,
    CircleStrokeWidth,
    CircleStrokeColor,
    CircleStrokeOpacity,
}

/// Attribute base names that do not follow the `<layer>-a-b` -> `a_b` rule.
const ATTRIBUTE_NAME_EXCEPTIONS: &[(PaintProperty, &[&str])] = &[
    (PaintProperty::LineGapWidth, &["gapwidth"]),
    (
        PaintProperty::LinePattern,
        &["pattern_from", "pattern_to", "pattern_size"],
    ),
];

/// Static metadata row: (name, value type, data-driven, attribute slot).
type Row = (&'static str, ValueType, bool, u32);

impl PaintProperty {
    fn row(self) -> Row {
        use ValueType::{Color, Number, Other, Pattern};
        match self {
            Self::FillAntialias => ("fill-antialias", Other, false, 0),
            Self::FillColor => ("fill-color", Color, true, 0),
            Self::FillOpacity => ("fill-opacity", Number, true, 1),
            Self::FillOutlineColor => ("fill-outline-color", Color, true, 2),
            Self::FillTranslate => ("fill-translate", Other, false, 0),
            Self::FillPattern => ("fill-pattern", Pattern, false, 0),
            Self::LineColor => ("line-color", Color, true, 0),
            Self::LineOpacity => ("line-opacity", Number, true, 1),
            Self::LineWidth => ("line-width", Number, true, 2),
            Self::LineGapWidth => ("line-gap-width", Number, true, 3),
            Self::LineOffset => ("line-offset", Number, true, 4),
            Self::LineBlur => ("line-blur", Number, true, 5),
            Self::LineTranslate => ("line-translate", Other, false, 0),
            Self::LineDasharray => ("line-dasharray", Other, false, 0),
            Self::LinePattern => ("line-pattern", Pattern, true, 6),
            Self::CircleRadius => ("circle-radius", Number, true, 0),
            Self::CircleColor => ("circle-color", Color, true, 1),
            Self::CircleBlur => ("circle-blur", Number, true, 2),
            Self::CircleOpacity => ("circle-opacity", Number, true, 3),
            Self::CircleTranslate => ("circle-translate", Other, false, 0),
            Self::CircleStrokeWidth => ("circle-stroke-width", Number, true, 4),
            Self::CircleStrokeColor => ("circle-stroke-color", Color, true, 5),
            Self::CircleStrokeOpacity => {
                ("circle-stroke-opacity", Number, true, 6)
            }
        }
    }

    /// Style-specification name, e.g. `"fill-color"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.row().0
    }

    /// Look a property up by its style-specification name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [LayerType::Fill, LayerType::Line, LayerType::Circle]
            .iter()
            .flat_map(|layer| layer.paint_properties())
            .copied()
            .find(|p| p.name() == name)
    }

    /// The layer type this property belongs to.
    #[must_use]
    pub fn layer_type(self) -> LayerType {
        let name = self.name();
        if name.starts_with("fill-") {
            LayerType::Fill
        } else if name.starts_with("line-") {
            LayerType::Line
        } else {
            LayerType::Circle
        }
    }

    /// Declared value type.
    #[must_use]
    pub fn value_type(self) -> ValueType {
        self.row().1
    }

    /// Whether the style specification allows data-driven values.
    #[must_use]
    pub fn is_data_driven(self) -> bool {
        self.row().2
    }

    /// Whether zoom-dependent values snap to integer zoom levels.
    #[must_use]
    pub fn use_integer_zoom(self) -> bool {
        matches!(
            self,
            Self::LinePattern | Self::FillPattern | Self::LineDasharray
        )
    }

    /// Pattern properties need cross-binder state owned by the renderer, so
    /// their uniforms are never set by an individual binder.
    #[must_use]
    pub fn is_pattern(self) -> bool {
        self.value_type() == ValueType::Pattern
    }

    /// First shader attribute location of this property, relative to the
    /// first location after the geometry's own layout attributes.
    #[must_use]
    pub fn attribute_slot(self) -> u32 {
        self.row().3
    }

    /// Shader attribute/uniform base names (without `a_` / `u_` prefix).
    #[must_use]
    pub fn attribute_names(self) -> Vec<String> {
        if let Some((_, names)) =
            ATTRIBUTE_NAME_EXCEPTIONS.iter().find(|(p, _)| *p == self)
        {
            return names.iter().map(|n| (*n).to_owned()).collect();
        }
        let name = self.name();
        let prefix = self.layer_type().name();
        let stripped = name
            .strip_prefix(prefix)
            .and_then(|s| s.strip_prefix('-'))
            .unwrap_or(name);
        vec![stripped.replace('-', "_")]
    }

    /// Value used when an expression yields nothing usable.
    #[must_use]
    pub fn default_value(self) -> Value {
        match self {
            Self::FillColor
            | Self::FillOutlineColor
            | Self::LineColor
            | Self::CircleColor
            | Self::CircleStrokeColor => Value::Color(Color::BLACK),
            Self::FillOpacity
            | Self::LineOpacity
            | Self::LineWidth
            | Self::CircleOpacity
            | Self::CircleStrokeOpacity => Value::Number(1.0),
            Self::LineGapWidth
            | Self::LineOffset
            | Self::LineBlur
            | Self::CircleBlur
            | Self::CircleStrokeWidth => Value::Number(0.0),
            Self::CircleRadius => Value::Number(5.0),
            _ => Value::Null,
        }
    }
}
