//! Crate-level error types.

use std::fmt;

use crate::{
    binder::BinderKind,
    style::{PaintProperty, ValueType},
};

/// Errors produced by the paintbind crate.
#[derive(Debug)]
pub enum BindError {
    /// No vertex layout exists for this property / binder-kind combination.
    MissingLayout {
        /// The property being bound.
        property: PaintProperty,
        /// Its declared value type.
        value_type: ValueType,
        /// The binder kind that was selected for it.
        kind: BinderKind,
    },
    /// Pattern population routed to a generic binder, or generic population
    /// routed to a pattern binder.
    NotPatternLayout(PaintProperty),
    /// Population after upload released the CPU paint array.
    PaintArrayReleased(PaintProperty),
    /// A layer id was not part of the configuration set.
    UnknownLayer(String),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLayout {
                property,
                value_type,
                kind,
            } => write!(
                f,
                "no paint vertex layout for '{}' ({value_type:?}, {kind:?})",
                property.name()
            ),
            Self::NotPatternLayout(property) => {
                write!(
                    f,
                    "'{}' was routed through the wrong population path",
                    property.name()
                )
            }
            Self::PaintArrayReleased(property) => write!(
                f,
                "'{}': paint array was released after upload; set retain_paint_arrays to keep populating",
                property.name()
            ),
            Self::UnknownLayer(id) => write!(f, "unknown layer '{id}'"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BindError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_property() {
        let err = BindError::MissingLayout {
            property: PaintProperty::FillColor,
            value_type: ValueType::Color,
            kind: BinderKind::Source,
        };
        let msg = err.to_string();
        assert!(msg.contains("fill-color"), "{msg}");
        assert!(msg.contains("Source"), "{msg}");
    }

    #[test]
    fn released_array_error_points_at_the_option() {
        let msg = BindError::PaintArrayReleased(PaintProperty::LineWidth).to_string();
        assert!(msg.contains("line-width"), "{msg}");
        assert!(msg.contains("retain_paint_arrays"), "{msg}");
    }

    #[test]
    fn io_error_is_the_source() {
        use std::error::Error;
        let err = BindError::from(std::io::Error::other("disk"));
        assert!(err.source().is_some());
        assert!(BindError::UnknownLayer("water".to_owned()).source().is_none());
    }
}
