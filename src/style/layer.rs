//! Style layer with its possibly-evaluated paint values.

use std::collections::BTreeMap;

use super::{
    property::{LayerType, PaintProperty},
    value::PossiblyEvaluatedValue,
};

/// A style layer as seen by the binding layer: an id, a type, and the paint
/// values resolved for the current zoom.
#[derive(Debug, Clone)]
pub struct StyleLayer {
    id: String,
    layer_type: LayerType,
    paint: BTreeMap<PaintProperty, PossiblyEvaluatedValue>,
}

impl StyleLayer {
    /// Layer with every paint property at its default.
    #[must_use]
    pub fn new(id: &str, layer_type: LayerType) -> Self {
        Self {
            id: id.to_owned(),
            layer_type,
            paint: BTreeMap::new(),
        }
    }

    /// Builder form of [`set_paint`](Self::set_paint).
    #[must_use]
    pub fn with_paint(
        mut self,
        property: PaintProperty,
        value: impl Into<PossiblyEvaluatedValue>,
    ) -> Self {
        self.set_paint(property, value);
        self
    }

    /// Set a paint value. Properties of another layer type are ignored.
    pub fn set_paint(
        &mut self,
        property: PaintProperty,
        value: impl Into<PossiblyEvaluatedValue>,
    ) {
        if property.layer_type() != self.layer_type {
            log::warn!(
                "layer '{}': ignoring {} paint property '{}'",
                self.id,
                property.layer_type().name(),
                property.name()
            );
            return;
        }
        let _ = self.paint.insert(property, value.into());
    }

    /// Layer id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Layer type.
    #[must_use]
    pub fn layer_type(&self) -> LayerType {
        self.layer_type
    }

    /// Current value of a paint property; unset properties resolve to their
    /// default constant.
    #[must_use]
    pub fn paint_value(&self, property: PaintProperty) -> PossiblyEvaluatedValue {
        self.paint.get(&property).cloned().unwrap_or_else(|| {
            PossiblyEvaluatedValue::Constant(property.default_value())
        })
    }

    /// Explicitly set paint values, in property order.
    pub fn paint(&self) -> impl Iterator<Item = (PaintProperty, &PossiblyEvaluatedValue)> {
        self.paint.iter().map(|(p, v)| (*p, v))
    }
}
