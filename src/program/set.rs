//! Program configurations of every layer sharing one tile's geometry.

use rustc_hash::FxHashMap;

use super::configuration::ProgramConfiguration;
use crate::{
    error::BindError,
    feature::Feature,
    gpu::{GpuContext, PaintBuffer, PatternVertex},
    options::BindingOptions,
    style::{PaintProperty, StyleLayer},
};

/// Layer id -> [`ProgramConfiguration`] for layers drawn from the same
/// bucket. All configurations share the tile zoom and receive the same
/// population calls.
#[derive(Debug)]
pub struct ProgramConfigurationSet<B> {
    configurations: FxHashMap<String, ProgramConfiguration<B>>,
}

impl<B: PaintBuffer> ProgramConfigurationSet<B> {
    /// One configuration per layer with default options.
    ///
    /// # Errors
    ///
    /// The first configuration error encountered.
    pub fn new<'a>(
        layers: impl IntoIterator<Item = &'a StyleLayer>,
        zoom: f32,
        filter: impl Fn(PaintProperty) -> bool,
    ) -> Result<Self, BindError> {
        Self::with_options(layers, zoom, filter, &BindingOptions::default())
    }

    /// [`new`](Self::new) with explicit options.
    ///
    /// # Errors
    ///
    /// The first configuration error encountered.
    pub fn with_options<'a>(
        layers: impl IntoIterator<Item = &'a StyleLayer>,
        zoom: f32,
        filter: impl Fn(PaintProperty) -> bool,
        options: &BindingOptions,
    ) -> Result<Self, BindError> {
        let mut configurations = FxHashMap::default();
        for layer in layers {
            let configuration =
                ProgramConfiguration::create_dynamic_with(layer, zoom, &filter, options)?;
            if configurations
                .insert(layer.id().to_owned(), configuration)
                .is_some()
            {
                log::warn!("duplicate layer id '{}'; keeping the last one", layer.id());
            }
        }
        Ok(Self { configurations })
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    /// `true` when no layer is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    /// Configuration of a layer.
    #[must_use]
    pub fn get(&self, layer_id: &str) -> Option<&ProgramConfiguration<B>> {
        self.configurations.get(layer_id)
    }

    /// Mutable configuration of a layer.
    pub fn get_mut(&mut self, layer_id: &str) -> Option<&mut ProgramConfiguration<B>> {
        self.configurations.get_mut(layer_id)
    }

    /// Iterate `(layer id, configuration)` in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProgramConfiguration<B>)> {
        self.configurations.iter().map(|(id, c)| (id.as_str(), c))
    }

    /// Populate every layer's paint arrays up to `length` for `feature`.
    ///
    /// # Errors
    ///
    /// The first population error encountered.
    pub fn populate_paint_arrays(&mut self, length: usize, feature: &Feature) -> Result<(), BindError> {
        for configuration in self.configurations.values_mut() {
            configuration.populate_paint_arrays(length, feature)?;
        }
        Ok(())
    }

    /// Populate one layer's pattern array.
    ///
    /// # Errors
    ///
    /// `BindError::UnknownLayer` if `layer_id` is not in the set, otherwise
    /// the configuration's error.
    pub fn populate_pattern_array(
        &mut self,
        layer_id: &str,
        property: PaintProperty,
        length: usize,
        pattern: &PatternVertex,
    ) -> Result<(), BindError> {
        self.configurations
            .get_mut(layer_id)
            .ok_or_else(|| BindError::UnknownLayer(layer_id.to_owned()))?
            .populate_pattern_array(property, length, pattern)
    }

    /// Apply feature-state changes to every layer. Returns whether any
    /// layer changed.
    ///
    /// # Errors
    ///
    /// The first update error encountered.
    pub fn update_paint_arrays(&mut self, features: &[Feature]) -> Result<bool, BindError> {
        let mut changed = false;
        for configuration in self.configurations.values_mut() {
            changed |= configuration.update_paint_arrays(features)?;
        }
        Ok(changed)
    }

    /// Upload every layer.
    pub fn upload<C: GpuContext<Buffer = B>>(&mut self, context: &C) {
        for configuration in self.configurations.values_mut() {
            configuration.upload(context);
        }
    }

    /// Destroy every layer's GPU buffers.
    pub fn destroy(&mut self) {
        for configuration in self.configurations.values_mut() {
            configuration.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        style::{Expression, LayerType, PossiblyEvaluatedValue, Value},
        testing::{RecordingBuffer, RecordingContext},
    };

    fn layers() -> Vec<StyleLayer> {
        vec![
            StyleLayer::new("casing", LayerType::Line).with_paint(
                PaintProperty::LineWidth,
                PossiblyEvaluatedValue::Source(Arc::new(Expression::get("width"))),
            ),
            StyleLayer::new("centre", LayerType::Line)
                .with_paint(PaintProperty::LineWidth, Value::Number(2.0)),
        ]
    }

    fn width_only(p: PaintProperty) -> bool {
        p == PaintProperty::LineWidth
    }

    #[test]
    fn builds_one_configuration_per_layer() {
        let layers = layers();
        let set: ProgramConfigurationSet<RecordingBuffer> =
            ProgramConfigurationSet::new(&layers, 12.0, width_only).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("casing").map(ProgramConfiguration::cache_key), Some("/a_line-width"));
        assert_eq!(set.get("centre").map(ProgramConfiguration::cache_key), Some("/u_line-width"));
        assert!(set.get("missing").is_none());
    }

    #[test]
    fn forwards_population_upload_and_destroy() {
        let layers = layers();
        let mut set: ProgramConfigurationSet<RecordingBuffer> =
            ProgramConfigurationSet::new(&layers, 12.0, width_only).unwrap();
        let feature = Feature::with_properties(serde_json::json!({ "width": 3 }));
        set.populate_paint_arrays(4, &feature).unwrap();
        assert!(set.iter().all(|(_, c)| c.vertex_count() == 4));

        let context = RecordingContext::default();
        set.upload(&context);
        assert_eq!(context.created().len(), 1);
        assert_eq!(context.created()[0].bytes, 16);

        set.destroy();
        assert_eq!(context.destroyed(), 1);
    }

    #[test]
    fn pattern_population_requires_a_known_layer() {
        let layers = layers();
        let mut set: ProgramConfigurationSet<RecordingBuffer> =
            ProgramConfigurationSet::new(&layers, 0.0, |_| true).unwrap();
        let err = set
            .populate_pattern_array("rail", PaintProperty::LinePattern, 1, &PatternVertex::default())
            .unwrap_err();
        assert!(matches!(err, BindError::UnknownLayer(ref id) if id == "rail"));
        set.populate_pattern_array("casing", PaintProperty::LinePattern, 1, &PatternVertex::default())
            .unwrap();
    }
}
