//! Binders of one style layer and the shader variant they select.

use std::collections::BTreeMap;

use super::feature_map::FeaturePositionMap;
use crate::{
    binder::Binder,
    error::BindError,
    feature::Feature,
    gpu::{
        GpuContext, PaintBuffer, PaintLayout, PaintVertexLayout, PatternVertex, ProgramUniforms,
        UniformSink, WgpuVertexBuffer,
    },
    options::BindingOptions,
    style::{EvaluationParameters, PaintProperty, StyleLayer},
};

/// One binder per bound paint property of a style layer on one tile.
///
/// The `cache_key` names the shader variant: sorted `/u_<prop>` (uniform),
/// `/a_<prop>` (attribute) and `/z_<prop>` (zoom-interpolated attribute)
/// tokens. [`defines`](Self::defines) are the matching shader defines.
#[derive(Debug)]
pub struct ProgramConfiguration<B> {
    layer_id: String,
    binders: BTreeMap<PaintProperty, Binder<B>>,
    cache_key: String,
    options: BindingOptions,
    feature_positions: FeaturePositionMap,
    vertex_count: usize,
}

impl<B: PaintBuffer> ProgramConfiguration<B> {
    /// Build binders for `layer` at tile zoom `zoom` with default options.
    /// Only properties accepted by `filter` are bound.
    ///
    /// # Errors
    ///
    /// `BindError::MissingLayout` if a property's value has no vertex
    /// layout.
    pub fn create_dynamic(
        layer: &StyleLayer,
        zoom: f32,
        filter: impl Fn(PaintProperty) -> bool,
    ) -> Result<Self, BindError> {
        Self::create_dynamic_with(layer, zoom, filter, &BindingOptions::default())
    }

    /// [`create_dynamic`](Self::create_dynamic) with explicit options.
    ///
    /// # Errors
    ///
    /// Same as [`create_dynamic`](Self::create_dynamic).
    pub fn create_dynamic_with(
        layer: &StyleLayer,
        zoom: f32,
        filter: impl Fn(PaintProperty) -> bool,
        options: &BindingOptions,
    ) -> Result<Self, BindError> {
        let mut binders = BTreeMap::new();
        let mut tokens = Vec::new();

        for &property in layer.layer_type().paint_properties() {
            if !filter(property) || !property.is_data_driven() {
                continue;
            }
            let binder = Binder::create(
                property,
                layer.paint_value(property),
                zoom,
                options.reserve_vertices,
            )?;
            tokens.push(binder.cache_key_token());
            let _ = binders.insert(property, binder);
        }

        tokens.sort();
        let cache_key = tokens.concat();
        log::debug!("layer '{}' at z{zoom}: program {cache_key}", layer.id());

        Ok(Self {
            layer_id: layer.id().to_owned(),
            binders,
            cache_key,
            options: options.clone(),
            feature_positions: FeaturePositionMap::default(),
            vertex_count: 0,
        })
    }

    /// Id of the layer this configuration was built for.
    #[must_use]
    pub fn layer_id(&self) -> &str {
        &self.layer_id
    }

    /// Shader variant key.
    #[must_use]
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    /// Options the configuration was built with.
    #[must_use]
    pub fn options(&self) -> &BindingOptions {
        &self.options
    }

    /// Binder of `property`, if it is bound.
    #[must_use]
    pub fn binder(&self, property: PaintProperty) -> Option<&Binder<B>> {
        self.binders.get(&property)
    }

    /// All binders in property order.
    pub fn binders(&self) -> impl Iterator<Item = &Binder<B>> {
        self.binders.values()
    }

    /// Vertex ranges of populated features.
    #[must_use]
    pub fn feature_positions(&self) -> &FeaturePositionMap {
        &self.feature_positions
    }

    /// Vertices populated so far.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Shader defines of every binder.
    #[must_use]
    pub fn defines(&self) -> Vec<String> {
        self.binders.values().flat_map(Binder::defines).collect()
    }

    /// Append paint data for `feature` up to vertex `length`.
    ///
    /// Layout-exception properties are skipped; the geometry builder fills
    /// them through [`populate_pattern_array`](Self::populate_pattern_array).
    ///
    /// # Errors
    ///
    /// Propagates binder population errors, including
    /// `BindError::PaintArrayReleased` after an upload that dropped the CPU
    /// arrays. The vertex count is left unchanged on error.
    pub fn populate_paint_arrays(&mut self, length: usize, feature: &Feature) -> Result<(), BindError> {
        for (property, binder) in &mut self.binders {
            if PaintLayout::is_exception(*property) {
                continue;
            }
            binder.populate_paint_array(length, feature)?;
        }
        if let Some(id) = feature.id {
            self.feature_positions.add(id, self.vertex_count, length);
        }
        self.vertex_count = self.vertex_count.max(length);
        Ok(())
    }

    /// Append pattern vertices for `property` up to `length`. Unbound
    /// properties are ignored.
    ///
    /// # Errors
    ///
    /// `BindError::NotPatternLayout` if the property is bound with a
    /// non-pattern layout.
    pub fn populate_pattern_array(
        &mut self,
        property: PaintProperty,
        length: usize,
        pattern: &PatternVertex,
    ) -> Result<(), BindError> {
        match self.binders.get_mut(&property) {
            Some(binder) => binder.populate_pattern_array(length, pattern),
            None => Ok(()),
        }
    }

    /// Re-evaluate state-dependent binders for `features` over the vertex
    /// ranges recorded at population. Returns whether any data changed; the
    /// next [`upload`](Self::upload) writes it to the existing buffers.
    ///
    /// # Errors
    ///
    /// Propagates binder population errors.
    pub fn update_paint_arrays(&mut self, features: &[Feature]) -> Result<bool, BindError> {
        let mut changed = false;
        for binder in self.binders.values_mut() {
            if !binder.is_state_dependent() || PaintLayout::is_exception(binder.property()) {
                continue;
            }
            for feature in features {
                let Some(id) = feature.id else {
                    continue;
                };
                for &(start, end) in self.feature_positions.ranges(id) {
                    changed |= binder.update_paint_array(start, end, feature)?;
                }
            }
        }
        Ok(changed)
    }

    /// Uniform names written by [`set_uniforms`](Self::set_uniforms), in
    /// slot order.
    #[must_use]
    pub fn uniform_names(&self) -> Vec<String> {
        self.binders
            .iter()
            .filter(|(property, _)| !property.is_pattern())
            .flat_map(|(_, binder)| binder.uniform_names().iter().cloned())
            .collect()
    }

    /// Staging block sized for [`uniform_names`](Self::uniform_names).
    #[must_use]
    pub fn program_uniforms(&self) -> ProgramUniforms {
        ProgramUniforms::new(self.uniform_names())
    }

    /// Write every binder's uniforms for the frame. `layer` supplies the
    /// current paint values; pattern properties are left to the renderer.
    pub fn set_uniforms(
        &self,
        program: &mut impl UniformSink,
        layer: &StyleLayer,
        globals: &EvaluationParameters,
    ) {
        for (property, binder) in &self.binders {
            if property.is_pattern() {
                continue;
            }
            let current = layer.paint_value(*property);
            binder.set_uniforms(program, Some(&current), globals);
        }
    }

    /// Move paint arrays to GPU buffers.
    pub fn upload<C: GpuContext<Buffer = B>>(&mut self, context: &C) {
        for binder in self.binders.values_mut() {
            binder.upload(context, &self.options);
        }
    }

    /// Release every GPU buffer. Safe before upload.
    pub fn destroy(&mut self) {
        for binder in self.binders.values_mut() {
            binder.destroy();
        }
    }

    /// Buffers of uploaded vertex-backed binders, in property order.
    #[must_use]
    pub fn paint_vertex_buffers(&self) -> Vec<&B> {
        self.binders.values().filter_map(Binder::vertex_buffer).collect()
    }

    /// Vertex buffer layouts of the vertex-backed binders, in property order.
    /// Each property's attributes start at `first_location` plus its slot.
    #[must_use]
    pub fn vertex_layouts(&self, first_location: u32) -> Vec<PaintVertexLayout> {
        self.binders
            .values()
            .filter_map(|binder| {
                let layout = binder.attribute_layout()?;
                let location = first_location + binder.property().attribute_slot();
                Some(PaintVertexLayout {
                    array_stride: layout.stride,
                    attributes: layout.vertex_attributes(location),
                })
            })
            .collect()
    }
}

impl ProgramConfiguration<WgpuVertexBuffer> {
    /// Set paint vertex buffers on `pass` from `first_slot`, one slot per
    /// entry of [`vertex_layouts`](Self::vertex_layouts). Returns the number
    /// of slots used.
    pub fn bind_paint_buffers(&self, pass: &mut wgpu::RenderPass<'_>, first_slot: u32) -> u32 {
        let mut slot = first_slot;
        for binder in self.binders.values() {
            if binder.attribute_layout().is_none() {
                continue;
            }
            match binder.vertex_buffer() {
                Some(buffer) => pass.set_vertex_buffer(slot, buffer.buffer().slice(..)),
                None => log::warn!(
                    "layer '{}': '{}' has no paint buffer for slot {slot}",
                    self.layer_id,
                    binder.property().name()
                ),
            }
            slot += 1;
        }
        slot - first_slot
    }
}
