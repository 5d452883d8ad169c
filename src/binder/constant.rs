//! Uniform binding for values that do not vary per feature.

use crate::{
    gpu::UniformSink,
    style::{PaintProperty, PossiblyEvaluatedValue, Value, ValueType},
};

/// A property bound as the `u_<name>` uniform.
///
/// No vertex data is stored. The shader variant is selected with
/// `HAS_UNIFORM_u_<name>` defines.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantBinder {
    property: PaintProperty,
    value: Value,
    names: Vec<String>,
    uniform_names: Vec<String>,
}

impl ConstantBinder {
    /// Binder for a constant `value`.
    #[must_use]
    pub fn new(property: PaintProperty, value: Value) -> Self {
        let names = property.attribute_names();
        let uniform_names = names.iter().map(|n| format!("u_{n}")).collect();
        Self {
            property,
            value,
            names,
            uniform_names,
        }
    }

    /// The bound property.
    #[must_use]
    pub fn property(&self) -> PaintProperty {
        self.property
    }

    /// Shader base names.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The value captured at creation.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// One `HAS_UNIFORM_u_<name>` define per name.
    #[must_use]
    pub fn defines(&self) -> Vec<String> {
        self.names
            .iter()
            .map(|n| format!("HAS_UNIFORM_u_{n}"))
            .collect()
    }

    /// Uniform names.
    #[must_use]
    pub fn uniform_names(&self) -> &[String] {
        &self.uniform_names
    }

    /// Write the uniforms. A constant `current` value (e.g. after a
    /// transition) takes precedence over the stored one.
    pub fn set_uniforms(
        &self,
        program: &mut impl UniformSink,
        current: Option<&PossiblyEvaluatedValue>,
    ) {
        let value = current
            .and_then(PossiblyEvaluatedValue::constant)
            .unwrap_or(&self.value);
        let is_color = self.property.value_type() == ValueType::Color;
        for name in self.uniform_names() {
            if is_color {
                program.set_uniform_color(name, super::color_or_default(self.property, value));
            } else {
                program.set_uniform_f32(name, super::number_or_default(self.property, value));
            }
        }
    }
}
