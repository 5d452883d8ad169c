//! Decoded vector-tile feature as consumed by expression evaluation.

use serde_json::{Map, Value as Json};

use crate::style::Value;

/// Attribute map of a feature or its state.
pub type Attributes = Map<String, Json>;

/// One decoded feature: optional id, attributes, and mutable feature state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    /// Feature id, required for feature-state updates.
    pub id: Option<u64>,
    /// Attributes decoded from the tile.
    pub properties: Attributes,
    /// Runtime feature state (hover, selection, ...).
    pub state: Attributes,
}

impl Feature {
    /// Feature with an id and no attributes.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Feature whose attributes are taken from a JSON object. Non-object
    /// values produce an empty attribute map.
    #[must_use]
    pub fn with_properties(properties: Json) -> Self {
        Self {
            properties: into_map(properties),
            ..Self::default()
        }
    }

    /// Set the id.
    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Replace the feature state with a JSON object.
    #[must_use]
    pub fn with_state(mut self, state: Json) -> Self {
        self.state = into_map(state);
        self
    }

    /// Attribute value, `Null` when absent.
    #[must_use]
    pub fn property(&self, key: &str) -> Value {
        self.properties.get(key).map(Value::from_json).unwrap_or_default()
    }

    /// Feature-state value, `Null` when absent.
    #[must_use]
    pub fn state_value(&self, key: &str) -> Value {
        self.state.get(key).map(Value::from_json).unwrap_or_default()
    }
}

fn into_map(value: Json) -> Attributes {
    match value {
        Json::Object(map) => map,
        _ => Attributes::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_properties_and_state() {
        let f = Feature::with_properties(serde_json::json!({ "height": 12.5 }))
            .with_id(7)
            .with_state(serde_json::json!({ "hover": true }));
        assert_eq!(f.id, Some(7));
        assert_eq!(f.property("height"), Value::Number(12.5));
        assert_eq!(f.property("missing"), Value::Null);
        assert_eq!(f.state_value("hover"), Value::Number(1.0));
    }

    #[test]
    fn non_object_json_is_empty() {
        assert!(Feature::with_properties(serde_json::json!([1, 2])).properties.is_empty());
    }
}
