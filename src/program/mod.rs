//! Per-layer binder registries.
//!
//! - [`configuration`] - binders of one style layer, cache key, defines
//! - [`set`] - configurations of all layers sharing one tile bucket
//! - [`feature_map`] - feature id to vertex range index for state updates

pub mod configuration;
pub mod feature_map;
pub mod set;

pub use configuration::ProgramConfiguration;
pub use feature_map::FeaturePositionMap;
pub use set::ProgramConfigurationSet;
