// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Binds data-driven style paint properties to a wgpu rendering pipeline.
//!
//! Every paint property of a style layer (fill color, opacity, line width,
//! ...) is bound to the shader in one of three ways, decided once per tile:
//!
//! - **constant** values become uniforms,
//! - **source** values (a function of the feature only) become one vertex
//!   attribute,
//! - **composite** values (a function of feature and zoom) become a pair of
//!   vertex attribute values bracketing `[zoom, zoom + 1]` plus an
//!   interpolation uniform recomputed every frame.
//!
//! # Key entry points
//!
//! - [`program::ProgramConfiguration`] - binders for one style layer
//! - [`program::ProgramConfigurationSet`] - all layers sharing one tile
//! - [`binder::Binder`] - the per-property binding strategy
//! - [`gpu::shader_composer::ShaderComposer`] - compiles shader variants from
//!   [`program::ProgramConfiguration::defines`]
//! - [`options::BindingOptions`] - runtime configuration (TOML)
//!
//! # Flow
//!
//! Configurations are built when a tile's geometry is built. As features are
//! decoded, [`program::ProgramConfiguration::populate_paint_arrays`] appends
//! per-vertex paint data. The render thread later calls `upload` to move the
//! arrays to GPU buffers, and `set_uniforms` before each draw.

pub mod binder;
pub mod error;
pub mod feature;
pub mod gpu;
pub mod options;
pub mod program;
pub mod style;

#[cfg(test)]
mod testing;
