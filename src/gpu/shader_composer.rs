use std::{borrow::Cow, collections::HashMap};

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, ComposerError, NagaModuleDescriptor,
    ShaderDefValue, ShaderLanguage, ShaderType,
};

/// Bundled fill shader consuming fill-color / fill-opacity bindings.
pub const FILL_SHADER: &str = include_str!("../../assets/shaders/fill.wgsl");

/// Wraps `naga_oil::compose::Composer` to build shader variants from paint
/// binding defines.
///
/// Each token returned by
/// [`ProgramConfiguration::defines`](crate::program::ProgramConfiguration::defines)
/// becomes a boolean shader def, so `#ifdef HAS_UNIFORM_u_color` selects the
/// uniform branch and the attribute branch otherwise. Shared WGSL modules are
/// pre-loaded and pulled in with `#import paintbind::module_name`.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition: (source, file_path)
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

impl Default for ShaderComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderComposer {
    /// Composer with the shared paint modules registered.
    #[must_use]
    pub fn new() -> Self {
        let mut composer = Composer::default();

        let modules: &[ModuleDef] = &[ModuleDef {
            source: include_str!("../../assets/shaders/modules/packing.wgsl"),
            file_path: "modules/packing.wgsl",
        }];

        for m in modules {
            if let Err(e) = composer.add_composable_module(ComposableModuleDescriptor {
                source: m.source,
                file_path: m.file_path,
                language: ShaderLanguage::Wgsl,
                ..Default::default()
            }) {
                log::error!("failed to register shader module '{}': {e}", m.file_path);
            }
        }

        Self { composer }
    }

    /// Compose a shader variant into a `wgpu::ShaderModule`.
    ///
    /// # Errors
    ///
    /// Returns the composer error if preprocessing or parsing fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
        defines: &[String],
    ) -> Result<wgpu::ShaderModule, Box<ComposerError>> {
        let naga_module = self.compose_naga(source, file_path, defines)?;
        log::debug!("composed shader '{label}' with {} defines", defines.len());

        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader variant into a `naga::Module` without creating a
    /// wgpu shader module. Useful for testing without a GPU device.
    ///
    /// # Errors
    ///
    /// Returns the composer error if preprocessing or parsing fails.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
        defines: &[String],
    ) -> Result<naga::Module, Box<ComposerError>> {
        let shader_defs: HashMap<String, ShaderDefValue> = defines
            .iter()
            .map(|d| (d.clone(), ShaderDefValue::Bool(true)))
            .collect();
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                shader_defs,
                ..Default::default()
            })
            .map_err(Box::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defines(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| (*t).to_owned()).collect()
    }

    #[test]
    fn fill_shader_composes_for_every_binding_combination() {
        let mut composer = ShaderComposer::new();
        let variants = [
            defines(&[]),
            defines(&["HAS_UNIFORM_u_color"]),
            defines(&["HAS_UNIFORM_u_opacity"]),
            defines(&["HAS_UNIFORM_u_color", "HAS_UNIFORM_u_opacity"]),
        ];
        for variant in &variants {
            let module = composer
                .compose_naga(FILL_SHADER, "fill.wgsl", variant)
                .unwrap_or_else(|e| panic!("fill.wgsl {variant:?} failed to compose: {e}"));
            assert_eq!(module.entry_points.len(), 2);
        }
    }

    #[test]
    fn uniform_define_removes_vertex_input() {
        let mut composer = ShaderComposer::new();
        let count_inputs = |module: &naga::Module| {
            module
                .entry_points
                .iter()
                .find(|e| e.name == "vs_main")
                .and_then(|e| e.function.arguments.first())
                .and_then(|arg| match &module.types[arg.ty].inner {
                    naga::TypeInner::Struct { members, .. } => Some(members.len()),
                    _ => None,
                })
        };
        let all_attributes = composer
            .compose_naga(FILL_SHADER, "fill.wgsl", &[])
            .unwrap_or_else(|e| panic!("{e}"));
        let all_uniforms = composer
            .compose_naga(
                FILL_SHADER,
                "fill.wgsl",
                &defines(&["HAS_UNIFORM_u_color", "HAS_UNIFORM_u_opacity"]),
            )
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(count_inputs(&all_attributes), Some(3));
        assert_eq!(count_inputs(&all_uniforms), Some(1));
    }
}
