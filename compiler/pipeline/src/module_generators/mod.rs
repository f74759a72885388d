//! Module generators for the code generation pipeline.
//!
//! A generator renders all of its files in memory first; nothing is written
//! unless every file rendered.

use std::path::PathBuf;

use crate::generation_context::GenerationContext;
use crate::PipelineError;

/// Trait for generating code modules
pub trait ModuleGenerator {
    /// Get the name of this module
    fn module_name(&self) -> &str;

    /// Generate the files for this module
    fn generate_files(
        &self,
        ctx: &GenerationContext,
    ) -> Result<Vec<(String, String)>, PipelineError>;

    /// Get the output subdirectory for this module
    fn output_subdir(&self, _ctx: &GenerationContext) -> PathBuf { PathBuf::new() }

    /// Whether this module should generate a mod.rs file
    fn should_generate_mod_rs(&self) -> bool { true }

    /// Generate and write the module files, returning the paths written
    fn generate_and_write(&self, ctx: &GenerationContext) -> Result<Vec<PathBuf>, PipelineError> {
        let files = self.generate_files(ctx)?;
        if files.is_empty() {
            tracing::info!("{}: nothing to generate", self.module_name());
            return Ok(Vec::new());
        }
        let output_dir = ctx.base_output_dir.join(self.output_subdir(ctx));

        codegen::write_generated(&output_dir, &files, ctx.rustfmt)?;
        let mut written: Vec<PathBuf> =
            files.iter().map(|(name, _)| output_dir.join(name)).collect();

        if self.should_generate_mod_rs() {
            let mod_rs = output_dir.join("mod.rs");
            std::fs::write(&mod_rs, codegen::render_mod_rs(&files))?;
            written.push(mod_rs);
        }

        Ok(written)
    }
}

pub mod gateway;

pub use gateway::GatewayModuleGenerator;
