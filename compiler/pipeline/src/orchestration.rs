//! Pipeline orchestration for the main entry points.

use std::path::{Path, PathBuf};

use codegen::{EmitPaths, GenMode, ModeFlags};
use config::{Config, PathsConfig};
use ir::GenerationRequest;

use crate::generation_context::GenerationContext;
use crate::module_generators::{GatewayModuleGenerator, ModuleGenerator};
use crate::PipelineError;

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Mode the run generated
    pub mode: GenMode,
    /// Files written, `mod.rs` last
    pub files: Vec<PathBuf>,
}

/// Module paths from their configuration section
pub fn emit_paths(paths: &PathsConfig) -> EmitPaths {
    EmitPaths {
        proto_module: paths.proto_module.clone(),
        api_module: paths.api_module.clone(),
        client_module: paths.client_module.clone(),
        testutil_module: paths.testutil_module.clone(),
        runtime_crate: paths.runtime_crate.clone(),
    }
}

/// Run the generator as configured.
///
/// `flags` come from the command line; the configured parameter and the
/// request's own parameter add to them.
pub fn run(config: &Config, flags: ModeFlags) -> Result<RunSummary, PipelineError> {
    let codegen = &config.codegen;
    let request = load_request(&codegen.input_path)?;
    let configured = codegen
        .parameter
        .as_deref()
        .map(|p| ModeFlags::from_parameters(p.split(',').map(str::trim)))
        .unwrap_or_default();

    compile_request(
        request,
        flags.union(configured),
        &codegen.output_dir,
        emit_paths(&codegen.paths),
        codegen.rustfmt,
    )
}

/// Compile an in-memory request into `output_dir`.
///
/// Nothing is written when any method fails to classify or render.
pub fn compile_request(
    request: GenerationRequest,
    flags: ModeFlags,
    output_dir: &Path,
    paths: EmitPaths,
    rustfmt: bool,
) -> Result<RunSummary, PipelineError> {
    let ctx = GenerationContext::builder()
        .request(request)
        .flags(flags)
        .paths(paths)
        .output_dir(output_dir.to_path_buf())
        .rustfmt(rustfmt)
        .build()?;

    tracing::info!("generating {} code into {}", ctx.mode, output_dir.display());
    let files = GatewayModuleGenerator.generate_and_write(&ctx)?;
    tracing::info!("wrote {} files", files.len());

    Ok(RunSummary { mode: ctx.mode, files })
}

fn load_request(path: &Path) -> Result<GenerationRequest, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::Message(format!("request not found: {}", path.display())));
    }
    Ok(GenerationRequest::from_file(path)?)
}
