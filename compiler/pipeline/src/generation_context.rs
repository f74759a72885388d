//! Generation context for code generation pipeline.
//!
//! Everything a run needs is computed here before the first file is
//! rendered: the mode, the route table and the input message index all look
//! at the whole request, while the type registry is the one piece of state
//! that changes as files are emitted.

use std::path::PathBuf;
use std::sync::Arc;

use codegen::{EmitPaths, GenMode, ModeFlags};
use ir::GenerationRequest;
use registry::{InputMessageIndex, RouteTable, TypeRegistry};

use crate::PipelineError;

/// Context containing all metadata needed for code generation
pub struct GenerationContext {
    /// The request being compiled
    pub request: GenerationRequest,
    /// What this run generates
    pub mode: GenMode,
    /// Module paths generated code imports from
    pub paths: EmitPaths,
    /// Input types whose region wrapper has been emitted
    pub type_registry: Arc<TypeRegistry>,
    /// Which services take each message as input
    pub inputs: InputMessageIndex,
    /// Every gateway method of the run
    pub routes: RouteTable,
    /// The base output directory for generated files
    pub base_output_dir: PathBuf,
    /// Run rustfmt on written files
    pub rustfmt: bool,
}

impl GenerationContext {
    /// Create a new builder for GenerationContext
    pub fn builder() -> GenerationContextBuilder { GenerationContextBuilder::default() }
}

#[derive(Default)]
/// Builder for GenerationContext
pub struct GenerationContextBuilder {
    request: Option<GenerationRequest>,
    flags: ModeFlags,
    paths: Option<EmitPaths>,
    type_registry: Option<Arc<TypeRegistry>>,
    base_output_dir: Option<PathBuf>,
    rustfmt: bool,
}

impl GenerationContextBuilder {
    /// Set the request
    pub fn request(mut self, request: GenerationRequest) -> Self {
        self.request = Some(request);
        self
    }

    /// Set the mode flags given outside the request; the request's own parameter is added to them
    pub fn flags(mut self, flags: ModeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the module paths (defaults to [`EmitPaths::default`])
    pub fn paths(mut self, paths: EmitPaths) -> Self {
        self.paths = Some(paths);
        self
    }

    /// Share an existing type registry (a fresh one is created by default)
    pub fn type_registry(mut self, registry: Arc<TypeRegistry>) -> Self {
        self.type_registry = Some(registry);
        self
    }

    /// Set the output directory
    pub fn output_dir(mut self, dir: PathBuf) -> Self {
        self.base_output_dir = Some(dir);
        self
    }

    /// Run rustfmt on written files
    pub fn rustfmt(mut self, rustfmt: bool) -> Self {
        self.rustfmt = rustfmt;
        self
    }

    /// Build the GenerationContext
    pub fn build(self) -> Result<GenerationContext, PipelineError> {
        let request = self
            .request
            .ok_or_else(|| PipelineError::Message("request is required".to_string()))?;
        let base_output_dir = self
            .base_output_dir
            .ok_or_else(|| PipelineError::Message("base_output_dir is required".to_string()))?;

        let flags = self.flags.union(ModeFlags::from_parameters(request.parameters()));
        let inputs = InputMessageIndex::from_request(&request);
        let routes = RouteTable::from_request(&request);

        Ok(GenerationContext {
            mode: GenMode::select(flags),
            paths: self.paths.unwrap_or_default(),
            type_registry: self.type_registry.unwrap_or_else(|| Arc::new(TypeRegistry::new())),
            inputs,
            routes,
            request,
            base_output_dir,
            rustfmt: self.rustfmt,
        })
    }
}
