#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! High-level pipeline that turns an annotated service description into
//! gateway code.
//!
//! A run reads one [`ir::GenerationRequest`], rejects it before producing any
//! output if an annotation is malformed, renders every file in memory and only
//! then writes the tree.
//!
//! ## Module Organization
//!
//! - `orchestration` - Entry points (`run`, `compile_request`)
//! - `generation_context` - Everything a run knows up front
//! - `module_generators` - Per-run file generation and writing

use thiserror::Error;

/// Convenient result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the codegen pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Generic message-based error.
    #[error("{0}")]
    Message(String),
    /// A method annotation or option is invalid.
    #[error(transparent)]
    Semantic(#[from] semantics::SemanticError),
    /// Error propagated from the codegen crate.
    #[error(transparent)]
    Codegen(#[from] codegen::CodegenError),
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// The request could not be read.
    #[error("failed to load request: {0}")]
    Ir(#[from] ir::IrError),
    /// I/O error while creating or writing files.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub mod generation_context;
pub mod module_generators;
pub mod orchestration;

pub use generation_context::{GenerationContext, GenerationContextBuilder};
pub use module_generators::{GatewayModuleGenerator, ModuleGenerator};
pub use orchestration::{compile_request, emit_paths, run, RunSummary};
