//! Emitters, one per [`GenMode`].
//!
//! The driver walks services and methods in declaration order and hands each
//! to the emitter of the run's mode. Emitters append text to a [`FileOutput`]
//! and record the imports that text needs.

use std::fmt;

use ir::GenerationRequest;
use registry::InputMessageIndex;

use crate::args::MethodArgs;
use crate::imports::ImportTracker;
use crate::mode::GenMode;
use crate::paths::EmitPaths;
use crate::{Result, GENERATED_HEADER};

pub mod api;
pub mod client;
pub mod gateway;
pub mod routes;
pub mod test_harness;
pub mod testutil;

/// A service as seen by an emitter.
pub struct ServiceScope<'a> {
    /// Service name
    pub name: &'a str,
    /// Its gateway methods, in declaration order
    pub methods: &'a [MethodArgs],
    /// The whole request, for message lookups
    pub request: &'a GenerationRequest,
    /// Which services take each message as input
    pub inputs: &'a InputMessageIndex,
}

/// Renders one mode.
pub trait Emitter {
    /// Code placed before the methods of a service
    fn begin_service(&self, _scope: &ServiceScope<'_>, _out: &mut FileOutput<'_>) -> Result<()> {
        Ok(())
    }

    /// Code for one method
    fn method(&self, args: &MethodArgs, out: &mut FileOutput<'_>) -> Result<()>;

    /// Code placed after the methods of a service
    fn end_service(&self, _scope: &ServiceScope<'_>, _out: &mut FileOutput<'_>) -> Result<()> {
        Ok(())
    }
}

impl GenMode {
    /// The emitter rendering this mode
    pub fn emitter(&self) -> &'static dyn Emitter {
        match self {
            GenMode::ServerGateway => &gateway::GatewayEmitter,
            GenMode::ApiStructOnly => &api::ApiEmitter,
            GenMode::ClientBinding => &client::ClientEmitter,
            GenMode::TestHarness => &test_harness::TestHarnessEmitter,
            GenMode::TestUtil => &testutil::TestUtilEmitter,
        }
    }
}

/// Text of one generated file under construction.
pub struct FileOutput<'a> {
    source: String,
    paths: &'a EmitPaths,
    imports: ImportTracker,
    body: String,
}

impl<'a> FileOutput<'a> {
    /// Empty output for the input file `source`
    pub fn new(source: &str, paths: &'a EmitPaths) -> Self {
        FileOutput {
            source: source.to_string(),
            paths,
            imports: ImportTracker::new(),
            body: String::new(),
        }
    }

    /// Module paths generated code refers to
    pub fn paths(&self) -> &'a EmitPaths { self.paths }

    /// Record a symbol imported from the runtime crate
    pub fn use_runtime(&mut self, symbol: &str) {
        let runtime = self.paths.runtime_crate.clone();
        self.imports.record(&runtime, symbol);
    }

    /// Record a symbol imported from an arbitrary path
    pub fn use_symbol(&mut self, path: &str, symbol: &str) { self.imports.record(path, symbol); }

    /// Record a module referred to by its local name
    pub fn use_module(&mut self, module_path: &str) { self.imports.record_module(module_path); }

    /// Imports recorded so far
    pub fn imports(&self) -> &ImportTracker { &self.imports }

    /// Body rendered so far
    pub fn body(&self) -> &str { &self.body }

    /// Header, imports and body
    pub fn finish(self) -> String {
        let mut out = format!("{GENERATED_HEADER}\n// source: {}\n\n", self.source);
        let imports = self.imports.render();
        if !imports.is_empty() {
            out.push_str(&imports);
            out.push('\n');
        }
        out.push_str(&self.body);
        out
    }
}

impl fmt::Write for FileOutput<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.body.push_str(s);
        Ok(())
    }
}

/// The `mod_funcs` parameter of generated test helpers
pub(crate) fn mod_funcs_param(proto: &str, in_name: &str) -> String {
    format!("mod_funcs: &[ModFn<'_, {proto}::{in_name}>]")
}
