//! Global route table.
//!
//! The route table lists every gateway method of every generated file, so it
//! can only be built once the whole request is known. It is computed before
//! any file is emitted and attached to the first generated file.

use ir::GenerationRequest;
use runtime::ROUTE_PREFIX;

/// One gateway method as seen by the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Rust module of the file declaring the method
    pub module: String,
    /// Service name
    pub service: String,
    /// Method name
    pub method: String,
    /// Input message name
    pub input_type: String,
    /// Whether the response is streamed
    pub streaming: bool,
    /// Method summary, if any
    pub summary: Option<String>,
}

impl RouteEntry {
    /// REST path of the method
    pub fn path(&self) -> String { format!("{}{}", ROUTE_PREFIX, self.method) }
}

/// Every gateway method of a run, in file, service and method order.
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Collect routes from the files output is requested for.
    pub fn from_request(request: &GenerationRequest) -> Self {
        let mut entries = Vec::new();
        for file in request.generated_files() {
            let module = file.module_name();
            for service in &file.services {
                for method in service.gateway_methods() {
                    entries.push(RouteEntry {
                        module: module.clone(),
                        service: service.name.clone(),
                        method: method.name.clone(),
                        input_type: method.input_type.clone(),
                        streaming: method.server_streaming,
                        summary: method.summary.clone(),
                    });
                }
            }
        }
        Self { entries }
    }

    /// All entries
    pub fn entries(&self) -> &[RouteEntry] { &self.entries }

    /// Whether the table has no routes
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Distinct `(module, service)` pairs, in first-seen order
    pub fn services(&self) -> Vec<(&str, &str)> {
        let mut seen: Vec<(&str, &str)> = Vec::new();
        for entry in &self.entries {
            let pair = (entry.module.as_str(), entry.service.as_str());
            if !seen.contains(&pair) {
                seen.push(pair);
            }
        }
        seen
    }
}
