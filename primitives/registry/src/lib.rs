#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Generation registries: run-wide lookup tables for the generator.
//!
//! [`TypeRegistry`] is the only mutable state shared across files: it records
//! which input types already had their region wrapper emitted, and where, so
//! that every wrapper is declared exactly once per run. [`InputMessageIndex`] and
//! [`RouteTable`] are read-only views computed up front from the complete
//! request, so per-file emission can consult the global picture.

pub mod routes;
pub mod type_registry;

use std::collections::{BTreeMap, BTreeSet};

use ir::GenerationRequest;

pub use routes::{RouteEntry, RouteTable};
pub use type_registry::{TypeRegistry, TypeRegistryReader};

/// Which services use a message as the input of a gateway method.
///
/// Built from every generated file, so a message used by services in two
/// different files is still seen as shared.
#[derive(Debug, Default, Clone)]
pub struct InputMessageIndex {
    services: BTreeMap<String, BTreeSet<String>>,
}

impl InputMessageIndex {
    /// Build the index from the files output is requested for.
    pub fn from_request(request: &GenerationRequest) -> Self {
        let mut services: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for file in request.generated_files() {
            for service in &file.services {
                for method in service.gateway_methods() {
                    services
                        .entry(method.input_type.clone())
                        .or_default()
                        .insert(service.name.clone());
                }
            }
        }
        Self { services }
    }

    /// Whether the message is the input of any gateway method.
    pub fn is_input(&self, message: &str) -> bool { self.services.contains_key(message) }

    /// Whether more than one service takes the message as input.
    pub fn is_shared(&self, message: &str) -> bool {
        self.services.get(message).is_some_and(|set| set.len() > 1)
    }
}
