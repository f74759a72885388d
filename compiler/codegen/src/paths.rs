//! Where generated code finds the modules it refers to.

use crate::utils::module_local_name;

/// Module paths generated code imports.
///
/// Each path is imported once per file and referred to by its last segment,
/// so `crate::edgeproto` makes types appear as `edgeproto::Flavor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitPaths {
    /// Message types
    pub proto_module: String,
    /// Region wrapper structs
    pub api_module: String,
    /// Client bindings
    pub client_module: String,
    /// Test request helpers
    pub testutil_module: String,
    /// The runtime crate
    pub runtime_crate: String,
}

impl Default for EmitPaths {
    fn default() -> Self {
        EmitPaths {
            proto_module: "crate::edgeproto".to_string(),
            api_module: "crate::ormapi".to_string(),
            client_module: "crate::mctestclient".to_string(),
            testutil_module: "crate::testutil".to_string(),
            runtime_crate: "restgate_runtime".to_string(),
        }
    }
}

impl EmitPaths {
    /// Local name of the message types module
    pub fn proto(&self) -> &str { module_local_name(&self.proto_module) }

    /// Local name of the wrapper module
    pub fn api(&self) -> &str { module_local_name(&self.api_module) }

    /// Local name of the client bindings module
    pub fn client(&self) -> &str { module_local_name(&self.client_module) }

    /// Local name of the test helpers module
    pub fn testutil(&self) -> &str { module_local_name(&self.testutil_module) }
}
