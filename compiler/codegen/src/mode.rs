//! Output modes.
//!
//! A run emits exactly one kind of code. The mode is picked once from the
//! requested flags and every per-method decision branches on it.

use std::fmt;

/// Mode flags as requested on the command line or in the request parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeFlags {
    /// Region wrapper structs only
    pub api: bool,
    /// Client bindings
    pub client: bool,
    /// Permission tests
    pub test: bool,
    /// Test request helpers
    pub testutil: bool,
}

impl ModeFlags {
    /// Flags named in a protoc style parameter list ("genapi", "genclient", "gentest", "gentestutil")
    ///
    /// Unknown parameters are ignored.
    pub fn from_parameters<'a>(params: impl IntoIterator<Item = &'a str>) -> Self {
        let mut flags = ModeFlags::default();
        for param in params {
            match param {
                "genapi" => flags.api = true,
                "genclient" => flags.client = true,
                "gentest" => flags.test = true,
                "gentestutil" => flags.testutil = true,
                other => tracing::debug!("ignoring generator parameter {:?}", other),
            }
        }
        flags
    }

    /// Flags set in either
    pub fn union(self, other: ModeFlags) -> Self {
        ModeFlags {
            api: self.api || other.api,
            client: self.client || other.client,
            test: self.test || other.test,
            testutil: self.testutil || other.testutil,
        }
    }
}

/// What a run generates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenMode {
    /// Gateway handlers, backend traits and the dispatcher
    #[default]
    ServerGateway,
    /// Region wrapper structs
    ApiStructOnly,
    /// Client bindings
    ClientBinding,
    /// Permission tests
    TestHarness,
    /// Test request helpers
    TestUtil,
}

impl GenMode {
    /// Pick the mode for a set of flags: api, then client, then test, then testutil, else server.
    pub fn select(flags: ModeFlags) -> Self {
        if flags.api {
            GenMode::ApiStructOnly
        } else if flags.client {
            GenMode::ClientBinding
        } else if flags.test {
            GenMode::TestHarness
        } else if flags.testutil {
            GenMode::TestUtil
        } else {
            GenMode::ServerGateway
        }
    }

    /// Whether the route table is attached to the first generated file
    pub fn emits_route_table(&self) -> bool { !matches!(self, GenMode::TestHarness) }

    /// Whether the route table includes the dispatcher, which references handlers
    pub fn emits_dispatch(&self) -> bool { matches!(self, GenMode::ServerGateway) }

    /// Short name, as used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            GenMode::ServerGateway => "server",
            GenMode::ApiStructOnly => "api",
            GenMode::ClientBinding => "client",
            GenMode::TestHarness => "test",
            GenMode::TestUtil => "testutil",
        }
    }
}

impl fmt::Display for GenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        let all = ModeFlags { api: true, client: true, test: true, testutil: true };
        assert_eq!(GenMode::select(all), GenMode::ApiStructOnly);
        assert_eq!(
            GenMode::select(ModeFlags { client: true, test: true, ..Default::default() }),
            GenMode::ClientBinding
        );
        assert_eq!(
            GenMode::select(ModeFlags { test: true, testutil: true, ..Default::default() }),
            GenMode::TestHarness
        );
        assert_eq!(
            GenMode::select(ModeFlags { testutil: true, ..Default::default() }),
            GenMode::TestUtil
        );
        assert_eq!(GenMode::select(ModeFlags::default()), GenMode::ServerGateway);
    }

    #[test]
    fn test_from_parameters() {
        let flags = ModeFlags::from_parameters(["gentest", "paths=source_relative"]);
        assert!(flags.test);
        assert!(!flags.api);

        let merged = flags.union(ModeFlags { api: true, ..Default::default() });
        assert_eq!(GenMode::select(merged), GenMode::ApiStructOnly);
    }

    #[test]
    fn test_route_table_modes() {
        assert!(GenMode::ServerGateway.emits_route_table());
        assert!(GenMode::ServerGateway.emits_dispatch());
        assert!(GenMode::ClientBinding.emits_route_table());
        assert!(!GenMode::ClientBinding.emits_dispatch());
        assert!(!GenMode::TestHarness.emits_route_table());
    }
}
