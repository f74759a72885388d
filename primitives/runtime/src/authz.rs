//! Authorization boundary seen by generated handlers.

/// Policy decision point.
///
/// Generated handlers never interpret policy; they ask this trait whether
/// `subject` may perform `action` on `resource` within `org`.
pub trait Enforcer: Send + Sync {
    /// Whether the subject is allowed
    fn enforce(&self, subject: &str, org: &str, resource: &str, action: &str) -> bool;

    /// Whether the named organization exists
    fn org_exists(&self, _org: &str) -> bool { true }
}

impl<F> Enforcer for F
where
    F: Fn(&str, &str, &str, &str) -> bool + Send + Sync,
{
    fn enforce(&self, subject: &str, org: &str, resource: &str, action: &str) -> bool {
        self(subject, org, resource, action)
    }
}

/// An enforcer that allows everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Enforcer for AllowAll {
    fn enforce(&self, _: &str, _: &str, _: &str, _: &str) -> bool { true }
}

/// Per-request context a handler works in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionContext {
    /// Authenticated caller
    pub username: String,
    /// Region the request targets, taken from the request wrapper
    pub region: String,
    /// Set by trusted internal callers to bypass enforcement
    pub skip_authz: bool,
}

impl RegionContext {
    /// Context for an authenticated user
    pub fn new(username: impl Into<String>) -> Self {
        RegionContext { username: username.into(), ..Default::default() }
    }

    /// Context that bypasses enforcement
    pub fn internal(username: impl Into<String>) -> Self {
        RegionContext { username: username.into(), skip_authz: true, ..Default::default() }
    }
}
