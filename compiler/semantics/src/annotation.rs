//! The `mc2_api` annotation: `"<resource>,<action>,<orgField>"`.
//!
//! Tokens are taken verbatim. The org field is a dotted path into the input
//! message (e.g. `Key.Organization`), empty when the resource is not scoped to
//! an organization, or the marker `skipenforce`.

use crate::{Result, SemanticError};

/// Org field marker that turns enforcement off for a method.
pub const SKIP_ENFORCE: &str = "skipenforce";

/// Action token of read-only methods.
pub const ACTION_VIEW: &str = "ActionView";

/// A parsed authorization annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthDirective {
    /// Resource name passed to the enforcer
    pub resource: String,
    /// Action name passed to the enforcer
    pub action: String,
    /// Dotted path of the organization field, possibly empty
    pub org_field: String,
}

/// Split an annotation into its three components.
///
/// # Errors
/// [`SemanticError::InvalidAnnotation`] unless there are exactly three.
pub fn parse_annotation(raw: &str) -> Result<AuthDirective> {
    let parts: Vec<&str> = raw.split(',').collect();
    match parts.as_slice() {
        [resource, action, org_field] => Ok(AuthDirective {
            resource: resource.to_string(),
            action: action.to_string(),
            org_field: org_field.to_string(),
        }),
        _ => Err(SemanticError::InvalidAnnotation { raw: raw.to_string(), found: parts.len() }),
    }
}

impl AuthDirective {
    /// Whether enforcement is skipped
    pub fn skip_enforce(&self) -> bool { self.org_field == SKIP_ENFORCE }

    /// Whether the org field names a real field of the input
    pub fn has_org(&self) -> bool { !self.org_field.is_empty() && !self.skip_enforce() }

    /// Whether the action is the view action
    pub fn is_view(&self) -> bool { self.action == ACTION_VIEW }

    /// Segments of the org field path, empty when there is no org field
    pub fn org_path(&self) -> Vec<&str> {
        if self.has_org() {
            self.org_field.split('.').collect()
        } else {
            Vec::new()
        }
    }
}
