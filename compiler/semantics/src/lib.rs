#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Semantic analysis for annotated service definitions.
//!
//! Parses the authorization annotation of every gateway method, derives the
//! flags emitters branch on, and checks the cross-message rules a request
//! must satisfy before anything is generated.

use std::collections::BTreeMap;

use ir::{GenerationRequest, MessageDefinition, MethodDefinition};

/// Authorization annotation parsing
pub mod annotation;
/// Permission matrix eligibility
pub mod eligibility;
/// Shared method categorization utilities used by codegen
pub mod method_categorization;

pub use annotation::{parse_annotation, AuthDirective, ACTION_VIEW, SKIP_ENFORCE};
pub use eligibility::is_test_eligible;
pub use method_categorization::{sort_create_first, MethodVerb};

/// Errors that can occur during semantic analysis.
#[derive(Debug, thiserror::Error)]
pub enum SemanticError {
    /// The annotation does not have exactly three components.
    #[error(
        "invalid mc2_api string \"{raw}\" ({found} components), expected ResourceType,Action,OrgNameField"
    )]
    InvalidAnnotation {
        /// The annotation as written
        raw: String,
        /// Number of comma separated components found
        found: usize,
    },

    /// A create method on an org-using input does not declare the org it requires.
    #[error(
        "method {method} input {input} has uses_org and is a create operation, so method must have requires_org specified"
    )]
    MissingRequiresOrg {
        /// Method name
        method: String,
        /// Input message name
        input: String,
    },

    /// Two generated files map to the same Rust module.
    #[error("files {first} and {second} both generate module {module}")]
    DuplicateModule {
        /// Module name both files map to
        module: String,
        /// File that claimed the module first
        first: String,
        /// File that collides with it
        second: String,
    },
}

/// Result type for semantic analysis operations.
pub type Result<T> = std::result::Result<T, SemanticError>;

/// A gateway method with its annotation parsed and its flags derived.
#[derive(Debug, Clone)]
pub struct ClassifiedMethod<'a> {
    /// The method as declared
    pub method: &'a MethodDefinition,
    /// Parsed annotation
    pub directive: AuthDirective,
    /// Verb the method name starts with
    pub verb: MethodVerb,
    /// Streaming view method whose items are filtered per caller
    pub show: bool,
}

impl ClassifiedMethod<'_> {
    /// Whether the method responds with a stream
    pub fn streaming(&self) -> bool { self.method.server_streaming }

    /// Whether enforcement is skipped entirely
    pub fn skip_enforce(&self) -> bool { self.directive.skip_enforce() }

    /// Organization field that must name an existing organization, if any
    pub fn requires_org(&self) -> Option<&str> { required_org(self.method) }
}

/// Parse and classify one gateway method.
///
/// `input` is the definition of the method's input message when the request
/// carries it; the requires-org rule can only be checked when it does.
pub fn classify<'a>(
    method: &'a MethodDefinition,
    input: Option<&MessageDefinition>,
) -> Result<ClassifiedMethod<'a>> {
    let directive = parse_annotation(method.mc2_api.as_deref().unwrap_or_default())?;
    if let Some(input) = input {
        validate_requires_org(method, input)?;
    }

    let verb = MethodVerb::of(&method.name);
    let show = directive.is_view() && verb == MethodVerb::Show && method.server_streaming;

    Ok(ClassifiedMethod { method, directive, verb, show })
}

/// The `requires_org` option, ignoring the empty and "none" markers
pub fn required_org(method: &MethodDefinition) -> Option<&str> {
    method.requires_org.as_deref().filter(|o| !o.is_empty() && *o != "none")
}

/// Create methods on inputs that use another organization must say which org they require.
pub fn validate_requires_org(method: &MethodDefinition, input: &MessageDefinition) -> Result<()> {
    if input.uses_org().is_none() || MethodVerb::of(&method.name) != MethodVerb::Create {
        return Ok(());
    }
    match method.requires_org.as_deref() {
        None | Some("") => Err(SemanticError::MissingRequiresOrg {
            method: method.name.clone(),
            input: input.name.clone(),
        }),
        Some(_) => Ok(()),
    }
}

/// Classify every gateway method of every generated file.
///
/// Fails on the first method that does not pass, or on two output files
/// mapping to one module; used to reject a request before any output is
/// produced.
pub fn validate_request(request: &GenerationRequest) -> Result<usize> {
    let mut modules = BTreeMap::new();
    for file in request.generated_files().filter(|f| f.has_gateway_methods()) {
        if let Some(first) = modules.insert(file.module_name(), file.name.as_str()) {
            return Err(SemanticError::DuplicateModule {
                module: file.module_name(),
                first: first.to_string(),
                second: file.name.clone(),
            });
        }
    }

    let mut count = 0;
    for file in request.generated_files() {
        for service in &file.services {
            for method in service.gateway_methods() {
                classify(method, request.find_message(&method.input_type))?;
                count += 1;
            }
        }
    }
    Ok(count)
}
