//! Restgate Intermediate Representation
//!
//! This module defines the service interface records the generator consumes.
//! They mirror what a protobuf front end knows after parsing: files holding
//! services and messages, services holding methods, and the per-method and
//! per-message options the generator is driven by.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or saving IR documents.
#[derive(Debug, Error)]
pub enum IrError {
    /// The IR file could not be read or written.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The IR document is not valid JSON for the expected shape.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// The complete input of one generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Every file known to the front end, in processing order.
    pub files: Vec<FileDefinition>,
    /// Names of the files output should be generated for. Empty means all files.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files_to_generate: Vec<String>,
    /// Comma separated generator parameters (e.g. "genapi"), as a protoc plugin receives them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

/// One input file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileDefinition {
    /// File name as given by the front end (e.g. "edgeproto/flavor.proto")
    pub name: String,
    /// Services declared in this file, in declaration order
    #[serde(default)]
    pub services: Vec<ServiceDefinition>,
    /// Messages declared in this file, in declaration order
    #[serde(default)]
    pub messages: Vec<MessageDefinition>,
}

/// An RPC service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Service name (e.g. "FlavorApi")
    pub name: String,
    /// Methods in declaration order
    #[serde(default)]
    pub methods: Vec<MethodDefinition>,
}

/// An RPC method.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodDefinition {
    /// Method name, unique within its service
    pub name: String,
    /// Name of the input message type
    pub input_type: String,
    /// Name of the output message type
    pub output_type: String,
    /// Whether the method streams its responses
    #[serde(default, alias = "streaming")]
    pub server_streaming: bool,
    /// Whether the method streams its requests
    #[serde(default)]
    pub client_streaming: bool,
    /// Raw authorization annotation: "resource,action,orgField"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mc2_api: Option<String>,
    /// Field of the input naming an organization that must exist before the call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_org: Option<String>,
    /// Leading comment of the method, used for route documentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// A message type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageDefinition {
    /// Message name
    pub name: String,
    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    /// Whether create/update/delete permission tests are generated for this message
    #[serde(default)]
    pub generate_cud_test: bool,
    /// Whether the message declares its own show test
    #[serde(default)]
    pub generate_show_test: bool,
    /// Field referencing another organization that the object uses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_org: Option<String>,
}

/// A message field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name as declared (e.g. "key")
    pub name: String,
    /// Field number
    pub number: u32,
    /// Message type name for nested message fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl GenerationRequest {
    /// Load a request from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, IrError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse a request from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self, IrError> { Ok(serde_json::from_str(content)?) }

    /// Save the request to a JSON file with pretty formatting
    pub fn to_file(&self, path: &Path) -> Result<(), IrError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        // Ensure file ends with a newline (POSIX standard)
        use std::io::Write;
        writeln!(file)?;
        Ok(())
    }

    /// Whether output is requested for the named file
    pub fn should_generate(&self, file_name: &str) -> bool {
        self.files_to_generate.is_empty() || self.files_to_generate.iter().any(|f| f == file_name)
    }

    /// Files output is requested for, in processing order
    pub fn generated_files(&self) -> impl Iterator<Item = &FileDefinition> {
        self.files.iter().filter(|f| self.should_generate(&f.name))
    }

    /// The individual generator parameters, trimmed, empty entries dropped
    pub fn parameters(&self) -> Vec<&str> {
        self.parameter
            .as_deref()
            .map(|p| p.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Look up a message by name across all files
    pub fn find_message(&self, name: &str) -> Option<&MessageDefinition> {
        self.files.iter().flat_map(|f| f.messages.iter()).find(|m| m.name == name)
    }
}

/// Rust keywords that cannot be used as plain identifiers
pub const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "yield",
];

impl FileDefinition {
    /// Rust module name for the generated counterpart of this file
    ///
    /// "edgeproto/flavor.proto" becomes "flavor", "app-inst.proto" becomes "app_inst".
    /// Keywords get a trailing underscore ("type.proto" becomes "type_") and a
    /// leading digit a leading one ("3d.proto" becomes "_3d").
    pub fn module_name(&self) -> String {
        let base = self.name.rsplit('/').next().unwrap_or(&self.name);
        let stem = base.strip_suffix(".proto").unwrap_or(base);
        let name: String =
            stem.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }).collect();
        if RUST_KEYWORDS.contains(&name.as_str()) {
            format!("{name}_")
        } else if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
            format!("_{name}")
        } else {
            name
        }
    }

    /// Whether any service in this file exposes at least one gateway method
    pub fn has_gateway_methods(&self) -> bool {
        self.services.iter().any(ServiceDefinition::has_gateway_methods)
    }
}

impl ServiceDefinition {
    /// Methods that are part of the gateway surface, in declaration order
    pub fn gateway_methods(&self) -> impl Iterator<Item = &MethodDefinition> {
        self.methods.iter().filter(|m| m.is_gateway_method())
    }

    /// Whether this service exposes at least one gateway method
    pub fn has_gateway_methods(&self) -> bool { self.gateway_methods().next().is_some() }
}

impl MethodDefinition {
    /// The raw annotation, if present and non-empty
    pub fn annotation(&self) -> Option<&str> { self.mc2_api.as_deref().filter(|a| !a.is_empty()) }

    /// Annotated, non client-streaming methods make up the gateway surface
    pub fn is_gateway_method(&self) -> bool { self.annotation().is_some() && !self.client_streaming }

    /// Whether the method name starts with the given verb (e.g. "Create")
    pub fn has_prefix(&self, verb: &str) -> bool { self.name.starts_with(verb) }
}

impl MessageDefinition {
    /// Whether the message carries a "fields" list used for partial updates
    pub fn has_fields(&self) -> bool { self.fields.iter().any(|f| f.name == "fields") }

    /// The org the message uses, ignoring the empty and "none" markers
    pub fn uses_org(&self) -> Option<&str> {
        self.uses_org.as_deref().filter(|o| !o.is_empty() && *o != "none")
    }
}
