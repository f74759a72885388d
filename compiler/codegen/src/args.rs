//! Everything an emitter needs to know about one method.

use ir::{GenerationRequest, MessageDefinition};
use semantics::{ClassifiedMethod, MethodVerb};

use crate::fields::field_paths;
use crate::utils::{pascal_to_snake_case, rust_field_path, rust_ident};
use crate::{CodegenError, Result};

/// Render-ready view of one classified gateway method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodArgs {
    /// Service declaring the method
    pub service: String,
    /// Method name as declared
    pub method: String,
    /// Rust function name for the method
    pub fn_name: String,
    /// Input message name
    pub in_name: String,
    /// Output message name
    pub out_name: String,
    /// Resource passed to the enforcer
    pub resource: String,
    /// Action passed to the enforcer
    pub action: String,
    /// Org field path as declared, possibly empty
    pub org_field: String,
    /// Whether this method is the first to use its input type, so its wrapper struct is emitted here
    pub gen_struct: bool,
    /// Module declaring the wrapper struct, when another generated file declared it
    pub wrapper_module: Option<String>,
    /// Settable fields of the input as (JSON path, field id), for methods that set fields
    pub field_ids: Vec<(String, String)>,
    /// Whether the method streams its responses
    pub outstream: bool,
    /// Streaming view method whose items are filtered per caller
    pub show: bool,
    /// Whether enforcement is skipped
    pub skip_enforce: bool,
    /// Expression naming the organization of the input (`&obj.<path>` or `""`)
    pub org_expr: String,
    /// Expression naming the organization of a streamed item (`&res.<path>` or `""`)
    pub show_org_expr: String,
    /// Rust path of the org field in the input, when it names a real field
    pub org_setter: Option<String>,
    /// Rust path of the field naming an organization that must exist
    pub requires_org: Option<String>,
    /// Whether the input carries a `fields` list
    pub has_fields: bool,
    /// Whether the method updates the fields listed in its input
    pub set_fields: bool,
    /// Field id of the org field, for methods that set fields
    pub org_field_id: Option<String>,
    /// Verb of the method name
    pub verb: MethodVerb,
}

impl MethodArgs {
    /// Build the arguments for one method.
    ///
    /// `gen_struct` is the registry's answer for the input type. The pipeline
    /// sets [`MethodArgs::wrapper_module`] afterwards from the registry owner.
    ///
    /// # Errors
    /// [`CodegenError::TemplateExecution`] when the method has no input or output type.
    pub fn new(
        service: &str,
        classified: &ClassifiedMethod<'_>,
        gen_struct: bool,
        request: &GenerationRequest,
    ) -> Result<Self> {
        let method = classified.method;
        if method.input_type.is_empty() || method.output_type.is_empty() {
            return Err(CodegenError::TemplateExecution {
                method: method.name.clone(),
                reason: "input and output types must be named".to_string(),
            });
        }

        let directive = &classified.directive;
        let input = request.find_message(&method.input_type);
        let has_fields = input.is_some_and(MessageDefinition::has_fields);
        let set_fields = has_fields && method.name.starts_with(&format!("Update{}", method.input_type));

        let org_path = directive.has_org().then(|| rust_field_path(&directive.org_field));
        let (org_expr, show_org_expr) = match &org_path {
            Some(path) => (format!("&obj.{path}"), format!("&res.{path}")),
            None => (r#""""#.to_string(), r#""""#.to_string()),
        };
        let (org_field_id, field_ids) = match input.filter(|_| set_fields) {
            Some(msg) => (
                field_id(request, msg, &directive.org_field),
                field_paths(request, msg).into_iter().map(|p| (p.json_path, p.id)).collect(),
            ),
            None => (None, Vec::new()),
        };

        Ok(MethodArgs {
            service: service.to_string(),
            method: method.name.clone(),
            fn_name: rust_ident(&method.name),
            in_name: method.input_type.clone(),
            out_name: method.output_type.clone(),
            resource: directive.resource.clone(),
            action: directive.action.clone(),
            org_field: directive.org_field.clone(),
            gen_struct,
            wrapper_module: None,
            field_ids,
            outstream: classified.streaming(),
            show: classified.show,
            skip_enforce: classified.skip_enforce(),
            org_expr,
            show_org_expr,
            org_setter: org_path,
            requires_org: classified.requires_org().map(rust_field_path),
            has_fields,
            set_fields,
            org_field_id,
            verb: classified.verb,
        })
    }

    /// Name of the region wrapper struct for the input
    pub fn wrapper_name(&self) -> String { wrapper_name(&self.in_name) }

    /// Field name of the wrapped object inside the region wrapper
    pub fn wrapper_field(&self) -> String { rust_ident(&self.in_name) }

    /// Whether the handler runs the enforcer before calling the backend
    pub fn enforces_input(&self) -> bool { !self.show && !self.skip_enforce }

    /// Whether streamed items are filtered through the enforcer
    pub fn filters_output(&self) -> bool { self.show && !self.skip_enforce }
}

/// Region wrapper struct name for an input type ("Flavor" gives "RegionFlavor")
pub fn wrapper_name(in_name: &str) -> String { format!("Region{in_name}") }

/// Snake case name of a message, used in generated function names
pub fn message_fn_suffix(name: &str) -> String { pascal_to_snake_case(name) }

/// Dotted field number path of a dotted field name path ("Key.Organization" gives "2.1")
///
/// Names are matched against the declared field names in CamelCase or as written.
pub fn field_id(
    request: &GenerationRequest,
    message: &MessageDefinition,
    path: &str,
) -> Option<String> {
    let mut numbers = Vec::new();
    let mut current = Some(message);
    for segment in path.split('.') {
        let msg = current?;
        let field = msg.fields.iter().find(|f| {
            f.name == segment || crate::utils::snake_to_pascal_case(&f.name) == segment
        })?;
        numbers.push(field.number.to_string());
        current = field.type_name.as_deref().and_then(|t| request.find_message(t));
    }
    Some(numbers.join("."))
}
