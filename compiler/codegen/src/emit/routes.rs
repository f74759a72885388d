//! The controller route table and the server dispatcher.
//!
//! Both list every gateway method of the run, so they are rendered once,
//! into the first generated file.

use std::fmt::Write as _;

use ir::{GenerationRequest, MessageDefinition};
use registry::{RouteEntry, RouteTable};

use super::FileOutput;
use crate::fields::field_paths;
use crate::mode::GenMode;
use crate::utils::rust_ident;
use crate::Result;

/// Render the route table, and the dispatcher in server mode.
pub fn emit_route_table(
    table: &RouteTable,
    request: &GenerationRequest,
    mode: GenMode,
    out: &mut FileOutput<'_>,
) -> Result<()> {
    if !mode.emits_route_table() || table.is_empty() {
        return Ok(());
    }
    out.use_runtime("ControllerRoute");

    writeln!(out, "/// Every controller route served by the gateway.\npub const CONTROLLER_ROUTES: &[ControllerRoute] = &[")?;
    for entry in table.entries() {
        for line in swagger_doc(entry, request) {
            if line.is_empty() {
                writeln!(out, "    //")?;
            } else {
                writeln!(out, "    // {line}")?;
            }
        }
        writeln!(
            out,
            "    ControllerRoute {{\n        service: \"{service}\",\n        method: \"{method}\",\n        path: \"{path}\",\n        input: \"{input}\",\n        streaming: {streaming},\n    }},",
            service = entry.service,
            method = entry.method,
            path = entry.path(),
            input = entry.input_type,
            streaming = entry.streaming,
        )?;
    }
    writeln!(out, "];\n")?;

    if mode.emits_dispatch() {
        emit_dispatch(table, out)?;
    }
    Ok(())
}

fn emit_dispatch(table: &RouteTable, out: &mut FileOutput<'_>) -> Result<()> {
    out.use_runtime("Enforcer");
    out.use_runtime("GatewayError");
    out.use_runtime("RegionContext");
    out.use_runtime("ResponseSink");

    let bounds: Vec<String> =
        table.services().iter().map(|(module, service)| format!("super::{module}::{service}")).collect();
    writeln!(
        out,
        r#"/// Serve the request for `path` with the handler of its method.
pub async fn dispatch<B>(
    path: &str,
    backend: &B,
    enforcer: &dyn Enforcer,
    rc: RegionContext,
    body: &[u8],
    sink: &mut dyn ResponseSink,
) -> Result<(), GatewayError>
where
    B: {bounds} + ?Sized,
{{
    match path {{"#,
        bounds = bounds.join(" + "),
    )?;
    for entry in table.entries() {
        writeln!(
            out,
            "        \"{path}\" => super::{module}::{fn_name}(backend, enforcer, rc, body, sink).await,",
            path = entry.path(),
            module = entry.module,
            fn_name = rust_ident(&entry.method),
        )?;
    }
    writeln!(out, "        _ => Err(GatewayError::NotFound(path.to_string())),\n    }}\n}}\n")?;
    Ok(())
}

/// Swagger comment lines of one route, without the comment marker.
pub fn swagger_doc(entry: &RouteEntry, request: &GenerationRequest) -> Vec<String> {
    let mut lines = vec![format!(
        "swagger:route POST {} {} {}",
        entry.path(),
        entry.input_type,
        entry.method
    )];

    let summary = entry.summary.as_deref().map(|s| s.replace(['\r', '\n'], " ")).unwrap_or_default();
    let summary = summary.trim();
    if !summary.is_empty() {
        match summary.split_once('.') {
            Some((first, rest)) => {
                lines.push(format!("{}.", first.trim()));
                if !rest.trim().is_empty() {
                    lines.push(rest.trim().to_string());
                }
            }
            None => lines.push(format!("{summary}.")),
        }
    }

    if entry.method.starts_with("Update") {
        lines.push(format!(
            "The following values should be added to `{}.fields` field array to specify which fields will be updated.",
            entry.input_type
        ));
        lines.push("```".to_string());
        if let Some(message) = request.find_message(&entry.input_type) {
            lines.extend(update_field_listing(request, message));
        }
        lines.push("```".to_string());
    }

    lines.extend(
        [
            "Security:",
            "  Bearer:",
            "responses:",
            "  200: success",
            "  400: badRequest",
            "  403: forbidden",
            "  404: notFound",
        ]
        .map(str::to_string),
    );
    lines
}

/// Every field reachable from `message` as `<CamelPath>: <number.path>`.
pub fn update_field_listing(request: &GenerationRequest, message: &MessageDefinition) -> Vec<String> {
    field_paths(request, message).into_iter().map(|p| format!("{}: {}", p.name, p.id)).collect()
}
