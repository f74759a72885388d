//! Gateway handlers and backend traits.
//!
//! For a method `UpdateFlavor(Flavor) returns (Result)` annotated
//! `flavor,ActionManage,Key.Organization` the handler reads:
//!
//! ```text
//! pub async fn update_flavor<B>(backend: &B, enforcer: &dyn Enforcer, mut rc: RegionContext,
//!     body: &[u8], sink: &mut dyn ResponseSink) -> Result<(), GatewayError>
//! where B: FlavorApi + ?Sized {
//!     let input: ormapi::RegionFlavor = decode_request(body)?;
//!     rc.region = input.region.clone();
//!     let obj = &input.flavor;
//!     if !rc.skip_authz {
//!         if !enforcer.enforce(&rc.username, &obj.key.organization, "flavor", "ActionManage") {
//!             return Err(GatewayError::Forbidden);
//!         }
//!     }
//!     let resp = backend.update_flavor(&rc, obj).await?;
//!     reply_json(sink, &resp)
//! }
//! ```
//!
//! Streaming view methods check each item instead of the input. Update
//! methods whose input carries a `fields` list fill it from the keys present
//! in the body before the backend is called.

use std::fmt::Write as _;

use super::{Emitter, FileOutput, ServiceScope};
use crate::args::MethodArgs;
use crate::Result;

/// Emitter for [`crate::GenMode::ServerGateway`]
pub struct GatewayEmitter;

impl Emitter for GatewayEmitter {
    fn begin_service(&self, scope: &ServiceScope<'_>, out: &mut FileOutput<'_>) -> Result<()> {
        let paths = out.paths();
        let proto = paths.proto();
        out.use_module(&paths.proto_module);
        out.use_runtime("async_trait");
        out.use_runtime("GatewayError");
        out.use_runtime("RegionContext");

        writeln!(
            out,
            "/// Backend of the `{name}` service.\n#[async_trait]\npub trait {name}: Send + Sync {{",
            name = scope.name
        )?;
        for args in scope.methods {
            let returns = if args.outstream {
                out.use_runtime("BackendStream");
                format!("BackendStream<{proto}::{}>", args.out_name)
            } else {
                format!("{proto}::{}", args.out_name)
            };
            writeln!(
                out,
                "    /// `{method}`\n    async fn {fn_name}(&self, rc: &RegionContext, obj: &{proto}::{in_name}) -> Result<{returns}, GatewayError>;",
                method = args.method,
                fn_name = args.fn_name,
                in_name = args.in_name,
            )?;
        }
        writeln!(out, "}}\n")?;
        Ok(())
    }

    fn method(&self, args: &MethodArgs, out: &mut FileOutput<'_>) -> Result<()> {
        let paths = out.paths();
        let api = paths.api().to_string();
        out.use_module(&paths.api_module);
        out.use_module(&paths.proto_module);
        out.use_runtime("decode_request");
        out.use_runtime("GatewayError");
        out.use_runtime("RegionContext");
        out.use_runtime("Enforcer");
        out.use_runtime("ResponseSink");

        let enforcer = if args.enforces_input() || args.filters_output() {
            "enforcer"
        } else {
            "_enforcer"
        };
        let sets_fields = args.set_fields && !args.field_ids.is_empty();
        if sets_fields {
            emit_field_ids(args, out)?;
        }
        writeln!(
            out,
            r#"/// Handle `{method}`.
pub async fn {fn_name}<B>(
    backend: &B,
    {enforcer}: &dyn Enforcer,
    mut rc: RegionContext,
    body: &[u8],
    sink: &mut dyn ResponseSink,
) -> Result<(), GatewayError>
where
    B: {service} + ?Sized,
{{
    let {binding}: {api}::{wrapper} = decode_request(body)?;
    rc.region = input.region.clone();"#,
            method = args.method,
            fn_name = args.fn_name,
            service = args.service,
            binding = if sets_fields { "mut input" } else { "input" },
            wrapper = args.wrapper_name(),
        )?;
        if sets_fields {
            out.use_runtime("set_region_obj_fields");
            writeln!(out, "    set_region_obj_fields(body, &mut input, {})?;", field_ids_const(args))?;
        }
        writeln!(out, "    let obj = &input.{};", args.wrapper_field())?;

        if args.enforces_input() {
            emit_input_check(args, out)?;
        }

        if args.outstream {
            out.use_runtime("serve_stream");
            let proto = paths.proto();
            let allow = if args.filters_output() {
                format!(
                    r#"rc.skip_authz || enforcer.enforce(&rc.username, {org}, "{resource}", "{action}")"#,
                    org = args.show_org_expr,
                    resource = args.resource,
                    action = args.action,
                )
            } else {
                "true".to_string()
            };
            let res = if args.filters_output() && args.org_setter.is_some() { "res" } else { "_res" };
            writeln!(
                out,
                "    serve_stream(sink, backend.{fn_name}(&rc, obj).await, |{res}: &{proto}::{out_name}| {{\n        {allow}\n    }})\n    .await\n}}\n",
                fn_name = args.fn_name,
                out_name = args.out_name,
            )?;
        } else {
            out.use_runtime("reply_json");
            writeln!(
                out,
                "    let resp = backend.{fn_name}(&rc, obj).await?;\n    reply_json(sink, &resp)\n}}\n",
                fn_name = args.fn_name,
            )?;
        }
        Ok(())
    }
}

fn field_ids_const(args: &MethodArgs) -> String {
    format!("{}_FIELD_IDS", args.fn_name.trim_start_matches("r#").to_uppercase())
}

/// The (JSON path, field id) table an update handler derives its field mask from.
fn emit_field_ids(args: &MethodArgs, out: &mut FileOutput<'_>) -> Result<()> {
    writeln!(
        out,
        "/// Settable fields of `{in_name}` by JSON path, for `{method}`.\nconst {name}: &[(&str, &str)] = &[",
        in_name = args.in_name,
        method = args.method,
        name = field_ids_const(args),
    )?;
    for (path, id) in &args.field_ids {
        writeln!(out, "    (\"{path}\", \"{id}\"),")?;
    }
    writeln!(out, "];\n")?;
    Ok(())
}

fn emit_input_check(args: &MethodArgs, out: &mut FileOutput<'_>) -> Result<()> {
    writeln!(out, "    if !rc.skip_authz {{")?;
    if let Some(org) = &args.requires_org {
        writeln!(
            out,
            "        if !enforcer.org_exists(&obj.{org}) {{\n            return Err(GatewayError::OrgNotFound(obj.{org}.to_string()));\n        }}"
        )?;
    }
    writeln!(
        out,
        r#"        if !enforcer.enforce(&rc.username, {org}, "{resource}", "{action}") {{
            return Err(GatewayError::Forbidden);
        }}
    }}"#,
        org = args.org_expr,
        resource = args.resource,
        action = args.action,
    )?;
    Ok(())
}
