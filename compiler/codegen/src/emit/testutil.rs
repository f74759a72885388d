//! Test request helpers.
//!
//! `test_<method>` wraps a given input in a region and calls the client
//! binding. `test_perm_<method>` builds a default input scoped to an
//! organization, for permission tests that only care about the org.

use std::fmt::Write as _;

use super::{mod_funcs_param, Emitter, FileOutput};
use crate::args::MethodArgs;
use crate::Result;

/// Emitter for [`crate::GenMode::TestUtil`]
pub struct TestUtilEmitter;

impl Emitter for TestUtilEmitter {
    fn method(&self, args: &MethodArgs, out: &mut FileOutput<'_>) -> Result<()> {
        let paths = out.paths();
        let (api, proto, client) = (paths.api(), paths.proto(), paths.client());
        out.use_module(&paths.api_module);
        out.use_module(&paths.proto_module);
        out.use_module(&paths.client_module);
        out.use_runtime("ApiTransport");
        out.use_runtime("ClientError");
        out.use_runtime("ModFn");

        let returns = if args.outstream {
            format!("Vec<{proto}::{}>", args.out_name)
        } else {
            format!("{proto}::{}", args.out_name)
        };
        let in_name = &args.in_name;
        let mod_funcs = mod_funcs_param(proto, in_name);

        writeln!(
            out,
            r#"/// Call `{method}` with `input` in `region`, after applying `mod_funcs` to it.
pub async fn test_{fn_name}(
    transport: &dyn ApiTransport,
    uri: &str,
    token: &str,
    region: &str,
    input: &{proto}::{in_name},
    {mod_funcs},
) -> Result<{returns}, ClientError> {{
    let mut req = {api}::{wrapper} {{
        region: region.to_string(),
        {field}: input.clone(),
    }};
    for f in mod_funcs {{
        f(&mut req.{field});
    }}
    {client}::{fn_name}(transport, uri, token, &req).await
}}
"#,
            method = args.method,
            fn_name = args.fn_name,
            wrapper = args.wrapper_name(),
            field = args.wrapper_field(),
        )?;

        let org_param = if args.org_setter.is_some() { "org" } else { "_org" };
        let mut scoping = String::new();
        if let Some(setter) = &args.org_setter {
            writeln!(scoping, "    input.{setter} = org.to_string();")?;
            if let Some(id) = &args.org_field_id {
                writeln!(scoping, "    input.fields.push(\"{id}\".to_string());")?;
            }
        }
        let input_decl = if scoping.is_empty() { "let input" } else { "let mut input" };

        writeln!(
            out,
            r#"/// Call `{method}` with a default input belonging to `org`.
pub async fn test_perm_{fn_name}(
    transport: &dyn ApiTransport,
    uri: &str,
    token: &str,
    region: &str,
    {org_param}: &str,
    {mod_funcs},
) -> Result<{returns}, ClientError> {{
    {input_decl} = {proto}::{in_name}::default();
{scoping}    test_{fn_name}(transport, uri, token, region, &input, mod_funcs).await
}}
"#,
            method = args.method,
            fn_name = args.fn_name,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use semantics::MethodVerb;

    use super::*;
    use crate::paths::EmitPaths;

    /// Helper function to create arguments for an update method
    fn update_args() -> MethodArgs {
        MethodArgs {
            service: "FlavorApi".to_string(),
            method: "UpdateFlavor".to_string(),
            fn_name: "update_flavor".to_string(),
            in_name: "Flavor".to_string(),
            out_name: "Result".to_string(),
            resource: "flavor".to_string(),
            action: "ActionManage".to_string(),
            org_field: "Key.Organization".to_string(),
            gen_struct: false,
            wrapper_module: None,
            field_ids: Vec::new(),
            outstream: false,
            show: false,
            skip_enforce: false,
            org_expr: "&obj.key.organization".to_string(),
            show_org_expr: "&res.key.organization".to_string(),
            org_setter: Some("key.organization".to_string()),
            requires_org: None,
            has_fields: true,
            set_fields: true,
            org_field_id: Some("2.2".to_string()),
            verb: MethodVerb::Update,
        }
    }

    #[test]
    fn test_perm_helper_scopes_input_to_org() {
        let paths = EmitPaths::default();
        let mut out = FileOutput::new("flavor.proto", &paths);
        TestUtilEmitter.method(&update_args(), &mut out).expect("emit");

        let body = out.body();
        assert!(body.contains("pub async fn test_update_flavor("));
        assert!(body.contains("mctestclient::update_flavor(transport, uri, token, &req).await"));
        assert!(body.contains("let mut input = edgeproto::Flavor::default();"));
        assert!(body.contains("    input.key.organization = org.to_string();"));
        assert!(body.contains(r#"    input.fields.push("2.2".to_string());"#));
    }

    #[test]
    fn test_perm_helper_without_org_field() {
        let paths = EmitPaths::default();
        let mut out = FileOutput::new("flavor.proto", &paths);
        let args = MethodArgs {
            org_setter: None,
            org_field_id: None,
            org_expr: r#""""#.to_string(),
            ..update_args()
        };
        TestUtilEmitter.method(&args, &mut out).expect("emit");

        let body = out.body();
        assert!(body.contains("    _org: &str,"));
        assert!(body.contains("let input = edgeproto::Flavor::default();"));
        assert!(!body.contains("fields.push"));
    }
}
