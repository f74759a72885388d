//! Region wrapper structs.
//!
//! Every input type gets one `Region<Type>` struct for the whole run, emitted
//! next to the first method that uses it. Each method also gets a request
//! alias naming its wrapper; a file reusing a wrapper declared by an earlier
//! file imports it from that file's module.

use std::fmt::Write as _;

use super::{Emitter, FileOutput};
use crate::args::MethodArgs;
use crate::Result;

/// Emitter for [`crate::GenMode::ApiStructOnly`]
pub struct ApiEmitter;

impl Emitter for ApiEmitter {
    fn method(&self, args: &MethodArgs, out: &mut FileOutput<'_>) -> Result<()> {
        if args.gen_struct {
            emit_wrapper(args, out)?;
        } else if let Some(owner) = &args.wrapper_module {
            out.use_symbol(&format!("super::{owner}"), &args.wrapper_name());
        }
        writeln!(
            out,
            "/// Request body of `{method}`.\npub type {method}Request = {wrapper};\n",
            method = args.method,
            wrapper = args.wrapper_name(),
        )?;
        Ok(())
    }
}

fn emit_wrapper(args: &MethodArgs, out: &mut FileOutput<'_>) -> Result<()> {
    let paths = out.paths();
    let proto = paths.proto().to_string();
    out.use_module(&paths.proto_module);
    out.use_symbol("serde", "Deserialize");
    out.use_symbol("serde", "Serialize");
    out.use_runtime("RegionObj");

    let wrapper = args.wrapper_name();
    let field = args.wrapper_field();
    let in_name = &args.in_name;

    writeln!(
        out,
        r#"/// `{in_name}` addressed to a region.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct {wrapper} {{
    /// Region name
    #[serde(rename = "Region")]
    pub region: String,
    /// {in_name} in region
    #[serde(rename = "{in_name}")]
    pub {field}: {proto}::{in_name},
}}

impl RegionObj for {wrapper} {{
    type Obj = {proto}::{in_name};

    fn region(&self) -> &str {{ &self.region }}

    fn set_region(&mut self, region: &str) {{ self.region = region.to_string(); }}

    fn obj(&self) -> &Self::Obj {{ &self.{field} }}

    fn obj_mut(&mut self) -> &mut Self::Obj {{ &mut self.{field} }}

    fn obj_name(&self) -> &'static str {{ "{in_name}" }}
}}
"#
    )?;

    if args.has_fields {
        out.use_runtime("RegionObjFields");
        writeln!(
            out,
            r#"impl RegionObjFields for {wrapper} {{
    fn obj_fields(&self) -> &[String] {{ &self.{field}.fields }}

    fn set_obj_fields(&mut self, fields: Vec<String>) {{ self.{field}.fields = fields; }}
}}
"#
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use semantics::MethodVerb;

    use super::*;
    use crate::paths::EmitPaths;

    /// Helper function to create arguments for a Widget method
    fn widget_args(method: &str, gen_struct: bool, wrapper_module: Option<&str>) -> MethodArgs {
        MethodArgs {
            service: "WidgetApi".to_string(),
            method: method.to_string(),
            fn_name: crate::utils::rust_ident(method),
            in_name: "Widget".to_string(),
            out_name: "Result".to_string(),
            resource: "widget".to_string(),
            action: "ActionManage".to_string(),
            org_field: "Key.Organization".to_string(),
            gen_struct,
            wrapper_module: wrapper_module.map(str::to_string),
            field_ids: Vec::new(),
            outstream: false,
            show: false,
            skip_enforce: false,
            org_expr: "&obj.key.organization".to_string(),
            show_org_expr: "&res.key.organization".to_string(),
            org_setter: Some("key.organization".to_string()),
            requires_org: None,
            has_fields: true,
            set_fields: false,
            org_field_id: None,
            verb: MethodVerb::Create,
        }
    }

    #[test]
    fn test_first_use_declares_wrapper() {
        let paths = EmitPaths::default();
        let mut out = FileOutput::new("widget.proto", &paths);
        ApiEmitter.method(&widget_args("CreateWidget", true, None), &mut out).expect("emit");

        let text = out.finish();
        assert!(text.contains("pub struct RegionWidget {"));
        assert!(text.contains("impl RegionObjFields for RegionWidget {"));
        assert!(text.contains("pub type CreateWidgetRequest = RegionWidget;"));
        assert!(!text.contains("use super::"));
    }

    #[test]
    fn test_reuse_imports_wrapper_from_owner() {
        let paths = EmitPaths::default();
        let mut out = FileOutput::new("admin.proto", &paths);
        ApiEmitter.method(&widget_args("InjectWidget", false, Some("widget")), &mut out).expect("emit");

        let text = out.finish();
        assert!(text.contains("use super::widget::RegionWidget;"));
        assert!(text.contains("pub type InjectWidgetRequest = RegionWidget;"));
        assert!(!text.contains("pub struct RegionWidget"));
    }
}
