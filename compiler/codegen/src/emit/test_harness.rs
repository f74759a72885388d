//! Permission tests.
//!
//! Each method gets four checks run through the test helpers: forbidden for
//! a foreign org, an expected status, allowed for the caller's org, and an
//! unknown region. Each test eligible input message then gets a permission
//! matrix for two users and two orgs, where each user may touch only their
//! own org's objects and sees only their own org's objects.

use std::fmt::Write as _;

use semantics::{is_test_eligible, sort_create_first};

use super::{mod_funcs_param, Emitter, FileOutput, ServiceScope};
use crate::args::{message_fn_suffix, MethodArgs};
use crate::Result;

/// Region no test environment serves
pub const UNKNOWN_REGION: &str = "nope";

/// Emitter for [`crate::GenMode::TestHarness`]
pub struct TestHarnessEmitter;

impl Emitter for TestHarnessEmitter {
    fn method(&self, args: &MethodArgs, out: &mut FileOutput<'_>) -> Result<()> {
        let paths = out.paths();
        let (proto, testutil) = (paths.proto(), paths.testutil());
        use_test_imports(out);

        let method = &args.method;
        let fn_name = &args.fn_name;
        let mod_funcs = mod_funcs_param(proto, &args.in_name);
        let call = format!("{testutil}::test_perm_{fn_name}");

        writeln!(
            out,
            r#"/// `{method}` on an object of `org` must be forbidden.
pub async fn bad_perm_{fn_name}(
    transport: &dyn ApiTransport,
    uri: &str,
    token: &str,
    region: &str,
    org: &str,
    {mod_funcs},
) {{
    let res = {call}(transport, uri, token, region, org, mod_funcs).await;
    let Err(err) = res else {{
        panic!("{method} for org {{org}} should be forbidden");
    }};
    assert!(err.to_string().contains("Forbidden"), "{method}: {{err}}");
    assert_eq!(err.status(), 403, "{method}: {{err}}");
}}

/// `{method}` on an object of `org` must fail with `status`.
pub async fn bad_{fn_name}(
    transport: &dyn ApiTransport,
    uri: &str,
    token: &str,
    region: &str,
    org: &str,
    status: u16,
    {mod_funcs},
) {{
    let res = {call}(transport, uri, token, region, org, mod_funcs).await;
    let Err(err) = res else {{
        panic!("{method} for org {{org}} should fail");
    }};
    assert_eq!(err.status(), status, "{method}: {{err}}");
}}

/// `{method}` on an object of `org` must succeed.
pub async fn good_perm_{fn_name}(
    transport: &dyn ApiTransport,
    uri: &str,
    token: &str,
    region: &str,
    org: &str,
    {mod_funcs},
) {{
    if let Err(err) = {call}(transport, uri, token, region, org, mod_funcs).await {{
        panic!("{method} for org {{org}}: {{err}}");
    }}
}}

/// `{method}` in an unknown region must fail.
pub async fn bad_region_{fn_name}(
    transport: &dyn ApiTransport,
    uri: &str,
    token: &str,
    org: &str,
    {mod_funcs},
) {{
    let res = {call}(transport, uri, token, "{UNKNOWN_REGION}", org, mod_funcs).await;
    let Err(err) = res else {{
        panic!("{method} in region {UNKNOWN_REGION} should fail");
    }};
    if err.to_string() == "Forbidden" {{
        assert_eq!(err.status(), 403, "{method}: {{err}}");
    }} else {{
        assert!(err.to_string().contains("\"{UNKNOWN_REGION}\" not found"), "{method}: {{err}}");
        assert_eq!(err.status(), 400, "{method}: {{err}}");
    }}
}}
"#
        )?;
        Ok(())
    }

    fn end_service(&self, scope: &ServiceScope<'_>, out: &mut FileOutput<'_>) -> Result<()> {
        for group in plan_message_tests(scope) {
            emit_message_tests(&group, out)?;
        }
        Ok(())
    }
}

/// Permission matrix inputs for one message of one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTestGroup<'a> {
    /// Input message name
    pub message: String,
    /// Function name suffix, prefixed by the service when the message is shared
    pub suffix: String,
    /// Methods checked on the input, creates first and deletes last
    pub no_show: Vec<&'a MethodArgs>,
    /// Streaming view methods
    pub show: Vec<&'a MethodArgs>,
}

/// Group the methods of a service by test eligible input message.
pub fn plan_message_tests<'a>(scope: &ServiceScope<'a>) -> Vec<MessageTestGroup<'a>> {
    let mut groups: Vec<MessageTestGroup<'a>> = Vec::new();
    for args in scope.methods {
        let eligible = scope.inputs.is_input(&args.in_name)
            && scope.request.find_message(&args.in_name).is_some_and(is_test_eligible);
        if !eligible {
            continue;
        }
        let index = match groups.iter().position(|g| g.message == args.in_name) {
            Some(index) => index,
            None => {
                let suffix = if scope.inputs.is_shared(&args.in_name) {
                    message_fn_suffix(&format!("{}{}", scope.name, args.in_name))
                } else {
                    message_fn_suffix(&args.in_name)
                };
                groups.push(MessageTestGroup {
                    message: args.in_name.clone(),
                    suffix,
                    no_show: Vec::new(),
                    show: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[index];
        if args.show {
            group.show.push(args);
        } else {
            group.no_show.push(args);
        }
    }
    for group in &mut groups {
        sort_create_first(&mut group.no_show, |args| args.method.as_str());
    }
    groups
}

fn use_test_imports(out: &mut FileOutput<'_>) {
    let paths = out.paths();
    out.use_module(&paths.proto_module);
    out.use_module(&paths.testutil_module);
    out.use_runtime("ApiTransport");
    out.use_runtime("ModFn");
}

fn emit_message_tests(group: &MessageTestGroup<'_>, out: &mut FileOutput<'_>) -> Result<()> {
    if group.no_show.is_empty() && group.show.is_empty() {
        return Ok(());
    }
    use_test_imports(out);
    let paths = out.paths();
    let (proto, testutil) = (paths.proto(), paths.testutil());
    let suffix = &group.suffix;
    let message = &group.message;
    let mod_funcs = mod_funcs_param(proto, message);

    if !group.no_show.is_empty() {
        writeln!(
            out,
            r#"/// The caller must not modify objects of `org`, an organization it has no permissions for.
pub async fn bad_perm_test_{suffix}(
    transport: &dyn ApiTransport,
    uri: &str,
    token: &str,
    region: &str,
    org: &str,
    {mod_funcs},
) {{"#
        )?;
        for args in &group.no_show {
            writeln!(
                out,
                "    bad_perm_{}(transport, uri, token, region, org, mod_funcs).await;",
                args.fn_name
            )?;
        }
        writeln!(out, "}}\n")?;
    }

    if !group.show.is_empty() {
        writeln!(
            out,
            r#"/// Showing objects of `org` is allowed but returns nothing.
pub async fn bad_perm_test_show_{suffix}(
    transport: &dyn ApiTransport,
    uri: &str,
    token: &str,
    region: &str,
    org: &str,
) {{"#
        )?;
        emit_show_checks(group, testutil, "0", false, out)?;
        writeln!(out, "}}\n")?;
    }

    let mod_funcs_name = if group.no_show.is_empty() { "_mod_funcs" } else { "mod_funcs" };
    let showcount = if group.show.is_empty() { "_showcount" } else { "showcount" };
    writeln!(
        out,
        r#"/// The caller may modify objects of `org`, an organization it has permissions for.
pub async fn good_perm_test_{suffix}(
    transport: &dyn ApiTransport,
    uri: &str,
    token: &str,
    region: &str,
    org: &str,
    {showcount}: usize,
    {mod_funcs_typed},
) {{"#,
        mod_funcs_typed = mod_funcs.replacen("mod_funcs", mod_funcs_name, 1),
    )?;
    for args in &group.no_show {
        writeln!(
            out,
            "    good_perm_{}(transport, uri, token, region, org, mod_funcs).await;",
            args.fn_name
        )?;
    }
    if !group.show.is_empty() {
        writeln!(
            out,
            "    good_perm_test_show_{suffix}(transport, uri, token, region, org, showcount).await;"
        )?;
    }
    for args in &group.no_show {
        writeln!(out, "    bad_region_{}(transport, uri, token, org, mod_funcs).await;", args.fn_name)?;
    }
    writeln!(out, "}}\n")?;

    if !group.show.is_empty() {
        writeln!(
            out,
            r#"/// Showing objects of `org` returns `count` of them.
pub async fn good_perm_test_show_{suffix}(
    transport: &dyn ApiTransport,
    uri: &str,
    token: &str,
    region: &str,
    org: &str,
    count: usize,
) {{"#
        )?;
        emit_show_checks(group, testutil, "count", true, out)?;
        writeln!(out, "}}\n")?;
    }

    writeln!(
        out,
        r#"/// Users of `token1` and `token2` may modify the objects of `org1` and `org2`
/// respectively, and not each other's.
#[allow(clippy::too_many_arguments)]
pub async fn perm_test_{suffix}(
    transport: &dyn ApiTransport,
    uri: &str,
    token1: &str,
    token2: &str,
    region: &str,
    org1: &str,
    org2: &str,
    showcount: usize,
    {mod_funcs},
) {{"#
    )?;
    if !group.no_show.is_empty() {
        writeln!(
            out,
            "    bad_perm_test_{suffix}(transport, uri, token1, region, org2, mod_funcs).await;\n    bad_perm_test_{suffix}(transport, uri, token2, region, org1, mod_funcs).await;"
        )?;
    }
    if !group.show.is_empty() {
        writeln!(
            out,
            "    bad_perm_test_show_{suffix}(transport, uri, token1, region, org2).await;\n    bad_perm_test_show_{suffix}(transport, uri, token2, region, org1).await;"
        )?;
    }
    writeln!(
        out,
        "    good_perm_test_{suffix}(transport, uri, token1, region, org1, showcount, mod_funcs).await;\n    good_perm_test_{suffix}(transport, uri, token2, region, org2, showcount, mod_funcs).await;\n}}\n"
    )?;
    Ok(())
}

fn emit_show_checks(
    group: &MessageTestGroup<'_>,
    testutil: &str,
    count: &str,
    check_region: bool,
    out: &mut FileOutput<'_>,
) -> Result<()> {
    for (i, args) in group.show.iter().enumerate() {
        writeln!(
            out,
            r#"    let list{i} = match {testutil}::test_perm_{fn_name}(transport, uri, token, region, org, &[]).await {{
        Ok(list) => list,
        Err(err) => panic!("{method} for org {{org}}: {{err}}"),
    }};
    assert_eq!(list{i}.len(), {count}, "{method} for org {{org}}");"#,
            fn_name = args.fn_name,
            method = args.method,
        )?;
        if check_region {
            writeln!(out, "    bad_region_{}(transport, uri, token, org, &[]).await;", args.fn_name)?;
        }
    }
    Ok(())
}
