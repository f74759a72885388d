//! Client bindings.

use std::fmt::Write as _;

use super::{Emitter, FileOutput};
use crate::args::MethodArgs;
use crate::Result;

/// Emitter for [`crate::GenMode::ClientBinding`]
pub struct ClientEmitter;

impl Emitter for ClientEmitter {
    fn method(&self, args: &MethodArgs, out: &mut FileOutput<'_>) -> Result<()> {
        let paths = out.paths();
        let (api, proto) = (paths.api(), paths.proto());
        out.use_module(&paths.api_module);
        out.use_module(&paths.proto_module);
        out.use_runtime("ApiTransport");
        out.use_runtime("ClientError");

        let (returns, call) = if args.outstream {
            out.use_runtime("call_stream");
            (format!("Vec<{proto}::{}>", args.out_name), "call_stream")
        } else {
            out.use_runtime("call_unary");
            (format!("{proto}::{}", args.out_name), "call_unary")
        };

        writeln!(
            out,
            r#"/// Call `{method}` on the gateway at `uri`.
pub async fn {fn_name}(
    transport: &dyn ApiTransport,
    uri: &str,
    token: &str,
    input: &{api}::{wrapper},
) -> Result<{returns}, ClientError> {{
    {call}(transport, uri, token, "{method}", input).await
}}
"#,
            method = args.method,
            fn_name = args.fn_name,
            wrapper = args.wrapper_name(),
        )?;
        Ok(())
    }
}
