//! One output file per input file that declares gateway methods.

use codegen::{emit_route_table, FileOutput, MethodArgs, ServiceScope};
use ir::ServiceDefinition;
use registry::TypeRegistryReader;

use super::ModuleGenerator;
use crate::generation_context::GenerationContext;
use crate::PipelineError;

/// Renders the run's mode for every generated file.
pub struct GatewayModuleGenerator;

impl ModuleGenerator for GatewayModuleGenerator {
    fn module_name(&self) -> &str { "gateway" }

    fn generate_files(
        &self,
        ctx: &GenerationContext,
    ) -> Result<Vec<(String, String)>, PipelineError> {
        let methods = semantics::validate_request(&ctx.request)?;
        tracing::debug!("{} gateway methods, mode {}", methods, ctx.mode);

        let emitter = ctx.mode.emitter();
        let mut files = Vec::new();
        let mut route_table_pending = ctx.mode.emits_route_table();

        for file in ctx.request.generated_files().filter(|f| f.has_gateway_methods()) {
            let mut out = FileOutput::new(&file.name, &ctx.paths);
            if route_table_pending {
                emit_route_table(&ctx.routes, &ctx.request, ctx.mode, &mut out)?;
                route_table_pending = false;
            }

            let module = file.module_name();
            for service in file.services.iter().filter(|s| s.has_gateway_methods()) {
                let methods = service_args(ctx, service, &module)?;
                let scope = ServiceScope {
                    name: &service.name,
                    methods: &methods,
                    request: &ctx.request,
                    inputs: &ctx.inputs,
                };
                emitter.begin_service(&scope, &mut out)?;
                for args in &methods {
                    emitter.method(args, &mut out)?;
                }
                emitter.end_service(&scope, &mut out)?;
            }

            logging::trace("PIPELINE", &format!("rendered {}", file.name));
            files.push((format!("{module}.rs"), out.finish()));
        }
        Ok(files)
    }
}

/// Classify the gateway methods of a service and claim wrapper types for them.
///
/// A wrapper claimed by another module is recorded so the file can import it.
fn service_args(
    ctx: &GenerationContext,
    service: &ServiceDefinition,
    module: &str,
) -> Result<Vec<MethodArgs>, PipelineError> {
    service
        .gateway_methods()
        .map(|method| -> Result<MethodArgs, PipelineError> {
            let input = ctx.request.find_message(&method.input_type);
            let classified = semantics::classify(method, input)?;
            let gen_struct = ctx.type_registry.ensure_emitted(&method.input_type, module);
            let mut args = MethodArgs::new(&service.name, &classified, gen_struct, &ctx.request)?;
            if !gen_struct {
                args.wrapper_module =
                    ctx.type_registry.owner_of(&method.input_type).filter(|owner| owner != module);
            }
            Ok(args)
        })
        .collect()
}
