#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Code generation for restgate.
//!
//! This crate turns classified gateway methods into Rust source. One run
//! produces exactly one flavor of output, selected by [`GenMode`]: gateway
//! handlers, region wrapper structs, client bindings, test helpers or
//! permission tests. Each flavor is an [`emit::Emitter`]; the driver feeds it
//! services and methods and collects the text in a [`emit::FileOutput`].
//!
//! Reading the request, the registries and writing the final tree are the
//! pipeline's job; this crate only renders text and writes the files it is given.

pub mod args;
pub mod emit;
pub mod fields;
pub mod imports;
pub mod mode;
pub mod paths;
pub mod utils;

use std::fs;
use std::path::Path;
use std::process::Command;

use thiserror::Error;

pub use args::MethodArgs;
pub use emit::routes::emit_route_table;
pub use emit::{Emitter, FileOutput, ServiceScope};
pub use imports::ImportTracker;
pub use mode::{GenMode, ModeFlags};
pub use paths::EmitPaths;

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// Code generated by restgate. DO NOT EDIT.";

/// Error type for code generation operations in this crate.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// A method could not be rendered.
    #[error("failed to render {method}: {reason}")]
    TemplateExecution {
        /// Method being rendered
        method: String,
        /// What was wrong with it
        reason: String,
    },
    /// Formatting error when building generated source.
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
    /// Underlying I/O error while writing files.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenient result type for codegen functions in this crate.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Formats a Rust source file with rustfmt, if it is installed.
///
/// Formatting is best effort: a missing or failing rustfmt leaves the file as written.
pub fn format_with_rustfmt(path: &Path) {
    let status = Command::new("rustfmt").arg("--edition=2021").arg(path).status();
    match status {
        Ok(status) if status.success() => {}
        Ok(status) => tracing::warn!("rustfmt exited with {} for {}", status, path.display()),
        Err(e) => tracing::debug!("rustfmt not run for {}: {}", path.display(), e),
    }
}

/// Trim trailing whitespace from each line and drop trailing blank lines.
/// Always ensures the returned string ends with a single newline when not empty.
pub fn clean_generated_source(src: &str) -> String {
    let mut lines: Vec<&str> = src.lines().map(str::trim_end).collect();

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    }
}

/// Persist a list of generated source files to disk under the given output directory,
/// creating any necessary subdirectories and appending `.rs` if missing.
pub fn write_generated<P: AsRef<Path>>(
    out_dir: P,
    files: &[(String, String)],
    rustfmt: bool,
) -> std::io::Result<()> {
    fs::create_dir_all(&out_dir)?;
    for (name, src) in files {
        let path = if name.ends_with(".rs") {
            out_dir.as_ref().join(name)
        } else {
            out_dir.as_ref().join(format!("{name}.rs"))
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let cleaned = clean_generated_source(src);
        fs::write(&path, cleaned.as_bytes())?;
        tracing::debug!("wrote {}", path.display());
        if rustfmt {
            format_with_rustfmt(&path);
        }
    }
    Ok(())
}

/// `mod.rs` declaring and re-exporting every generated module
pub fn render_mod_rs(files: &[(String, String)]) -> String {
    let mut content = format!("{GENERATED_HEADER}\n\n");
    for (name, _) in files {
        let module_name = name.strip_suffix(".rs").unwrap_or(name);
        if module_name != "mod" {
            content.push_str(&format!("pub mod {module_name};\npub use {module_name}::*;\n"));
        }
    }
    content
}
