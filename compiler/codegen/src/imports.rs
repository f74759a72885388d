//! Per-file record of the symbols generated code uses.

use std::collections::{BTreeMap, BTreeSet};

/// Symbols used by one generated file, keyed by the path they are imported from.
///
/// Emitters record what they reference while rendering; the file header is
/// rendered from the record at the end, so every `use` line is needed and
/// none is missing.
#[derive(Debug, Default, Clone)]
pub struct ImportTracker {
    uses: BTreeMap<String, BTreeSet<String>>,
}

impl ImportTracker {
    /// Create an empty tracker
    pub fn new() -> Self { Self::default() }

    /// Record usage of a symbol from a path (e.g., ("restgate_runtime", "GatewayError"))
    pub fn record(&mut self, path: &str, symbol: &str) {
        self.uses.entry(path.to_string()).or_default().insert(symbol.to_string());
    }

    /// Record usage of a module by its local name (e.g., "crate::edgeproto")
    ///
    /// Single segment paths name extern crates, which are in scope already.
    pub fn record_module(&mut self, module_path: &str) {
        if let Some((parent, name)) = module_path.rsplit_once("::") {
            self.record(parent, name);
        }
    }

    /// Get a sorted list of symbols recorded for a path
    pub fn symbols_for(&self, path: &str) -> Vec<String> {
        self.uses.get(path).map(|set| set.iter().cloned().collect()).unwrap_or_default()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool { self.uses.is_empty() }

    /// The `use` lines, sorted by path then symbol
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (path, symbols) in &self.uses {
            let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();
            match symbols.as_slice() {
                [single] => out.push_str(&format!("use {path}::{single};\n")),
                many => out.push_str(&format!("use {path}::{{{}}};\n", many.join(", "))),
            }
        }
        out
    }
}
