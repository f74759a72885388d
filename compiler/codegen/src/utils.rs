// codegen/src/utils.rs

use ir::RUST_KEYWORDS;

/// Converts a PascalCase string to snake_case
///
/// Runs of capitals are kept together, so acronyms read naturally.
///
/// # Examples
/// ```
/// use restgate_codegen::utils::pascal_to_snake_case;
/// assert_eq!(pascal_to_snake_case("CreateFlavor"), "create_flavor");
/// assert_eq!(pascal_to_snake_case("ShowAppInst"), "show_app_inst");
/// assert_eq!(pascal_to_snake_case("GPUDriver"), "gpu_driver");
/// assert_eq!(pascal_to_snake_case("Organization"), "organization");
/// ```
pub fn pascal_to_snake_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut result = String::with_capacity(input.len() + 4);

    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                result.push('_');
            }
        }
        result.extend(c.to_lowercase());
    }

    result
}

/// Convert snake_case to PascalCase
pub fn snake_to_pascal_case(s: &str) -> String { s.split('_').map(capitalize).collect() }

/// Capitalize the first letter of a string
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Sanitizes external identifiers (message, field and method names) to be valid Rust identifiers
pub fn sanitize_external_identifier(name: &str) -> String {
    let sanitized: String = name
        .replace('-', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    match sanitized.as_str() {
        "self" | "super" | "crate" | "Self" => format!("{sanitized}_"),
        s if RUST_KEYWORDS.contains(&s) => format!("r#{s}"),
        _ => sanitized,
    }
}

/// Rust function or field name for a declared name
pub fn rust_ident(name: &str) -> String { sanitize_external_identifier(&pascal_to_snake_case(name)) }

/// Rust field access path for a dotted field path ("Key.Organization" gives "key.organization")
pub fn rust_field_path(path: &str) -> String {
    path.split('.').map(rust_ident).collect::<Vec<_>>().join(".")
}

/// Last segment of a module path ("crate::edgeproto" gives "edgeproto")
pub fn module_local_name(path: &str) -> &str { path.rsplit("::").next().unwrap_or(path) }
