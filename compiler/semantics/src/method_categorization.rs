//! Method categorization by verb
//!
//! Gateway methods follow a `<Verb><Type>` naming convention. The verb decides
//! whether a method can be a filtered show and where it runs in generated
//! permission tests.

/// Verb a method name starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodVerb {
    /// `Create*`
    Create,
    /// `Update*`
    Update,
    /// `Delete*`
    Delete,
    /// `Show*`
    Show,
    /// Anything else (`Refresh*`, `Inject*`, ...)
    Other,
}

impl MethodVerb {
    /// Verb of a method name, matched on its leading camel case word
    pub fn of(method_name: &str) -> Self {
        match camel_case_prefix(method_name) {
            "Create" => MethodVerb::Create,
            "Update" => MethodVerb::Update,
            "Delete" => MethodVerb::Delete,
            "Show" => MethodVerb::Show,
            _ => MethodVerb::Other,
        }
    }

    /// Position in a mutation sequence: creates run first, deletes last
    pub fn run_order(&self) -> u8 {
        match self {
            MethodVerb::Create => 0,
            MethodVerb::Delete => 2,
            _ => 1,
        }
    }
}

/// Leading camel case word of a name ("CreateFlavor" gives "Create")
pub fn camel_case_prefix(name: &str) -> &str {
    let end = name
        .char_indices()
        .skip(1)
        .find(|(_, c)| c.is_ascii_uppercase())
        .map(|(i, _)| i)
        .unwrap_or(name.len());
    &name[..end]
}

/// Sort so that creates come first and deletes last, keeping the relative order of the rest
pub fn sort_create_first<T>(items: &mut [T], name: impl Fn(&T) -> &str) {
    items.sort_by_key(|item| MethodVerb::of(name(item)).run_order());
}
