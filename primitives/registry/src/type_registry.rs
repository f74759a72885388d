//! Exactly-once bookkeeping for region wrapper types.
//!
//! Many methods share one input type, and every one of them would otherwise
//! emit the same `Region<Type>` declaration. The registry is consulted exactly
//! once per annotated method; whichever method reaches it first (in file
//! processing order) emits the wrapper, and the module it was emitted into is
//! remembered so later files can import it from there.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Run-wide, append-only map from input type to the module declaring its wrapper.
///
/// Interior mutability behind a single lock: the registry is shared through an
/// `Arc` with every file-processing unit, and the check-and-insert in
/// [`TypeRegistry::ensure_emitted`] happens under that lock, so two units can
/// never both observe a first sighting of the same type.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    owners: Mutex<BTreeMap<String, String>>,
}

impl TypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self { Self::default() }

    /// Claim `type_name` for `module`; returns `true` only on its first sighting.
    ///
    /// A later claim from another module leaves the first owner in place.
    pub fn ensure_emitted(&self, type_name: &str, module: &str) -> bool {
        let mut owners = self.lock();
        if owners.contains_key(type_name) {
            return false;
        }
        owners.insert(type_name.to_string(), module.to_string());
        tracing::trace!(type_name, module, "claimed region wrapper");
        true
    }

    // The map stays consistent even if a holder panicked: every mutation is a single insert.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.owners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Read-only interface to the [`TypeRegistry`].
pub trait TypeRegistryReader {
    /// Module the wrapper for `type_name` was emitted into, if claimed.
    fn owner_of(&self, type_name: &str) -> Option<String>;

    /// Whether the wrapper for `type_name` has been claimed.
    fn contains(&self, type_name: &str) -> bool { self.owner_of(type_name).is_some() }
}

impl TypeRegistryReader for TypeRegistry {
    fn owner_of(&self, type_name: &str) -> Option<String> { self.lock().get(type_name).cloned() }
}
