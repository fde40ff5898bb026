pub mod tutorials;

use std::sync::Arc;

use primer_kernel::ModuleRegistry;
use primer_store::MemoryStore;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry) {
    // Explicit construction: the store is built here and handed to the
    // module, which passes it to its handlers as router state.
    let store = Arc::new(MemoryStore::new());
    registry.register(tutorials::create_module(store));
}
