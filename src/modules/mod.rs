pub mod books;

use shelf_kernel::ModuleRegistry;

use books::SharedBookStore;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: SharedBookStore) {
    registry.register(books::create_module(store));
}
