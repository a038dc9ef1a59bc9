use std::sync::Arc;

use coffeeshop_infra::DrinkStore;

/// Shared handles every endpoint receives.
///
/// Cheap to clone; the store handle is injected at startup instead of living
/// in a global.
#[derive(Clone)]
pub struct AppContext {
    store: Arc<dyn DrinkStore>,
}

impl AppContext {
    pub fn new(store: Arc<dyn DrinkStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn DrinkStore {
        self.store.as_ref()
    }
}
