//! Application state management

use domain_products::InMemoryProductRepository;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub products: InMemoryProductRepository,
}
