use std::sync::Arc;

use service::catalog::CatalogRepository;

/// Shared handler state. The catalog is a trait object so tests can swap in
/// their own repository.
#[derive(Clone)]
pub struct ServerState {
    pub catalog: Arc<dyn CatalogRepository>,
}

impl ServerState {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }
}
