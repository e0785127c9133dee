use async_trait::async_trait;
use models::{NewProduct, Product, ProductPatch};

use crate::errors::ServiceError;

/// Trait abstraction for catalog storage, consumed by the HTTP layer.
/// "Not found" is a `None`/`false` result for lookups and deletes, and an
/// error only for updates.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn create(&self, input: NewProduct) -> Result<Product, ServiceError>;
    async fn list_all(&self) -> Result<Vec<Product>, ServiceError>;
    async fn get_by_id(&self, id: u64) -> Result<Option<Product>, ServiceError>;
    async fn update(&self, id: u64, patch: ProductPatch) -> Result<Product, ServiceError>;
    async fn delete(&self, id: u64) -> Result<bool, ServiceError>;
}
