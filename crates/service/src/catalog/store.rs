use std::{path::PathBuf, sync::Arc};

use models::{NewProduct, Product, ProductPatch};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::catalog::repository::CatalogRepository;
use crate::errors::ServiceError;
use crate::storage::JsonDocument;

struct Snapshot {
    products: Vec<Product>,
    next_id: u64,
}

fn next_id_after(products: &[Product]) -> u64 {
    products.iter().map(|p| p.id).max().map_or(1, |max| max + 1)
}

/// File-backed product store.
///
/// Every operation is one load -> mutate -> save round trip against the
/// backing document. The lock only guards the in-memory snapshot between
/// steps, so two concurrent writers can both start from the same snapshot
/// and the later save wins.
pub struct ProductStore {
    snapshot: RwLock<Snapshot>,
    document: JsonDocument<Product>,
}

impl ProductStore {
    /// Open the store on `path`, seeding the snapshot and id counter from the
    /// document if it already holds products.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let document = JsonDocument::new(path);
        document.ensure_parent().await?;
        let products = document.load().await?;
        let next_id = next_id_after(&products);
        info!(path = %document.path().display(), count = products.len(), next_id, "product store opened");
        Ok(Arc::new(Self {
            snapshot: RwLock::new(Snapshot { products, next_id }),
            document,
        }))
    }

    /// Read the backing document without touching the snapshot.
    pub async fn load(&self) -> Result<Vec<Product>, ServiceError> {
        self.document.load().await
    }

    /// Persist the current in-memory collection.
    pub async fn save(&self) -> Result<(), ServiceError> {
        let products = self.snapshot.read().await.products.clone();
        self.document.save(&products).await
    }

    /// Persist an explicit collection, leaving the snapshot as is.
    pub async fn save_products(&self, products: &[Product]) -> Result<(), ServiceError> {
        self.document.save(products).await
    }

    async fn reload(&self) -> Result<Vec<Product>, ServiceError> {
        let products = self.document.load().await?;
        let mut snap = self.snapshot.write().await;
        snap.next_id = snap.next_id.max(next_id_after(&products));
        snap.products = products.clone();
        Ok(products)
    }

    async fn commit(&self, products: Vec<Product>) -> Result<(), ServiceError> {
        self.snapshot.write().await.products = products.clone();
        self.document.save(&products).await
    }

    /// Validate, reject duplicate codes among the in-memory products, assign
    /// the next id, append and persist.
    pub async fn create(&self, input: NewProduct) -> Result<Product, ServiceError> {
        input.validate()?;
        let (product, products) = {
            let mut snap = self.snapshot.write().await;
            if snap.products.iter().any(|p| p.code == input.code) {
                warn!(code = %input.code, "duplicate product code");
                return Err(ServiceError::duplicate_code(&input.code));
            }
            let id = snap.next_id;
            snap.next_id += 1;
            let product = input.into_product(id);
            snap.products.push(product.clone());
            (product, snap.products.clone())
        };
        if let Err(e) = self.document.save(&products).await {
            // the record never reached the document; drop it and free its id
            let mut snap = self.snapshot.write().await;
            snap.products.retain(|p| p.id != product.id);
            if snap.next_id == product.id + 1 {
                snap.next_id = product.id;
            }
            return Err(e);
        }
        info!(id = product.id, code = %product.code, "product created");
        Ok(product)
    }

    /// All products in stored order.
    pub async fn list_all(&self) -> Result<Vec<Product>, ServiceError> {
        self.reload().await
    }

    pub async fn get_by_id(&self, id: u64) -> Result<Option<Product>, ServiceError> {
        let products = self.reload().await?;
        Ok(products.into_iter().find(|p| p.id == id))
    }

    /// Merge `patch` into the product with `id` and persist.
    pub async fn update(&self, id: u64, patch: ProductPatch) -> Result<Product, ServiceError> {
        let mut products = self.reload().await?;
        let idx = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ServiceError::not_found(&format!("product {id}")))?;
        patch.validate()?;
        if let Some(code) = &patch.code {
            if products.iter().any(|p| p.id != id && &p.code == code) {
                warn!(id, code = %code, "duplicate product code on update");
                return Err(ServiceError::duplicate_code(code));
            }
        }
        let product = &mut products[idx];
        product.apply(patch);
        let updated = product.clone();
        self.commit(products).await?;
        info!(id, "product updated");
        Ok(updated)
    }

    /// Remove the first product with `id`. Returns `false` when there was
    /// nothing to delete; the document is left untouched in that case.
    pub async fn delete(&self, id: u64) -> Result<bool, ServiceError> {
        let mut products = self.reload().await?;
        let Some(idx) = products.iter().position(|p| p.id == id) else {
            warn!(id, "nothing to delete");
            return Ok(false);
        };
        products.remove(idx);
        self.commit(products).await?;
        info!(id, "product deleted");
        Ok(true)
    }
}

#[async_trait::async_trait]
impl CatalogRepository for ProductStore {
    async fn create(&self, input: NewProduct) -> Result<Product, ServiceError> { self.create(input).await }
    async fn list_all(&self) -> Result<Vec<Product>, ServiceError> { self.list_all().await }
    async fn get_by_id(&self, id: u64) -> Result<Option<Product>, ServiceError> { self.get_by_id(id).await }
    async fn update(&self, id: u64, patch: ProductPatch) -> Result<Product, ServiceError> { self.update(id, patch).await }
    async fn delete(&self, id: u64) -> Result<bool, ServiceError> { self.delete(id).await }
}
