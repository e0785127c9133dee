//! Product catalog backed by a single JSON document.

pub mod repository;
pub mod store;

pub use repository::CatalogRepository;
pub use store::ProductStore;
