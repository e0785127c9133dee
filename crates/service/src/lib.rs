//! Service layer for the product catalog.
//! - `storage` persists collections as a pretty-printed JSON document.
//! - `catalog` holds the product store and its CRUD contract.
//! - Validation rules live in the `models` crate and surface here as `ServiceError`.

pub mod errors;
pub mod storage;
pub mod catalog;
pub mod pagination;
