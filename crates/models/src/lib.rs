pub mod errors;
pub mod product;

pub use product::{NewProduct, Product, ProductPatch};
