use axum::{extract::{rejection::JsonRejection, Path, Query, State}, http::StatusCode, Json};
use models::{NewProduct, Product, ProductPatch};
use serde::Deserialize;
use service::pagination::{parse_int_prefix, Limit};
use tracing::info;

use crate::errors::{ApiError, PRODUCT_NOT_FOUND};
use crate::state::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Keep only the first N products; ignored when not a number.
    pub limit: Option<String>,
}

/// Ids are read by their leading integer (`"1abc"` is 1). Values without
/// one, and negative ones, can never match a product.
fn parse_id(raw: &str) -> Option<u64> {
    parse_int_prefix(raw).and_then(|n| u64::try_from(n).ok())
}

#[utoipa::path(
    get, path = "/products", tag = "products",
    params(ListQuery),
    responses(
        (status = 200, description = "Products in stored order", body = [crate::openapi::ProductDoc]),
        (status = 500, description = "Catalog unavailable", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let limit = Limit::parse(q.limit.as_deref());
    let products = limit.apply(state.catalog.list_all().await?);
    info!(count = products.len(), limit = ?limit.get(), "list products");
    Ok(Json(products))
}

#[utoipa::path(
    get, path = "/products/{id}", tag = "products",
    params(("id" = u64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = crate::openapi::ProductDoc),
        (status = 400, description = "Producto no encontrado", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Catalog unavailable", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let Some(id) = parse_id(&raw_id) else {
        return Err(ApiError::bad_request(PRODUCT_NOT_FOUND));
    };
    match state.catalog.get_by_id(id).await? {
        Some(product) => Ok(Json(product)),
        None => Err(ApiError::bad_request(PRODUCT_NOT_FOUND)),
    }
}

#[utoipa::path(
    post, path = "/products", tag = "products",
    request_body = crate::openapi::NewProductDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 409, description = "Duplicate code", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(input) = payload?;
    info!(code = %input.code, title = %input.title, "product_create_request");
    let product = state.catalog.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put, path = "/products/{id}", tag = "products",
    params(("id" = u64, Path, description = "Product id")),
    request_body = crate::openapi::ProductPatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 409, description = "Duplicate code", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Json(patch) = payload?;
    let Some(id) = parse_id(&raw_id) else {
        return Err(ApiError::not_found(PRODUCT_NOT_FOUND));
    };
    let product = state.catalog.update(id, patch).await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete, path = "/products/{id}", tag = "products",
    params(("id" = u64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Nothing to delete", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let Some(id) = parse_id(&raw_id) else {
        return Err(ApiError::not_found(PRODUCT_NOT_FOUND));
    };
    if state.catalog.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(PRODUCT_NOT_FOUND))
    }
}
