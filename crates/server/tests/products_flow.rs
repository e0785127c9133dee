use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use models::{NewProduct, Product, ProductPatch};
use serde_json::{json, Value};
use service::catalog::{CatalogRepository, ProductStore};
use service::errors::ServiceError;
use tower::ServiceExt;
use uuid::Uuid;

use server::{routes, ServerState};

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

async fn build_app() -> anyhow::Result<(Router, std::path::PathBuf)> {
    let path = std::env::temp_dir().join(format!("products_flow_{}.json", Uuid::new_v4()));
    let store = ProductStore::open(&path).await?;
    Ok((routes::build_router(ServerState::new(store), cors()), path))
}

async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let res = app.clone().oneshot(req).await?;
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, body))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn tshirt() -> Value {
    json!({
        "title": "T-shirt",
        "description": "White cotton t-shirt",
        "price": 150,
        "thumbnail": "img1.jpg",
        "code": "A01",
        "stock": 200
    })
}

fn pants() -> Value {
    json!({
        "title": "Pants",
        "description": "Blue jeans",
        "price": 200,
        "thumbnail": "img2.jpg",
        "code": "A002",
        "stock": 140
    })
}

#[tokio::test]
async fn create_list_and_limit() -> anyhow::Result<()> {
    let (app, path) = build_app().await?;

    let (status, body) = send(&app, json_request("POST", "/products", tshirt())).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    let (status, body) = send(&app, json_request("POST", "/products", pants())).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 2);

    let (status, body) = send(&app, get("/products")).await?;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<u64> = body.as_array().unwrap().iter().map(|p| p["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2]);

    let (_, body) = send(&app, get("/products?limit=1")).await?;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["code"], "A01");

    let (_, body) = send(&app, get("/products?limit=abc")).await?;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}

#[tokio::test]
async fn get_by_id_and_missing_product_body() -> anyhow::Result<()> {
    let (app, path) = build_app().await?;
    send(&app, json_request("POST", "/products", tshirt())).await?;

    let (status, body) = send(&app, get("/products/1")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "T-shirt");

    let (status, body) = send(&app, get("/products/999")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Producto no encontrado"}));

    let (status, body) = send(&app, get("/products/abc")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Producto no encontrado");

    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}

#[tokio::test]
async fn create_rejects_incomplete_and_duplicate_products() -> anyhow::Result<()> {
    let (app, path) = build_app().await?;

    let (status, body) = send(&app, json_request("POST", "/products", json!({"title": "Only title"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("validation error"));

    send(&app, json_request("POST", "/products", tshirt())).await?;
    let (status, _) = send(&app, json_request("POST", "/products", tshirt())).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, get("/products")).await?;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}

#[tokio::test]
async fn update_and_delete() -> anyhow::Result<()> {
    let (app, path) = build_app().await?;
    send(&app, json_request("POST", "/products", tshirt())).await?;

    let (status, body) = send(&app, json_request("PUT", "/products/1", json!({"id": 7, "price": 500}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["price"], 500.0);
    assert_eq!(body["code"], "A01");

    let (status, _) = send(&app, json_request("PUT", "/products/42", json!({"price": 1}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let del = Request::builder().method("DELETE").uri("/products/1").body(Body::empty())?;
    let (status, _) = send(&app, del).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let del_again = Request::builder().method("DELETE").uri("/products/1").body(Body::empty())?;
    let (status, _) = send(&app, del_again).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}

fn raw_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn malformed_bodies_get_json_error_bodies() -> anyhow::Result<()> {
    let (app, path) = build_app().await?;

    let (status, body) = send(&app, raw_request("POST", "/products", "{not json")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let mut wrong_type = tshirt();
    wrong_type["price"] = json!("150");
    let (status, body) = send(&app, json_request("POST", "/products", wrong_type)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("price"));

    send(&app, json_request("POST", "/products", tshirt())).await?;
    let (status, body) = send(&app, raw_request("PUT", "/products/1", "[1, 2")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}

#[tokio::test]
async fn limit_and_id_use_their_leading_integer() -> anyhow::Result<()> {
    let (app, path) = build_app().await?;
    send(&app, json_request("POST", "/products", tshirt())).await?;
    send(&app, json_request("POST", "/products", pants())).await?;

    let (_, body) = send(&app, get("/products?limit=1abc")).await?;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, get("/products/1abc")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "A01");

    let (status, body) = send(&app, get("/products/2.9")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 2);

    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}

struct BrokenCatalog;

#[async_trait::async_trait]
impl CatalogRepository for BrokenCatalog {
    async fn create(&self, _input: NewProduct) -> Result<Product, ServiceError> { Err(broken()) }
    async fn list_all(&self) -> Result<Vec<Product>, ServiceError> { Err(broken()) }
    async fn get_by_id(&self, _id: u64) -> Result<Option<Product>, ServiceError> { Err(broken()) }
    async fn update(&self, _id: u64, _patch: ProductPatch) -> Result<Product, ServiceError> { Err(broken()) }
    async fn delete(&self, _id: u64) -> Result<bool, ServiceError> { Err(broken()) }
}

fn broken() -> ServiceError {
    ServiceError::Persistence("cannot read products.json".into())
}

#[tokio::test]
async fn store_faults_map_to_500_with_message() -> anyhow::Result<()> {
    let app = routes::build_router(ServerState::new(Arc::new(BrokenCatalog)), cors());

    let (status, body) = send(&app, get("/products")).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "persistence error: cannot read products.json");

    let (status, _) = send(&app, get("/products/1")).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}

#[tokio::test]
async fn health_and_openapi_are_served() -> anyhow::Result<()> {
    let (app, path) = build_app().await?;

    let (status, body) = send(&app, get("/health")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, get("/api-docs/openapi.json")).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/products"].is_object());

    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}
