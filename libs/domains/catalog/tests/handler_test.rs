//! Handler tests for the catalog domain
//!
//! These drive the real router with `oneshot` against the in-memory repository:
//! - Request deserialization (JSON → request bodies)
//! - The `{status, message, data}` envelope
//! - HTTP status codes
//! - Scoped vs global product resolution

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_catalog::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

struct TestApp {
    repository: InMemoryCatalogRepository,
}

impl TestApp {
    fn new() -> Self {
        Self {
            repository: InMemoryCatalogRepository::new(),
        }
    }

    fn router(&self) -> Router {
        handlers::router(self.repository.clone())
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn create_category(&self, name: &str, status: &str) -> i64 {
        let (code, body) = self
            .send(
                "POST",
                "/categories",
                Some(json!({ "name": name, "status": status })),
            )
            .await;
        assert_eq!(code, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_i64().unwrap()
    }

    async fn create_product(&self, category_id: i64, name: &str, price: Value) -> i64 {
        let (code, body) = self
            .send(
                "POST",
                &format!("/categories/{category_id}/products"),
                Some(json!({ "name": name, "description": "Handmade", "price": price })),
            )
            .await;
        assert_eq!(code, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_i64().unwrap()
    }

    async fn category_count(&self) -> usize {
        self.repository.list_all().await.unwrap().len()
    }

    async fn product_count(&self) -> usize {
        self.repository.list_products().await.unwrap().len()
    }
}

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
async fn test_create_category_returns_201_with_envelope() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            "POST",
            "/categories",
            Some(json!({ "name": "Rings", "status": "Active" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "Success");
    assert_eq!(body["message"], "Category was created successfully.");
    assert_eq!(body["data"]["name"], "Rings");
    assert_eq!(body["data"]["status"], "Active");
}

#[tokio::test]
async fn test_create_category_without_status_is_inactive() {
    let app = TestApp::new();

    let (status, body) = app
        .send("POST", "/categories", Some(json!({ "name": "Bracelets" })))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "Inactive");
}

#[tokio::test]
async fn test_duplicate_name_differing_in_case_is_rejected() {
    let app = TestApp::new();
    app.create_category("Rings", "Active").await;

    let (status, body) = app
        .send(
            "POST",
            "/categories",
            Some(json!({ "name": "rings", "status": "Active" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "Error");
    assert_eq!(body["message"], json!(["Name has already been taken"]));
    assert_eq!(app.category_count().await, 1);
}

#[tokio::test]
async fn test_all_validation_messages_are_reported_together() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            "POST",
            "/categories",
            Some(json!({ "name": "", "status": "Archived" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["message"],
        json!(["Name can't be blank", "Status is not included in the list"])
    );
    assert_eq!(app.category_count().await, 0);
}

#[tokio::test]
async fn test_unknown_fields_are_ignored() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            "POST",
            "/categories",
            Some(json!({ "name": "Earrings", "id": 500, "featured": true })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], 1);
}

#[tokio::test]
async fn test_get_missing_category_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/categories/999999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "status": "Error", "message": "Category not found" })
    );
}

#[tokio::test]
async fn test_non_numeric_category_id_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/categories/rings", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found");
}

#[tokio::test]
async fn test_list_categories_in_id_order_without_message() {
    let app = TestApp::new();
    for name in ["Necklaces", "Rings", "Earrings"] {
        app.create_category(name, "Active").await;
    }

    let (status, body) = app.send("GET", "/categories", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Success");
    assert!(body.get("message").is_none());
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Necklaces", "Rings", "Earrings"]);
}

#[tokio::test]
async fn test_list_categories_empty() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/categories", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_update_category_applies_only_supplied_fields() {
    let app = TestApp::new();
    let id = app.create_category("Rings", "Inactive").await;

    let (status, body) = app
        .send(
            "PATCH",
            &format!("/categories/{id}"),
            Some(json!({ "status": "Active" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Category was updated successfully.");
    assert_eq!(body["data"]["name"], "Rings");
    assert_eq!(body["data"]["status"], "Active");
}

#[tokio::test]
async fn test_update_category_may_recase_its_own_name() {
    let app = TestApp::new();
    let id = app.create_category("Rings", "Active").await;

    let (status, body) = app
        .send(
            "PUT",
            &format!("/categories/{id}"),
            Some(json!({ "name": "RINGS" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "RINGS");
}

#[tokio::test]
async fn test_update_category_to_taken_name_leaves_it_unchanged() {
    let app = TestApp::new();
    app.create_category("Rings", "Active").await;
    let id = app.create_category("Earrings", "Active").await;

    let (status, body) = app
        .send(
            "PUT",
            &format!("/categories/{id}"),
            Some(json!({ "name": "RINGS" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], json!(["Name has already been taken"]));

    let (_, body) = app.send("GET", &format!("/categories/{id}"), None).await;
    assert_eq!(body["data"]["name"], "Earrings");
}

#[tokio::test]
async fn test_update_category_with_null_name_is_blank() {
    let app = TestApp::new();
    let id = app.create_category("Rings", "Active").await;

    let (status, body) = app
        .send(
            "PUT",
            &format!("/categories/{id}"),
            Some(json!({ "name": null })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], json!(["Name can't be blank"]));
}

#[tokio::test]
async fn test_update_missing_category_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app
        .send("PUT", "/categories/42", Some(json!({ "name": "" })))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found");
}

#[tokio::test]
async fn test_delete_category_cascades_to_its_products() {
    let app = TestApp::new();
    let rings = app.create_category("Rings", "Active").await;
    let earrings = app.create_category("Earrings", "Active").await;
    app.create_product(rings, "Engagement Ring", json!(45000)).await;
    app.create_product(rings, "Gold Band Ring", json!("9500")).await;
    app.create_product(earrings, "Diamond Studs", json!(30000)).await;

    let (status, body) = app
        .send("DELETE", &format!("/categories/{rings}"), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "Success", "message": "Category was deleted successfully." })
    );
    assert_eq!(app.category_count().await, 1);
    assert_eq!(app.product_count().await, 1);
}

#[tokio::test]
async fn test_delete_missing_category_is_not_found() {
    let app = TestApp::new();

    let (status, _) = app.send("DELETE", "/categories/7", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_create_product_inside_category() {
    let app = TestApp::new();
    let id = app.create_category("Necklaces", "Active").await;

    let (status, body) = app
        .send(
            "POST",
            &format!("/categories/{id}/products"),
            Some(json!({
                "name": "Diamond Pendant",
                "description": "18k white gold",
                "price": 5000,
                "category_id": 999
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Product was created successfully.");
    assert_eq!(body["data"]["category_id"], id);
    assert_eq!(body["data"]["price"], "5000.00");
}

#[tokio::test]
async fn test_create_product_rejects_negative_price() {
    let app = TestApp::new();
    let id = app.create_category("Rings", "Active").await;

    let (status, body) = app
        .send(
            "POST",
            &format!("/categories/{id}/products"),
            Some(json!({ "name": "X", "description": "Y", "price": -5 })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], json!(["Price must be greater than 0"]));
    assert_eq!(app.product_count().await, 0);
}

#[tokio::test]
async fn test_create_product_reports_every_blank_field() {
    let app = TestApp::new();
    let id = app.create_category("Rings", "Active").await;

    let (status, body) = app
        .send(
            "POST",
            &format!("/categories/{id}/products"),
            Some(json!({ "price": "lots" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["message"],
        json!([
            "Name can't be blank",
            "Description can't be blank",
            "Price is not a number"
        ])
    );
}

#[tokio::test]
async fn test_create_product_in_missing_category_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            "POST",
            "/categories/3/products",
            Some(json!({ "name": "X", "description": "Y", "price": 10 })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found");
}

#[tokio::test]
async fn test_scoped_listing_only_returns_category_products() {
    let app = TestApp::new();
    let rings = app.create_category("Rings", "Active").await;
    let earrings = app.create_category("Earrings", "Active").await;
    app.create_product(rings, "Wedding Ring Set", json!(12000)).await;
    app.create_product(earrings, "Pearl Drops", json!(4500)).await;
    app.create_product(earrings, "Gold Hoops", json!(2500)).await;

    let (status, body) = app
        .send("GET", &format!("/categories/{earrings}/products"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = app.send("GET", "/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_scoped_listing_of_missing_category_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/categories/5/products", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found");
}

#[tokio::test]
async fn test_scoped_get_of_other_category_product_is_not_found() {
    let app = TestApp::new();
    let rings = app.create_category("Rings", "Active").await;
    let earrings = app.create_category("Earrings", "Active").await;
    let studs = app.create_product(earrings, "Diamond Studs", json!(30000)).await;

    let (status, body) = app
        .send("GET", &format!("/categories/{rings}/products/{studs}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");

    let (status, body) = app.send("GET", &format!("/products/{studs}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Diamond Studs");
}

#[tokio::test]
async fn test_scoped_update_of_other_category_product_is_not_found() {
    let app = TestApp::new();
    let rings = app.create_category("Rings", "Active").await;
    let earrings = app.create_category("Earrings", "Active").await;
    let studs = app.create_product(earrings, "Diamond Studs", json!(30000)).await;

    let (status, body) = app
        .send(
            "PATCH",
            &format!("/categories/{rings}/products/{studs}"),
            Some(json!({ "name": "Diamond Ring" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");

    let (_, body) = app.send("GET", &format!("/products/{studs}"), None).await;
    assert_eq!(body["data"]["name"], "Diamond Studs");
    assert_eq!(body["data"]["category_id"], earrings);
}

#[tokio::test]
async fn test_scoped_delete_of_other_category_product_is_not_found() {
    let app = TestApp::new();
    let rings = app.create_category("Rings", "Active").await;
    let earrings = app.create_category("Earrings", "Active").await;
    let studs = app.create_product(earrings, "Diamond Studs", json!(30000)).await;

    let (status, body) = app
        .send("DELETE", &format!("/categories/{rings}/products/{studs}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
    assert_eq!(app.product_count().await, 1);
}

#[tokio::test]
async fn test_malformed_product_id_reports_missing_category_first() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/categories/999/products/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found");

    let (status, body) = app
        .send("DELETE", "/categories/999/products/abc", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found");

    let rings = app.create_category("Rings", "Active").await;
    let (status, body) = app
        .send("GET", &format!("/categories/{rings}/products/abc"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_price_beyond_column_precision_is_rejected() {
    let app = TestApp::new();
    let rings = app.create_category("Rings", "Active").await;

    let (status, body) = app
        .send(
            "POST",
            &format!("/categories/{rings}/products"),
            Some(json!({ "name": "Crown Jewel", "description": "Priceless", "price": "1e11" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], json!(["Price must be less than 10000000000"]));

    let id = app.create_product(rings, "Signet Ring", json!(6000)).await;
    let (status, body) = app
        .send(
            "PATCH",
            &format!("/categories/{rings}/products/{id}"),
            Some(json!({ "price": 10_000_000_000_i64 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], json!(["Price must be less than 10000000000"]));
}

#[tokio::test]
async fn test_update_product_moves_it_to_another_category() {
    let app = TestApp::new();
    let rings = app.create_category("Rings", "Active").await;
    let bracelets = app.create_category("Bracelets", "Active").await;
    let id = app.create_product(rings, "Tennis Bracelet", json!(18000)).await;

    let (status, body) = app
        .send(
            "PATCH",
            &format!("/categories/{rings}/products/{id}"),
            Some(json!({ "category_id": bracelets, "price": "17999.999" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product was updated successfully.");
    assert_eq!(body["data"]["category_id"], bracelets);
    assert_eq!(body["data"]["price"], "18000.00");
}

#[tokio::test]
async fn test_update_product_to_missing_category_must_exist() {
    let app = TestApp::new();
    let rings = app.create_category("Rings", "Active").await;
    let id = app.create_product(rings, "Signet Ring", json!(6000)).await;

    let (status, body) = app
        .send(
            "PUT",
            &format!("/categories/{rings}/products/{id}"),
            Some(json!({ "category_id": 404 })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], json!(["Category must exist"]));
}

#[tokio::test]
async fn test_delete_product_keeps_category() {
    let app = TestApp::new();
    let rings = app.create_category("Rings", "Active").await;
    let id = app.create_product(rings, "Signet Ring", json!(6000)).await;

    let (status, body) = app
        .send("DELETE", &format!("/categories/{rings}/products/{id}"), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product was deleted successfully.");
    assert!(body.get("data").is_none());
    assert_eq!(app.product_count().await, 0);
    assert_eq!(app.category_count().await, 1);
}

// ============================================================================
// Malformed requests
// ============================================================================

#[tokio::test]
async fn test_malformed_json_answers_with_error_envelope() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/categories")
                .header("content-type", "application/json")
                .body(Body::from("{\"name\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "Error");
}
