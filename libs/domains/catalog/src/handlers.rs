use axum::{
    Router,
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
    routing::get,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, Envelope, ErrorEnvelope, JsonBody, Outcome, extract_ip_from_headers,
    extract_user_agent, success, success_message,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CategoryStatus, CreateCategory, CreateProduct, Product, Scope, UpdateCategory,
    UpdateProduct,
};
use crate::repository::{CategoryRepository, ProductRepository};
use crate::service::{CategoryService, ProductService};

pub const CATEGORY_CREATED: &str = "Category was created successfully.";
pub const CATEGORY_UPDATED: &str = "Category was updated successfully.";
pub const CATEGORY_DELETED: &str = "Category was deleted successfully.";
pub const PRODUCT_CREATED: &str = "Product was created successfully.";
pub const PRODUCT_UPDATED: &str = "Product was updated successfully.";
pub const PRODUCT_DELETED: &str = "Product was deleted successfully.";

/// OpenAPI documentation for the catalog API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        get_category,
        update_category,
        delete_category,
        list_all_products,
        get_any_product,
        list_category_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(schemas(
        Category,
        CategoryStatus,
        CreateCategory,
        UpdateCategory,
        Product,
        CreateProduct,
        UpdateProduct,
        ErrorEnvelope,
    )),
    tags(
        (name = entity::category::TAG, description = "Category management endpoints"),
        (name = entity::product::TAG, description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the catalog router with all HTTP endpoints.
///
/// Both services share one repository; the router expects to be nested under the API
/// version prefix.
pub fn router<R>(repository: R) -> Router
where
    R: CategoryRepository + ProductRepository + 'static,
{
    let repository = Arc::new(repository);
    let categories = CategoryService::new(Arc::clone(&repository));
    let products = ProductService::new(repository);

    let category_routes = Router::new()
        .route(
            "/categories",
            get(list_categories::<R>).post(create_category::<R>),
        )
        .route(
            "/categories/{category_id}",
            get(get_category::<R>)
                .put(update_category::<R>)
                .patch(update_category::<R>)
                .delete(delete_category::<R>),
        )
        .with_state(categories);

    let product_routes = Router::new()
        .route("/products", get(list_all_products::<R>))
        .route("/products/{id}", get(get_any_product::<R>))
        .route(
            "/categories/{category_id}/products",
            get(list_category_products::<R>).post(create_product::<R>),
        )
        .route(
            "/categories/{category_id}/products/{id}",
            get(get_product::<R>)
                .put(update_product::<R>)
                .patch(update_product::<R>)
                .delete(delete_product::<R>),
        )
        .with_state(products);

    category_routes.merge(product_routes)
}

/// Path ids that are not integers can never match a row.
fn parse_id(raw: &str, missing: CatalogError) -> CatalogResult<i64> {
    raw.parse::<i64>().map_err(|_| missing)
}

fn category_scope(raw: &str) -> CatalogResult<Scope> {
    parse_id(raw, CatalogError::CategoryNotFound).map(Scope::Category)
}

/// Product id inside a category scope. A missing category outranks a malformed product id.
async fn scoped_product_id<R: CategoryRepository + ProductRepository>(
    service: &ProductService<R>,
    scope: Scope,
    raw: &str,
) -> CatalogResult<i64> {
    match raw.parse::<i64>() {
        Ok(id) => Ok(id),
        Err(_) => {
            service.resolve_scope(scope).await?;
            Err(CatalogError::ProductNotFound)
        }
    }
}

fn audit(action: &str, resource: String, headers: &HeaderMap) -> AuditEvent {
    AuditEvent::new(action, Some(resource), AuditOutcome::Success)
        .with_ip(extract_ip_from_headers(headers))
        .with_user_agent(extract_user_agent(headers))
}

/// List all categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = entity::category::TAG,
    responses(
        (status = 200, description = "Categories by ascending id", body = Envelope<Vec<Category>>),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    )
)]
async fn list_categories<R: CategoryRepository>(
    State(service): State<CategoryService<R>>,
) -> CatalogResult<Response> {
    let categories = service.list_categories().await?;
    Ok(success(Outcome::Ok, None, categories))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/categories",
    tag = entity::category::TAG,
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Envelope<Category>),
        (status = 400, description = "Malformed JSON", body = ErrorEnvelope),
        (status = 422, description = "Validation failed", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    )
)]
async fn create_category<R: CategoryRepository>(
    State(service): State<CategoryService<R>>,
    headers: HeaderMap,
    JsonBody(input): JsonBody<CreateCategory>,
) -> CatalogResult<Response> {
    let category = service.create_category(input).await?;

    audit("category.create", format!("category:{}", category.id), &headers)
        .with_details(json!({
            "name": category.name,
            "status": category.status.to_string(),
        }))
        .log();

    Ok(success(Outcome::Created, Some(CATEGORY_CREATED), category))
}

/// Get a category by id
#[utoipa::path(
    get,
    path = "/categories/{category_id}",
    tag = entity::category::TAG,
    params(
        ("category_id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = Envelope<Category>),
        (status = 404, description = "Category not found", body = ErrorEnvelope)
    )
)]
async fn get_category<R: CategoryRepository>(
    State(service): State<CategoryService<R>>,
    Path(category_id): Path<String>,
) -> CatalogResult<Response> {
    let id = parse_id(&category_id, CatalogError::CategoryNotFound)?;
    let category = service.get_category(id).await?;
    Ok(success(Outcome::Ok, None, category))
}

/// Update a category (PUT or PATCH)
#[utoipa::path(
    put,
    path = "/categories/{category_id}",
    tag = entity::category::TAG,
    params(
        ("category_id" = i64, Path, description = "Category ID")
    ),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = Envelope<Category>),
        (status = 404, description = "Category not found", body = ErrorEnvelope),
        (status = 422, description = "Validation failed", body = ErrorEnvelope)
    )
)]
async fn update_category<R: CategoryRepository>(
    State(service): State<CategoryService<R>>,
    headers: HeaderMap,
    Path(category_id): Path<String>,
    JsonBody(input): JsonBody<UpdateCategory>,
) -> CatalogResult<Response> {
    let id = parse_id(&category_id, CatalogError::CategoryNotFound)?;
    let category = service.update_category(id, input).await?;

    audit("category.update", format!("category:{id}"), &headers)
        .with_details(json!({
            "name": category.name,
            "status": category.status.to_string(),
        }))
        .log();

    Ok(success(Outcome::Ok, Some(CATEGORY_UPDATED), category))
}

/// Delete a category and all of its products
#[utoipa::path(
    delete,
    path = "/categories/{category_id}",
    tag = entity::category::TAG,
    params(
        ("category_id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted; envelope with message only"),
        (status = 404, description = "Category not found", body = ErrorEnvelope),
        (status = 422, description = "Delete failed", body = ErrorEnvelope)
    )
)]
async fn delete_category<R: CategoryRepository>(
    State(service): State<CategoryService<R>>,
    headers: HeaderMap,
    Path(category_id): Path<String>,
) -> CatalogResult<Response> {
    let id = parse_id(&category_id, CatalogError::CategoryNotFound)?;
    let products_removed = service.delete_category(id).await?;

    audit("category.delete", format!("category:{id}"), &headers)
        .with_details(json!({ "products_removed": products_removed }))
        .log();

    Ok(success_message(CATEGORY_DELETED))
}

/// List every product
#[utoipa::path(
    get,
    path = "/products",
    tag = entity::product::TAG,
    responses(
        (status = 200, description = "Products by ascending id", body = Envelope<Vec<Product>>)
    )
)]
async fn list_all_products<R: CategoryRepository + ProductRepository>(
    State(service): State<ProductService<R>>,
) -> CatalogResult<Response> {
    let products = service.list_products(Scope::Global).await?;
    Ok(success(Outcome::Ok, None, products))
}

/// Get any product by id
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = entity::product::TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Envelope<Product>),
        (status = 404, description = "Product not found", body = ErrorEnvelope)
    )
)]
async fn get_any_product<R: CategoryRepository + ProductRepository>(
    State(service): State<ProductService<R>>,
    Path(id): Path<String>,
) -> CatalogResult<Response> {
    let id = parse_id(&id, CatalogError::ProductNotFound)?;
    let product = service.get_product(Scope::Global, id).await?;
    Ok(success(Outcome::Ok, None, product))
}

/// List the products of one category
#[utoipa::path(
    get,
    path = "/categories/{category_id}/products",
    tag = entity::product::TAG,
    params(
        ("category_id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Products of the category", body = Envelope<Vec<Product>>),
        (status = 404, description = "Category not found", body = ErrorEnvelope)
    )
)]
async fn list_category_products<R: CategoryRepository + ProductRepository>(
    State(service): State<ProductService<R>>,
    Path(category_id): Path<String>,
) -> CatalogResult<Response> {
    let products = service.list_products(category_scope(&category_id)?).await?;
    Ok(success(Outcome::Ok, None, products))
}

/// Create a product inside a category
#[utoipa::path(
    post,
    path = "/categories/{category_id}/products",
    tag = entity::product::TAG,
    params(
        ("category_id" = i64, Path, description = "Owning category ID")
    ),
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Envelope<Product>),
        (status = 404, description = "Category not found", body = ErrorEnvelope),
        (status = 422, description = "Validation failed", body = ErrorEnvelope)
    )
)]
async fn create_product<R: CategoryRepository + ProductRepository>(
    State(service): State<ProductService<R>>,
    headers: HeaderMap,
    Path(category_id): Path<String>,
    JsonBody(input): JsonBody<CreateProduct>,
) -> CatalogResult<Response> {
    let category_id = parse_id(&category_id, CatalogError::CategoryNotFound)?;
    let product = service.create_product(category_id, input).await?;

    audit("product.create", format!("product:{}", product.id), &headers)
        .with_details(json!({
            "category_id": product.category_id,
            "name": product.name,
            "price": product.price.to_string(),
        }))
        .log();

    Ok(success(Outcome::Created, Some(PRODUCT_CREATED), product))
}

/// Get a product of one category
#[utoipa::path(
    get,
    path = "/categories/{category_id}/products/{id}",
    tag = entity::product::TAG,
    params(
        ("category_id" = i64, Path, description = "Category ID"),
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Envelope<Product>),
        (status = 404, description = "Category or product not found", body = ErrorEnvelope)
    )
)]
async fn get_product<R: CategoryRepository + ProductRepository>(
    State(service): State<ProductService<R>>,
    Path((category_id, id)): Path<(String, String)>,
) -> CatalogResult<Response> {
    let scope = category_scope(&category_id)?;
    let id = scoped_product_id(&service, scope, &id).await?;

    let product = service.get_product(scope, id).await?;
    Ok(success(Outcome::Ok, None, product))
}

/// Update a product of one category (PUT or PATCH)
#[utoipa::path(
    put,
    path = "/categories/{category_id}/products/{id}",
    tag = entity::product::TAG,
    params(
        ("category_id" = i64, Path, description = "Category ID"),
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = Envelope<Product>),
        (status = 404, description = "Category or product not found", body = ErrorEnvelope),
        (status = 422, description = "Validation failed", body = ErrorEnvelope)
    )
)]
async fn update_product<R: CategoryRepository + ProductRepository>(
    State(service): State<ProductService<R>>,
    headers: HeaderMap,
    Path((category_id, id)): Path<(String, String)>,
    JsonBody(input): JsonBody<UpdateProduct>,
) -> CatalogResult<Response> {
    let scope = category_scope(&category_id)?;
    let id = scoped_product_id(&service, scope, &id).await?;

    let product = service.update_product(scope, id, input).await?;

    audit("product.update", format!("product:{id}"), &headers)
        .with_details(json!({
            "category_id": product.category_id,
            "price": product.price.to_string(),
        }))
        .log();

    Ok(success(Outcome::Ok, Some(PRODUCT_UPDATED), product))
}

/// Delete a product of one category
#[utoipa::path(
    delete,
    path = "/categories/{category_id}/products/{id}",
    tag = entity::product::TAG,
    params(
        ("category_id" = i64, Path, description = "Category ID"),
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted; envelope with message only"),
        (status = 404, description = "Category or product not found", body = ErrorEnvelope),
        (status = 422, description = "Delete failed", body = ErrorEnvelope)
    )
)]
async fn delete_product<R: CategoryRepository + ProductRepository>(
    State(service): State<ProductService<R>>,
    headers: HeaderMap,
    Path((category_id, id)): Path<(String, String)>,
) -> CatalogResult<Response> {
    let scope = category_scope(&category_id)?;
    let id = scoped_product_id(&service, scope, &id).await?;

    service.delete_product(scope, id).await?;

    audit("product.delete", format!("product:{id}"), &headers).log();

    Ok(success_message(PRODUCT_DELETED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewCategory;
    use crate::repository::mock::MockCatalogRepository;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn rings() -> Category {
        Category::new(
            1,
            NewCategory {
                name: "Rings".into(),
                status: CategoryStatus::Active,
            },
        )
    }

    async fn call(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", CatalogError::CategoryNotFound).unwrap(), 42);
        assert!(matches!(
            parse_id("abc", CatalogError::ProductNotFound),
            Err(CatalogError::ProductNotFound)
        ));
    }

    #[tokio::test]
    async fn test_failed_cascade_answers_unprocessable() {
        let mut mock = MockCatalogRepository::new();
        mock.expect_find_by_id().returning(|_| Ok(Some(rings())));
        mock.expect_delete_cascading()
            .returning(|_| Err(CatalogError::Internal("transaction aborted".into())));

        let (status, body) = call(router(mock), "DELETE", "/categories/1").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], "Error");
        assert_eq!(body["message"], "Failed to delete category");
    }

    #[tokio::test]
    async fn test_store_outage_answers_internal_without_details() {
        let mut mock = MockCatalogRepository::new();
        mock.expect_list_all()
            .returning(|| Err(CatalogError::Internal("Database error: pool timed out".into())));

        let (status, body) = call(router(mock), "GET", "/categories").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "Error");
        assert!(!body["message"].to_string().contains("pool timed out"));
    }

    #[tokio::test]
    async fn test_non_numeric_product_id_is_not_found() {
        let mut mock = MockCatalogRepository::new();
        mock.expect_find_product().never();

        let (status, body) = call(router(mock), "GET", "/products/abc").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Product not found");
    }

    #[tokio::test]
    async fn test_missing_scope_category_outranks_malformed_product_id() {
        let mut mock = MockCatalogRepository::new();
        mock.expect_find_by_id().returning(|_| Ok(None));
        mock.expect_find_product().never();

        let (status, body) = call(router(mock), "GET", "/categories/999/products/abc").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Category not found");
    }

    #[tokio::test]
    async fn test_malformed_product_id_in_existing_category_is_product_not_found() {
        let mut mock = MockCatalogRepository::new();
        mock.expect_find_by_id().returning(|_| Ok(Some(rings())));
        mock.expect_find_product().never();
        mock.expect_delete_product().never();

        let (status, body) = call(router(mock), "DELETE", "/categories/1/products/abc").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Product not found");
    }
}
