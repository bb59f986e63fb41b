use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorEnvelope, axum_helpers::EnvelopeStatus, axum_helpers::Message)
    ),
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Categories of jewellery and the products they own"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/v1", api = domain_catalog::ApiDoc)
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_paths_are_nested_under_version() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/v1/categories"));
        assert!(paths.iter().any(|p| p.as_str() == "/v1/categories/{category_id}/products/{id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/v1/products/{id}"));
    }
}
