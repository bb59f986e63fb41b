use axum::Router;
use domain_catalog::PgCatalogRepository;

pub mod health;

/// API version prefix; `create_router` adds `/api` in front of it.
pub const VERSION_PREFIX: &str = "/v1";

/// Creates the API routes without the `/api` prefix.
///
/// The returned router is stateless: the catalog router carries its own services.
pub fn routes(state: &crate::state::AppState) -> Router {
    let repository = PgCatalogRepository::new(state.db.clone());

    Router::new().nest(VERSION_PREFIX, domain_catalog::handlers::router(repository))
}

/// Router with the `/ready` endpoint, to be merged next to the documented API.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
