//! Catalog Domain
//!
//! Categories and the products they own, exposed as a JSON API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, envelope responses, audit events
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Services   │  ← Scope resolution, validation, uniqueness/existence checks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (traits + in-memory and Postgres implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, request bodies, validation drafts
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{handlers, repository::InMemoryCatalogRepository};
//!
//! let repository = InMemoryCatalogRepository::new();
//! let router: axum::Router = handlers::router(repository);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use error::{CatalogError, CatalogResult};
pub use handlers::ApiDoc;
pub use models::{
    Category, CategoryStatus, CreateCategory, CreateProduct, PriceInput, Product, Scope,
    UpdateCategory, UpdateProduct,
};
pub use postgres::PgCatalogRepository;
pub use repository::{CategoryRepository, InMemoryCatalogRepository, ProductRepository};
pub use service::{CategoryService, ProductService};
