//! # Axum Helpers
//!
//! Shared building blocks for the catalog HTTP service.
//!
//! - **[`response`]**: the `{status, message, data}` envelope and the single builder behind it
//! - **[`errors`]**: [`AppError`] answering in the envelope, error codes for logs
//! - **[`extractors`]**: [`JsonBody`], a JSON extractor with envelope rejections
//! - **[`server`]**: router assembly with OpenAPI viewers, health/readiness, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`audit`]**: audit trail for mutating requests
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::app_info;
//!
//! let router = create_router::<ApiDoc>(api_routes)?.merge(health_router(app_info!()));
//! create_production_app(router, &server_config, Duration::from_secs(30), async {}).await?;
//! ```

pub mod audit;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod response;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::security_headers;

pub use errors::{AppError, ErrorCode};

pub use extractors::JsonBody;

pub use response::{
    Envelope, EnvelopeStatus, ErrorEnvelope, Message, Outcome, failure, respond, success,
    success_message,
};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
