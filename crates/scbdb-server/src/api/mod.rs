mod bills;
mod brands;
mod locations;
mod pricing;
mod products;
mod sentiment;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(50).clamp(1, 200)
}

pub(super) fn map_db_error(request_id: String, error: &scbdb_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/products", get(products::list_products))
        .route(
            "/api/v1/pricing/snapshots",
            get(pricing::list_pricing_snapshots),
        )
        .route(
            "/api/v1/pricing/summary",
            get(pricing::list_pricing_summary),
        )
        .route("/api/v1/bills", get(bills::list_bills))
        .route(
            "/api/v1/bills/{bill_id}/events",
            get(bills::list_bill_events),
        )
        .route("/api/v1/bills/{bill_id}/texts", get(bills::list_bill_texts))
        .route(
            "/api/v1/sentiment/summary",
            get(sentiment::list_sentiment_summary),
        )
        .route(
            "/api/v1/sentiment/snapshots",
            get(sentiment::list_sentiment_snapshots),
        )
        .route(
            "/api/v1/locations/summary",
            get(locations::list_locations_summary),
        )
        .route(
            "/api/v1/locations/by-state",
            get(locations::list_locations_by_state),
        )
        .route("/api/v1/locations/pins", get(locations::list_location_pins))
        .route(
            "/api/v1/brands",
            get(brands::list_brands).post(brands::create_brand),
        )
        .route(
            "/api/v1/brands/{slug}",
            get(brands::get_brand)
                .patch(brands::update_brand)
                .delete(brands::deactivate_brand),
        )
        .route(
            "/api/v1/brands/{slug}/signals",
            get(brands::list_brand_signals),
        )
        .route("/api/v1/brands/{slug}/funding", get(brands::list_funding))
        .route(
            "/api/v1/brands/{slug}/lab-tests",
            get(brands::list_lab_tests),
        )
        .route("/api/v1/brands/{slug}/legal", get(brands::list_legal))
        .route(
            "/api/v1/brands/{slug}/sponsorships",
            get(brands::list_sponsorships),
        )
        .route(
            "/api/v1/brands/{slug}/distributors",
            get(brands::list_distributors),
        )
        .route(
            "/api/v1/brands/{slug}/competitors",
            get(brands::list_competitors),
        )
        .route("/api/v1/brands/{slug}/media", get(brands::list_media))
        .route(
            "/api/v1/brands/{slug}/profile",
            put(brands::upsert_brand_profile),
        )
        .route(
            "/api/v1/brands/{slug}/social",
            put(brands::upsert_brand_social),
        )
        .route(
            "/api/v1/brands/{slug}/domains",
            put(brands::upsert_brand_domains),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match scbdb_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}
