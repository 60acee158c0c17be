// src/server.rs
use crate::limiter::RateLimiter;
use crate::service::LookupService;
use crate::types::{Config, TrackerError};
use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Liveness routes bypass admission checks entirely.
const EXEMPT_PATHS: &[&str] = &["/", "/health"];

pub struct AppState {
    pub service: LookupService,
    pub limiter: RateLimiter,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, TrackerError> {
        let service = LookupService::new(&config)?;
        let limiter = RateLimiter::from_config(&config.rate_limit);
        Ok(Self {
            service,
            limiter,
            config,
        })
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            TrackerError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            TrackerError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            TrackerError::Upstream(_) | TrackerError::HttpError(_) | TrackerError::ParseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR")
            }
            TrackerError::ConfigError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
                code,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
struct TrackUsernameRequest {
    username: String,
}

#[derive(Debug, Deserialize)]
struct TrackIpRequest {
    ip_address: String,
}

#[derive(Debug, Deserialize)]
struct TrackPhoneRequest {
    phone_number: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/my-ip", get(my_ip))
        .route("/api/track-ip", post(track_ip))
        .route("/api/track-phone", post(track_phone))
        .route("/api/track-username", post(track_username))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Admission gate in front of every non-exempt route. A denial yields
/// 429 with no side effect beyond the log line.
async fn rate_limit(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if EXEMPT_PATHS.contains(&path) {
        return next.run(request).await;
    }

    let client = addr.ip().to_string();
    if !state.limiter.admit(&client) {
        warn!("Rate limited {} on {}", client, path);
        return TrackerError::RateLimited.into_response();
    }

    next.run(request).await
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": format!("{} API v{}", crate::NAME, crate::VERSION),
        "status": "running"
    }))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": crate::VERSION,
        "build": env!("BUILD_TIME"),
    }))
}

async fn my_ip(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, TrackerError> {
    let ip = state.service.my_ip().await?;
    Ok(Json(serde_json::json!({ "ip": ip, "success": true })))
}

async fn track_ip(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TrackIpRequest>,
) -> Result<impl IntoResponse, TrackerError> {
    let report = state.service.track_ip(&payload.ip_address).await?;
    Ok(Json(report))
}

async fn track_phone(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TrackPhoneRequest>,
) -> Result<impl IntoResponse, TrackerError> {
    let report = state.service.track_phone(&payload.phone_number)?;
    Ok(Json(report))
}

async fn track_username(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TrackUsernameRequest>,
) -> Result<impl IntoResponse, TrackerError> {
    info!("Tracking username {:?}", payload.username);
    let report = state.service.track_username(&payload.username).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request as HttpRequest};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state(max_requests: u32) -> Arc<AppState> {
        let mut config = Config::default();
        config.rate_limit.max_requests = max_requests;
        Arc::new(AppState::new(config).unwrap())
    }

    fn request(method: &str, uri: &str, body: Option<&str>) -> HttpRequest<Body> {
        let builder = HttpRequest::builder().method(method).uri(uri);
        let mut request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([203, 0, 113, 9], 41000))));
        request
    }

    #[tokio::test]
    async fn test_root_and_health_respond() {
        let app = router(test_state(10));

        let response = app
            .clone()
            .oneshot(request("GET", "/", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(request("GET", "/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_invalid_username_is_rejected_with_400() {
        let app = router(test_state(10));

        let response = app
            .oneshot(request(
                "POST",
                "/api/track-username",
                Some(r#"{"username": "bad input!"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_private_ip_is_rejected_with_400() {
        let app = router(test_state(10));

        let response = app
            .oneshot(request(
                "POST",
                "/api/track-ip",
                Some(r#"{"ip_address": "127.0.0.1"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_track_phone_round_trip() {
        let app = router(test_state(10));

        let response = app
            .oneshot(request(
                "POST",
                "/api/track-phone",
                Some(r#"{"phone_number": "+14155552671"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["is_valid"], true);
        assert_eq!(json["type"], "fixed_line_or_mobile");
        assert_eq!(json["e164_format"], "+14155552671");
        assert_eq!(json["success"], true);
    }

    #[tokio::test]
    async fn test_over_limit_yields_429() {
        let app = router(test_state(1));
        let body = r#"{"phone_number": "+14155552671"}"#;

        let first = app
            .clone()
            .oneshot(request("POST", "/api/track-phone", Some(body)))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(request("POST", "/api/track-phone", Some(body)))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_health_is_exempt_from_rate_limiting() {
        let app = router(test_state(1));

        for _ in 0..5 {
            let response = app
                .clone()
                .oneshot(request("GET", "/health", None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }
}
