//! Moneta HTTP API
//!
//! Thin axum layer over the prediction pipeline: an analyze endpoint, an
//! insight endpoint, and a health probe. The pipeline is shared read-only
//! state, so requests are served concurrently without locking.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::nlp::insights::{generate_insight, LedgerEntry};
use crate::nlp::{Pipeline, Prediction};

/// Shared application state
pub struct AppState {
    pub pipeline: Pipeline,
    /// Set when the knowledge base failed to load
    pub degraded: bool,
}

/// API error with a client-facing message
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl ApiError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
            internal: Some(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Some(err) = &self.internal {
            error!(error = %err, "internal error");
        }
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub prediction: Prediction,
}

#[derive(Debug, Deserialize)]
pub struct InsightRequest {
    #[serde(default)]
    pub transactions: Vec<LedgerEntry>,
    #[serde(default)]
    pub budgets: HashMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub status: &'static str,
    pub insight: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub entries: usize,
    pub embedder: String,
    pub degraded: bool,
}

/// POST /api/analyze - classify a free-text financial statement
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    if req.message.trim().is_empty() {
        return Err(ApiError::bad_request("Empty message"));
    }

    let prediction = state
        .pipeline
        .predict(&req.message)
        .map_err(|e| ApiError::internal(e.into()))?;

    Ok(Json(AnalyzeResponse {
        status: "success",
        prediction,
    }))
}

/// POST /api/insight - advisory text over the caller's transactions
pub async fn insight(
    State(_state): State<Arc<AppState>>,
    Json(req): Json<InsightRequest>,
) -> Json<InsightResponse> {
    let insight = generate_insight(&req.transactions, &req.budgets);
    Json(InsightResponse {
        status: "success",
        insight,
    })
}

/// GET /api/health - readiness probe with corpus stats
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        entries: state.pipeline.matcher().knowledge().len(),
        embedder: state.pipeline.matcher().embedder().name().to_string(),
        degraded: state.degraded,
    })
}

/// Create the application router
pub fn create_router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/api/insight", post(insight))
        .route("/api/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn serve(
    addr: SocketAddr,
    state: Arc<AppState>,
    allowed_origins: &[String],
) -> anyhow::Result<()> {
    let router = create_router(state, allowed_origins);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{HashEmbedder, KnowledgeBase};

    fn test_state() -> Arc<AppState> {
        let pipeline = Pipeline::new(Box::new(HashEmbedder::new()), KnowledgeBase::empty());
        Arc::new(AppState {
            pipeline,
            degraded: true,
        })
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_message() {
        let err = analyze(
            State(test_state()),
            Json(AnalyzeRequest {
                message: "   ".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Empty message");
    }

    #[tokio::test]
    async fn test_analyze_success_envelope() {
        let res = analyze(
            State(test_state()),
            Json(AnalyzeRequest {
                message: "paid 500 for lunch".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(res.0.status, "success");
        assert_eq!(res.0.prediction.amount, 500.0);
        assert_eq!(res.0.prediction.category, "General");
    }

    #[tokio::test]
    async fn test_insight_endpoint() {
        let res = insight(
            State(test_state()),
            Json(InsightRequest {
                transactions: vec![],
                budgets: HashMap::new(),
            }),
        )
        .await;

        assert_eq!(res.0.status, "success");
        assert_eq!(res.0.insight, "No spending data yet. Add an expense!");
    }

    #[tokio::test]
    async fn test_health_reports_degraded() {
        let res = health(State(test_state())).await;
        assert_eq!(res.0.status, "ok");
        assert_eq!(res.0.entries, 0);
        assert!(res.0.degraded);
    }
}
