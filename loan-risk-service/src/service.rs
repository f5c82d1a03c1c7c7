use axum::{
    Router,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode},
    middleware::{Next, from_fn},
    response::{Json, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

use crate::{
    llm::CompletionClient,
    models::{AssessmentResponse, ErrorResponse, LoanRiskRequest},
    relay,
};

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn bad_request_error(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

fn internal_error(message: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub completion_client: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn new(completion_client: Arc<dyn CompletionClient>) -> Self {
        Self { completion_client }
    }
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/assess-loan-risk", post(assess_loan_risk))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Tag each request with a fresh correlation id and run it inside a span carrying that id.
async fn correlation_id_middleware(mut request: Request, next: Next) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    let header_value = HeaderValue::from_str(&correlation_id).ok();

    if let Some(value) = &header_value {
        request
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, value.clone());
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    let mut response = next.run(request).instrument(span).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "EV Loan Risk Assessment Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Relays EV loan applicant details to a language model for a risk assessment",
        "endpoints": {
            "POST /assess-loan-risk": "Assess the loan risk of an EV buyer",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn assess_loan_risk(
    State(state): State<AppState>,
    payload: Result<Json<LoanRiskRequest>, JsonRejection>,
) -> ApiResult<AssessmentResponse> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected loan risk request body");
        bad_request_error("Invalid request")
    })?;

    info!(
        ev_model = %request.ev_model,
        credit_score = request.credit_score,
        "Assessing loan risk"
    );

    let assessment = relay::assess(state.completion_client.as_ref(), &request)
        .await
        .map_err(|e| {
            error!(error = %e, "Loan risk assessment failed");
            internal_error(&e.to_string())
        })?;

    Ok(Json(AssessmentResponse {
        loan_risk_assessment: assessment,
    }))
}
