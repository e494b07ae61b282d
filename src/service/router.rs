use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::response::{Html, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{debug, info};
use serde_json::Value;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::error::CasError;

use super::analysis::analyze;
use super::config::{ApiInfo, ServiceKind};
use super::docs::{docs_page, openapi};
use super::dto::{
    AnalysisRequest, AnalysisResponse, DerivativeResponse, ExpressionRequest, IntegralResponse,
    LatexResponse, Outcome, SimplifyResponse, StatusResponse,
};
use super::error::{ApiError, ApiJson};
use super::symbols::SymbolTable;
use super::toolkit;

/// Shared, read-only router state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub symbols: Arc<SymbolTable>,
    pub service: ServiceKind,
    pub info: Arc<ApiInfo>,
}

impl AppState {
    pub fn new(service: ServiceKind, symbols: SymbolTable) -> Self {
        AppState {
            symbols: Arc::new(symbols),
            service,
            info: Arc::new(service.api_info()),
        }
    }
}

/// Router for the given service with CORS and request logging applied.
pub fn create_router(state: AppState) -> Router {
    let routes = match state.service {
        ServiceKind::Analysis => Router::new().route("/analyze", post(analyze_handler)),
        ServiceKind::Toolkit => Router::new()
            .route("/", get(root))
            .route("/solve", post(solve_handler))
            .route("/derivative", post(derivative_handler))
            .route("/integrate", post(integrate_handler))
            .route("/latex", post(latex_handler)),
    };
    routes
        .route("/openapi.json", get(openapi_handler))
        .route("/docs", get(docs_handler))
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .layer(cors())
        .with_state(state)
}

/// Any origin, method and header, with credentials. Origins are mirrored since a wildcard
/// cannot be combined with credentials.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

async fn log_request(req: Request, next: Next) -> Response {
    let method: Method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(req).await;
    info!(
        "{method} {path} -> {} in {:.2?}",
        response.status().as_u16(),
        started.elapsed()
    );
    response
}

/// Run an engine call on the blocking pool. Failures, including panics, become an in-band
/// error payload.
async fn run_engine<T, F>(job: F) -> Json<Outcome<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CasError> + Send + 'static,
{
    let outcome = match tokio::task::spawn_blocking(job).await {
        Ok(result) => {
            if let Err(err) = &result {
                debug!("engine error: {err}");
            }
            Outcome::from(result)
        }
        Err(join_error) if join_error.is_panic() => {
            let message = panic_message(join_error.into_panic());
            debug!("engine panicked: {message}");
            Outcome::error(message)
        }
        Err(join_error) => Outcome::error(join_error.to_string()),
    };
    Json(outcome)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "internal error".to_string()),
    }
}

async fn analyze_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AnalysisRequest>,
) -> Json<Outcome<AnalysisResponse>> {
    let symbols = Arc::clone(&state.symbols);
    run_engine(move || analyze(&symbols, &req.equation)).await
}

async fn solve_handler(
    ApiJson(req): ApiJson<ExpressionRequest>,
) -> Json<Outcome<SimplifyResponse>> {
    run_engine(move || toolkit::simplify_expression(&req.expression)).await
}

async fn derivative_handler(
    ApiJson(req): ApiJson<ExpressionRequest>,
) -> Json<Outcome<DerivativeResponse>> {
    run_engine(move || toolkit::derivative(&req.expression)).await
}

async fn integrate_handler(
    ApiJson(req): ApiJson<ExpressionRequest>,
) -> Json<Outcome<IntegralResponse>> {
    run_engine(move || toolkit::integral(&req.expression)).await
}

async fn latex_handler(ApiJson(req): ApiJson<ExpressionRequest>) -> Json<Outcome<LatexResponse>> {
    run_engine(move || toolkit::to_latex(&req.expression)).await
}

async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "FastAPI is running".to_string(),
    })
}

async fn openapi_handler(State(state): State<AppState>) -> Json<Value> {
    Json(openapi(state.service, &state.info))
}

async fn docs_handler(State(state): State<AppState>) -> Html<String> {
    Html(docs_page(&state.info))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
