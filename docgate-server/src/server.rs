//! HTTP surface: routing, extraction, and the blocking-work bridge.
//!
//! `POST /markdownlint` lints; `POST` to any other path validates MDX. Every
//! other method gets `405` before the body is read.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Query, Request, State, rejection::QueryRejection},
    middleware::{self, Next},
    routing::{MethodRouter, post},
};
use docgate::{
    LintConfig, LintOptions, LintOrchestrator, LintReport, MarkdownRsParser, MdxParser,
    ServiceLimits,
    mdx::{MDX_SUCCESS_MESSAGE, validate_mdx},
};

use crate::error::ApiError;
use crate::logging::AccessLog;

/// Path served by the lint handler. Matched exactly.
pub const LINT_PATH: &str = "/markdownlint";

/// Shared, read-only state of the service.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<LintOrchestrator>,
    parser: Arc<dyn MdxParser>,
    limits: ServiceLimits,
}

impl AppState {
    #[must_use]
    pub fn new(config: Arc<LintConfig>, limits: ServiceLimits) -> Self {
        Self::with_parser(config, limits, Arc::new(MarkdownRsParser))
    }

    #[must_use]
    pub fn with_parser(
        config: Arc<LintConfig>,
        limits: ServiceLimits,
        parser: Arc<dyn MdxParser>,
    ) -> Self {
        Self {
            orchestrator: Arc::new(LintOrchestrator::new(config)),
            parser,
            limits,
        }
    }
}

/// Build the router with every route, the body limit, and the access log.
#[must_use]
pub fn build_router(state: AppState, verbose: u8) -> Router {
    let access_log = AccessLog::new(verbose);
    let max_body_bytes = state.limits.max_body_bytes;

    Router::new()
        .route(LINT_PATH, post_only(post(markdownlint)))
        .route("/", post_only(post(check_mdx)))
        .route("/{*path}", post_only(post(check_mdx)))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(middleware::from_fn(move |request: Request, next: Next| {
            access_log.handle(request, next)
        }))
        .with_state(state)
}

fn post_only(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.fallback(|| async { ApiError::MethodNotAllowed })
}

async fn markdownlint(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    body: Bytes,
) -> Result<Json<LintReport>, ApiError> {
    let pairs = match query {
        Ok(Query(pairs)) => pairs,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unparseable query, using default lint options");
            Vec::new()
        }
    };
    let options = LintOptions::from_query_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let document = options.document(decode_body(&body)?);

    let orchestrator = Arc::clone(&state.orchestrator);
    let outcome = run_blocking(state.limits.request_timeout, move || {
        orchestrator.lint_and_maybe_fix(&document, options.fix)
    })
    .await?;
    Ok(Json(outcome.into_report()))
}

async fn check_mdx(State(state): State<AppState>, body: Bytes) -> Result<&'static str, ApiError> {
    let text = decode_body(&body)?;
    let parser = Arc::clone(&state.parser);
    run_blocking(state.limits.request_timeout, move || {
        validate_mdx(parser.as_ref(), &text)
    })
    .await??;
    Ok(MDX_SUCCESS_MESSAGE)
}

fn decode_body(body: &Bytes) -> Result<String, ApiError> {
    std::str::from_utf8(body)
        .map(str::to_owned)
        .map_err(|_| ApiError::InvalidUtf8)
}

/// Run CPU-bound work off the async executor, bounded by `timeout`.
///
/// On timeout the caller gets [`ApiError::Timeout`]; the blocking job runs
/// to completion and its result is dropped.
async fn run_blocking<T, F>(timeout: Duration, job: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(job)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(join_error)) => Err(ApiError::Internal(join_error.to_string())),
        Err(_) => {
            tracing::warn!(timeout_ms = timeout.as_millis(), "Request processing timed out");
            Err(ApiError::Timeout)
        }
    }
}
