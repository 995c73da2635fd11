#![allow(clippy::unwrap_used)]
//! HTTP-level tests for the docgate router.
//!
//! These tests drive the router in-process with `tower::ServiceExt::oneshot`
//! and cover:
//! - Method gating on every path
//! - MDX success and failure bodies
//! - The lint JSON contract, with and without `fix`
//! - Query fallbacks and the body size limit
//! - The per-request timeout

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use docgate::{ConfigSource, MdxParseError, MdxParser, ServiceLimits, load_lint_config};
use docgate_server::{AppState, build_router};
use serde_json::Value;
use tower::ServiceExt;

fn app_with(limits: ServiceLimits) -> Router {
    let config = load_lint_config(&ConfigSource::Embedded).unwrap();
    build_router(AppState::new(config, limits), 0)
}

fn app() -> Router {
    app_with(ServiceLimits::default())
}

async fn send(app: Router, method: Method, uri: &str, body: impl Into<Body>) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body.into())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn lint(uri: &str, body: &str) -> Value {
    let (status, body) = send(app(), Method::POST, uri, body.to_owned()).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    serde_json::from_str(&body).unwrap()
}

// =============================================================================
// Method gating
// =============================================================================

#[tokio::test]
async fn test_non_post_rejected_on_every_path() {
    for uri in ["/", "/markdownlint", "/docs/page.mdx", "/markdownlint/extra"] {
        for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
            let (status, body) = send(app(), method.clone(), uri, "# x").await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
            assert_eq!(body, "Only POST is supported");
        }
    }
}

#[tokio::test]
async fn test_method_checked_before_body_limit() {
    let app = app_with(ServiceLimits::new(8, Duration::from_secs(30)));
    let (status, body) = send(app, Method::GET, "/markdownlint", "x".repeat(1024)).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, "Only POST is supported");
}

// =============================================================================
// MDX validation
// =============================================================================

#[tokio::test]
async fn test_mdx_valid() {
    let (status, body) = send(app(), Method::POST, "/", "# Hello\n\n<Note>hi</Note>\n").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Successfully parsed mdx");
}

#[tokio::test]
async fn test_mdx_any_path() {
    let (status, body) = send(app(), Method::POST, "/some/where?x=1", "plain text").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Successfully parsed mdx");
}

#[tokio::test]
async fn test_mdx_empty_body() {
    let (status, body) = send(app(), Method::POST, "/", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Successfully parsed mdx");
}

#[tokio::test]
async fn test_mdx_invalid() {
    for text in ["<Unclosed", "<Unclosed\n"] {
        let (status, body) = send(app(), Method::POST, "/", text).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with("MDX parse failure: 1:1: "), "body: {body}");
    }
}

#[tokio::test]
async fn test_invalid_utf8_rejected() {
    let (status, _) = send(app(), Method::POST, "/", vec![0xff_u8, 0xfe, 0xfd]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Markdown lint
// =============================================================================

#[tokio::test]
async fn test_lint_clean_document() {
    let json = lint("/markdownlint", "# Title\n\nBody.\n").await;
    assert_eq!(json["errorNum"], 0);
    assert_eq!(json["validations"], "");
    assert_eq!(json["fixedText"], Value::Null);
}

#[tokio::test]
async fn test_lint_without_fix() {
    let json = lint("/markdownlint", "#Title\n").await;
    assert_eq!(json["errorNum"], 1);
    assert_eq!(json["fixedText"], Value::Null);
    let validations = json["validations"].as_str().unwrap();
    assert!(validations.starts_with("1: MD018/no-missing-space-atx"), "{validations}");
}

#[tokio::test]
async fn test_lint_with_fix() {
    let json = lint("/markdownlint?fix=true", "#Title\n").await;
    assert_eq!(json["fixedText"], "# Title\n");
    assert_eq!(json["errorNum"], 0);
    assert_eq!(json["validations"], "");
}

#[tokio::test]
async fn test_lint_fix_is_case_insensitive() {
    let json = lint("/markdownlint?fix=TRUE", "#Title\n").await;
    assert_eq!(json["fixedText"], "# Title\n");

    let json = lint("/markdownlint?fix=yes", "#Title\n").await;
    assert_eq!(json["fixedText"], Value::Null);
    assert_eq!(json["errorNum"], 1);
}

#[tokio::test]
async fn test_lint_fix_with_nothing_fixable() {
    let json = lint("/markdownlint?fix=true", "# A\n\n### C\n").await;
    assert_eq!(json["fixedText"], Value::Null);
    assert_eq!(json["errorNum"], 1);
}

#[tokio::test]
async fn test_lint_filename_not_in_response() {
    let json = lint("/markdownlint?filename=guide.md", "#Title").await;
    let body = json.to_string();
    assert!(!body.contains("guide.md"), "{body}");
    assert!(!body.contains("readme"), "{body}");
    assert_eq!(json["errorNum"], 2);
}

#[tokio::test]
async fn test_lint_malformed_query_uses_defaults() {
    let json = lint("/markdownlint?fix=%ZZ&filename", "#Title\n").await;
    assert_eq!(json["fixedText"], Value::Null);
    assert_eq!(json["errorNum"], 1);
}

#[tokio::test]
async fn test_lint_response_is_json() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/markdownlint")
        .body(Body::from("# Title\n"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert_eq!(content_type, "application/json");
}

// =============================================================================
// Limits
// =============================================================================

#[tokio::test]
async fn test_body_over_limit_rejected() {
    let app = app_with(ServiceLimits::new(16, Duration::from_secs(30)));
    let (status, _) = send(app, Method::POST, "/markdownlint", "#".repeat(64)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

struct SlowParser;

impl MdxParser for SlowParser {
    fn parse(&self, _text: &str) -> Result<(), MdxParseError> {
        std::thread::sleep(Duration::from_millis(300));
        Ok(())
    }
}

#[tokio::test]
async fn test_slow_request_times_out() {
    let config = load_lint_config(&ConfigSource::Embedded).unwrap();
    let limits = ServiceLimits::new(1024, Duration::from_millis(20));
    let app = build_router(AppState::with_parser(config, limits, Arc::new(SlowParser)), 0);

    let (status, body) = send(app, Method::POST, "/", "# x").await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body, "Request timed out");
}

#[tokio::test]
async fn test_verbose_access_log_preserves_response() {
    let config = load_lint_config(&ConfigSource::Embedded).unwrap();
    let app = build_router(AppState::new(config, ServiceLimits::default()), 2);

    let (status, body) = send(app, Method::POST, "/markdownlint?fix=true", "#Title\n").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["fixedText"], "# Title\n");
}

#[tokio::test]
async fn test_lint_fix_raising_count_not_returned() {
    let json = lint("/markdownlint?fix=true", "# A\n\n###B:\n").await;
    assert_eq!(json["fixedText"], Value::Null);
    assert_eq!(json["errorNum"], 1);
}
