use std::io::IsTerminal;
use std::time::Instant;

use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};
use chrono::Local;

/// Response bodies larger than this are not echoed at `-vv`.
const MAX_LOGGED_BODY: usize = 64 * 1024;

// ANSI color codes
struct Colors {
    reset: &'static str,
    dim: &'static str,
    green: &'static str,
    yellow: &'static str,
    red: &'static str,
    cyan: &'static str,
    blue: &'static str,
    magenta: &'static str,
    gray: &'static str,
}

impl Colors {
    fn detect() -> Self {
        if std::io::stderr().is_terminal() {
            Self {
                reset: "\x1b[0m",
                dim: "\x1b[2m",
                green: "\x1b[92m",
                yellow: "\x1b[93m",
                red: "\x1b[91m",
                cyan: "\x1b[96m",
                blue: "\x1b[94m",
                magenta: "\x1b[95m",
                gray: "\x1b[90m",
            }
        } else {
            Self {
                reset: "",
                dim: "",
                green: "",
                yellow: "",
                red: "",
                cyan: "",
                blue: "",
                magenta: "",
                gray: "",
            }
        }
    }

    fn status_color(&self, status: StatusCode) -> &'static str {
        if status.is_success() {
            self.green
        } else if status.is_redirection() {
            self.yellow
        } else {
            self.red
        }
    }
}

fn describe_length(content_length: Option<u64>) -> String {
    content_length.map_or_else(|| "unknown".to_owned(), |n| n.to_string())
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S,%3f").to_string()
}

/// Access log written straight to stderr so ANSI codes survive.
///
/// `verbose == 0` disables it, `1` prints one line per request, `2+` also
/// prints the request size and the response body. Request bodies are never
/// read here: a rejected method must leave the body untouched.
#[derive(Debug, Clone, Copy)]
pub struct AccessLog {
    pub verbose: u8,
}

#[allow(clippy::print_stderr)]
impl AccessLog {
    #[must_use]
    pub fn new(verbose: u8) -> Self {
        Self { verbose }
    }

    pub async fn handle(self, request: Request, next: Next) -> Response {
        if self.verbose == 0 {
            return next.run(request).await;
        }

        let colors = Colors::detect();
        let method = request.method().clone();
        let path = request.uri().path().to_owned();
        let query = request.uri().query().map(str::to_owned);
        let content_length = request
            .headers()
            .get(axum::http::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if self.verbose >= 2 {
            eprintln!(
                "{} - DEBUG - {}Request:{} {} {}{} ({} bytes)",
                timestamp(),
                colors.dim,
                colors.reset,
                method,
                path,
                query.as_deref().map(|q| format!("?{q}")).unwrap_or_default(),
                describe_length(content_length),
            );
        }

        let start = Instant::now();
        let response = next.run(request).await;
        let status = response.status();
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        eprintln!(
            "{} - INFO - {}{}{} {}{}{} -> {}{}{} in {}{:.1}ms{}",
            timestamp(),
            colors.cyan,
            method,
            colors.reset,
            colors.blue,
            path,
            colors.reset,
            colors.status_color(status),
            status.as_u16(),
            colors.reset,
            colors.magenta,
            duration_ms,
            colors.reset
        );

        if self.verbose < 2 {
            return response;
        }

        let (parts, body) = response.into_parts();
        let Ok(bytes) = axum::body::to_bytes(body, usize::MAX).await else {
            return Response::from_parts(parts, Body::empty());
        };
        if !bytes.is_empty() && bytes.len() <= MAX_LOGGED_BODY {
            let rendered = serde_json::from_slice::<serde_json::Value>(&bytes)
                .ok()
                .and_then(|json| serde_json::to_string_pretty(&json).ok())
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
            eprintln!(
                "{} - DEBUG - {}Response body:{}\n{}{}{}",
                timestamp(),
                colors.dim,
                colors.reset,
                colors.gray,
                rendered,
                colors.reset
            );
        }
        Response::from_parts(parts, Body::from(bytes))
    }
}
