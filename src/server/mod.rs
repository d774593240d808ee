pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::ChatError;
use crate::gemini::GeminiClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gemini: Arc<GeminiClient>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ChatError> {
        let gemini = GeminiClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            gemini: Arc::new(gemini),
        })
    }
}

pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/api/chat", post(handlers::handle_chat))
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn build_and_run(state: AppState) -> Result<(), ChatError> {
    let listener =
        tokio::net::TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], state.config.port))).await?;
    let addr = listener.local_addr()?;

    tracing::info!("Gemini chat running on http://localhost:{}", addr.port());

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::test_config;
    use crate::gemini::fake;

    const UNREACHABLE: &str = "http://127.0.0.1:1";

    fn app(api_base: &str, static_dir: &Path) -> Router {
        let mut config = test_config(api_base);
        config.static_dir = static_dir.to_path_buf();
        router(AppState::new(config).unwrap())
    }

    async fn post_chat(app: Router, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_chat_requires_message() {
        let dir = tempfile::tempdir().unwrap();
        for body in [
            r#"{"message": ""}"#,
            r#"{"message": "   "}"#,
            r#"{}"#,
            r#"{"message": 42}"#,
            "not json",
        ] {
            let (status, json) = post_chat(app(UNREACHABLE, dir.path()), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(json, json!({ "error": "Message is required." }));
        }
    }

    #[tokio::test]
    async fn test_chat_renders_reply() {
        let dir = tempfile::tempdir().unwrap();
        let base = fake::fixed(StatusCode::OK, fake::reply("**Hi** there\n\n- one\n- two")).await;
        let (status, json) = post_chat(app(&base, dir.path()), r#"{"message": "hello"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["reply"], "**Hi** there\n\n- one\n- two");
        assert_eq!(
            json["html"],
            "<p><strong>Hi</strong> there</p><ul><li>one</li><li>two</li></ul>"
        );
    }

    #[tokio::test]
    async fn test_chat_escapes_model_markup() {
        let dir = tempfile::tempdir().unwrap();
        let base = fake::fixed(StatusCode::OK, fake::reply("<script>alert(1)</script>")).await;
        let (status, json) = post_chat(app(&base, dir.path()), r#"{"message": "hi"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["html"], "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>");
    }

    #[tokio::test]
    async fn test_chat_provider_failure() {
        let dir = tempfile::tempdir().unwrap();
        let (status, json) = post_chat(app(UNREACHABLE, dir.path()), r#"{"message": "hi"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json,
            json!({ "reply": "Something went wrong.", "html": "<p>Something went wrong.</p>" })
        );
    }

    #[tokio::test]
    async fn test_chat_provider_error_status() {
        let dir = tempfile::tempdir().unwrap();
        let base = fake::fixed(
            StatusCode::FORBIDDEN,
            json!({ "error": { "code": 403, "message": "API key not valid" } }),
        )
        .await;
        let (status, json) = post_chat(app(&base, dir.path()), r#"{"message": "hi"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["reply"], "Something went wrong.");
    }

    #[tokio::test]
    async fn test_serves_static_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>chat</h1>").unwrap();

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app(UNREACHABLE, dir.path()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"<h1>chat</h1>");

        let request = Request::builder().uri("/missing.js").body(Body::empty()).unwrap();
        let response = app(UNREACHABLE, dir.path()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("origin", "http://example.com")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"message": ""}"#))
            .unwrap();
        let response = app(UNREACHABLE, dir.path()).oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }
}
