pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::editor::handlers as editor;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Scoring engine
        .route("/api/v1/cv/analyze", post(analysis::handle_analyze))
        .route("/api/v1/cv/coach", post(analysis::handle_coach))
        // Editor history store
        .route(
            "/api/v1/editor/sessions",
            post(editor::handle_open_session),
        )
        .route(
            "/api/v1/editor/sessions/:id",
            get(editor::handle_get_session).delete(editor::handle_close_session),
        )
        .route(
            "/api/v1/editor/sessions/:id/commands",
            post(editor::handle_command),
        )
        .route(
            "/api/v1/editor/sessions/:id/save-status",
            put(editor::handle_save_status),
        )
        .route(
            "/api/v1/editor/sessions/:id/analyze",
            post(editor::handle_analyze_session),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::analyzer::{AnalyzerConfig, HeuristicAnalyzer};
    use crate::editor::persistence::MemoryStorage;
    use crate::editor::registry::SessionRegistry;

    fn test_app() -> Router {
        build_router(AppState {
            analyzer: Arc::new(HeuristicAnalyzer::new(AnalyzerConfig::default())),
            editor: Arc::new(SessionRegistry::new(Arc::new(MemoryStorage::new()))),
            llm: None,
        })
    }

    fn cv_json() -> Value {
        json!({
            "personalInfo": { "name": "John Doe", "email": "john@example.com" },
            "experience": [],
            "education": [],
            "skills": [],
            "projects": []
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let response = send(&app, "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["service"], "altocv-api");
    }

    #[tokio::test]
    async fn test_analyze_endpoint() {
        let app = test_app();
        let response = send(
            &app,
            "POST",
            "/api/v1/cv/analyze",
            Some(json!({ "cvContent": cv_json(), "targetRole": "Frontend Developer" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["backend"], "heuristic");
        let overall = body["analysis"]["overallScore"].as_u64().unwrap();
        assert!(overall <= 100);
        assert!(body["analysis"]["sectionScores"]["personalInfo"].is_u64());
        assert!(body["warnings"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_rejects_malformed_cv() {
        let app = test_app();
        let response = send(
            &app,
            "POST",
            "/api/v1/cv/analyze",
            Some(json!({ "cvContent": { "summary": "no personal info" } })),
        )
        .await;
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_coach_without_key_is_unavailable() {
        let app = test_app();
        let response = send(
            &app,
            "POST",
            "/api/v1/cv/coach",
            Some(json!({ "cvContent": cv_json() })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "LLM_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_editor_load_command_undo_flow() {
        let app = test_app();
        let response = send(
            &app,
            "POST",
            "/api/v1/editor/sessions",
            Some(json!({ "cvId": "cv-123", "content": cv_json() })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let opened = json_body(response).await;
        let id = opened["sessionId"].as_str().unwrap().to_string();
        assert_eq!(opened["historyIndex"], 0);

        let commands = format!("/api/v1/editor/sessions/{id}/commands");
        let edited = json_body(
            send(
                &app,
                "POST",
                &commands,
                Some(json!({ "action": "updateSummary", "summary": "Rust engineer" })),
            )
            .await,
        )
        .await;
        assert_eq!(edited["applied"], true);
        assert_eq!(edited["cv"]["summary"], "Rust engineer");
        assert_eq!(edited["canUndo"], true);

        let undone = json_body(send(&app, "POST", &commands, Some(json!({ "action": "undo" }))).await).await;
        assert_eq!(undone["historyIndex"], 0);
        assert!(undone["cv"].get("summary").is_none());
        assert_eq!(undone["canRedo"], true);

        let fetched = send(&app, "GET", &format!("/api/v1/editor/sessions/{id}"), None).await;
        assert_eq!(fetched.status(), StatusCode::OK);
        assert_eq!(json_body(fetched).await["historyLength"], 2);
    }

    #[tokio::test]
    async fn test_editor_save_status_and_analyze() {
        let app = test_app();
        let opened = json_body(
            send(
                &app,
                "POST",
                "/api/v1/editor/sessions",
                Some(json!({ "cvId": "cv-1", "content": cv_json() })),
            )
            .await,
        )
        .await;
        let id = opened["sessionId"].as_str().unwrap().to_string();

        let saved = json_body(
            send(
                &app,
                "PUT",
                &format!("/api/v1/editor/sessions/{id}/save-status"),
                Some(json!({ "isSaving": false, "lastSavedAt": "2026-01-15T10:00:00Z" })),
            )
            .await,
        )
        .await;
        assert_eq!(saved["lastSavedAt"], "2026-01-15T10:00:00Z");

        let analyzed = send(
            &app,
            "POST",
            &format!("/api/v1/editor/sessions/{id}/analyze"),
            Some(json!({})),
        )
        .await;
        assert_eq!(analyzed.status(), StatusCode::OK);

        send(
            &app,
            "POST",
            &format!("/api/v1/editor/sessions/{id}/commands"),
            Some(json!({ "action": "clearCv" })),
        )
        .await;
        let conflict = send(
            &app,
            "POST",
            &format!("/api/v1/editor/sessions/{id}/analyze"),
            Some(json!({})),
        )
        .await;
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_editor_close_and_missing_session() {
        let app = test_app();
        let opened = json_body(
            send(
                &app,
                "POST",
                "/api/v1/editor/sessions",
                Some(json!({ "cvId": "cv-1", "content": cv_json() })),
            )
            .await,
        )
        .await;
        let uri = format!("/api/v1/editor/sessions/{}", opened["sessionId"].as_str().unwrap());

        let closed = send(&app, "DELETE", &uri, None).await;
        assert_eq!(closed.status(), StatusCode::NO_CONTENT);

        let missing = send(&app, "GET", &uri, None).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(missing).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_open_session_requires_cv_id() {
        let app = test_app();
        let response = send(
            &app,
            "POST",
            "/api/v1/editor/sessions",
            Some(json!({ "cvId": "  ", "content": cv_json() })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
