use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use store::Question;
use tracing::info;
use workflows::{
    models::API_KEY_HEADER,
    utils::{strip_trailing_slashes, workflows_url},
};

use crate::{error::AppError, state::AppState};

pub const MISSING_WORKFLOW_ID: &str = "Missing or invalid workflowId query parameter";
pub const MISSING_N8N_FIELDS: &str = "Missing or invalid baseUrl or apiKey";

#[derive(Deserialize)]
pub struct QuestionsQuery {
    #[serde(rename = "workflowId")]
    workflow_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowsProxyRequest {
    base_url: Option<String>,
    api_key: Option<String>,
    cursor: Option<String>,
}

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn questions_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<QuestionsQuery>, QueryRejection>,
) -> Result<Json<Vec<Question>>, AppError> {
    let workflow_id = query
        .ok()
        .and_then(|Query(query)| query.workflow_id)
        .filter(|workflow_id| !workflow_id.is_empty())
        .ok_or(AppError::MissingParameter(MISSING_WORKFLOW_ID))?;

    let questions = state
        .store
        .get_questions(&workflow_id)
        .await
        .map_err(|e| AppError::internal("Failed to fetch questions", e, state.config.environment))?;

    info!(%workflow_id, count = questions.len(), "Served questions");

    Ok(Json(questions))
}

/// Forwards a workflow listing to the caller's n8n instance, which browsers
/// can't call directly because of CORS.
pub async fn workflows_proxy_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WorkflowsProxyRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Ok(Json(payload)) = payload else {
        return Err(AppError::MissingParameter(MISSING_N8N_FIELDS));
    };

    let non_blank = |value: Option<String>| value.filter(|value| !value.trim().is_empty());
    let (Some(base_url), Some(api_key)) = (non_blank(payload.base_url), non_blank(payload.api_key))
    else {
        return Err(AppError::MissingParameter(MISSING_N8N_FIELDS));
    };

    let environment = state.config.environment;
    let failed = |e: &dyn std::fmt::Display| {
        AppError::internal("Failed to fetch workflows", e, environment)
    };

    let url = workflows_url(
        strip_trailing_slashes(base_url.trim()),
        payload.cursor.as_deref(),
    )
    .map_err(|e| failed(&e))?;

    info!(%url, "Proxying workflow listing");

    let upstream = state
        .http
        .get(url)
        .header(API_KEY_HEADER, api_key)
        .send()
        .await
        .map_err(|e| failed(&e))?;

    let status = upstream.status();
    if !status.is_success() {
        return Err(AppError::Upstream {
            status,
            message: format!(
                "n8n API request failed: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            ),
        });
    }

    let body = upstream.bytes().await.map_err(|e| failed(&e))?;

    Ok((status, [(CONTENT_TYPE, "application/json")], body).into_response())
}

pub async fn fallback_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use mockito::{Matcher, Server};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::{
        config::{Config, Environment},
        router,
        state::AppState,
    };

    fn app(supabase_url: &str, environment: Environment) -> Router {
        router(AppState::new(Config {
            port: 0,
            supabase_url: supabase_url.to_string(),
            service_role_key: "service-key".to_string(),
            environment,
        }))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(
            app("http://127.0.0.1:1", Environment::Production),
            get("/health"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_questions_missing_param() {
        let (status, body) = send(
            app("http://127.0.0.1:1", Environment::Production),
            get("/api/questions"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": super::MISSING_WORKFLOW_ID }));

        let (status, _) = send(
            app("http://127.0.0.1:1", Environment::Production),
            get("/api/questions?workflowId="),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_questions_empty_list() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/questions")
            .match_query(Matcher::UrlEncoded("workflow_id".into(), "eq.abc".into()))
            .match_header("apikey", "service-key")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let (status, body) = send(
            app(&server.url(), Environment::Production),
            get("/api/questions?workflowId=abc"),
        )
        .await;

        mock.assert_async().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_questions_list() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/v1/questions")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!([{
                    "id": "q1",
                    "question": "Why?",
                    "workflow_id": "abc",
                    "created_at": "2025-01-01T00:00:00.123456"
                }])
                .to_string(),
            )
            .create_async()
            .await;

        let (status, body) = send(
            app(&server.url(), Environment::Production),
            get("/api/questions?workflowId=abc"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], "q1");
        assert_eq!(body[0]["question"], "Why?");
        assert_eq!(body[0]["created_at"], "2025-01-01T00:00:00.123456");
    }

    #[tokio::test]
    async fn test_questions_error_hides_detail_in_production() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/v1/questions")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message":"Invalid API key"}"#)
            .create_async()
            .await;

        let (status, body) = send(
            app(&server.url(), Environment::Production),
            get("/api/questions?workflowId=abc"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch questions" }));
    }

    #[tokio::test]
    async fn test_questions_error_detail_in_development() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/v1/questions")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message":"Invalid API key"}"#)
            .create_async()
            .await;

        let (status, body) = send(
            app(&server.url(), Environment::Development),
            get("/api/questions?workflowId=abc"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch questions");
        assert_eq!(
            body["message"],
            "Failed to fetch questions: Invalid API key"
        );
    }

    #[tokio::test]
    async fn test_workflows_missing_fields() {
        let app = app("http://127.0.0.1:1", Environment::Production);

        let (status, body) = send(
            app.clone(),
            post_json("/api/n8n/workflows", r#"{"baseUrl":"https://n8n.example.com"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": super::MISSING_N8N_FIELDS }));

        let (status, _) = send(
            app.clone(),
            post_json("/api/n8n/workflows", r#"{"baseUrl":" ","apiKey":"key"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(app, post_json("/api/n8n/workflows", "not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_workflows_relays_upstream() {
        let mut n8n = Server::new_async().await;
        let mock = n8n
            .mock("GET", "/api/v1/workflows/")
            .match_query(Matcher::UrlEncoded("cursor".into(), "c2".into()))
            .match_header("x-n8n-api-key", "n8n-key")
            .with_status(200)
            .with_body(r#"{"data":[{"id":"1","name":"Sync"}],"nextCursor":null}"#)
            .create_async()
            .await;

        let request = json!({
            "baseUrl": format!("{}///", n8n.url()),
            "apiKey": "n8n-key",
            "cursor": "c2",
        });
        let (status, body) = send(
            app("http://127.0.0.1:1", Environment::Production),
            post_json("/api/n8n/workflows", &request.to_string()),
        )
        .await;

        mock.assert_async().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "data": [{ "id": "1", "name": "Sync" }], "nextCursor": null })
        );
    }

    #[tokio::test]
    async fn test_workflows_upstream_status() {
        let mut n8n = Server::new_async().await;
        n8n.mock("GET", "/api/v1/workflows/")
            .with_status(401)
            .with_body(r#"{"message":"unauthorized"}"#)
            .create_async()
            .await;

        let request = json!({ "baseUrl": n8n.url(), "apiKey": "wrong" });
        let (status, body) = send(
            app("http://127.0.0.1:1", Environment::Production),
            post_json("/api/n8n/workflows", &request.to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({ "error": "n8n API request failed: 401 Unauthorized" })
        );
    }

    #[tokio::test]
    async fn test_workflows_transport_failure() {
        let request = json!({ "baseUrl": "http://127.0.0.1:1", "apiKey": "key" });

        let (status, body) = send(
            app("http://127.0.0.1:1", Environment::Production),
            post_json("/api/n8n/workflows", &request.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch workflows" }));

        let (status, body) = send(
            app("http://127.0.0.1:1", Environment::Development),
            post_json("/api/n8n/workflows", &request.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _) = send(
            app("http://127.0.0.1:1", Environment::Production),
            get("/api/nope"),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
