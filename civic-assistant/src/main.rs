//! Civic Fix Assistant Lambda - Triages citizen reports before they are stored.
//!
//! Endpoints:
//! - POST / - Process an assistant event (report triage or UI hints)
//! - GET /reports/recent - Newest stored reports, for building the duplicate window
//! - OPTIONS * - CORS pre-flight

use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use shared::http::{error_response, json_response, preflight_response, ApiResponse};
use shared::{db, Assistant, AssistantRequest, Config, PgReportStore, ReportStore, TriageDecision};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Application state shared across requests.
struct AppState<S> {
    assistant: Assistant<S>,
    recent_reports_limit: i64,
}

async fn handler<S: ReportStore>(state: Arc<AppState<S>>, event: Request) -> Result<Response<Body>, Error> {
    let method = event.method().as_str();
    let path = event.uri().path();

    info!("Assistant request: {} {}", method, path);

    match method {
        "OPTIONS" => preflight_response(),
        "GET" if path.trim_end_matches('/').ends_with("/reports/recent") => {
            let limit = event
                .query_string_parameters()
                .first("limit")
                .and_then(|l| l.parse().ok())
                .unwrap_or(state.recent_reports_limit);

            match state.assistant.recent_reports(limit).await {
                Ok(reports) => json_response(200, &ApiResponse::success(reports)),
                Err(e) => {
                    error!("Failed to load recent reports: {}", e);
                    error_response(500, "Failed to load recent reports")
                }
            }
        }
        "POST" => triage(&state.assistant, event.body()).await,
        _ => error_response(405, "Method not allowed"),
    }
}

async fn triage<S: ReportStore>(assistant: &Assistant<S>, body: &Body) -> Result<Response<Body>, Error> {
    let outcome = match serde_json::from_slice::<AssistantRequest>(body.as_ref()) {
        Ok(request) => assistant.handle(&request).await,
        Err(e) => Err(shared::Error::Serialization(e)),
    };

    match outcome {
        Ok(decision) => json_response(200, &decision),
        Err(e) => {
            error!("Error processing request: {}", e);
            json_response(500, &TriageDecision::error(e.to_string()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;
    let pool = db::connect(&config).await?;

    let state = Arc::new(AppState {
        assistant: Assistant::new(PgReportStore::new(pool)),
        recent_reports_limit: config.recent_reports_limit,
    });

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::MemoryReportStore;

    fn state() -> Arc<AppState<MemoryReportStore>> {
        Arc::new(AppState {
            assistant: Assistant::new(MemoryReportStore::new()),
            recent_reports_limit: 2,
        })
    }

    fn request(method: &str, uri: &str, body: Body) -> Request {
        lambda_http::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(body)
            .unwrap()
    }

    fn body_json(response: &Response<Body>) -> serde_json::Value {
        serde_json::from_slice(response.body().as_ref()).unwrap()
    }

    fn post(json: serde_json::Value) -> Request {
        request("POST", "/", Body::from(json.to_string()))
    }

    #[tokio::test]
    async fn test_preflight() {
        let response = handler(state(), request("OPTIONS", "/", Body::Empty)).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
        assert!(response.body().as_ref().is_empty());
    }

    #[tokio::test]
    async fn test_new_report_round_trip() {
        let response = handler(
            state(),
            post(serde_json::json!({
                "event": "new_report",
                "report": {
                    "title": "Water pipe leak",
                    "description": "A water pipe is leaking near the park gate",
                    "coordinates": {"lat": 23.36, "lon": 85.33},
                    "images": ["pipe_leak.jpg"],
                    "user_id": "citizen-1",
                    "timestamp": "2024-05-02T10:00:00.000Z"
                },
                "recent_reports": [],
                "user_role": "citizen",
                "ui_version": "1.4.0"
            })),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), 200);
        let body = body_json(&response);
        assert_eq!(body["status"], "success");
        assert_eq!(body["category"], "Water");
        assert_eq!(body["address"], "GEOCODE_REQUIRED");
        assert_eq!(body["need_reverse_geocode"], true);
        assert_eq!(body["coordinates_returned"], serde_json::json!({"lat": 23.36, "lon": 85.33}));
        assert_eq!(body["image_objects"], serde_json::json!([{"label": "water_issue", "confidence": 0.7}]));
        assert_eq!(body["duplicate"], false);
        assert!(body["duplicate_of"].is_null());
        assert!(body["ocr_text"].is_null());
        assert!(body["report_id"].is_string());
    }

    #[tokio::test]
    async fn test_missing_report_is_500() {
        let response = handler(state(), post(serde_json::json!({"event": "image_upload"})))
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        let body = body_json(&response);
        assert_eq!(body["status"], "error");
        assert_eq!(body["error_message"], "Report data is required for image_upload events");
        assert_eq!(body["priority"], "low");
        assert_eq!(body["priority_score"], 0.0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_500() {
        let response = handler(state(), request("POST", "/", Body::from("{not json")))
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        assert_eq!(body_json(&response)["status"], "error");
    }

    #[tokio::test]
    async fn test_unknown_event_gets_generic_response() {
        let response = handler(state(), post(serde_json::json!({"event": "map_opened"})))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = body_json(&response);
        assert_eq!(body["status"], "success");
        assert_eq!(body["category"], "Other");
        assert_eq!(body["explainability"], "Processing generic event with default response");
    }

    #[tokio::test]
    async fn test_recent_reports_endpoint() {
        let state = state();
        for title in ["Pothole near bridge", "Broken streetlight", "Garbage not collected"] {
            let response = handler(
                state.clone(),
                post(serde_json::json!({
                    "event": "new_report",
                    "report": {"title": title, "description": "reported by a resident of ward 9", "user_id": "citizen-3"}
                })),
            )
            .await
            .unwrap();
            assert_eq!(response.status(), 200);
        }

        let response = handler(state, request("GET", "/reports/recent", Body::Empty))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = body_json(&response);
        assert_eq!(body["success"], true);
        let reports = body["data"].as_array().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0]["title"], "Garbage not collected");
    }

    #[tokio::test]
    async fn test_missing_event_gets_generic_response() {
        for json in [serde_json::json!({}), serde_json::json!({"event": null})] {
            let response = handler(state(), post(json)).await.unwrap();

            assert_eq!(response.status(), 200);
            let body = body_json(&response);
            assert_eq!(body["status"], "success");
            assert_eq!(body["explainability"], "Processing generic event with default response");
        }
    }

    #[tokio::test]
    async fn test_ignored_report_never_fails_ui_events() {
        let response = handler(
            state(),
            post(serde_json::json!({
                "event": "admin_login",
                "report": {"coordinates": {"lat": 1}},
                "recent_reports": [{"title": 42}]
            })),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), 200);
        let body = body_json(&response);
        assert_eq!(body["status"], "success");
        assert_eq!(
            body["ui_actions"]["hide_elements_on_admin_login"],
            serde_json::json!(["report_issue", "about_us", "view_map", "admin_button"])
        );
    }

    #[tokio::test]
    async fn test_recent_report_without_id_is_still_triaged() {
        let response = handler(
            state(),
            post(serde_json::json!({
                "event": "new_report",
                "report": {"title": "Open drain", "description": "open drain near the primary well"},
                "recent_reports": [{"title": "Open drain", "description": "open drain near the primary well"}]
            })),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), 200);
        let body = body_json(&response);
        assert_eq!(body["duplicate"], true);
        assert_eq!(body["duplicate_of"], "");
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let response = handler(state(), request("DELETE", "/", Body::Empty)).await.unwrap();
        assert_eq!(response.status(), 405);
    }
}
