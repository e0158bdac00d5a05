pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::prospect::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/prospect/search", post(handlers::handle_search))
        .route("/prospect/jobs", post(handlers::handle_create_job))
        .route("/prospect/status/:id", get(handlers::handle_job_status))
        .route("/prospect/list", get(handlers::handle_list_jobs))
        .route("/prospect/:id", delete(handlers::handle_delete_job))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::prospect::jobs::JobStore;
    use crate::prospect::pipeline::ProspectPipeline;
    use crate::prospect::prompts::PromptTemplate;
    use crate::prospect::test_support::{raw_profile, scored_reply, StubCompletion, StubSearch};
    use crate::search::RawProfile;

    fn app(search: StubSearch, llm: StubCompletion, config: Config) -> Router {
        build_router(AppState {
            pipeline: ProspectPipeline::new(
                Arc::new(search),
                Arc::new(llm),
                PromptTemplate::default(),
            ),
            jobs: JobStore::default(),
            config,
        })
    }

    fn candidates() -> Vec<RawProfile> {
        vec![
            raw_profile("https://linkedin.com/in/alice"),
            raw_profile("https://linkedin.com/in/bob"),
            raw_profile("https://linkedin.com/in/carol"),
        ]
    }

    fn working_app() -> Router {
        let candidates = candidates();
        app(
            StubSearch::returning(candidates.clone()),
            StubCompletion::replying(&scored_reply(&candidates)),
            Config::for_tests(),
        )
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_search_openai_rnd_returns_three_scored_profiles() {
        let response = working_app()
            .oneshot(post_json(
                "/prospect/search",
                json!({"company": "OpenAI", "search_term": "R&D", "max_profiles": 5}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let profiles = body.as_array().unwrap();
        assert_eq!(profiles.len(), 3);

        let urls: Vec<&str> = profiles.iter().map(|p| p["url"].as_str().unwrap()).collect();
        for candidate in candidates() {
            assert!(urls.contains(&candidate.url.as_str()));
        }
        for profile in profiles {
            for field in ["title", "url", "content", "score", "name", "position", "experience", "analysis"] {
                assert!(profile.get(field).is_some(), "missing {field}");
            }
        }
    }

    #[tokio::test]
    async fn test_search_caps_at_max_profiles() {
        let response = working_app()
            .oneshot(post_json(
                "/prospect/search",
                json!({"company": "OpenAI", "search_term": "R&D", "max_profiles": 2}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_provider_failure_is_502() {
        let response = app(
            StubSearch::failing(),
            StubCompletion::replying("[]"),
            Config::for_tests(),
        )
        .oneshot(post_json("/prospect/search", json!({"company": "OpenAI"})))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "SEARCH_PROVIDER_ERROR");
    }

    #[tokio::test]
    async fn test_completion_failure_is_502() {
        let response = app(
            StubSearch::returning(candidates()),
            StubCompletion::failing(),
            Config::for_tests(),
        )
        .oneshot(post_json("/prospect/search", json!({"company": "OpenAI"})))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(response).await["error"]["code"], "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_model_json_is_reported() {
        let response = app(
            StubSearch::returning(candidates()),
            StubCompletion::replying("{\"profiles\": [ nope"),
            Config::for_tests(),
        )
        .oneshot(post_json("/prospect/search", json!({"company": "OpenAI"})))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "INVALID_MODEL_RESPONSE");
        assert!(body["error"]["message"].as_str().unwrap().contains("not valid JSON"));
    }

    #[tokio::test]
    async fn test_missing_company_is_400() {
        let response = working_app()
            .oneshot(post_json("/prospect/search", json!({"search_term": "R&D"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ill_typed_body_is_400_json() {
        let response = working_app()
            .oneshot(post_json(
                "/prospect/search",
                json!({"company": "OpenAI", "max_profiles": -1}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("max_profiles"));
    }

    #[tokio::test]
    async fn test_broken_json_body_is_400_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/prospect/jobs")
            .header("content-type", "application/json")
            .body(Body::from("{\"company\": "))
            .unwrap();
        let response = working_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_default_company_applies() {
        let candidates = candidates();
        let config = Config {
            default_company: Some("OpenAI".to_string()),
            ..Config::for_tests()
        };
        let response = app(
            StubSearch::returning(candidates.clone()),
            StubCompletion::replying(&scored_reply(&candidates)),
            config,
        )
        .oneshot(post_json("/prospect/search", json!({})))
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_search_archives_results() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = candidates();
        let config = Config {
            results_dir: Some(dir.path().to_path_buf()),
            ..Config::for_tests()
        };
        let response = app(
            StubSearch::returning(candidates.clone()),
            StubCompletion::replying(&scored_reply(&candidates)),
            config,
        )
        .oneshot(post_json("/prospect/search", json!({"company": "Open AI"})))
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let archived = std::fs::read_to_string(dir.path().join("Open_AI.jsonl")).unwrap();
        assert_eq!(archived.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_archive_failure_keeps_response() {
        // A regular file where the archive directory should be.
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let candidates = candidates();
        let config = Config {
            results_dir: Some(blocker.path().to_path_buf()),
            ..Config::for_tests()
        };
        let response = app(
            StubSearch::returning(candidates.clone()),
            StubCompletion::replying(&scored_reply(&candidates)),
            config,
        )
        .oneshot(post_json("/prospect/search", json!({"company": "OpenAI"})))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_job_lifecycle_over_http() {
        let app = working_app();

        let response = app
            .clone()
            .oneshot(post_json("/prospect/jobs", json!({"company": "OpenAI", "max_profiles": 5})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let accepted = json_body(response).await;
        let id = accepted["request_id"].as_str().unwrap().to_string();

        let mut job = Value::Null;
        for _ in 0..50 {
            let response = app
                .clone()
                .oneshot(get_request(&format!("/prospect/status/{id}")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            job = json_body(response).await;
            if job["status"] != "processing" {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(job["status"], "completed");
        assert_eq!(job["profiles"].as_array().unwrap().len(), 3);

        let list = json_body(app.clone().oneshot(get_request("/prospect/list")).await.unwrap()).await;
        assert_eq!(list["total"], 1);
        assert_eq!(list["searches"][0]["request_id"], id.as_str());

        let deleted = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/prospect/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::OK);

        let gone = app
            .oneshot(get_request(&format!("/prospect/status/{id}")))
            .await
            .unwrap();
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_failed_job_records_error() {
        let app = app(
            StubSearch::failing(),
            StubCompletion::replying("[]"),
            Config::for_tests(),
        );
        let accepted = json_body(
            app.clone()
                .oneshot(post_json("/prospect/jobs", json!({"company": "OpenAI"})))
                .await
                .unwrap(),
        )
        .await;
        let id = accepted["request_id"].as_str().unwrap().to_string();

        let mut job = Value::Null;
        for _ in 0..50 {
            job = json_body(
                app.clone()
                    .oneshot(get_request(&format!("/prospect/status/{id}")))
                    .await
                    .unwrap(),
            )
            .await;
            if job["status"] != "processing" {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(job["status"], "error");
        assert!(job["error"].as_str().unwrap().contains("usage limit exceeded"));
    }

    #[tokio::test]
    async fn test_unknown_job_is_404() {
        let id = uuid::Uuid::new_v4();
        let response = working_app()
            .oneshot(get_request(&format!("/prospect/status/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_job_id_is_400_json() {
        let app = working_app();
        let status = app
            .clone()
            .oneshot(get_request("/prospect/status/not-a-uuid"))
            .await
            .unwrap();
        assert_eq!(status.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(status).await["error"]["code"], "VALIDATION_ERROR");

        let deleted = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/prospect/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(deleted).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_health_and_root() {
        let app = working_app();
        let health = json_body(app.clone().oneshot(get_request("/health")).await.unwrap()).await;
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["environment"], "test");

        let root = json_body(app.oneshot(get_request("/")).await.unwrap()).await;
        assert_eq!(root["default_max_profiles"], 10);
    }
}
