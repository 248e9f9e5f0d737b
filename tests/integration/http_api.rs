//! HTTP API through the axum router

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use bdd_forge::config::OutputLayout;
use bdd_forge::model::ScriptedModel;
use bdd_forge::server::{router, AppState};
use bdd_forge::{Dispatcher, ForgeConfig};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app(model: Arc<ScriptedModel>, root: &Path, timeout: Duration) -> Router {
    let config = ForgeConfig {
        output: OutputLayout::rooted_at(root),
        ..ForgeConfig::default()
    };
    router(AppState::new(Dispatcher::new(&config, model), timeout))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_reports_liveness() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(Arc::new(ScriptedModel::default()), dir.path(), Duration::from_secs(5));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"message": "QA Test Generation API is running"})
    );
}

#[tokio::test]
async fn generate_returns_content_and_filename() {
    let dir = tempfile::tempdir().unwrap();
    let model = Arc::new(ScriptedModel::repeating("Feature: Search"));
    let app = app(model, dir.path(), Duration::from_secs(5));

    let response = app
        .oneshot(post_json(
            "/generate",
            json!({
                "requirement": "User searches for a product and sees results",
                "agentType": "test_generator",
                "featureName": "search",
                "iterations": 1
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["content"], "Feature: Search");
    assert_eq!(body["filename"], "search.feature");
}

#[tokio::test]
async fn validation_failures_are_bad_requests() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(
        Arc::new(ScriptedModel::repeating("unused")),
        dir.path(),
        Duration::from_secs(5),
    );

    let response = app
        .oneshot(post_json(
            "/generate",
            json!({"requirement": "xq zz 9 !!", "agentType": "test_generator"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Please provide a meaningful request"));
}

#[tokio::test]
async fn malformed_bodies_get_the_structured_error_shape() {
    let dir = tempfile::tempdir().unwrap();
    let model = Arc::new(ScriptedModel::repeating("unused"));
    let app = app(model.clone(), dir.path(), Duration::from_secs(5));

    let bodies = [
        "{not json".to_string(),
        json!({"requirement": "Verify the login page", "iterations": "two"}).to_string(),
    ];
    for body in bodies {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
        let json = json_body(response).await;
        assert_eq!(json["status"], "error", "{}", body);
        assert!(!json["message"].as_str().unwrap().is_empty());
    }
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn unknown_agent_type_is_a_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(
        Arc::new(ScriptedModel::repeating("unused")),
        dir.path(),
        Duration::from_secs(5),
    );

    let response = app
        .oneshot(post_json(
            "/generate",
            json!({"requirement": "Verify the login page", "agentType": "robot"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["message"].as_str().unwrap().contains("robot"));
}

#[tokio::test]
async fn slow_generation_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let model =
        Arc::new(ScriptedModel::repeating("Feature: Slow").with_delay(Duration::from_secs(5)));
    let app = app(model, dir.path(), Duration::from_millis(50));

    let response = app
        .oneshot(post_json(
            "/generate",
            json!({"requirement": "Verify the login page", "agentType": "test_generator"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    let body = json_body(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Taking too long to generate"));
}

#[tokio::test]
async fn timed_out_generation_leaves_no_artifact_behind() {
    let dir = tempfile::tempdir().unwrap();
    let model =
        Arc::new(ScriptedModel::repeating("Feature: Slow").with_delay(Duration::from_millis(100)));
    let app = app(model.clone(), dir.path(), Duration::from_millis(50));

    let response = app
        .oneshot(post_json(
            "/generate",
            json!({
                "requirement": "Verify the login page",
                "agentType": "test_generator",
                "featureName": "slow",
                "iterations": 1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

    // long enough for both model calls and the write had the task survived
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(model.calls(), 1);
    assert!(!dir.path().join("features/slow.feature").exists());
    assert!(!dir.path().join("features").exists());
}

#[tokio::test]
async fn download_serves_generated_files_as_attachments() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("test_scripts")).unwrap();
    std::fs::write(dir.path().join("test_scripts/test_login.py"), "def test(): pass").unwrap();
    let app = app(Arc::new(ScriptedModel::default()), dir.path(), Duration::from_secs(5));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/download/test_login.py")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=test_login.py"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_EXPOSE_HEADERS],
        "Content-Disposition"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"def test(): pass");
}

#[tokio::test]
async fn download_of_missing_or_escaping_names_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("secret.txt"), "x").unwrap();
    let app = app(Arc::new(ScriptedModel::default()), dir.path(), Duration::from_secs(5));

    for uri in ["/download/missing.feature", "/download/..%2Fsecret.txt"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn upload_is_combined_with_the_typed_requirement() {
    let dir = tempfile::tempdir().unwrap();
    let model = Arc::new(ScriptedModel::repeating("Feature: Upload"));
    let app = app(model.clone(), dir.path(), Duration::from_secs(5));

    let boundary = "X-BOUNDARY";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"requirement\"\r\n\r\n\
         Cover password reset\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"agentType\"\r\n\r\n\
         test_generator\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"iterations\"\r\n\r\n\
         1\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"story.md\"\r\n\
         Content-Type: text/markdown\r\n\r\n\
         As a user I want to reset my password by email\r\n\
         --{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/generate-with-file")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "success");

    let first = &model.prompts()[0].text;
    assert!(first.contains("User Input:\nCover password reset\n\nFile Content:\nAs a user"));
    assert!(dir.path().join("uploads/story.md").is_file());
    assert_eq!(model.calls(), 2);
}

#[tokio::test]
async fn upload_without_a_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(Arc::new(ScriptedModel::default()), dir.path(), Duration::from_secs(5));

    let body = "--B\r\nContent-Disposition: form-data; name=\"agentType\"\r\n\r\ntest_generator\r\n--B--\r\n";
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/generate-with-file")
                .header(header::CONTENT_TYPE, "multipart/form-data; boundary=B")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "No file uploaded");
}
