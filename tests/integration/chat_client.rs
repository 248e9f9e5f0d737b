//! ChatModelClient against a mocked chat-completions endpoint

use crate::mock_server::MockServerFixture;
use bdd_forge::config::ModelSettings;
use bdd_forge::model::ChatModelClient;
use bdd_forge::{ErrorKind, Prompt, TextModel};
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn returns_first_choice_content() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_reply("Feature: Login", 1).await;
    let dir = tempfile::tempdir().unwrap();
    let client = ChatModelClient::new(&fixture.config(dir.path())).unwrap();

    let reply = client
        .generate(&Prompt::new("be brief", "write a feature", ModelSettings::gherkin()))
        .await
        .unwrap();

    assert_eq!(reply, "Feature: Login");
    mock.assert_async().await;
}

#[tokio::test]
async fn sends_model_settings_and_both_messages() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "model": "mixtral-8x7b-32768",
            "max_tokens": 4000,
            "messages": [
                {"role": "system", "content": "system text"},
                {"role": "user", "content": "user text"}
            ]
        })))
        .with_status(200)
        .with_body(crate::mock_server::completion_body("ok"))
        .create_async()
        .await;
    let dir = tempfile::tempdir().unwrap();
    let client = ChatModelClient::new(&fixture.config(dir.path())).unwrap();

    client
        .generate(&Prompt::new("system text", "user text", ModelSettings::selenium()))
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn http_errors_surface_the_remote_message() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response(429, r#"{"error":{"message":"Rate limit reached"}}"#)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let client = ChatModelClient::new(&fixture.config(dir.path())).unwrap();

    let err = client
        .generate(&Prompt::new("", "hi", ModelSettings::gherkin()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Upstream);
    let message = err.to_string();
    assert!(message.contains("HTTP 429"), "{}", message);
    assert!(message.contains("Rate limit reached"), "{}", message);
}

#[tokio::test]
async fn empty_choices_are_an_upstream_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_json_response(200, r#"{"choices":[]}"#).await;
    let dir = tempfile::tempdir().unwrap();
    let client = ChatModelClient::new(&fixture.config(dir.path())).unwrap();

    let err = client
        .generate(&Prompt::new("", "hi", ModelSettings::gherkin()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upstream);
    assert!(err.to_string().contains("No response from model API"));
}
