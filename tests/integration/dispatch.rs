//! Dispatcher end to end, with a scripted model and with the real client

use crate::mock_server::MockServerFixture;
use bdd_forge::config::OutputLayout;
use bdd_forge::model::ScriptedModel;
use bdd_forge::types::ResponseStatus;
use bdd_forge::{Dispatcher, ForgeConfig, GenerateRequest, RoutingStrategy, UiFramework};
use std::fs;
use std::path::Path;
use std::sync::Arc;

const LOGIN_REQUIREMENT: &str =
    "User can log in with valid credentials and sees a welcome page";

fn config(root: &Path) -> ForgeConfig {
    ForgeConfig {
        output: OutputLayout::rooted_at(root),
        ..ForgeConfig::default()
    }
}

#[tokio::test]
async fn login_requirement_produces_a_feature_file() {
    let dir = tempfile::tempdir().unwrap();
    let model = Arc::new(ScriptedModel::new([
        "```gherkin\nFeature: Login\n  Scenario: draft\n    Given a user\n```",
        "<think>missing failure case</think>\nFeature: Login\n  Scenario: v2",
        "Feature: Login\n  Scenario: Valid credentials\n    Given a registered user\n    When they log in\n    Then they see a welcome page",
    ]));
    let dispatcher = Dispatcher::new(&config(dir.path()), model.clone());

    let request = GenerateRequest::new("test_generator", LOGIN_REQUIREMENT)
        .with_feature_name("login")
        .with_iterations(2);
    let response = dispatcher.route_request(&request).await;

    assert_eq!(response.status, ResponseStatus::Success, "{}", response.message);
    assert_eq!(response.filename.as_deref(), Some("login.feature"));
    assert_eq!(model.calls(), 3);

    let written = fs::read_to_string(dir.path().join("features/login.feature")).unwrap();
    assert_eq!(written, response.content);
    assert!(written.contains("Then they see a welcome page"));
    assert!(model.prompts()[0].text.contains(LOGIN_REQUIREMENT));
}

#[tokio::test]
async fn unknown_agent_type_is_named_in_the_error() {
    let dir = tempfile::tempdir().unwrap();
    let model = Arc::new(ScriptedModel::repeating("unused"));
    let dispatcher = Dispatcher::new(&config(dir.path()), model.clone());

    let response = dispatcher
        .route_request(&GenerateRequest::new("cypress_generator", LOGIN_REQUIREMENT))
        .await;

    assert_eq!(response.status, ResponseStatus::Error);
    assert!(response.message.contains("cypress_generator"));
    assert!(response.message.contains("test_generator"));
    assert_eq!(model.calls(), 0);
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn agent_type_matching_ignores_case() {
    let dir = tempfile::tempdir().unwrap();
    let model = Arc::new(ScriptedModel::repeating("Feature: Login"));
    let dispatcher = Dispatcher::new(&config(dir.path()), model.clone());

    let response = dispatcher
        .route_request(
            &GenerateRequest::new("Test_Generator", LOGIN_REQUIREMENT)
                .with_feature_name("login.feature")
                .with_iterations(1),
        )
        .await;
    assert!(response.is_success(), "{}", response.message);
    assert_eq!(response.filename.as_deref(), Some("login.feature"));
    assert_eq!(model.calls(), 2);
}

#[tokio::test]
async fn unsupported_language_fails_without_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let model = Arc::new(ScriptedModel::repeating("unused"));
    let dispatcher = Dispatcher::new(&config(dir.path()), model);

    let response = dispatcher
        .route_request(
            &GenerateRequest::new("selenium_generator", "Click the login button")
                .with_language("ruby"),
        )
        .await;
    assert_eq!(response.status, ResponseStatus::Error);
    assert!(response
        .message
        .starts_with("Currently only Python is supported for Selenium scripts"));
    assert!(!dir.path().join("test_scripts").exists());
}

#[tokio::test]
async fn content_routing_sends_database_requests_to_the_database_template() {
    let dir = tempfile::tempdir().unwrap();
    let model = Arc::new(ScriptedModel::repeating("def test_rollback(): pass"));
    let dispatcher = Dispatcher::new(&config(dir.path()), model.clone())
        .with_strategy(RoutingStrategy::Content(UiFramework::Selenium));

    let response = dispatcher
        .route_request(
            &GenerateRequest::new(
                "test_generator",
                "Verify a failed transfer triggers a rollback of both accounts",
            )
            .with_test_name("transfer"),
        )
        .await;

    assert!(response.is_success(), "{}", response.message);
    assert!(dir
        .path()
        .join("generated_tests/selenium/test_transfer.py")
        .is_file());
    assert!(model.prompts()[0].text.contains("pytest database"));
}

#[tokio::test]
async fn real_client_drives_the_refinement_loop() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_reply("Feature: Checkout", 3).await;
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = Dispatcher::from_config(&fixture.config(dir.path())).unwrap();

    let response = dispatcher
        .route_request(
            &GenerateRequest::new("test_generator", "User can check out a cart with two items")
                .with_feature_name("checkout"),
        )
        .await;

    assert!(response.is_success(), "{}", response.message);
    assert_eq!(response.content, "Feature: Checkout");
    mock.assert_async().await;
}
