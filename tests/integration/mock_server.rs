//! Mock chat-completions server for integration tests

use bdd_forge::config::OutputLayout;
use bdd_forge::ForgeConfig;
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use std::path::Path;

pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const TEST_API_KEY: &str = "test-key";

/// Owns a mock server and builds configs pointed at it.
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = format!("{}/v1", server.url());
        Self { server, base_url }
    }

    /// Config with the mock as model endpoint and `root` as output root.
    pub fn config(&self, root: &Path) -> ForgeConfig {
        ForgeConfig {
            api_key: Some(TEST_API_KEY.to_string()),
            base_url: self.base_url.clone(),
            http_timeout_secs: 5,
            output: OutputLayout::rooted_at(root),
            ..ForgeConfig::default()
        }
    }

    /// Successful completion whose first choice carries `content`, expected `hits` times.
    pub async fn mock_reply(&mut self, content: &str, hits: usize) -> Mock {
        self.server
            .mock("POST", COMPLETIONS_PATH)
            .match_header("authorization", format!("Bearer {}", TEST_API_KEY).as_str())
            .match_header("content-type", Matcher::Regex("application/json".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(content))
            .expect(hits)
            .create_async()
            .await
    }

    /// Raw JSON response with an arbitrary status.
    pub async fn mock_json_response(&mut self, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", COMPLETIONS_PATH)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }
}

pub fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}
