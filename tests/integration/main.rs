//! Integration tests: model client against a mock server, dispatcher end to
//! end, and the HTTP API through the router.

mod chat_client;
mod dispatch;
mod http_api;
mod mock_server;
