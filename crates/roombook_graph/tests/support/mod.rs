//! Shared fixtures for the router tests.

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use roombook_config::{AppConfig, GraphConfig, ServerConfig};
use roombook_graph::auth::{ClientCredentialsProvider, TokenProvider};
use roombook_graph::{GraphClient, GraphState};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/tenant-1/oauth2/v2.0/token";

/// Creates a mock AppConfig pointing both services at `server`
pub fn create_mock_config(server: &MockServer) -> Arc<AppConfig> {
    Arc::new(AppConfig {
        server: ServerConfig::default(),
        graph: GraphConfig {
            tenant_id: "tenant-1".to_string(),
            client_id: "client-1".to_string(),
            client_secret: "shh".to_string(),
            authority_host: server.uri(),
            base_url: format!("{}/v1.0", server.uri()),
            ..GraphConfig::default()
        },
        cors: Default::default(),
        logging: Default::default(),
        use_auto_release: false,
        auto_release: None,
    })
}

pub fn create_state(config: Arc<AppConfig>) -> Arc<GraphState> {
    let http = reqwest::Client::new();
    let tokens: Arc<dyn TokenProvider> =
        Arc::new(ClientCredentialsProvider::new(&config.graph, http.clone()));
    let client = GraphClient::new(&config, tokens, http).expect("client builds");
    Arc::new(GraphState {
        client: Arc::new(client),
    })
}

pub async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": token, "expires_in": 3599 })),
        )
        .mount(server)
        .await;
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
