use roombook_config::{AppConfig, AutoReleaseConfig, GraphConfig, ServerConfig};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::auth::{ClientCredentialsProvider, TokenProvider};
use crate::client::GraphClient;

pub const TENANT: &str = "tenant-1";
pub const TOKEN_PATH: &str = "/tenant-1/oauth2/v2.0/token";

pub fn create_mock_config(server: &MockServer) -> AppConfig {
    create_mock_config_for_uri(&server.uri())
}

pub fn create_mock_config_for_uri(uri: &str) -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        graph: GraphConfig {
            tenant_id: TENANT.to_string(),
            client_id: "client-1".to_string(),
            client_secret: "shh".to_string(),
            authority_host: uri.to_string(),
            base_url: format!("{}/v1.0", uri),
            ..GraphConfig::default()
        },
        cors: Default::default(),
        logging: Default::default(),
        use_auto_release: true,
        auto_release: Some(AutoReleaseConfig::default()),
    }
}

pub fn create_client(config: &AppConfig) -> GraphClient {
    let http = reqwest::Client::new();
    let tokens: Arc<dyn TokenProvider> =
        Arc::new(ClientCredentialsProvider::new(&config.graph, http.clone()));
    GraphClient::new(config, tokens, http).expect("client builds")
}

pub async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": token
        })))
        .mount(server)
        .await;
}

pub async fn mount_token_failure(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        })))
        .mount(server)
        .await;
}
