//! Shared wiremock fixtures for the membership API tests

use eventforge_domain::{AccountId, Config};
use eventforge_infra::MembershipClient;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-key";
pub const ACCOUNT_ID: AccountId = 42;

/// Configuration pointing both endpoints at `server`.
pub fn config_for(server: &MockServer, account_id: Option<AccountId>) -> Config {
    let mut config = Config::with_api_key(API_KEY);
    config.api.token_url = format!("{}/auth/token", server.uri());
    config.api.base_url = format!("{}/v2.2", server.uri());
    config.account_id = account_id;
    config
}

pub fn client_for(server: &MockServer, account_id: Option<AccountId>) -> MembershipClient {
    MembershipClient::from_config(&config_for(server, account_id)).expect("client")
}

/// Token endpoint answering with a one-hour token.
pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "tok-1", "expires_in": 3600 })),
        )
        .mount(server)
        .await;
}

pub fn event_json(id: u64, name: &str, start: &str, end: Option<&str>) -> Value {
    let mut event = json!({
        "Id": id,
        "Name": name,
        "StartDate": start,
        "Url": format!("https://api.example.org/v2.2/accounts/{ACCOUNT_ID}/events/{id}"),
        "Location": "Main Hall",
        "Tags": ["community"],
    });
    if let Some(end) = end {
        event["EndDate"] = json!(end);
    }
    event
}

pub fn event_path(id: u64) -> String {
    format!("/v2.2/accounts/{ACCOUNT_ID}/events/{id}")
}
