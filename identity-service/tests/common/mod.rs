use std::sync::Arc;

use auth::Authenticator;
use auth::HashingParams;
use auth::PasswordHasher;
use auth::TokenCodec;
use auth::TokenSettings;
use identity_service::inbound::http::router::create_router;
use identity_service::inbound::http::router::AppState;
use identity_service::outbound::repositories::InMemoryCredentialRepository;
use identity_service::outbound::repositories::InMemoryUserRepository;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TEST_ISSUER: &str = "org.example.identity";
pub const TEST_AUDIENCE: &str = "expenser";

/// Test application that spawns a real server over the in-memory stores
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub token_codec: TokenCodec,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Cheap hashing parameters keep the suite fast
        let password_hasher = PasswordHasher::with_params(HashingParams {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
            salt_length: 16,
            hash_length: 32,
        })
        .expect("Failed to build password hasher");

        let authenticator = Arc::new(Authenticator::new(
            TEST_SECRET,
            password_hasher,
            TokenSettings::new(TEST_ISSUER, TEST_AUDIENCE, 20_000_000),
        ));

        let state = AppState::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryCredentialRepository::new()),
            authenticator,
        );
        let router = create_router(state, &[]);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            token_codec: TokenCodec::new(TEST_SECRET),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    /// Helper to make GET request with a tokenId header
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).header("tokenId", token)
    }

    /// Helper to make PUT request with a tokenId header
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.put(self.url(path)).header("tokenId", token)
    }

    /// Helper to make DELETE request with a tokenId header
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(self.url(path))
            .header("tokenId", token)
    }

    /// Register a user and return the created profile
    pub async fn register(&self, username: &str, password: &str) -> serde_json::Value {
        let response = self
            .post("/systemuser")
            .json(&json!({
                "first_name": "Test",
                "last_name": "User",
                "email": format!("{}@example.com", username),
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Log in and return the issued token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response
            .headers()
            .get("tokenId")
            .expect("Missing tokenId header")
            .to_str()
            .expect("Invalid tokenId header")
            .to_string()
    }
}
