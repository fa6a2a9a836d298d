use std::net::TcpListener;
use std::sync::Arc;

use keygate::configuration::JwtSettings;
use keygate::startup::run;
use keygate::store::MemoryStore;

async fn spawn_app() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let store = Arc::new(MemoryStore::new());
    let jwt = JwtSettings {
        access_secret: "integration-access-secret-32-chars!!".to_string(),
        refresh_secret: "integration-refresh-secret-32-chars!".to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 604800,
    };
    let server = run(listener, store.clone(), store, jwt).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn health_check_works() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/health_check", &address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}
