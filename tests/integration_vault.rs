// tests/integration_vault.rs

use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;
use vault_appid::{Config, ConnectionConfig, Credentials, Operation, VaultClient, VaultError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const APP_ID: &str = "01bd2fe7-e5ab-47c8-ad48-9888ae6348a5";
const USER_ID: &str = "0ecd7b5d-4885-45c1-a03f-5949e485c6bf";

/// App ID login response in the format Vault returns it.
fn login_response(token: &str, lease_duration: u64) -> serde_json::Value {
    serde_json::json!({
        "request_id": "test-request-id",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": null,
        "wrap_info": null,
        "warnings": null,
        "auth": {
            "client_token": token,
            "accessor": "",
            "policies": ["default", "myapp"],
            "metadata": {"app-id": "sha1:app", "user-id": "sha1:user"},
            "lease_duration": lease_duration,
            "renewable": true
        }
    })
}

fn secret_response(data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "request_id": "test-request-id",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 2764800,
        "data": data,
        "wrap_info": null,
        "warnings": null,
        "auth": null
    })
}

async fn mount_login(mock_server: &MockServer, token: &str, lease_duration: u64, times: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/auth/app-id/login"))
        .and(body_json(serde_json::json!({"app_id": APP_ID, "user_id": USER_ID})))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_response(token, lease_duration)))
        .expect(times)
        .mount(mock_server)
        .await;
}

async fn vault_client(mock_server: &MockServer) -> VaultClient {
    VaultClient::builder()
        .env_fallback(false)
        .endpoint(mock_server.uri())
        .secrets_path("secret/myapp/")
        .app_id(APP_ID)
        .user_id(USER_ID)
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_read_secret() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, "token-1", 3600, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/myapp/database"))
        .and(header("X-Vault-Token", "token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(secret_response(
            serde_json::json!({"username": "admin", "password": "secret123"}),
        )))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = vault_client(&mock_server).await;

    let secret = client.read("database").await.unwrap();
    assert_eq!(secret.get("username").unwrap(), "admin");
    assert_eq!(secret.get("password").unwrap(), "secret123");

    // Token is cached, login mock expects a single call.
    client.read("database").await.unwrap();
}

#[tokio::test]
async fn test_expired_token_triggers_new_login() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, "token-1", 1, 2).await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/myapp/database"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(secret_response(serde_json::json!({"k": "v"}))),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = vault_client(&mock_server).await;
    client.read("database").await.unwrap();

    tokio::time::sleep(Duration::from_millis(1100)).await;

    client.read("database").await.unwrap();
}

#[tokio::test]
async fn test_rejected_login() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/app-id/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "errors": ["invalid user ID or app ID"]
        })))
        .mount(&mock_server)
        .await;

    let result = VaultClient::builder()
        .env_fallback(false)
        .endpoint(mock_server.uri())
        .app_id(APP_ID)
        .user_id(USER_ID)
        .build()
        .await;

    match result {
        Err(VaultError::Authentication { status, errors }) => {
            assert_eq!(status, 400);
            assert_eq!(errors, vec!["invalid user ID or app ID"]);
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("login should have been rejected"),
    }
}

#[tokio::test]
async fn test_secret_not_found() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, "token-1", 3600, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/myapp/nonexistent"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({"errors": []})))
        .mount(&mock_server)
        .await;

    let client = vault_client(&mock_server).await;
    let err = client.read("nonexistent").await.unwrap_err();

    assert!(
        matches!(err, VaultError::SecretNotFound { ref path } if path == "secret/myapp/nonexistent"),
        "unexpected error: {}",
        err
    );
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, "token-1", 3600, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/myapp/database"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "errors": ["Vault is sealed"]
        })))
        .mount(&mock_server)
        .await;

    let client = vault_client(&mock_server).await;
    let err = client.read("database").await.unwrap_err();

    match &err {
        VaultError::Transport {
            operation, path, ..
        } => {
            assert_eq!(*operation, Operation::Read);
            assert_eq!(path, "secret/myapp/database");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.to_string().contains("Vault is sealed"));
}

#[tokio::test]
async fn test_write_list_delete() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, "token-1", 3600, 1).await;

    Mock::given(method("PUT"))
        .and(path("/v1/secret/myapp/services/db"))
        .and(header("X-Vault-Token", "token-1"))
        .and(body_json(serde_json::json!({"password": "hunter2"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/myapp/services/"))
        .and(query_param("list", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(secret_response(serde_json::json!({"keys": ["db"]}))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/v1/secret/myapp/services/db"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = vault_client(&mock_server).await;

    let data = HashMap::from([("password".to_string(), serde_json::json!("hunter2"))]);
    client.write("services/db", &data).await.unwrap();

    let listed = client.list("services/").await.unwrap();
    assert_eq!(listed.get("keys").unwrap(), &serde_json::json!(["db"]));

    client.delete("services/db").await.unwrap();
}

#[tokio::test]
async fn test_client_from_config_files() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, "token-1", 0, 1).await;

    let mut user_id_file = NamedTempFile::new().unwrap();
    write!(user_id_file, r#"{{"UserID": "{}"}}"#, USER_ID).unwrap();

    let mut config_file = NamedTempFile::new().unwrap();
    let config_json = serde_json::json!({
        "SecretsPath": "secret/myapp/",
        "VaultConnection": {"EndPoint": mock_server.uri(), "TimeoutSecs": 5}
    });
    write!(config_file, "{}", config_json).unwrap();

    let mut credentials_file = NamedTempFile::new().unwrap();
    let credentials_json = serde_json::json!({
        "AppID": APP_ID,
        "UserIDFile": user_id_file.path()
    });
    write!(credentials_file, "{}", credentials_json).unwrap();

    let config = Config::from_file(config_file.path()).unwrap();
    let credentials = Credentials::from_file(credentials_file.path()).unwrap();
    let client = VaultClient::new(config, credentials).await.unwrap();

    assert_eq!(client.credentials().user_id, USER_ID);
    assert_eq!(client.connection().endpoint, mock_server.uri());
    assert_eq!(client.session().get_token().await.unwrap(), "token-1");
}

#[tokio::test]
async fn test_sub_second_timeout() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, "token-1", 3600, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/myapp/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(secret_response(serde_json::json!({"k": "v"})))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = VaultClient::builder()
        .env_fallback(false)
        .endpoint(mock_server.uri())
        .timeout(Duration::from_millis(500))
        .secrets_path("secret/myapp/")
        .app_id(APP_ID)
        .user_id(USER_ID)
        .build()
        .await
        .unwrap();

    let err = client.read("slow").await.unwrap_err();

    assert!(matches!(
        err,
        VaultError::Transport { operation: Operation::Read, .. }
    ));
    assert!(matches!(err.root_cause(), VaultError::Request(_)));
}

#[tokio::test]
async fn test_unreachable_vault() {
    let config = Config {
        secrets_path: "secret/myapp/".to_string(),
        connection: ConnectionConfig::new("http://127.0.0.1:1"),
    };

    let result = VaultClient::new(config, Credentials::new(APP_ID, USER_ID)).await;

    assert!(matches!(result, Err(VaultError::Request(_))));
}
