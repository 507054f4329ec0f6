use semaphore_sms::{
    ApiKey, ListQuery, MessageId, MessageStatus, MessageText, RawPhoneNumber, Recipients,
    SemaphoreClient, SemaphoreConfig, SemaphoreError, SendMessage, SenderId, SqliteStore,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer, store: SqliteStore) -> SemaphoreClient {
    SemaphoreClient::builder(ApiKey::new("test_key").unwrap())
        .sender_name(SenderId::new("SHOP").unwrap())
        .base_url(format!("{}/api/v4/", server.uri()))
        .user_agent("semaphore-sms-tests")
        .store(store)
        .build()
        .unwrap()
}

#[tokio::test]
async fn send_posts_json_and_persists_to_sqlite() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v4/messages"))
        .and(body_partial_json(json!({
            "apikey": "test_key",
            "sendername": "SHOP",
            "number": "09171234567,09181234567",
            "message": "hello",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"message_id": 1001, "recipient": "639171234567", "status": "Pending"},
            {"message_id": 1002, "recipient": "639181234567", "status": "Pending"},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = SqliteStore::open_in_memory().await.unwrap();
    let client = client(&server, store.clone()).await;

    let recipients = Recipients::many(vec![
        RawPhoneNumber::new("09171234567").unwrap(),
        RawPhoneNumber::new("09181234567").unwrap(),
    ])
    .unwrap();
    let messages = client
        .send(SendMessage::new(recipients, MessageText::new("hello").unwrap()))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(messages.len(), 2);
    assert!(messages.all_stored());
    assert_eq!(store.count("semaphore_messages").await.unwrap(), 2);
}

#[tokio::test]
async fn find_updates_the_stored_message_in_place() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/messages/1001"))
        .and(query_param("apikey", "test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"message_id": 1001, "recipient": "639171234567", "status": "Sent"},
        ])))
        .mount(&server)
        .await;

    let store = SqliteStore::open_in_memory().await.unwrap();
    let client = client(&server, store.clone()).await;
    let id = MessageId::new("1001").unwrap();

    client.find(&id).await.unwrap();
    let found = client.find(&id).await.unwrap();

    assert!(found.is_stored());
    assert_eq!(found.record().status, Some(MessageStatus::Sent));
    assert_eq!(store.count("semaphore_messages").await.unwrap(), 1);
}

#[tokio::test]
async fn account_balance_is_refreshed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "account_id": 12345,
            "account_name": "Example Shop",
            "status": "Active",
            "credit_balance": 4999,
        })))
        .mount(&server)
        .await;

    let store = SqliteStore::open_in_memory().await.unwrap();
    let client = client(&server, store.clone()).await;

    let account = client.account().await.unwrap();
    assert!(account.is_stored());
    assert_eq!(account.record().credit_balance, "4999");
    assert_eq!(store.count("semaphore_accounts").await.unwrap(), 1);
}

#[tokio::test]
async fn list_endpoints_forward_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/account/users"))
        .and(query_param("page", "2"))
        .and(query_param("sendername", "SHOP"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"user_id": 7, "email": "ops@example.com", "role": "Owner"},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = SqliteStore::open_in_memory().await.unwrap();
    let client = client(&server, store.clone()).await;

    let users = client.users(&ListQuery::page(2)).await.unwrap().unwrap();
    assert_eq!(
        users.first().unwrap().record().email.as_deref(),
        Some("ops@example.com")
    );
    assert_eq!(store.count("semaphore_users").await.unwrap(), 1);
}

#[tokio::test]
async fn provider_field_errors_surface_as_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v4/otp"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "number": ["The number format is invalid."],
        })))
        .mount(&server)
        .await;

    let store = SqliteStore::open_in_memory().await.unwrap();
    let client = client(&server, store.clone()).await;

    let err = client
        .otp(
            RawPhoneNumber::new("123").unwrap(),
            MessageText::new("Your code is {otp}").unwrap(),
        )
        .await
        .unwrap_err();

    match err {
        SemaphoreError::InvalidRequest(err) => {
            assert_eq!(err.status, 400);
            assert_eq!(err.message, "The number format is invalid.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(store.count("semaphore_messages").await.unwrap(), 0);
}

#[tokio::test]
async fn server_errors_map_to_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/account/transactions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let store = SqliteStore::open_in_memory().await.unwrap();
    let client = client(&server, store).await;

    let err = client
        .transactions(&ListQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn configured_database_mirrors_sent_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v4/priority"))
        .and(body_partial_json(json!({"apikey": "from-config"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"message_id": 77, "recipient": "639171234567", "status": "Queued"},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let database = dir.path().join("semaphore.db");
    let config = SemaphoreConfig {
        api_key: "from-config".to_owned(),
        base_url: format!("{}/api/v4/", server.uri()),
        database: Some(database.clone()),
        ..SemaphoreConfig::default()
    };

    let client = SemaphoreClient::from_config(&config).await.unwrap();
    let sent = client
        .priority(SendMessage::new(
            RawPhoneNumber::new("09171234567").unwrap(),
            MessageText::new("urgent").unwrap(),
        ))
        .await
        .unwrap()
        .unwrap();
    assert!(sent.all_stored());

    let store = SqliteStore::open(&database).await.unwrap();
    assert_eq!(store.count("semaphore_messages").await.unwrap(), 1);
}
