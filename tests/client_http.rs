use mockito::Server;
use std::io::Write;
use std::time::Duration;
use tasktab::client::{ApiClient, ApiError};

#[tokio::test]
async fn test_lists_are_fetched_with_bearer_token() {
    let mut server = Server::new_async().await;

    let mock_lists = server
        .mock("GET", "/lists")
        .match_header("authorization", "Bearer secret-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id":"a1","title":"Home"},{"id":2,"title":"Work"}]"#)
        .create_async()
        .await;

    // Trailing slash on the base url must not produce "//lists"
    let client = ApiClient::new(&format!("{}/", server.url()), "secret-token", true).unwrap();
    let lists = client.get_lists().await.unwrap();

    mock_lists.assert_async().await;
    assert_eq!(lists.len(), 2);
    assert_eq!(lists[0].title, "Home");
    assert_eq!(lists[1].id, "2");
}

#[tokio::test]
async fn test_tasks_are_unwrapped_from_page() {
    let mut server = Server::new_async().await;

    let mock_tasks = server
        .mock("GET", "/lists/a1/tasks")
        .match_header("authorization", "Bearer t")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": "a1",
                "title": "Home",
                "tasks": [
                    {"id": "t1", "title": "Laundry", "detail": "whites", "done": false, "limit": "2025-05-23T04:01:00.000Z"},
                    {"id": "t2", "title": "Dishes", "done": true, "limit": "2025-05-20T00:00:00Z"}
                ]
            }"#,
        )
        .create_async()
        .await;

    let client = ApiClient::new(&server.url(), "t", true).unwrap();
    let tasks = client.get_tasks("a1").await.unwrap();

    mock_tasks.assert_async().await;
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].detail.as_deref(), Some("whites"));
    assert!(tasks[1].done);
    assert_eq!(tasks[0].limit.to_rfc3339(), "2025-05-23T04:01:00+00:00");
}

#[tokio::test]
async fn test_error_status_carries_server_message() {
    let mut server = Server::new_async().await;

    let _m = server
        .mock("GET", "/lists")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"ErrorCode":403,"ErrorMessageJP":"認証エラー","ErrorMessageEN":"authentication failed"}"#,
        )
        .create_async()
        .await;

    let client = ApiClient::new(&server.url(), "expired", true).unwrap();
    let err = client.get_lists().await.unwrap_err();

    match &err {
        ApiError::Status { status, message } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(message, "authentication failed");
        }
        other => panic!("expected a status error, got {:?}", other),
    }
    assert_eq!(err.to_string(), "401 Unauthorized: authentication failed");
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let mut server = Server::new_async().await;

    let _m = server
        .mock("GET", "/lists/x/tasks")
        .with_status(200)
        .with_body(r#"{"tasks":[{"id":"t1","title":"no deadline","done":false}]}"#)
        .create_async()
        .await;

    let client = ApiClient::new(&server.url(), "t", true).unwrap();
    let err = client.get_tasks("x").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "{:?}", err);
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    // Port 1 is never served in the test environment
    let client = ApiClient::new("http://127.0.0.1:1", "t", true).unwrap();
    let err = client.get_lists().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{:?}", err);
}

#[tokio::test]
async fn test_null_task_collection_is_empty() {
    let mut server = Server::new_async().await;

    let _m = server
        .mock("GET", "/lists/a1/tasks")
        .with_status(200)
        .with_body(r#"{"id":"a1","title":"Home","tasks":null}"#)
        .create_async()
        .await;

    let client = ApiClient::new(&server.url(), "t", true).unwrap();
    let tasks = client.get_tasks("a1").await.unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_list_id_is_sent_as_a_single_segment() {
    let mut server = Server::new_async().await;

    let mock_tasks = server
        .mock("GET", "/lists/a%20b%2Fc/tasks")
        .with_status(200)
        .with_body(r#"{"tasks":[]}"#)
        .expect(1)
        .create_async()
        .await;

    let client = ApiClient::new(&server.url(), "t", true).unwrap();
    let tasks = client.get_tasks("a b/c").await.unwrap();

    mock_tasks.assert_async().await;
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_hung_request_times_out() {
    let mut server = Server::new_async().await;

    // Headers go out straight away, the body only after two seconds
    let _m = server
        .mock("GET", "/lists")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_secs(2));
            w.write_all(b"[]")
        })
        .create_async()
        .await;

    let client = ApiClient::new(&server.url(), "t", true)
        .unwrap()
        .with_timeout(Duration::from_millis(200));
    let err = client.get_lists().await.unwrap_err();

    assert!(matches!(err, ApiError::Timeout(_)), "{:?}", err);
    assert_eq!(err.to_string(), "request timed out after 0s");
}
