use axum::{
    extract::State,
    http::{ header::CONTENT_TYPE, HeaderMap, StatusCode },
    response::IntoResponse,
    routing::{ get, post },
    Json,
    Router,
};
use serde_json::{ json, Value };
use std::sync::{ Arc, Mutex };
use subconscious_chat::client::ChatClient;
use subconscious_chat::models::chat::{ ChatResponse, ConversationMessage };
use subconscious_chat::ClientError;
use tokio::net::TcpListener;

async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[derive(Clone, Default)]
struct Captured {
    seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn capture_chat(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    captured.seen.lock().unwrap().push((content_type, body));
    Json(json!({ "answer": "hi", "sources": [], "metadata": {} }))
}

#[tokio::test]
async fn success_response_is_decoded_verbatim() {
    let captured = Captured::default();
    let app = Router::new()
        .route("/api/chat", post(capture_chat))
        .with_state(captured.clone());
    let client = ChatClient::new(spawn_backend(app).await);

    let resp = client.send_chat_message("hello", &[]).await.unwrap();

    let expected: ChatResponse = serde_json::from_value(
        json!({ "answer": "hi", "sources": [], "metadata": {} })
    ).unwrap();
    assert_eq!(resp, expected);

    let seen = captured.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0.as_deref(), Some("application/json"));
    assert_eq!(seen[0].1, json!({ "message": "hello", "conversation_history": [] }));
}

#[tokio::test]
async fn history_is_sent_in_order() {
    let captured = Captured::default();
    let app = Router::new()
        .route("/api/chat", post(capture_chat))
        .with_state(captured.clone());
    let client = ChatClient::new(spawn_backend(app).await);

    let history = vec![
        ConversationMessage::user("one"),
        ConversationMessage::assistant("two"),
        ConversationMessage::user("three"),
    ];
    client.send_chat_message("four", &history).await.unwrap();

    let seen = captured.seen.lock().unwrap();
    let body = seen[0].1.as_object().unwrap();
    assert_eq!(body.len(), 2);
    assert_eq!(body["message"], json!("four"));
    assert_eq!(
        body["conversation_history"],
        json!([
            { "role": "user", "content": "one" },
            { "role": "assistant", "content": "two" },
            { "role": "user", "content": "three" }
        ])
    );
}

#[tokio::test]
async fn error_body_becomes_the_message() {
    let app = Router::new().route(
        "/api/chat",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "internal error") })
    );
    let client = ChatClient::new(spawn_backend(app).await);

    let err = client.send_chat_message("hello", &[]).await.unwrap_err();

    assert!(matches!(err, ClientError::Backend { .. }));
    assert_eq!(err.to_string(), "internal error");
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
}

#[tokio::test]
async fn empty_error_body_reports_status_code() {
    let app = Router::new().route(
        "/api/chat",
        post(|| async { StatusCode::SERVICE_UNAVAILABLE })
    );
    let client = ChatClient::new(spawn_backend(app).await);

    let err = client.send_chat_message("hello", &[]).await.unwrap_err();

    assert!(err.to_string().contains("503"), "got: {}", err);
}

#[tokio::test]
async fn connection_reset_surfaces_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((socket, _)) = listener.accept().await {
            drop(socket);
        }
    });
    let client = ChatClient::new(format!("http://{}", addr));

    let err = client.send_chat_message("hello", &[]).await.unwrap_err();

    match err {
        ClientError::Transport(inner) => assert!(inner.status().is_none()),
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn refused_connection_surfaces_transport_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let client = ChatClient::new(format!("http://{}", addr));

    let err = client.send_chat_message("hello", &[]).await.unwrap_err();

    match err {
        ClientError::Transport(inner) => assert!(inner.is_connect()),
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn non_json_success_body_is_a_decode_error() {
    let app = Router::new().route(
        "/api/chat",
        post(|| async { (StatusCode::OK, "<html>not json</html>").into_response() })
    );
    let client = ChatClient::new(spawn_backend(app).await);

    let err = client.send_chat_message("hello", &[]).await.unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn health_is_decoded() {
    let app = Router::new().route(
        "/health",
        get(|| async { Json(json!({ "status": "ok", "rag_service_ready": false })) })
    );
    let client = ChatClient::new(spawn_backend(app).await);

    let health = client.health().await.unwrap();

    assert_eq!(health.status, "ok");
    assert!(!health.rag_service_ready);
}
