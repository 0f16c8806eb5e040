//! Drives the gateway against an in-process backend.

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use lingo_core::LingoError;
use lingo_interaction::{ApiGateway, CommandSender, ResponseStatus};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Mimics the backend: routes on `command` and answers with the string-encoded envelope.
async fn process(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let command = body["command"].as_str().unwrap_or_default().to_string();

    // The backend rejects anything whose `data` is not a string.
    let Some(data) = body["data"].as_str() else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": [{"loc": ["body", "data"], "msg": "str type expected"}]})),
        );
    };

    match command.as_str() {
        "echo" => {
            let result = json!({"raw": data});
            ok(&command, result.to_string())
        }
        "greet" => {
            let payload: Value = serde_json::from_str(data).unwrap();
            let name = payload["name"].as_str().unwrap_or("stranger");
            ok(&command, json!({"greeting": format!("hello {name}")}).to_string())
        }
        "plain" => ok(&command, "not json".to_string()),
        "locked" => error(&command, json!({"message": "scene locked"}).to_string()),
        "silent" => error(&command, "{}".to_string()),
        "strict" => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": [{"loc": ["body", "command"], "msg": "unknown command"}]})),
        ),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
    }
}

fn ok(command: &str, data: String) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({"status": "ok", "command": command, "data": data})),
    )
}

fn error(command: &str, data: String) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({"status": "error", "command": command, "data": data})),
    )
}

async fn spawn_backend() -> ApiGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/api/process", post(process));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ApiGateway::new(format!("http://{addr}/api/process"))
}

#[tokio::test]
async fn test_payload_travels_as_string() {
    let gateway = spawn_backend().await;

    let response = gateway
        .send_command("echo", Some(json!({"a": 1})))
        .await
        .unwrap();

    assert_eq!(response.status, ResponseStatus::Ok);
    assert_eq!(response.command, "echo");
    assert_eq!(response.data, json!({"raw": "{\"a\":1}"}));
}

#[tokio::test]
async fn test_missing_payload_sends_empty_object() {
    let gateway = spawn_backend().await;

    let response = gateway.send_command("echo", None).await.unwrap();
    assert_eq!(response.data, json!({"raw": "{}"}));
}

#[tokio::test]
async fn test_typed_round_trip() {
    #[derive(Serialize)]
    struct Greet<'a> {
        name: &'a str,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Greeting {
        greeting: String,
    }

    let gateway = spawn_backend().await;
    let response = gateway
        .send_typed::<_, Greeting>("greet", &Greet { name: "Ada" })
        .await
        .unwrap();

    assert_eq!(
        response.data,
        Greeting {
            greeting: "hello Ada".to_string()
        }
    );
}

#[tokio::test]
async fn test_unparseable_data_is_kept_as_string() {
    let gateway = spawn_backend().await;

    let response = gateway.send_command("plain", None).await.unwrap();
    assert_eq!(response.data, json!("not json"));
}

#[tokio::test]
async fn test_backend_error_message_is_surfaced() {
    let gateway = spawn_backend().await;

    let err = gateway.send_command("locked", None).await.unwrap_err();
    assert!(err.is_backend());
    assert_eq!(err.to_string(), "scene locked");

    let err = gateway.send_command("silent", None).await.unwrap_err();
    assert_eq!(err.to_string(), "Unknown Backend Error");
}

#[tokio::test]
async fn test_validation_status_is_distinct() {
    let gateway = spawn_backend().await;

    let validation = gateway.send_command("strict", None).await.unwrap_err();
    let generic = gateway.send_command("explode", None).await.unwrap_err();

    match &validation {
        LingoError::Validation { detail } => assert!(detail.contains("unknown command")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(matches!(generic, LingoError::Http { status: 500 }));
    assert_ne!(validation.to_string(), generic.to_string());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Reserve a port, then free it so nothing is listening there.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = ApiGateway::new(format!("http://{addr}/api/process"));
    let err = gateway.send_command("echo", None).await.unwrap_err();

    assert!(err.is_transport(), "unexpected error: {err:?}");
}
