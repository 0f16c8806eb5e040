//! ApiGateway - the single chokepoint for backend calls.
//!
//! The backend exposes one POST endpoint that accepts a command envelope.
//! The payload is JSON-encoded *into a string* and nested inside the outer
//! JSON body, and the response carries its `data` the same way:
//!
//! ```text
//! request:  {"command": "translate", "data": "{\"text\":\"hello\"}"}
//! response: {"status": "ok", "command": "translate", "data": "{\"result\":\"你好\"}"}
//! ```
//!
//! The double encoding is part of the wire contract and must be kept as is.

use async_trait::async_trait;
use lingo_core::config::ApiConfig;
use lingo_core::error::UNKNOWN_BACKEND_ERROR;
use lingo_core::{LingoError, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outer request body sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub command: String,
    /// JSON-encoded payload object.
    pub data: String,
}

/// Application-level status reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// Response body as it arrives on the wire. `data` is normally a string
/// holding JSON, but an already-decoded value is tolerated.
#[derive(Debug, Deserialize)]
struct RawBackendResponse {
    status: ResponseStatus,
    command: String,
    #[serde(default)]
    data: Value,
}

/// A successful, fully decoded backend response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendResponse<T = Value> {
    pub status: ResponseStatus,
    pub command: String,
    pub data: T,
}

/// Anything that can deliver a command to the backend.
#[async_trait]
pub trait CommandSender: Send + Sync {
    /// Sends `command` with an optional payload object.
    async fn send_command(&self, command: &str, payload: Option<Value>)
    -> Result<BackendResponse>;
}

/// HTTP client for the backend command endpoint.
#[derive(Clone, Debug)]
pub struct ApiGateway {
    client: Client,
    endpoint: String,
}

impl ApiGateway {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.endpoint.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends a serializable payload and decodes the response data into `T`.
    pub async fn send_typed<P, T>(&self, command: &str, payload: &P) -> Result<BackendResponse<T>>
    where
        P: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_value(payload)?;
        let response = self.send_command(command, Some(payload)).await?;
        Ok(BackendResponse {
            status: response.status,
            command: response.command,
            data: serde_json::from_value(response.data)?,
        })
    }

    async fn post(&self, envelope: &CommandEnvelope) -> Result<BackendResponse> {
        tracing::debug!(
            "[ApiGateway] Request command={} data={}",
            envelope.command,
            envelope.data
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(envelope)
            .send()
            .await
            .map_err(|err| LingoError::transport(format!("Backend request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body_text));
        }

        let body_text = response
            .text()
            .await
            .map_err(|err| LingoError::transport(format!("Failed to read backend response: {err}")))?;
        let raw: RawBackendResponse = serde_json::from_str(&body_text)?;

        decode_raw(raw)
    }
}

#[async_trait]
impl CommandSender for ApiGateway {
    async fn send_command(
        &self,
        command: &str,
        payload: Option<Value>,
    ) -> Result<BackendResponse> {
        let envelope = encode_request(command, payload)?;
        let result = self.post(&envelope).await;
        if let Err(err) = &result {
            tracing::error!("[ApiGateway] Command '{}' failed: {}", command, err);
        }
        result
    }
}

/// Builds the request envelope. A missing or `null` payload becomes `{}`.
pub fn encode_request(command: &str, payload: Option<Value>) -> Result<CommandEnvelope> {
    let payload = match payload {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(value) => value,
    };

    Ok(CommandEnvelope {
        command: command.to_string(),
        data: serde_json::to_string(&payload)?,
    })
}

/// Decodes a response body, parsing the nested `data` string.
///
/// Returns `LingoError::Backend` when the backend reports `status: "error"`.
pub fn decode_response(body: &str) -> Result<BackendResponse> {
    let raw: RawBackendResponse = serde_json::from_str(body)?;
    decode_raw(raw)
}

fn decode_raw(raw: RawBackendResponse) -> Result<BackendResponse> {
    let data = match raw.data {
        Value::String(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        other => other,
    };

    if raw.status == ResponseStatus::Error {
        let message = data
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(UNKNOWN_BACKEND_ERROR);
        return Err(LingoError::backend(message));
    }

    Ok(BackendResponse {
        status: raw.status,
        command: raw.command,
        data,
    })
}

fn map_http_error(status: StatusCode, body: &str) -> LingoError {
    if status == StatusCode::UNPROCESSABLE_ENTITY {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("detail").cloned())
            .map(|d| d.to_string())
            .unwrap_or_else(|| body.to_string());
        tracing::error!("[ApiGateway] Validation failed (422): {}", detail);
        return LingoError::validation(detail);
    }

    LingoError::Http {
        status: status.as_u16(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_nests_payload_as_string() {
        let envelope = encode_request("x", Some(json!({"a": 1}))).unwrap();
        assert_eq!(envelope.data, "{\"a\":1}");

        let body = serde_json::to_value(&envelope).unwrap();
        assert_eq!(body, json!({"command": "x", "data": "{\"a\":1}"}));
    }

    #[test]
    fn test_encode_missing_payload_is_empty_object() {
        assert_eq!(encode_request("x", None).unwrap().data, "{}");
        assert_eq!(encode_request("x", Some(Value::Null)).unwrap().data, "{}");
    }

    #[test]
    fn test_decode_parses_nested_data() {
        let response =
            decode_response(r#"{"status":"ok","command":"x","data":"{\"b\":2}"}"#).unwrap();

        assert_eq!(response.status, ResponseStatus::Ok);
        assert_eq!(response.command, "x");
        assert_eq!(response.data, json!({"b": 2}));
    }

    #[test]
    fn test_decode_keeps_unparseable_data_as_string() {
        let response =
            decode_response(r#"{"status":"ok","command":"x","data":"plain text"}"#).unwrap();
        assert_eq!(response.data, json!("plain text"));
    }

    #[test]
    fn test_decode_accepts_already_decoded_data() {
        let response = decode_response(r#"{"status":"ok","command":"x","data":{"b":2}}"#).unwrap();
        assert_eq!(response.data, json!({"b": 2}));
    }

    #[test]
    fn test_decode_error_status_uses_message() {
        let err = decode_response(
            r#"{"status":"error","command":"x","data":"{\"message\":\"scene locked\"}"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "scene locked");
    }

    #[test]
    fn test_decode_error_status_without_message() {
        let err = decode_response(r#"{"status":"error","command":"x","data":"{}"}"#).unwrap_err();
        assert!(err.is_backend());
        assert_eq!(err.to_string(), UNKNOWN_BACKEND_ERROR);
    }

    #[test]
    fn test_decode_malformed_body_is_serialization_error() {
        let err = decode_response("<html>").unwrap_err();
        assert!(matches!(err, LingoError::Serialization { .. }));
    }

    #[test]
    fn test_map_http_error_distinguishes_validation() {
        let validation = map_http_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","data"],"msg":"str type expected"}]}"#,
        );
        let generic = map_http_error(StatusCode::INTERNAL_SERVER_ERROR, "");

        match &validation {
            LingoError::Validation { detail } => assert!(detail.contains("str type expected")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_ne!(validation.to_string(), generic.to_string());
        assert_eq!(generic.to_string(), "HTTP Error: 500");
    }
}
