//! The uniform `{success, data, message, error, statusCode}` response shape.

use agrimarket_common::AgriError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Message the backend sends when a request carried no session token.
/// Failures carrying it are expected for anonymous browsing and not logged.
pub const NO_TOKEN_MESSAGE: &str = "No token provided";

/// Rejection value used when a failure carries no backend body.
pub const FALLBACK_REJECTION: &str = "Something went wrong";

/// The backend sends `statusCode` either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusCode {
    Number(i64),
    Text(String),
}

impl StatusCode {
    pub fn is_ok(&self) -> bool {
        match self {
            StatusCode::Number(code) => *code == 200,
            StatusCode::Text(code) => code.trim() == "200",
        }
    }

    fn to_value(&self) -> Value {
        match self {
            StatusCode::Number(code) => Value::from(*code),
            StatusCode::Text(code) => Value::from(code.as_str()),
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusCode::Number(code) => write!(f, "{code}"),
            StatusCode::Text(code) => f.write_str(code),
        }
    }
}

/// A backend response body.
///
/// The envelope keys are read leniently into typed fields. Every other
/// top-level key lands in `extra`, as does any envelope key whose value has
/// an unexpected shape (a `message` object, a `"true"` success flag), so
/// serializing an envelope gives back the body exactly as it was received.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Envelope {
    pub success: bool,
    pub data: Option<Value>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub status_code: Option<StatusCode>,
    pub extra: Map<String, Value>,
}

impl Envelope {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            ..Self::default()
        }
    }

    /// Synthesized envelope for failures that produced no usable body.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Reads a response object. Never fails; see the type docs for how
    /// oddly shaped envelope keys are kept.
    pub fn from_body(mut body: Map<String, Value>) -> Self {
        let success = match body.remove("success") {
            Some(Value::Bool(flag)) => flag,
            Some(raw) => {
                let flag = loose_flag(&raw);
                body.insert("success".to_string(), raw);
                flag
            }
            None => false,
        };
        let status_code = match body.remove("statusCode") {
            Some(Value::Number(code)) if code.is_i64() => code.as_i64().map(StatusCode::Number),
            Some(Value::String(code)) => Some(StatusCode::Text(code)),
            Some(raw) => {
                let code = raw
                    .as_f64()
                    .filter(|code| code.fract() == 0.0)
                    .map(|code| StatusCode::Number(code as i64));
                body.insert("statusCode".to_string(), raw);
                code
            }
            None => None,
        };
        let data = body.remove("data");
        let message = text_field(&mut body, "message");
        let error = text_field(&mut body, "error");

        Self {
            success,
            data,
            message,
            error,
            status_code,
            extra: body,
        }
    }

    /// The envelope as a JSON object, raw values in `extra` taking precedence.
    pub fn to_body(&self) -> Map<String, Value> {
        let mut body = self.extra.clone();
        body.entry("success").or_insert(Value::Bool(self.success));
        if let Some(data) = &self.data {
            body.entry("data").or_insert_with(|| data.clone());
        }
        if let Some(message) = &self.message {
            body.entry("message").or_insert_with(|| Value::from(message.as_str()));
        }
        if let Some(error) = &self.error {
            body.entry("error").or_insert_with(|| Value::from(error.as_str()));
        }
        if let Some(code) = &self.status_code {
            body.entry("statusCode").or_insert_with(|| code.to_value());
        }
        body
    }

    /// `statusCode` is present and is neither `200` nor `"200"`.
    pub fn is_soft_failure(&self) -> bool {
        self.status_code.as_ref().is_some_and(|code| !code.is_ok())
    }

    pub fn is_missing_token(&self) -> bool {
        self.message.as_deref() == Some(NO_TOKEN_MESSAGE)
    }

    /// Soft failures are logged unless they only report a missing session token.
    pub fn should_log_failure(&self) -> bool {
        self.is_soft_failure() && !self.is_missing_token()
    }

    /// A non-ok `statusCode` wins over `success: true`; otherwise either the
    /// flag or an ok status code is enough.
    pub fn is_success(&self) -> bool {
        if self.is_soft_failure() {
            return false;
        }
        self.success || self.status_code.as_ref().is_some_and(StatusCode::is_ok)
    }

    pub fn failure_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| FALLBACK_REJECTION.to_string())
    }

    /// Maps the envelope into the tagged result used by the service layer.
    pub fn into_result(self) -> Result<Envelope, ServiceError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ServiceError::Backend(Box::new(self)))
        }
    }

    /// Takes `data`, treating an absent payload as `Value::Null`.
    pub fn into_data(self) -> Value {
        self.data.unwrap_or(Value::Null)
    }
}

fn loose_flag(raw: &Value) -> bool {
    match raw {
        Value::Bool(flag) => *flag,
        Value::String(text) => matches!(text.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

/// Strings are taken as-is; other non-null values are stringified for the
/// typed field and kept raw in the body.
fn text_field(body: &mut Map<String, Value>, key: &str) -> Option<String> {
    match body.remove(key)? {
        Value::String(text) => Some(text),
        Value::Null => {
            body.insert(key.to_string(), Value::Null);
            None
        }
        raw => {
            let text = raw.to_string();
            body.insert(key.to_string(), raw);
            Some(text)
        }
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_body().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Envelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(body) => Ok(Envelope::from_body(body)),
            other => Err(D::Error::custom(format!("expected an envelope object, got {other}"))),
        }
    }
}

/// Failure of a service call, as seen by dispatchers and views.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The backend answered, but with a failure envelope.
    #[error("{}", .0.failure_message())]
    Backend(Box<Envelope>),

    /// Local work around the call failed: encoding a request or persisting
    /// session state.
    #[error(transparent)]
    Local(#[from] AgriError),
}

impl ServiceError {
    /// The value handed to the store when an action is rejected: the
    /// backend body when there is one, the fallback literal otherwise.
    pub fn rejection_value(&self) -> Value {
        match self {
            ServiceError::Backend(envelope) => Value::Object(envelope.to_body()),
            ServiceError::Local(_) => Value::from(FALLBACK_REJECTION),
        }
    }

    pub fn envelope(&self) -> Option<&Envelope> {
        match self {
            ServiceError::Backend(envelope) => Some(envelope.as_ref()),
            ServiceError::Local(_) => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use agrimarket_common::storage_error;
    use serde_json::json;

    fn parse(body: Value) -> Envelope {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn accepts_numeric_and_string_ok_codes() {
        assert!(!parse(json!({"statusCode": 200})).is_soft_failure());
        assert!(!parse(json!({"statusCode": "200"})).is_soft_failure());
        assert!(parse(json!({"statusCode": 400})).is_soft_failure());
        assert!(parse(json!({"statusCode": "401"})).is_soft_failure());
        assert!(!parse(json!({"success": true})).is_soft_failure());
    }

    #[test]
    fn missing_token_failures_are_not_logged() {
        let envelope = parse(json!({"statusCode": 401, "message": NO_TOKEN_MESSAGE}));
        assert!(envelope.is_soft_failure());
        assert!(!envelope.should_log_failure());

        let envelope = parse(json!({"statusCode": 401, "message": "Token expired"}));
        assert!(envelope.should_log_failure());
    }

    #[test]
    fn non_ok_status_code_overrides_success_flag() {
        assert!(parse(json!({"success": true, "data": []})).into_result().is_ok());
        assert!(parse(json!({"statusCode": "200", "data": {}})).into_result().is_ok());
        assert!(parse(json!({"success": true, "statusCode": 500})).into_result().is_err());
        assert!(parse(json!({"message": "hello"})).into_result().is_err());
    }

    #[test]
    fn object_message_keeps_failure_semantics() {
        let body = json!({"success": false, "statusCode": 400, "message": {"phone": "required"}});
        let envelope = parse(body.clone());

        assert!(!envelope.success);
        assert_eq!(envelope.status_code, Some(StatusCode::Number(400)));
        assert!(envelope.should_log_failure());
        assert_eq!(envelope.failure_message(), r#"{"phone":"required"}"#);
        assert_eq!(serde_json::to_value(&envelope).unwrap(), body);
    }

    #[test]
    fn unknown_keys_and_odd_shapes_survive_serialization() {
        let body = json!({
            "success": "true",
            "statusCode": 200.0,
            "data": null,
            "error": null,
            "token": "t",
            "totalCount": 42
        });
        let envelope = parse(body.clone());

        assert!(envelope.success);
        assert_eq!(envelope.status_code, Some(StatusCode::Number(200)));
        assert_eq!(envelope.error, None);
        assert_eq!(envelope.extra["totalCount"], json!(42));
        assert_eq!(serde_json::to_value(&envelope).unwrap(), body);
    }

    #[test]
    fn rejection_value_is_backend_body_or_fallback() {
        let err = parse(json!({"success": false, "error": "Invalid OTP", "statusCode": 400, "attempts": 2}))
            .into_result()
            .unwrap_err();
        assert_eq!(
            err.rejection_value(),
            json!({"success": false, "error": "Invalid OTP", "statusCode": 400, "attempts": 2})
        );
        assert_eq!(err.to_string(), "Invalid OTP");

        let local = ServiceError::Local(storage_error("disk full"));
        assert_eq!(local.rejection_value(), json!(FALLBACK_REJECTION));
    }

    #[test]
    fn failure_message_prefers_error_then_message() {
        assert_eq!(Envelope::failure("boom").failure_message(), "boom");
        assert_eq!(parse(json!({"message": "nope"})).failure_message(), "nope");
        assert_eq!(parse(json!({})).failure_message(), FALLBACK_REJECTION);
    }

    #[test]
    fn non_object_bodies_are_not_envelopes() {
        assert!(serde_json::from_value::<Envelope>(json!([1, 2])).is_err());
    }
}
