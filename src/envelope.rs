//! The `{ success, data?, message? }` wrapper every backend call answers with.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, Notification, FALLBACK_MESSAGE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self { success: true, data: Some(data), message: Some(message.into()) }
    }

    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self { success: true, data: None, message: Some(message.into()) }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { success: false, data: None, message: Some(message.into()) }
    }

    /// Message to show the user, with the generic fallback when the backend sent none.
    pub fn display_message(&self) -> &str {
        match self.message.as_deref() {
            Some(m) if !m.trim().is_empty() => m,
            _ => FALLBACK_MESSAGE,
        }
    }

    /// Success with or without a payload; failures become `AppError::Application`.
    pub fn into_result(self) -> AppResult<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(AppError::application("request_failed", self.display_message()))
        }
    }

    /// Success that must carry a payload.
    pub fn into_data(self) -> AppResult<T> {
        if !self.success {
            return Err(AppError::application("request_failed", self.display_message()));
        }
        self.data.ok_or_else(|| AppError::application("missing_data", "Response carried no data"))
    }

    pub fn notification(&self) -> Notification {
        if self.success {
            Notification::success(self.display_message())
        } else {
            Notification::error(self.display_message())
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope { success: self.success, data: self.data.map(f), message: self.message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn decodes_minimal_failure() {
        let env: Envelope<Value> = serde_json::from_value(json!({"success": false})).unwrap();
        assert!(!env.success);
        assert!(env.data.is_none());
        assert_eq!(env.display_message(), FALLBACK_MESSAGE);
    }

    #[test]
    fn null_data_is_absent() {
        let env: Envelope<Value> =
            serde_json::from_value(json!({"success": true, "data": null, "message": "ok"})).unwrap();
        assert!(env.data.is_none());
        assert!(env.clone().into_data().is_err());
        assert_eq!(env.into_result().unwrap(), None);
    }

    #[test]
    fn failure_surfaces_backend_message() {
        let env: Envelope<Value> = Envelope::fail("Wrong password");
        let err = env.into_result().unwrap_err();
        assert_eq!(err.message(), "Wrong password");
        assert!(matches!(err, AppError::Application { .. }));
    }

    #[test]
    fn serializes_without_absent_fields() {
        let v = serde_json::to_value(Envelope::<Value>::ok_empty("done")).unwrap();
        assert_eq!(v, json!({"success": true, "message": "done"}));
    }
}
