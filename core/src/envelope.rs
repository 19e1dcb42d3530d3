//! The `{status, message, data}` wrapper shared by every enveloped endpoint.

use serde::{Deserialize, Serialize};

/// Normalized response returned by service functions regardless of source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(status: u16, data: T) -> Self {
        Self {
            status,
            message: None,
            data,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            status: self.status,
            message: self.message,
            data: f(self.data),
        }
    }
}

/// Body of an acknowledgement that carries no data.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Ack {
    pub status: u16,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<Ack> for Envelope<()> {
    fn from(ack: Ack) -> Self {
        Envelope {
            status: ack.status,
            message: ack.message,
            data: (),
        }
    }
}

/// Error body as sent by the backend; only `message` is relied upon.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_status_is_rejected() {
        let result: Result<Envelope<Vec<String>>, _> =
            serde_json::from_str(r#"{"status":"200","data":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn message_is_optional() {
        let env: Envelope<Vec<String>> =
            serde_json::from_str(r#"{"status":200,"data":["군대"]}"#).unwrap();
        assert_eq!(env.status, 200);
        assert!(env.message.is_none());
        assert_eq!(env.data, vec!["군대".to_string()]);
    }

    #[test]
    fn ack_converts_to_unit_envelope() {
        let ack: Ack = serde_json::from_str(r#"{"status":200,"message":"성공"}"#).unwrap();
        let env: Envelope<()> = ack.into();
        assert_eq!(env.message.as_deref(), Some("성공"));
    }
}
