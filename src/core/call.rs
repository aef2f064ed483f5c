use serde::{Deserialize, Serialize};

use super::error::BridgeError;

/// Which of the two call surfaces a method call targets.
///
/// Query operations are side-effect-free reads; command operations may
/// mutate backend state. Both carry the same payload and result shapes —
/// the distinction is semantic, not structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Query,
    Command,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Command => "command",
        }
    }
}

/// One inbound invocation: a method name plus an optional opaque payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodCall {
    pub channel: ChannelKind,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Vec<u8>>,
}

impl MethodCall {
    pub fn query(method: impl Into<String>, request: Option<Vec<u8>>) -> Self {
        Self {
            channel: ChannelKind::Query,
            method: method.into(),
            request,
        }
    }

    pub fn command(method: impl Into<String>, request: Option<Vec<u8>>) -> Self {
        Self {
            channel: ChannelKind::Command,
            method: method.into(),
            request,
        }
    }

    /// Payload bytes, with an absent request normalized to an empty slice.
    pub fn request_bytes(&self) -> &[u8] {
        self.request.as_deref().unwrap_or(&[])
    }
}

/// Structured error half of a [`CallResult`].
///
/// `code` is a short machine-usable failure identifier, `detail` a
/// human-readable description. No payload bytes accompany an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallError {
    pub code: String,
    pub detail: String,
}

impl CallError {
    pub fn new(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            detail: detail.into(),
        }
    }
}

impl From<&BridgeError> for CallError {
    fn from(err: &BridgeError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

impl From<BridgeError> for CallError {
    fn from(err: BridgeError) -> Self {
        Self::from(&err)
    }
}

/// Outcome of one dispatch: exactly one of success bytes or a structured
/// error, never both, never neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallResult {
    Success(Vec<u8>),
    Error(CallError),
}

impl CallResult {
    /// Wrap a backend response, normalizing an absent payload to
    /// zero-length bytes. A success payload is never null.
    pub fn success(bytes: Option<Vec<u8>>) -> Self {
        Self::Success(bytes.unwrap_or_default())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Success(bytes) => Some(bytes),
            Self::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&CallError> {
        match self {
            Self::Success(_) => None,
            Self::Error(err) => Some(err),
        }
    }
}

impl From<BridgeError> for CallResult {
    fn from(err: BridgeError) -> Self {
        Self::Error(err.into())
    }
}
