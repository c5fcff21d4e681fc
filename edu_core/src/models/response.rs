//! Uniform response envelope returned by every endpoint

use serde::{Deserialize, Serialize};

use crate::utils::date::now_iso;

/// Wire shape of every API answer.
///
/// `data` is expected on success and `error` on failure, but nothing stops a
/// caller of [`ApiResponse::from_parts`] from setting both. Absent fields are
/// left out of the JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String,
}

/// Named fields accepted by [`ApiResponse::from_parts`].
#[derive(Debug, Clone)]
pub struct ApiResponseParts<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<String>,
    /// Ignored: the envelope is always stamped with its construction time.
    pub timestamp: Option<String>,
}

impl<T> Default for ApiResponseParts<T> {
    fn default() -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: None,
            timestamp: None,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            timestamp: now_iso(),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success(data)
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
            timestamp: now_iso(),
        }
    }

    /// Builds an envelope from any subset of fields. A supplied `timestamp`
    /// is discarded in favour of the current instant.
    pub fn from_parts(parts: ApiResponseParts<T>) -> Self {
        let ApiResponseParts {
            success,
            data,
            message,
            error,
            timestamp: _,
        } = parts;

        Self {
            success,
            data,
            message,
            error,
            timestamp: now_iso(),
        }
    }
}
