/*
 * Responsibility
 * - DriverError: everything the driver can report to a test
 * - separates harness misuse (invalid operation) from faults raised by the handler
 */
use std::time::Duration;

use thiserror::Error;
use tower::BoxError;

use crate::config::ConfigError;
use crate::routing::RouteError;

pub type DriverResult<T> = Result<T, DriverError>;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("invalid operation: handler not set")]
    HandlerNotSet,
    #[error("invalid operation: no routes configured, call one of the set_up_* methods first")]
    RoutesNotConfigured,
    #[error("invalid operation: blocking call made from inside an async runtime, use the async variant")]
    BlockingInsideRuntime,
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error("invalid request uri `{uri}`: {reason}")]
    InvalidUri { uri: String, reason: String },
    #[error("failed to build the request")]
    Request(#[from] axum::http::Error),
    #[error("handler failed: {0}")]
    Dispatch(#[source] BoxError),
    #[error("handler did not complete within {0:?}")]
    Timeout(Duration),
    #[error("failed to read response body")]
    Body(#[source] axum::Error),
    #[error("response body is not valid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("failed to deserialize response body")]
    Deserialize(#[from] serde_json::Error),
    #[error("failed to start the dispatch runtime")]
    Runtime(#[source] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DriverError {
    pub(crate) fn invalid_uri(uri: &str, reason: impl ToString) -> Self {
        Self::InvalidUri {
            uri: uri.to_owned(),
            reason: reason.to_string(),
        }
    }

    /// True when the harness was misused, as opposed to the handler misbehaving.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(
            self,
            Self::HandlerNotSet | Self::RoutesNotConfigured | Self::BlockingInsideRuntime
        )
    }

    /// The fault raised by the handler, as it was raised.
    pub fn dispatch_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Dispatch(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
