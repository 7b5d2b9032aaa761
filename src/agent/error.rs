//! Error types and failure classification for gateway operations.
//!
//! Every fault raised while talking to a remote gateway is a [`GatewayError`].
//! [`classify`] reduces it to a [`FailureCategory`], which drives the retry
//! decision, and [`describe`] turns it into an actionable message.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Longest upstream error body carried into a human-readable message.
const MAX_DETAIL_LEN: usize = 200;

/// Errors that can occur during gateway operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Network connectivity error (DNS, connection refused, reset, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded its client-side deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Gateway returned a non-2xx response.
    #[error("Gateway error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Gateway response doesn't match the chat-completion format.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Missing credential or other misconfiguration, detected before any I/O.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Pre-flight probe reported the gateway host as down.
    #[error("Cannot delegate: VPS unreachable at {base_url} ({reason})")]
    Unreachable { base_url: String, reason: String },

    /// Terminal failure of a retried operation.
    #[error("{operation} failed after {attempts} attempt(s): {message}")]
    Operation {
        operation: String,
        attempts: u32,
        category: FailureCategory,
        message: String,
    },
}

impl GatewayError {
    /// Map a transport error from reqwest, given the deadline that was in force.
    pub fn from_reqwest(err: reqwest::Error, deadline: Duration) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout(deadline.as_millis() as u64)
        } else if let Some(status) = err.status() {
            GatewayError::Upstream {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            GatewayError::InvalidResponse(err.to_string())
        } else if err.is_builder() {
            GatewayError::Configuration(err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }

    pub fn category(&self) -> FailureCategory {
        classify(self)
    }
}

/// Coarse failure category used for retry and messaging decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// Aborted by a client-side deadline.
    Timeout,
    /// Connection-level failure: refused, reset, DNS, transport.
    NetworkUnreachable,
    /// Remote responded with a non-2xx status.
    RemoteHttpError(u16),
    /// Malformed payload, unexpected shape, logic or configuration error.
    AgentLevelError,
}

impl FailureCategory {
    /// Whether waiting and retrying can plausibly resolve this failure.
    ///
    /// 4xx responses and agent-level errors are permanent for a given request.
    pub fn is_retryable(self) -> bool {
        match self {
            FailureCategory::Timeout | FailureCategory::NetworkUnreachable => true,
            FailureCategory::RemoteHttpError(status) => status >= 500,
            FailureCategory::AgentLevelError => false,
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCategory::Timeout => write!(f, "timeout"),
            FailureCategory::NetworkUnreachable => write!(f, "network_unreachable"),
            FailureCategory::RemoteHttpError(status) => write!(f, "http_{}", status),
            FailureCategory::AgentLevelError => write!(f, "agent_error"),
        }
    }
}

/// Classify a gateway error into exactly one [`FailureCategory`].
pub fn classify(err: &GatewayError) -> FailureCategory {
    match err {
        GatewayError::Timeout(_) => FailureCategory::Timeout,
        GatewayError::Network(_) | GatewayError::Unreachable { .. } => {
            FailureCategory::NetworkUnreachable
        }
        GatewayError::Upstream { status, .. } => FailureCategory::RemoteHttpError(*status),
        GatewayError::Operation { category, .. } => *category,
        GatewayError::InvalidResponse(_) | GatewayError::Configuration(_) => {
            FailureCategory::AgentLevelError
        }
    }
}

/// Human-readable message that tells the operator what to do about `err`.
pub fn describe(err: &GatewayError) -> String {
    if let GatewayError::Operation { .. } = err {
        return err.to_string();
    }

    match classify(err) {
        FailureCategory::Timeout => format!(
            "{}. The remote agent may be slow; consider raising the gateway request timeout",
            err
        ),
        FailureCategory::NetworkUnreachable => format!(
            "Cannot reach gateway ({}). Check the gateway URL and that the server is running",
            err
        ),
        FailureCategory::RemoteHttpError(status) if status >= 500 => format!(
            "Gateway internal error (HTTP {}): {}",
            status,
            upstream_detail(err)
        ),
        FailureCategory::RemoteHttpError(status) => format!(
            "Gateway rejected the request (HTTP {}): {}",
            status,
            upstream_detail(err)
        ),
        FailureCategory::AgentLevelError => err.to_string(),
    }
}

fn upstream_detail(err: &GatewayError) -> String {
    let detail = match err {
        GatewayError::Upstream { message, .. } => message.trim(),
        _ => "",
    };
    if detail.is_empty() {
        return "no details provided".to_string();
    }
    if detail.chars().count() > MAX_DETAIL_LEN {
        let cut: String = detail.chars().take(MAX_DETAIL_LEN).collect();
        format!("{}...", cut)
    } else {
        detail.to_string()
    }
}
