use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ErrorCategory {
    Chunk,
    Network,
    Timeout,
    RateLimit,
    Auth,
    Unknown,
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let category = match self {
            ErrorCategory::Chunk => "chunk",
            ErrorCategory::Network => "network",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::RateLimit => "rate_limit",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Unknown => "unknown",
        };
        write!(f, "{}", category)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ErrorSeverity {
    Warn,
    Error,
    Fatal,
}

impl Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self {
            ErrorSeverity::Warn => "warn",
            ErrorSeverity::Error => "error",
            ErrorSeverity::Fatal => "fatal",
        };
        write!(f, "{}", severity)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ErrorClassification {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
}

const CHUNK_KEYWORDS: [&str; 4] = [
    "chunkloaderror",
    "loading chunk",
    "dynamically imported module",
    "importing a module script failed",
];
const NETWORK_KEYWORDS: [&str; 5] = [
    "failed to fetch",
    "fetch failed",
    "network",
    "econnrefused",
    "socket hang up",
];
const TIMEOUT_KEYWORDS: [&str; 3] = ["timed out", "timeout", "etimedout"];
const RATE_LIMIT_KEYWORDS: [&str; 4] =
    ["rate limit", "rate_limited", "too many requests", "429"];
const AUTH_KEYWORDS: [&str; 5] = ["unauthorized", "forbidden", "jwt", "401", "403"];

/// Maps a free-text error message and a source tag to telemetry severity and
/// category. Category is first-match over the ordered keyword buckets.
pub fn classify_error(message: &str, source: &str) -> ErrorClassification {
    let lowered = message.to_lowercase();
    let contains_any =
        |keywords: &[&str]| keywords.iter().any(|kw| lowered.contains(kw));

    let category = if contains_any(&CHUNK_KEYWORDS) {
        ErrorCategory::Chunk
    } else if contains_any(&NETWORK_KEYWORDS) {
        ErrorCategory::Network
    } else if contains_any(&TIMEOUT_KEYWORDS) {
        ErrorCategory::Timeout
    } else if contains_any(&RATE_LIMIT_KEYWORDS) {
        ErrorCategory::RateLimit
    } else if contains_any(&AUTH_KEYWORDS) {
        ErrorCategory::Auth
    } else {
        ErrorCategory::Unknown
    };

    let from_error_boundary = source.replace('-', "_").contains("error_boundary");
    let severity = if category == ErrorCategory::Chunk || from_error_boundary {
        ErrorSeverity::Fatal
    } else if matches!(
        category,
        ErrorCategory::Network | ErrorCategory::Timeout | ErrorCategory::RateLimit
    ) {
        ErrorSeverity::Warn
    } else {
        ErrorSeverity::Error
    };

    ErrorClassification { category, severity }
}

/// FNV-1a 64-bit. Used for error signatures and dedup keys; deterministic,
/// not cryptographic.
pub fn hash_string(input: &str) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = FNV_OFFSET;
    for byte in input.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportErrorModel {
    pub message: String,
    pub stack: Option<String>,
    pub pathname: Option<String>,
    pub url: Option<String>,
    pub user_agent: Option<String>,
    pub app_version: Option<String>,
    pub source: Option<String>,
    pub meta: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_load_is_always_fatal() {
        let from_client = classify_error("ChunkLoadError: loading chunk 42 failed", "client");
        assert_eq!(from_client.category, ErrorCategory::Chunk);
        assert_eq!(from_client.severity, ErrorSeverity::Fatal);

        let from_boundary = classify_error("ChunkLoadError", "error_boundary");
        assert_eq!(from_boundary.category, ErrorCategory::Chunk);
        assert_eq!(from_boundary.severity, ErrorSeverity::Fatal);
    }

    #[test]
    fn error_boundary_source_escalates_to_fatal() {
        let classified = classify_error("something broke", "error-boundary");
        assert_eq!(classified.category, ErrorCategory::Unknown);
        assert_eq!(classified.severity, ErrorSeverity::Fatal);
    }

    #[test]
    fn transient_categories_downgrade_to_warn() {
        assert_eq!(
            classify_error("TypeError: Failed to fetch", "client").severity,
            ErrorSeverity::Warn
        );
        assert_eq!(
            classify_error("request timed out after 30s", "client").category,
            ErrorCategory::Timeout
        );
        assert_eq!(
            classify_error("429 Too Many Requests", "client").category,
            ErrorCategory::RateLimit
        );
    }

    #[test]
    fn auth_keywords_keep_error_severity() {
        let classified = classify_error("JWT validation failed", "client");
        assert_eq!(classified.category, ErrorCategory::Auth);
        assert_eq!(classified.severity, ErrorSeverity::Error);
    }

    #[test]
    fn unknown_message_defaults_to_error() {
        let classified = classify_error("undefined is not a function", "client");
        assert_eq!(classified.category, ErrorCategory::Unknown);
        assert_eq!(classified.severity, ErrorSeverity::Error);
    }

    #[test]
    fn hash_string_is_deterministic() {
        assert_eq!(hash_string("treino a"), hash_string("treino a"));
        assert_ne!(hash_string("treino a"), hash_string("treino b"));
        assert_ne!(hash_string(""), hash_string(" "));
    }
}
