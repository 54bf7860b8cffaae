//! Error types for wlsbeat
//!
//! This module defines the error types used throughout the application.

use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Collector error
    #[error("Collector error: {0}")]
    Collector(#[from] CollectorError),

    /// Event sink error
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Collector 모듈 에러 타입
#[derive(Error, Debug)]
pub enum CollectorError {
    /// HTTP 클라이언트 초기화 실패
    #[error("Failed to initialize HTTP client: {0}")]
    HttpClientInit(#[source] reqwest::Error),

    /// 요청 URL 조립 실패
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// HTTP 요청 실패
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[source] reqwest::Error),

    /// HTTP 응답 읽기 실패
    #[error("Failed to read HTTP response: {0}")]
    HttpResponse(#[source] reqwest::Error),

    /// HTTP 상태 코드 에러 (응답 본문 보존)
    #[error("HTTP error status: {status}")]
    HttpStatus { status: u16, body: String },

    /// JSON 파싱 에러 (응답 본문 보존)
    #[error("JSON parse error: {message}")]
    JsonParse { message: String, body: String },

    /// 응답 구조가 계약과 다름 (응답 본문 보존)
    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String, body: String },

    /// 타임아웃
    /// The value is the configured timeout in milliseconds, if known.
    #[error("Request timed out{}", .0.map(|ms| format!(" after {}ms", ms)).unwrap_or_default())]
    Timeout(Option<u64>),

    /// 연결 실패
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

impl CollectorError {
    /// 요청이 서버에 도달하지 못한 에러인지 확인
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CollectorError::HttpRequest(_)
                | CollectorError::HttpResponse(_)
                | CollectorError::Timeout(..)
                | CollectorError::ConnectionFailed(_)
        )
    }

    /// HTTP 상태 코드 추출
    pub fn http_status(&self) -> Option<u16> {
        match self {
            CollectorError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 진단용 원본 응답 본문 (있을 경우)
    pub fn body(&self) -> Option<&str> {
        match self {
            CollectorError::HttpStatus { body, .. }
            | CollectorError::JsonParse { body, .. }
            | CollectorError::UnexpectedResponse { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }

    /// Create a Timeout error with known duration
    pub fn timeout_with_duration(ms: u64) -> Self {
        CollectorError::Timeout(Some(ms))
    }
}

impl From<reqwest::Error> for CollectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest doesn't expose the configured timeout duration.
            // Use CollectorError::timeout_with_duration() when the duration is known.
            CollectorError::Timeout(None)
        } else if err.is_connect() {
            CollectorError::ConnectionFailed(err.to_string())
        } else if err.is_request() {
            CollectorError::HttpRequest(err)
        } else {
            CollectorError::HttpResponse(err)
        }
    }
}

/// Event sink errors
#[derive(Error, Debug)]
pub enum SinkError {
    /// Writing to the underlying output failed
    #[error("Failed to write event: {0}")]
    Io(#[from] std::io::Error),

    /// Event could not be serialized
    #[error("Failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;
