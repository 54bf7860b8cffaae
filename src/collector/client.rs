//! WebLogic 관리 REST HTTP 클라이언트
//!
//! Basic auth, 고정 헤더, 타임아웃을 적용한 비동기 GET 클라이언트입니다.
//! 요청 실패는 [`CollectorError`]로 분류되어 호출자가 에러 이벤트로 변환합니다.

use std::fmt;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::CollectResult;
use crate::config::WeblogicConfig;
use crate::error::CollectorError;

/// Header WebLogic requires on management REST calls
pub const REQUESTED_BY_HEADER: &str = "X-Requested-By";

/// 관리 REST 리소스 경로 (세그먼트 + 쿼리)
///
/// Segments are percent-encoded when the URL is assembled, so resource names
/// from configuration can be pushed as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    segments: Vec<String>,
    query: Option<String>,
}

impl ResourcePath {
    pub fn new(segments: &[&str]) -> Self {
        Self {
            segments: segments.iter().map(|s| s.to_string()).collect(),
            query: None,
        }
    }

    /// Append one path segment
    pub fn push(mut self, segment: &str) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    /// Set the query string (without the leading '?')
    pub fn query(mut self, query: &str) -> Self {
        self.query = Some(query.to_string());
        self
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}

/// 상태 코드와 본문만 담은 응답
#[derive(Debug, Clone)]
pub struct RestResponse {
    pub status: u16,
    pub body: String,
}

impl RestResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 관리 REST HTTP 클라이언트
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: Url,
    timeout_ms: u64,
    auth: Option<(String, String)>,
    requested_by: String,
}

impl RestClient {
    /// 새 클라이언트 생성 (인증서 검증 활성화)
    ///
    /// # Arguments
    /// * `base_url` - Admin server URL (예: "https://localhost:7001")
    /// * `timeout_ms` - 요청 타임아웃 (밀리초)
    pub fn new(base_url: &str, timeout_ms: u64) -> CollectResult<Self> {
        Self::build(base_url, timeout_ms, false)
    }

    /// 설정으로부터 클라이언트 생성
    pub fn from_config(config: &WeblogicConfig) -> CollectResult<Self> {
        let mut client = Self::build(&config.host, config.timeout_ms, config.insecure_tls)?
            .with_requested_by(&config.requested_by);
        if !config.username.is_empty() {
            client = client.with_auth(&config.username, &config.password);
        }
        Ok(client)
    }

    fn build(base_url: &str, timeout_ms: u64, insecure_tls: bool) -> CollectResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CollectorError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_millis(timeout_ms))
            .danger_accept_invalid_certs(insecure_tls)
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(CollectorError::HttpClientInit)?;

        Ok(Self {
            client,
            base_url,
            timeout_ms,
            auth: None,
            requested_by: "wlsbeat".to_string(),
        })
    }

    /// Basic Auth 설정
    pub fn with_auth(mut self, username: &str, password: &str) -> Self {
        self.auth = Some((username.to_string(), password.to_string()));
        self
    }

    /// `X-Requested-By` 헤더 값 설정
    pub fn with_requested_by(mut self, caller: &str) -> Self {
        self.requested_by = caller.to_string();
        self
    }

    fn url_for(&self, path: &ResourcePath) -> CollectResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CollectorError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(&path.segments);
        url.set_query(path.query.as_deref());
        Ok(url)
    }

    fn classify(&self, err: reqwest::Error) -> CollectorError {
        if err.is_timeout() {
            CollectorError::timeout_with_duration(self.timeout_ms)
        } else {
            CollectorError::from(err)
        }
    }

    /// 단일 GET 요청 - 전송 실패만 에러로 반환
    #[instrument(skip(self, path), fields(path = %path))]
    pub async fn get(&self, path: &ResourcePath) -> CollectResult<RestResponse> {
        let url = self.url_for(path)?;

        debug!("Sending management REST request");

        let mut req = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(REQUESTED_BY_HEADER, &self.requested_by);

        if let Some((username, password)) = &self.auth {
            req = req.basic_auth(username, Some(password));
        }

        let response = req.send().await.map_err(|e| self.classify(e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        debug!(status, bytes = body.len(), "Received management REST response");

        Ok(RestResponse { status, body })
    }

    /// GET 후 2xx 상태와 JSON 본문을 요구
    pub async fn get_json(&self, path: &ResourcePath) -> CollectResult<Value> {
        let response = self.get(path).await?;

        if !response.is_success() {
            return Err(CollectorError::HttpStatus {
                status: response.status,
                body: response.body,
            });
        }

        match serde_json::from_str(&response.body) {
            Ok(value) => Ok(value),
            Err(e) => Err(CollectorError::JsonParse {
                message: e.to_string(),
                body: response.body,
            }),
        }
    }

    /// 보조 확인 호출 - 성공 여부만 반환하고 실패는 전파하지 않음
    pub async fn probe(&self, path: &ResourcePath) -> bool {
        match self.get(path).await {
            Ok(response) if response.is_success() => true,
            Ok(response) => {
                debug!(path = %path, status = response.status, "Probe returned non-success status");
                false
            }
            Err(e) => {
                debug!(path = %path, error = %e, "Probe failed");
                false
            }
        }
    }
}
