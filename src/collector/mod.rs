//! WebLogic 관리 REST 메트릭 수집 모듈
//!
//! 서버 버전별 REST 어댑터를 통해 서버, 데이터소스, 애플리케이션, 스레드 풀
//! 상태를 수집하고 정규화된 이벤트로 변환합니다.
//!
//! # Example
//!
//! ```ignore
//! use wlsbeat::collector::{select_adapter, RestClient, ServerVersion};
//!
//! let client = RestClient::new("https://localhost:7001", 5000)?.with_auth("weblogic", "welcome1");
//! let adapter = select_adapter(ServerVersion::resolve("12.2.1"), client);
//! let event = adapter.server_status("AdminServer").await;
//! ```

pub mod adapter;
mod client;
pub mod coerce;

pub use adapter::{
    select_adapter, DomainRuntimeAdapter, Scope, ServerVersion, TenantMonitoringAdapter,
    Traversal, VersionAdapter,
};
pub use client::{ResourcePath, RestClient, RestResponse, REQUESTED_BY_HEADER};

use crate::error::CollectorError;

/// Collector 작업 결과 타입
pub type CollectResult<T> = Result<T, CollectorError>;
