//! 도메인 타입 -- 서비스 전역에서 사용되는 공통 타입
//!
//! 조회 파이프라인과 HTTP 서버가 공유하는 데이터 구조를 정의합니다.
//! 응답 JSON의 필드 구조는 이 타입들의 serde 표현과 일치합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// `/status` 응답의 `service` 필드 값
///
/// 기존 소비자와의 호환을 위해 고정된 문자열을 사용합니다.
pub const SERVICE_NAME: &str = "Sherlock API";

/// 현재 시각의 UTC ISO8601 타임스탬프 문자열을 반환합니다.
///
/// 모든 응답 타임스탬프는 이 헬퍼를 통해 생성되어 형식이 일치합니다.
pub fn utc_timestamp() -> String {
    chrono::Utc::now()
        .to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// 발견된 프로필 레코드
///
/// 스캐너 출력에서 파싱된 한 건의 hit을 나타냅니다.
/// 파서는 positive hit만 내보내므로 `exists`는 항상 `true`이고,
/// plain-text 모드는 사이트별 응답 시간을 제공하지 않으므로
/// `response_time`은 항상 `None`입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// 플랫폼 이름 (예: "GitHub")
    pub site: String,
    /// 프로필 URL
    pub url: String,
    /// 프로필 존재 여부
    pub exists: bool,
    /// 사이트 응답 시간 (초)
    pub response_time: Option<f64>,
}

impl ProfileRecord {
    /// positive hit 레코드를 생성합니다.
    pub fn found(site: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            url: url.into(),
            exists: true,
            response_time: None,
        }
    }
}

impl fmt::Display for ProfileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.site, self.url)
    }
}

/// 한 번의 조회 결과
///
/// 출력 등장 순서를 유지한 레코드 목록과 집계 값을 담습니다.
/// 요청 처리 후 응답으로 직렬화되고 폐기됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    /// 정리된(clean) 사용자명
    pub username: String,
    /// 발견된 프로필 (스캐너 출력 순서)
    pub results: Vec<ProfileRecord>,
    /// 검사한 사이트 수
    pub checked_sites: usize,
    /// 발견된 사이트 수
    pub found_sites: usize,
    /// 조회 소요 시간 (초, 소수점 둘째 자리)
    pub search_duration: f64,
    /// 응답 생성 시각 (UTC ISO8601)
    pub timestamp: String,
    /// 성공 여부 (파이프라인을 통과한 결과는 항상 true)
    pub success: bool,
}

impl LookupResult {
    /// 파싱된 레코드로 조회 결과를 만듭니다.
    ///
    /// `checked_sites`와 `found_sites`는 레코드에서 계산됩니다.
    /// positive hit만 파싱되므로 두 값은 같습니다.
    pub fn new(
        username: impl Into<String>,
        results: Vec<ProfileRecord>,
        search_duration: f64,
    ) -> Self {
        let found_sites = results.iter().filter(|r| r.exists).count();
        Self {
            username: username.into(),
            checked_sites: results.len(),
            found_sites,
            results,
            search_duration,
            timestamp: utc_timestamp(),
            success: true,
        }
    }
}

impl fmt::Display for LookupResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} profiles in {:.2}s",
            self.username, self.found_sites, self.search_duration,
        )
    }
}

/// 외부 스캐너 의존성의 헬스 상태
///
/// `/health` 응답의 상태 값과 HTTP 코드 매핑에 사용됩니다.
/// Unhealthy만 503이고 Healthy/Degraded는 200입니다.
#[derive(Debug, Clone, PartialEq)]
pub enum HealthStatus {
    /// 스캐너가 정상 응답
    Healthy,
    /// 스캐너가 실행되지만 비정상 종료 코드 반환
    Degraded(String),
    /// 스캐너 실행 불가 또는 프로브 타임아웃
    Unhealthy(String),
}

impl HealthStatus {
    /// 정상 상태 여부
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }

    /// 서비스 불가 상태 여부
    pub fn is_unhealthy(&self) -> bool {
        matches!(self, HealthStatus::Unhealthy(_))
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Degraded(_) => write!(f, "degraded"),
            HealthStatus::Unhealthy(_) => write!(f, "unhealthy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_record_found_sets_positive_flags() {
        let record = ProfileRecord::found("GitHub", "https://github.com/alice");
        assert!(record.exists);
        assert!(record.response_time.is_none());
        assert_eq!(record.site, "GitHub");
        assert_eq!(record.url, "https://github.com/alice");
    }

    #[test]
    fn profile_record_display() {
        let record = ProfileRecord::found("Reddit", "http://reddit.com/u/alice");
        let display = record.to_string();
        assert!(display.contains("Reddit"));
        assert!(display.contains("http://reddit.com/u/alice"));
    }

    #[test]
    fn lookup_result_counts_match_records() {
        let records = vec![
            ProfileRecord::found("GitHub", "https://github.com/alice"),
            ProfileRecord::found("Reddit", "http://reddit.com/u/alice"),
        ];
        let result = LookupResult::new("alice", records, 1.25);
        assert_eq!(result.checked_sites, 2);
        assert_eq!(result.found_sites, 2);
        assert_eq!(result.search_duration, 1.25);
        assert!(result.success);
    }

    #[test]
    fn lookup_result_empty_records() {
        let result = LookupResult::new("ghost", Vec::new(), 0.01);
        assert_eq!(result.checked_sites, 0);
        assert_eq!(result.found_sites, 0);
        assert!(result.results.is_empty());
        assert!(result.success);
    }

    #[test]
    fn lookup_result_serialize_roundtrip() {
        let result = LookupResult::new(
            "alice",
            vec![ProfileRecord::found("GitHub", "https://github.com/alice")],
            2.5,
        );
        let json = serde_json::to_string(&result).unwrap();
        let deserialized: LookupResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, deserialized);
    }

    #[test]
    fn lookup_result_serializes_null_response_time() {
        let result = LookupResult::new(
            "alice",
            vec![ProfileRecord::found("GitHub", "https://github.com/alice")],
            0.5,
        );
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"response_time\":null"));
        assert!(json.contains("\"exists\":true"));
    }

    #[test]
    fn utc_timestamp_is_rfc3339_utc() {
        let ts = utc_timestamp();
        assert!(ts.contains('T'));
        assert!(ts.ends_with('Z'));
        chrono::DateTime::parse_from_rfc3339(&ts).unwrap();
    }

    #[test]
    fn health_status_display_is_lowercase() {
        assert_eq!(HealthStatus::Healthy.to_string(), "healthy");
        assert_eq!(
            HealthStatus::Degraded("slow".to_owned()).to_string(),
            "degraded"
        );
        assert_eq!(
            HealthStatus::Unhealthy("gone".to_owned()).to_string(),
            "unhealthy"
        );
    }

    #[test]
    fn health_status_predicates() {
        assert!(HealthStatus::Healthy.is_healthy());
        assert!(!HealthStatus::Healthy.is_unhealthy());
        let degraded = HealthStatus::Degraded("x".to_owned());
        assert!(!degraded.is_healthy());
        assert!(!degraded.is_unhealthy());
        let unhealthy = HealthStatus::Unhealthy("x".to_owned());
        assert!(unhealthy.is_unhealthy());
    }
}
