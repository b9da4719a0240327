//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `sleuth_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(sleuth_core::metrics::LOOKUP_REQUESTS_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (healthy, degraded, unhealthy / success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── 조회(Lookup) 메트릭 ───────────────────────────────────────────

/// Lookup: 수신한 조회 요청 수 (counter)
pub const LOOKUP_REQUESTS_TOTAL: &str = "sleuth_lookup_requests_total";

/// Lookup: 처리 중인 조회 요청 수 (gauge)
pub const LOOKUP_ACTIVE_REQUESTS: &str = "sleuth_lookup_active_requests";

/// Lookup: 조회 전체 소요 시간 (histogram, 초)
pub const LOOKUP_DURATION_SECONDS: &str = "sleuth_lookup_duration_seconds";

/// Lookup: 발견된 프로필 수 (counter)
pub const LOOKUP_PROFILES_FOUND_TOTAL: &str = "sleuth_lookup_profiles_found_total";

// ─── 스캐너 메트릭 ─────────────────────────────────────────────────

/// Scanner: 시간 제한을 초과해 강제 종료된 스캔 수 (counter)
pub const SCAN_TIMEOUTS_TOTAL: &str = "sleuth_scan_timeouts_total";

/// Scanner: 실행 파일을 띄우지 못한 횟수 (counter)
pub const SCAN_LAUNCH_FAILURES_TOTAL: &str = "sleuth_scan_launch_failures_total";

/// Scanner: 헬스 프로브 수행 수 (counter, label: result)
pub const HEALTH_PROBES_TOTAL: &str = "sleuth_health_probes_total";

// ─── 파서 메트릭 ───────────────────────────────────────────────────

/// Parser: 어떤 매처도 받지 않아 건너뛴 후보 라인 수 (counter)
pub const PARSE_SKIPPED_LINES_TOTAL: &str = "sleuth_parse_skipped_lines_total";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 조회 소요 시간 히스토그램 버킷 (초)
///
/// 500ms ~ 300s 범위 (외부 스캐너가 수백 개 사이트를 순회하므로 수십 초가 정상)
pub const LOOKUP_DURATION_BUCKETS: [f64; 8] = [0.5, 1.0, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// `metrics::describe_counter!()`, `describe_gauge!()`, `describe_histogram!()`을
/// 호출하여 Prometheus HELP 텍스트를 설정합니다.
///
/// 이 함수는 전역 레코더 설치 후 한 번만 호출해야 합니다.
/// 일반적으로 `sleuth-server`의 시작 시점에서 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    // Lookup
    describe_counter!(
        LOOKUP_REQUESTS_TOTAL,
        "Total number of username lookup requests received"
    );
    describe_gauge!(
        LOOKUP_ACTIVE_REQUESTS,
        "Number of lookup requests currently in flight"
    );
    describe_histogram!(
        LOOKUP_DURATION_SECONDS,
        "End-to-end username lookup duration in seconds"
    );
    describe_counter!(
        LOOKUP_PROFILES_FOUND_TOTAL,
        "Total number of profiles found across all lookups"
    );

    // Scanner
    describe_counter!(
        SCAN_TIMEOUTS_TOTAL,
        "Total number of scanner runs killed after exceeding the time cap"
    );
    describe_counter!(
        SCAN_LAUNCH_FAILURES_TOTAL,
        "Total number of scanner invocations that failed to launch"
    );
    describe_counter!(
        HEALTH_PROBES_TOTAL,
        "Total number of scanner health probes by result"
    );

    // Parser
    describe_counter!(
        PARSE_SKIPPED_LINES_TOTAL,
        "Total number of candidate scanner output lines no matcher accepted"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    // Full metric name list (for tests)
    const ALL_METRIC_NAMES: &[&str] = &[
        LOOKUP_REQUESTS_TOTAL,
        LOOKUP_ACTIVE_REQUESTS,
        LOOKUP_DURATION_SECONDS,
        LOOKUP_PROFILES_FOUND_TOTAL,
        SCAN_TIMEOUTS_TOTAL,
        SCAN_LAUNCH_FAILURES_TOTAL,
        HEALTH_PROBES_TOTAL,
        PARSE_SKIPPED_LINES_TOTAL,
    ];

    #[test]
    fn all_metrics_start_with_sleuth_prefix() {
        for name in ALL_METRIC_NAMES {
            assert!(
                name.starts_with("sleuth_"),
                "Metric '{}' does not start with 'sleuth_' prefix",
                name
            );
        }
    }

    #[test]
    fn all_metrics_have_8_entries() {
        // 4 lookup + 3 scanner + 1 parser
        assert_eq!(
            ALL_METRIC_NAMES.len(),
            8,
            "Expected 8 metrics (4 lookup + 3 scanner + 1 parser)"
        );
    }

    #[test]
    fn metric_names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for name in ALL_METRIC_NAMES {
            assert!(seen.insert(*name), "Duplicate metric name '{}'", name);
        }
    }

    #[test]
    fn describe_all_does_not_panic() {
        // describe_all() should not panic even without a recorder installed
        describe_all();
    }

    #[test]
    fn label_keys_are_lowercase() {
        assert_eq!(LABEL_RESULT.to_lowercase(), LABEL_RESULT);
    }

    #[test]
    fn lookup_duration_buckets_are_sorted() {
        let buckets = LOOKUP_DURATION_BUCKETS;
        for i in 1..buckets.len() {
            assert!(
                buckets[i] > buckets[i - 1],
                "Bucket values must be in ascending order"
            );
        }
    }
}
