//! 조회 서비스 -- 정제, 실행, 파싱을 묶는 오케스트레이터
//!
//! [`LookupService`]는 한 번의 조회 요청을 처음부터 끝까지 처리합니다.
//! 검증 실패만 에러로 전파하고, 스캐너가 죽거나 늦는 경우는 빈 결과로
//! 강등하여 응답 자체는 성공으로 유지합니다.

use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use tracing::{Instrument, debug, info};
use uuid::Uuid;

use sleuth_core::config::ScannerConfig;
use sleuth_core::error::LookupError;
use sleuth_core::metrics::{
    HEALTH_PROBES_TOTAL, LABEL_RESULT, LOOKUP_DURATION_SECONDS, LOOKUP_PROFILES_FOUND_TOTAL,
};
use sleuth_core::types::{HealthStatus, LookupResult};

use crate::parser::OutputParser;
use crate::sanitizer;
use crate::scanner::{ScanOutcome, ScannerInvoker};

/// 스캐너 헬스 프로브 결과
#[derive(Debug, Clone, PartialEq)]
pub struct ScannerHealth {
    /// 종합 상태
    pub status: HealthStatus,
    /// 스캐너가 조회에 사용 가능한지 여부 (`--version` 종료 코드 0)
    pub available: bool,
    /// 사용 불가 사유 (unhealthy일 때만 채워짐)
    pub error: Option<String>,
}

/// 사용자명 조회 서비스
///
/// 요청 간 공유 상태가 없으므로 `&self`로 동시 조회가 안전합니다.
pub struct LookupService {
    /// 스캐너 실행기
    invoker: ScannerInvoker,
    /// 출력 파서
    parser: OutputParser,
    /// 조회당 스캐너 타임아웃
    timeout: Duration,
    /// 헬스/플랫폼 프로브 타임아웃
    probe_timeout: Duration,
}

impl LookupService {
    /// 실행기와 타임아웃으로 서비스를 생성합니다.
    pub fn new(invoker: ScannerInvoker, timeout: Duration, probe_timeout: Duration) -> Self {
        Self {
            invoker,
            parser: OutputParser::new(),
            timeout,
            probe_timeout,
        }
    }

    /// 스캐너 설정에서 서비스를 생성합니다.
    pub fn from_config(config: &ScannerConfig) -> Self {
        Self::new(
            ScannerInvoker::from_config(config),
            config.timeout(),
            config.probe_timeout(),
        )
    }

    /// 조회당 스캐너 타임아웃을 반환합니다.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 프로브 타임아웃을 반환합니다.
    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    /// 사용자명을 조회합니다.
    ///
    /// 소요 시간은 정제 직전부터 파싱 직후까지 측정하여 소수점 둘째
    /// 자리로 반올림합니다. 검증 에러는 스캐너 실행 없이 즉시
    /// 반환됩니다.
    pub async fn lookup(&self, raw: &str) -> Result<LookupResult, LookupError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("lookup", request_id = %request_id, username = raw);
        self.lookup_inner(raw).instrument(span).await
    }

    async fn lookup_inner(&self, raw: &str) -> Result<LookupResult, LookupError> {
        let started = Instant::now();

        let username = sanitizer::clean(raw)?;

        let outcome = self.invoker.invoke(&username, self.timeout).await;
        let records = if outcome.succeeded() {
            self.parser.parse(&outcome.stdout)
        } else {
            // 타임아웃/실행 실패/비정상 종료는 빈 결과로 강등
            debug!(
                timed_out = outcome.timed_out,
                exit_status = ?outcome.exit_status,
                "scan did not complete cleanly, returning empty result set"
            );
            Vec::new()
        };

        let duration = round2(started.elapsed().as_secs_f64());

        histogram!(LOOKUP_DURATION_SECONDS).record(duration);
        let found = u64::try_from(records.len()).unwrap_or(u64::MAX);
        counter!(LOOKUP_PROFILES_FOUND_TOTAL).increment(found);

        let result = LookupResult::new(username.as_str(), records, duration);

        info!(
            username = %username,
            checked_sites = result.checked_sites,
            found_sites = result.found_sites,
            duration_secs = duration,
            "lookup completed"
        );

        Ok(result)
    }

    /// 스캐너 헬스 프로브(`--version`)를 수행합니다.
    ///
    /// - 종료 코드 0: healthy, 조회 가능
    /// - 비정상 종료 코드: degraded (실행 파일은 있으나 동작 이상)
    /// - 실행 실패 또는 타임아웃: unhealthy
    pub async fn health_check(&self) -> ScannerHealth {
        let outcome = self.invoker.probe("--version", self.probe_timeout).await;

        let health = if outcome.succeeded() {
            ScannerHealth {
                status: HealthStatus::Healthy,
                available: true,
                error: None,
            }
        } else if outcome.completed() {
            let code = outcome.exit_status.unwrap_or(-1);
            ScannerHealth {
                status: HealthStatus::Degraded(format!(
                    "scanner version probe exited with status {code}"
                )),
                available: false,
                error: None,
            }
        } else {
            let reason = if outcome.timed_out {
                format!(
                    "scanner version probe timed out after {}s",
                    self.probe_timeout.as_secs()
                )
            } else {
                "scanner executable could not be launched".to_owned()
            };
            ScannerHealth {
                status: HealthStatus::Unhealthy(reason.clone()),
                available: false,
                error: Some(reason),
            }
        };

        counter!(HEALTH_PROBES_TOTAL, LABEL_RESULT => health.status.to_string()).increment(1);
        health
    }

    /// 플랫폼 목록 엔드포인트용 프로브(`--help`)를 수행합니다.
    ///
    /// 프로브가 타임아웃 내에 종료까지 도달하면 (종료 코드와 무관하게)
    /// 스캐너가 플랫폼 목록을 제공할 수 있는 상태로 간주합니다.
    pub async fn platforms_probe(&self) -> ScanOutcome {
        self.invoker.probe("--help", self.probe_timeout).await
    }
}

/// 소수점 둘째 자리로 반올림합니다.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
