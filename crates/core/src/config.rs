//! 설정 관리 -- sleuth.toml 파싱 및 런타임 설정
//!
//! [`SleuthConfig`]는 서버와 조회 파이프라인의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`SLEUTH_SERVER_PORT=8080` 형식)
//! 3. 설정 파일 (`sleuth.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), sleuth_core::error::SleuthError> {
//! use sleuth_core::config::SleuthConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = SleuthConfig::load("sleuth.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = SleuthConfig::parse("[server]\nport = 8080")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, SleuthError};

/// Sleuth 통합 설정
///
/// `sleuth.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 크레이트는 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SleuthConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// HTTP 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 외부 스캐너 설정
    #[serde(default)]
    pub scanner: ScannerConfig,
    /// 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl SleuthConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SleuthError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 파일이 없으면 기본값에서 시작합니다.
    ///
    /// 환경변수 오버라이드와 검증은 항상 적용됩니다. 설정 파일 없이도
    /// 서버를 바로 띄울 수 있도록 기본 경로 부재를 에러로 만들지 않습니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SleuthError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path).await?
        } else {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, SleuthError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SleuthError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                SleuthError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, SleuthError> {
        toml::from_str(toml_str).map_err(|e| {
            SleuthError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `SLEUTH_{SECTION}_{FIELD}`
    /// 예: `SLEUTH_SCANNER_EXECUTABLE=/usr/local/bin/sherlock`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "SLEUTH_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "SLEUTH_GENERAL_LOG_FORMAT");
        override_string(&mut self.general.pid_file, "SLEUTH_GENERAL_PID_FILE");

        // Server
        override_string(&mut self.server.host, "SLEUTH_SERVER_HOST");
        override_u16(&mut self.server.port, "SLEUTH_SERVER_PORT");

        // Scanner
        override_string(&mut self.scanner.executable, "SLEUTH_SCANNER_EXECUTABLE");
        override_u64(&mut self.scanner.timeout_secs, "SLEUTH_SCANNER_TIMEOUT_SECS");
        override_u64(
            &mut self.scanner.probe_timeout_secs,
            "SLEUTH_SCANNER_PROBE_TIMEOUT_SECS",
        );

        // Metrics
        override_bool(&mut self.metrics.enabled, "SLEUTH_METRICS_ENABLED");
        override_string(&mut self.metrics.listen_addr, "SLEUTH_METRICS_LISTEN_ADDR");
        override_u16(&mut self.metrics.port, "SLEUTH_METRICS_PORT");
        override_string(&mut self.metrics.endpoint, "SLEUTH_METRICS_ENDPOINT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), SleuthError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // 서버 바인드 주소 검증
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_owned(),
                reason: "must not be 0".to_owned(),
            }
            .into());
        }
        if self.server.host.parse::<std::net::IpAddr>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "server.host".to_owned(),
                reason: format!("'{}' is not a valid IP address", self.server.host),
            }
            .into());
        }

        // 스캐너 검증
        if self.scanner.executable.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scanner.executable".to_owned(),
                reason: "executable must not be empty".to_owned(),
            }
            .into());
        }
        if !(1..=300).contains(&self.scanner.timeout_secs) {
            return Err(ConfigError::InvalidValue {
                field: "scanner.timeout_secs".to_owned(),
                reason: "must be between 1 and 300".to_owned(),
            }
            .into());
        }
        if !(1..=60).contains(&self.scanner.probe_timeout_secs) {
            return Err(ConfigError::InvalidValue {
                field: "scanner.probe_timeout_secs".to_owned(),
                reason: "must be between 1 and 60".to_owned(),
            }
            .into());
        }

        // 메트릭 검증 (활성화된 경우에만)
        if self.metrics.enabled {
            if self.metrics.port == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "metrics.port".to_owned(),
                    reason: "must not be 0".to_owned(),
                }
                .into());
            }
            if self.metrics.listen_addr.parse::<std::net::IpAddr>().is_err() {
                return Err(ConfigError::InvalidValue {
                    field: "metrics.listen_addr".to_owned(),
                    reason: format!("'{}' is not a valid IP address", self.metrics.listen_addr),
                }
                .into());
            }
            if !self.metrics.endpoint.starts_with('/') {
                return Err(ConfigError::InvalidValue {
                    field: "metrics.endpoint".to_owned(),
                    reason: "must start with '/'".to_owned(),
                }
                .into());
            }
        }

        Ok(())
    }
}

// Default는 derive 매크로로 자동 생성 (각 필드가 Default를 구현하므로)

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
    /// PID 파일 경로 (빈 문자열이면 작성하지 않음)
    pub pid_file: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
            pid_file: String::new(),
        }
    }
}

/// HTTP 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인드 주소 (IP 리터럴)
    pub host: String,
    /// 바인드 포트 (프론트엔드 포트와 겹치지 않는 고정 기본값)
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 3002,
        }
    }
}

/// 외부 스캐너 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// 스캐너 실행 파일 (PATH 검색 또는 절대 경로)
    pub executable: String,
    /// 조회당 스캐너 타임아웃 (초)
    pub timeout_secs: u64,
    /// 헬스/플랫폼 프로브 타임아웃 (초)
    pub probe_timeout_secs: u64,
}

impl ScannerConfig {
    /// 조회 타임아웃을 `Duration`으로 변환합니다.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 프로브 타임아웃을 `Duration`으로 변환합니다.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            executable: "sherlock".to_owned(),
            timeout_secs: 30,
            probe_timeout_secs: 5,
        }
    }
}

/// 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prometheus 엔드포인트 활성화 여부
    pub enabled: bool,
    /// 메트릭 리스너 바인드 주소
    pub listen_addr: String,
    /// 메트릭 리스너 포트 (API 포트와 분리)
    pub port: u16,
    /// 스크레이프 경로
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9102,
            endpoint: "/metrics".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
