//! 에러 타입 정의 -- thiserror 기반 계층적 에러 구조
//!
//! [`SleuthError`]는 워크스페이스 전체의 최상위 에러 타입입니다.
//! 도메인별 하위 에러(설정, 조회)는 `#[from]`으로 자동 변환됩니다.
//!
//! 스캐너 서브프로세스의 타임아웃과 실행 실패는 에러가 아니라
//! `ScanOutcome`의 상태 값으로 표현됩니다. 조회 요청은 스캐너가
//! 죽어도 빈 결과로 응답하며, 에러 경로는 입력 검증과 내부 결함에만
//! 사용됩니다.

use thiserror::Error;

/// Sleuth 최상위 에러 타입
///
/// 모든 하위 에러는 이 타입으로 변환되어 전파됩니다.
#[derive(Debug, Error)]
pub enum SleuthError {
    /// 설정 로딩/검증 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 사용자명 조회 에러
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 결함 (분류되지 않은 실패)
    #[error("internal error: {reason}")]
    Internal {
        /// 실패 사유
        reason: String,
    },
}

/// 설정 에러
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound {
        /// 찾지 못한 파일 경로
        path: String,
    },

    /// TOML 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed {
        /// 파싱 실패 사유
        reason: String,
    },

    /// 설정값 유효성 검증 실패
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue {
        /// 문제가 된 필드명
        field: String,
        /// 검증 실패 사유
        reason: String,
    },
}

/// 사용자명 조회 에러
///
/// HTTP 레이어는 [`LookupError::status_code`]가 알려주는 상태 코드로
/// 응답을 구성합니다. 스캐너 실패는 여기 포함되지 않습니다.
#[derive(Debug, Error)]
pub enum LookupError {
    /// 사용자명 길이가 허용 범위를 벗어남
    #[error("invalid username length: {length} (must be 2-30 characters)")]
    InvalidLength {
        /// 입력된 원본 길이
        length: usize,
    },

    /// 허용 문자를 제거한 뒤 남는 문자가 없음
    #[error("username contains only invalid characters")]
    EmptyAfterCleaning,

    /// 내부 조회 실패
    #[error("internal lookup failure: {reason}")]
    Internal {
        /// 실패 사유
        reason: String,
    },
}

impl LookupError {
    /// 이 에러에 대응하는 HTTP 상태 코드를 반환합니다.
    ///
    /// | Variant | Status |
    /// |---------|--------|
    /// | `InvalidLength` | 400 |
    /// | `EmptyAfterCleaning` | 400 |
    /// | `Internal` | 500 |
    pub fn status_code(&self) -> u16 {
        match self {
            LookupError::InvalidLength { .. } => 400,
            LookupError::EmptyAfterCleaning => 400,
            LookupError::Internal { .. } => 500,
        }
    }

    /// 클라이언트 응답에 넣을 수 있는 에러인지 반환합니다.
    ///
    /// 검증 에러는 입력에서 비롯되므로 메시지를 그대로 노출해도 안전합니다.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LookupError::InvalidLength { .. } | LookupError::EmptyAfterCleaning
        )
    }
}
