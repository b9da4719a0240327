//! 사용자명 정제 -- 길이 검증 및 허용 문자 필터링
//!
//! [`clean`]은 원시 사용자명을 검증하고 허용 문자만 남긴 [`CleanUsername`]을
//! 생성합니다. 길이 검증은 필터링 전의 원본 입력을 기준으로 합니다.
//!
//! # 사용 예시
//! ```
//! use sleuth_lookup::sanitizer;
//!
//! let username = sanitizer::clean("alice_99").unwrap();
//! assert_eq!(username.as_str(), "alice_99");
//!
//! let username = sanitizer::clean("bob!@#smith").unwrap();
//! assert_eq!(username.as_str(), "bobsmith");
//! ```

use sleuth_core::error::LookupError;

/// 원시 입력 최소 길이 (문자 수)
pub const MIN_RAW_LEN: usize = 2;

/// 원시 입력 최대 길이 (문자 수)
pub const MAX_RAW_LEN: usize = 30;

/// 정제 완료된 사용자명
///
/// ASCII 영숫자와 `_`, `-`, `.`만 포함합니다. [`clean`]을 통해서만
/// 생성할 수 있으며, 생성 이후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanUsername(String);

impl CleanUsername {
    /// 정제된 사용자명을 `&str`로 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 내부 `String`을 소비하여 반환합니다.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for CleanUsername {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CleanUsername {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 허용 문자 여부를 반환합니다.
///
/// ASCII 영숫자 또는 `_`, `-`, `.`
fn is_allowed(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.')
}

/// 원시 사용자명을 검증하고 정제합니다.
///
/// 1. 원본 길이가 [`MIN_RAW_LEN`]..=[`MAX_RAW_LEN`] 범위를 벗어나면
///    [`LookupError::InvalidLength`]
/// 2. 허용 문자만 남기고 제거 (순서 유지)
/// 3. 남은 문자가 없으면 [`LookupError::EmptyAfterCleaning`]
///
/// 부수 효과가 없는 순수 함수입니다.
pub fn clean(raw: &str) -> Result<CleanUsername, LookupError> {
    let length = raw.chars().count();
    if !(MIN_RAW_LEN..=MAX_RAW_LEN).contains(&length) {
        return Err(LookupError::InvalidLength { length });
    }

    let cleaned: String = raw.chars().filter(|ch| is_allowed(*ch)).collect();
    if cleaned.is_empty() {
        return Err(LookupError::EmptyAfterCleaning);
    }

    Ok(CleanUsername(cleaned))
}
