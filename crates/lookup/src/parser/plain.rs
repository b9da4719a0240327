//! 마커 없는 라인 매처
//!
//! 일부 스캐너 버전/설정은 마커 없이 프로필을 출력합니다.
//!
//! ```text
//! Reddit: http://reddit.com/u/alice
//! ```

use sleuth_core::types::ProfileRecord;

use super::{FOUND_MARKER, LineMatcher, split_site_and_url};

/// `Site: https://...` 형식 매처
///
/// `[+]` 마커가 있는 라인은 [`MarkedLineMatcher`](super::MarkedLineMatcher)
/// 담당이므로 여기서는 매칭하지 않습니다.
pub struct PlainLineMatcher;

impl LineMatcher for PlainLineMatcher {
    fn name(&self) -> &str {
        "plain"
    }

    fn try_match(&self, line: &str) -> Option<ProfileRecord> {
        if line.contains(FOUND_MARKER) {
            return None;
        }

        let (site_part, url) = split_site_and_url(line)?;
        Some(ProfileRecord::found(site_part.trim(), url))
    }
}
