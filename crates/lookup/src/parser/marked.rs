//! `[+]` 마커 라인 매처
//!
//! 스캐너가 발견한 프로필을 출력하는 기본 형식을 처리합니다.
//!
//! ```text
//! [+] GitHub: https://github.com/alice
//! ```

use sleuth_core::types::ProfileRecord;

use super::{FOUND_MARKER, LineMatcher, split_site_and_url};

/// `[+] Site: https://...` 형식 매처
///
/// 마커를 제거한 부분이 사이트명이 됩니다. 구분자가 없는 마커 라인
/// (진행 상황 출력 등)은 매칭하지 않습니다.
pub struct MarkedLineMatcher;

impl LineMatcher for MarkedLineMatcher {
    fn name(&self) -> &str {
        "marked"
    }

    fn try_match(&self, line: &str) -> Option<ProfileRecord> {
        if !line.contains(FOUND_MARKER) {
            return None;
        }

        let (site_part, url) = split_site_and_url(line)?;
        let site = site_part.replace(FOUND_MARKER, "");
        Some(ProfileRecord::found(site.trim(), url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matcher_name_is_marked() {
        assert_eq!(MarkedLineMatcher.name(), "marked");
    }

    #[test]
    fn matches_basic_marked_line() {
        let record = MarkedLineMatcher
            .try_match("[+] GitHub: https://github.com/alice")
            .unwrap();

        assert_eq!(record.site, "GitHub");
        assert_eq!(record.url, "https://github.com/alice");
        assert!(record.exists);
        assert_eq!(record.response_time, None);
    }

    #[test]
    fn matches_http_scheme() {
        let record = MarkedLineMatcher
            .try_match("[+] Reddit: http://reddit.com/u/alice")
            .unwrap();

        assert_eq!(record.site, "Reddit");
        assert_eq!(record.url, "http://reddit.com/u/alice");
    }

    #[test]
    fn site_name_with_spaces_is_trimmed() {
        let record = MarkedLineMatcher
            .try_match("[+]  Stack Overflow : https://stackoverflow.com/users/1")
            .unwrap();

        assert_eq!(record.site, "Stack Overflow");
    }

    #[test]
    fn unmarked_line_does_not_match() {
        assert!(
            MarkedLineMatcher
                .try_match("GitHub: https://github.com/alice")
                .is_none()
        );
    }

    #[test]
    fn marked_line_without_delimiter_does_not_match() {
        assert!(MarkedLineMatcher.try_match("[+] checking 400 sites").is_none());
        assert!(
            MarkedLineMatcher
                .try_match("[+] GitHub - https://github.com/alice")
                .is_none()
        );
    }

    #[test]
    fn splits_on_first_delimiter_only() {
        let record = MarkedLineMatcher
            .try_match("[+] Mirror: https://a.example/x: http://b.example")
            .unwrap();

        assert_eq!(record.site, "Mirror");
        assert_eq!(record.url, "https://a.example/x: http://b.example");
    }
}
