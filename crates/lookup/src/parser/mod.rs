//! 스캐너 출력 파싱 모듈 -- 라인 단위 형식별 매처
//!
//! [`OutputParser`]는 스캐너의 텍스트 출력을 라인 단위로 순회하며,
//! 등록된 [`LineMatcher`]를 우선순위 순서로 시도합니다. 첫 번째로
//! 매칭에 성공한 매처의 레코드가 채택됩니다.
//!
//! # 지원 형식
//! - `[+] Site: https://...` 마커 라인 ([`MarkedLineMatcher`])
//! - `Site: https://...` 마커 없는 라인 ([`PlainLineMatcher`])
//!
//! # 사용 예시
//! ```
//! use sleuth_lookup::parser::OutputParser;
//!
//! let parser = OutputParser::new();
//! let records = parser.parse("[+] GitHub: https://github.com/alice\n");
//! assert_eq!(records[0].site, "GitHub");
//! assert_eq!(records[0].url, "https://github.com/alice");
//! ```

pub mod marked;
pub mod plain;

pub use marked::MarkedLineMatcher;
pub use plain::PlainLineMatcher;

use metrics::counter;
use tracing::debug;

use sleuth_core::metrics::PARSE_SKIPPED_LINES_TOTAL;
use sleuth_core::types::ProfileRecord;

/// 발견 라인 마커
pub(crate) const FOUND_MARKER: &str = "[+]";

/// 사이트명과 URL을 나누는 구분자
///
/// 첫 번째 등장 위치에서 나누며, URL은 잘려나간 `http`를 다시 붙여
/// 복원합니다. 사이트명에 `:`가 들어가는 경우의 오동작 가능성은 알려진
/// 한계이며, 매칭되지 않은 후보 라인 로그로 관찰합니다.
pub(crate) const URL_DELIMITER: &str = ": http";

/// 라인 매처 -- 출력 형식 하나를 담당합니다.
///
/// 새 출력 형식 지원은 이 trait 구현을 추가하고
/// [`OutputParser::with_matcher`]로 등록하는 것으로 끝납니다.
pub trait LineMatcher: Send + Sync {
    /// 매처 형식 이름 (로깅/디버깅용)
    fn name(&self) -> &str;

    /// 라인이 이 매처의 형식이면 레코드를 반환합니다.
    ///
    /// 형식이 아니면 `None`을 반환하여 다음 매처로 넘깁니다.
    fn try_match(&self, line: &str) -> Option<ProfileRecord>;
}

/// 라인을 첫 번째 구분자 기준으로 (사이트 부분, 복원된 URL)로 나눕니다.
pub(crate) fn split_site_and_url(line: &str) -> Option<(&str, String)> {
    let idx = line.find(URL_DELIMITER)?;
    let site_part = &line[..idx];
    let url_tail = &line[idx + URL_DELIMITER.len()..];
    Some((site_part, format!("http{}", url_tail.trim())))
}

/// URL을 담은 것으로 보이는 라인인지 판별합니다.
fn is_candidate(line: &str) -> bool {
    line.contains("http") && line.contains(':')
}

/// 스캐너 출력 파서
///
/// 매처 목록을 우선순위 순서로 보유합니다. 어떤 매처도 받지 않은 후보
/// 라인은 에러 없이 건너뛰고 debug 로그와 카운터로 기록합니다.
pub struct OutputParser {
    /// 등록된 매처 목록 (순서대로 시도)
    matchers: Vec<Box<dyn LineMatcher>>,
}

impl OutputParser {
    /// 기본 매처 세트 (마커 우선, 그다음 일반 라인)로 파서를 생성합니다.
    pub fn new() -> Self {
        Self {
            matchers: vec![
                Box::new(MarkedLineMatcher),
                Box::new(PlainLineMatcher),
            ],
        }
    }

    /// 매처를 추가 등록합니다. 기존 매처 이후 순서로 시도됩니다.
    pub fn with_matcher(mut self, matcher: Box<dyn LineMatcher>) -> Self {
        self.matchers.push(matcher);
        self
    }

    /// 등록된 매처 이름 목록을 반환합니다.
    pub fn registered_matchers(&self) -> Vec<&str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// 스캐너 출력 전체를 파싱하여 레코드 목록을 반환합니다.
    ///
    /// 출력 순서가 유지되며 중복 제거는 하지 않습니다. 어떤 입력에도
    /// 패닉하지 않습니다.
    pub fn parse(&self, output: &str) -> Vec<ProfileRecord> {
        let mut records = Vec::new();

        for line in output.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match self.matchers.iter().find_map(|m| m.try_match(line)) {
                Some(record) => records.push(record),
                None => {
                    if is_candidate(line) {
                        counter!(PARSE_SKIPPED_LINES_TOTAL).increment(1);
                        debug!(line, "candidate output line matched no format, skipping");
                    }
                }
            }
        }

        records
    }
}

impl Default for OutputParser {
    fn default() -> Self {
        Self::new()
    }
}
