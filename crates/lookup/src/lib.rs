#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`sanitizer`]: 원시 사용자명 검증 및 정제 ([`CleanUsername`] 생성)
//! - [`scanner`]: 외부 스캐너 서브프로세스 실행 및 결과 정규화
//! - [`parser`]: 스캐너 텍스트 출력 파싱 (형식별 매처 + 우선순위 라우팅)
//! - [`service`]: 조회 오케스트레이션 (정제 → 실행 → 파싱 → 집계)
//!
//! # 아키텍처
//!
//! ```text
//! raw username -> Sanitizer -> ScannerInvoker -> OutputParser -> LookupResult
//!                     |              |                 |
//!                 2-30자 검증    timeout + kill    [+] marked / plain
//! ```

pub mod parser;
pub mod sanitizer;
pub mod scanner;
pub mod service;

// --- 주요 타입 re-export ---

// 정제
pub use sanitizer::CleanUsername;

// 스캐너
pub use scanner::{ScanOutcome, ScannerInvoker};

// 파서
pub use parser::{LineMatcher, MarkedLineMatcher, OutputParser, PlainLineMatcher};

// 서비스
pub use service::{LookupService, ScannerHealth};
