//! 외부 스캐너 실행 -- 서브프로세스 타임아웃 관리 및 결과 정규화
//!
//! [`ScannerInvoker`]는 스캐너 실행 파일을 `tokio::process`로 실행하고,
//! 모든 실패(실행 불가, 비정상 종료, 시간 초과)를 [`ScanOutcome`]의
//! 상태 값으로 정규화합니다. 이 모듈은 `Err`를 반환하지 않으며,
//! 호출자는 항상 완결된 결과를 받습니다.
//!
//! # 실행 계약
//!
//! ```text
//! <executable> <username> --timeout <seconds> --print-found --no-color
//! ```
//!
//! 스캐너 자체 타임아웃에 기동 허용치를 더한 시간이 벽시계 상한이며,
//! 상한을 넘기면 프로세스를 강제 종료합니다.

use std::process::Stdio;
use std::time::Duration;

use metrics::counter;
use tokio::process::Command;
use tracing::{debug, warn};

use sleuth_core::config::ScannerConfig;
use sleuth_core::metrics::{SCAN_LAUNCH_FAILURES_TOTAL, SCAN_TIMEOUTS_TOTAL};

use crate::sanitizer::CleanUsername;

/// 스캐너 기동 허용치
///
/// 인터프리터 기동과 종료 정리에 걸리는 시간을 스캐너 자체 타임아웃
/// 위에 추가로 허용합니다.
const STARTUP_BUFFER: Duration = Duration::from_secs(10);

/// 한 번의 스캐너 실행 결과
///
/// `stdout`은 프로세스가 상한 내에 종료 코드 0으로 완료된 경우에만
/// 비어 있지 않습니다. 실행 실패는 `exit_status: None`,
/// 시간 초과는 `timed_out: true`로 구분됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// 캡처된 표준 출력 (UTF-8 lossy)
    pub stdout: String,
    /// 프로세스 종료 코드 (실행 실패 또는 시그널 종료 시 `None`)
    pub exit_status: Option<i32>,
    /// 벽시계 상한 초과로 강제 종료되었는지 여부
    pub timed_out: bool,
}

impl ScanOutcome {
    /// 프로세스가 종료 코드 0으로 정상 완료되었는지 반환합니다.
    pub fn succeeded(&self) -> bool {
        self.exit_status == Some(0) && !self.timed_out
    }

    /// 프로세스가 (종료 코드와 무관하게) 스스로 종료까지 도달했는지 반환합니다.
    pub fn completed(&self) -> bool {
        self.exit_status.is_some() && !self.timed_out
    }
}

/// 스캐너 서브프로세스 실행기
///
/// 실행 파일 경로와 기동 허용치만 보유하며, 타임아웃은 호출마다
/// 인자로 받습니다. 요청 간 공유 상태가 없어 `&self`로 동시 호출이
/// 안전합니다.
#[derive(Debug, Clone)]
pub struct ScannerInvoker {
    /// 스캐너 실행 파일 (PATH 검색 또는 절대 경로)
    executable: String,
    /// 벽시계 상한에 더해지는 기동 허용치
    startup_buffer: Duration,
}

impl ScannerInvoker {
    /// 실행 파일 경로로 새 실행기를 생성합니다.
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            startup_buffer: STARTUP_BUFFER,
        }
    }

    /// 스캐너 설정에서 실행기를 생성합니다.
    pub fn from_config(config: &ScannerConfig) -> Self {
        Self::new(config.executable.clone())
    }

    /// 기동 허용치를 변경합니다.
    ///
    /// 짧은 상한이 필요한 테스트에서 사용합니다.
    pub fn with_startup_buffer(mut self, buffer: Duration) -> Self {
        self.startup_buffer = buffer;
        self
    }

    /// 설정된 실행 파일 경로를 반환합니다.
    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// 사용자명 조회 스캔을 실행합니다.
    ///
    /// `timeout`은 스캐너 자체에 `--timeout`으로 전달되는 값이며,
    /// 프로세스 강제 종료 상한은 `timeout + startup_buffer`입니다.
    pub async fn invoke(&self, username: &CleanUsername, timeout: Duration) -> ScanOutcome {
        let cap = timeout + self.startup_buffer;

        let mut cmd = Command::new(&self.executable);
        cmd.arg(username.as_str())
            .arg("--timeout")
            .arg(timeout.as_secs().to_string())
            .arg("--print-found")
            .arg("--no-color")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        debug!(
            username = %username,
            timeout_secs = timeout.as_secs(),
            "launching scanner"
        );

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                counter!(SCAN_LAUNCH_FAILURES_TOTAL).increment(1);
                warn!(
                    executable = %self.executable,
                    error = %e,
                    "failed to launch scanner"
                );
                return ScanOutcome::default();
            }
        };

        // stdout은 파이프 버퍼가 차서 프로세스가 멈추지 않도록
        // 별도 태스크에서 종료와 동시에 읽습니다.
        let mut stdout_pipe = child.stdout.take();
        let reader = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(pipe) = stdout_pipe.as_mut() {
                use tokio::io::AsyncReadExt;
                if let Err(e) = pipe.read_to_end(&mut buf).await {
                    debug!(error = %e, "failed to read scanner stdout");
                }
            }
            String::from_utf8_lossy(&buf).into_owned()
        });

        match tokio::time::timeout(cap, child.wait()).await {
            Ok(Ok(status)) => {
                let stdout = reader.await.unwrap_or_default();
                let exit_status = status.code();

                if status.success() {
                    ScanOutcome {
                        stdout,
                        exit_status,
                        timed_out: false,
                    }
                } else {
                    debug!(
                        exit_status = ?exit_status,
                        stdout_len = stdout.len(),
                        "scanner exited non-zero, discarding output"
                    );
                    ScanOutcome {
                        stdout: String::new(),
                        exit_status,
                        timed_out: false,
                    }
                }
            }
            Ok(Err(e)) => {
                reader.abort();
                warn!(error = %e, "failed to wait for scanner process");
                ScanOutcome::default()
            }
            Err(_elapsed) => {
                if let Err(e) = child.start_kill() {
                    warn!(error = %e, "failed to kill scanner after time cap");
                }
                let _ = child.wait().await;
                reader.abort();

                counter!(SCAN_TIMEOUTS_TOTAL).increment(1);
                warn!(
                    username = %username,
                    cap_secs = cap.as_secs(),
                    "scanner exceeded time cap, killed"
                );
                ScanOutcome {
                    stdout: String::new(),
                    exit_status: None,
                    timed_out: true,
                }
            }
        }
    }

    /// 단일 플래그 프로브를 실행합니다.
    ///
    /// 헬스 체크(`--version`)와 플랫폼 목록 확인(`--help`)에 사용합니다.
    /// 출력은 버리고 종료 코드만 확인하며, 기동 허용치 없이 `timeout`이
    /// 그대로 상한입니다.
    pub async fn probe(&self, flag: &str, timeout: Duration) -> ScanOutcome {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(flag)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                counter!(SCAN_LAUNCH_FAILURES_TOTAL).increment(1);
                warn!(
                    executable = %self.executable,
                    flag,
                    error = %e,
                    "failed to launch scanner probe"
                );
                return ScanOutcome::default();
            }
        };

        match tokio::time::timeout(timeout, child.wait()).await {
            Ok(Ok(status)) => ScanOutcome {
                stdout: String::new(),
                exit_status: status.code(),
                timed_out: false,
            },
            Ok(Err(e)) => {
                warn!(flag, error = %e, "failed to wait for scanner probe");
                ScanOutcome::default()
            }
            Err(_elapsed) => {
                if let Err(e) = child.start_kill() {
                    warn!(error = %e, "failed to kill scanner probe after timeout");
                }
                let _ = child.wait().await;

                counter!(SCAN_TIMEOUTS_TOTAL).increment(1);
                warn!(
                    flag,
                    timeout_secs = timeout.as_secs(),
                    "scanner probe timed out, killed"
                );
                ScanOutcome {
                    stdout: String::new(),
                    exit_status: None,
                    timed_out: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitizer;

    #[test]
    fn new_uses_default_startup_buffer() {
        let invoker = ScannerInvoker::new("sherlock");
        assert_eq!(invoker.executable(), "sherlock");
        assert_eq!(invoker.startup_buffer, STARTUP_BUFFER);
    }

    #[test]
    fn with_startup_buffer_overrides_default() {
        let invoker =
            ScannerInvoker::new("sherlock").with_startup_buffer(Duration::from_millis(100));
        assert_eq!(invoker.startup_buffer, Duration::from_millis(100));
    }

    #[test]
    fn from_config_uses_configured_executable() {
        let config = ScannerConfig {
            executable: "/opt/bin/sherlock".to_owned(),
            ..Default::default()
        };
        let invoker = ScannerInvoker::from_config(&config);
        assert_eq!(invoker.executable(), "/opt/bin/sherlock");
    }

    #[test]
    fn outcome_succeeded_requires_exit_zero() {
        let ok = ScanOutcome {
            stdout: "output".to_owned(),
            exit_status: Some(0),
            timed_out: false,
        };
        assert!(ok.succeeded());
        assert!(ok.completed());

        let nonzero = ScanOutcome {
            stdout: String::new(),
            exit_status: Some(2),
            timed_out: false,
        };
        assert!(!nonzero.succeeded());
        assert!(nonzero.completed());
    }

    #[test]
    fn outcome_timed_out_is_neither_succeeded_nor_completed() {
        let timed_out = ScanOutcome {
            stdout: String::new(),
            exit_status: None,
            timed_out: true,
        };
        assert!(!timed_out.succeeded());
        assert!(!timed_out.completed());
    }

    #[test]
    fn default_outcome_is_launch_failure_shape() {
        let outcome = ScanOutcome::default();
        assert!(outcome.stdout.is_empty());
        assert_eq!(outcome.exit_status, None);
        assert!(!outcome.timed_out);
        assert!(!outcome.completed());
    }

    #[tokio::test]
    async fn invoke_missing_executable_returns_empty_outcome() {
        let invoker = ScannerInvoker::new("/nonexistent/sleuth-test-scanner");
        let username = sanitizer::clean("testuser").unwrap();

        let outcome = invoker.invoke(&username, Duration::from_secs(1)).await;

        assert_eq!(outcome, ScanOutcome::default());
        assert!(!outcome.succeeded());
    }

    #[tokio::test]
    async fn probe_missing_executable_returns_empty_outcome() {
        let invoker = ScannerInvoker::new("/nonexistent/sleuth-test-scanner");

        let outcome = invoker.probe("--version", Duration::from_secs(1)).await;

        assert_eq!(outcome, ScanOutcome::default());
        assert!(!outcome.completed());
    }
}
