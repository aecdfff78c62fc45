//! 수집 주기 통계 구조체.

use std::time::Duration;

use serde::Serialize;

/// 한 수집 주기의 통계
#[derive(Debug, Clone, Default, Serialize)]
pub struct CycleStats {
    /// 디렉토리 종목 수
    pub directory_size: usize,
    /// 조회 성공 채널 수
    pub channels_ok: usize,
    /// 조회 실패 채널 수 (타임아웃 제외)
    pub channels_failed: usize,
    /// 타임아웃 채널 수
    pub channels_timed_out: usize,
    /// 종료 요청으로 건너뛴 채널 수
    pub channels_skipped: usize,
    /// 조회 기간을 벗어나 중단된 채널 수
    pub channels_past_horizon: usize,
    /// 검사한 메시지 수
    pub messages_scanned: usize,
    /// 너무 짧아 건너뛴 메시지 수
    pub messages_short: usize,
    /// 무시 단어로 버린 메시지 수
    pub messages_ignored: usize,
    /// 언급된 종목 수
    pub tickers: usize,
    /// 새로 기록된 알림 수
    pub alerts_added: usize,
    /// 중간 저장 횟수
    pub checkpoints: usize,
    /// 저장 실패 횟수
    pub persist_failures: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CycleStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 조회를 시도한 채널 수
    pub fn channels_attempted(&self) -> usize {
        self.channels_ok + self.channels_failed + self.channels_timed_out
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            directory = self.directory_size,
            channels_attempted = self.channels_attempted(),
            channels_ok = self.channels_ok,
            channels_failed = self.channels_failed,
            channels_timed_out = self.channels_timed_out,
            channels_skipped = self.channels_skipped,
            messages = self.messages_scanned,
            short = self.messages_short,
            ignored = self.messages_ignored,
            tickers = self.tickers,
            alerts_added = self.alerts_added,
            checkpoints = self.checkpoints,
            persist_failures = self.persist_failures,
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 주기 완료"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_attempted_excludes_skipped() {
        let stats = CycleStats {
            channels_ok: 3,
            channels_failed: 1,
            channels_timed_out: 1,
            channels_skipped: 4,
            ..Default::default()
        };
        assert_eq!(stats.channels_attempted(), 5);
    }
}
