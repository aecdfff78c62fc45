//! 수집 주기 실행.
//!
//! ```text
//! 디렉토리 구성 ─(실패/빈 결과)→ 주기 중단
//!      │
//!      ▼
//! 채널 순회 (채널마다: 종료 확인 → 타임아웃 조회 → 선별 → 언급/알림 기록)
//!      │          └─ N개 채널마다 중간 저장
//!      ▼
//! 최종 저장 (랭킹 스냅샷 + 알림 이력)
//! ```
//!
//! 알림 이력은 [`Collector`]가 주기를 넘어 소유하고, 디렉토리와 언급 맵은
//! 주기마다 새로 만드는 [`CycleContext`]에 담깁니다.

use std::time::Instant;

use buzz_core::text::to_snapshot_time;
use buzz_core::{
    ChannelSource, ListingProvider, MentionMap, ProviderError, Stoplist, TickerDirectory,
    Tokenizer,
};
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use super::alert::{AlertRecorder, AlertRules, ALERT_HISTORY_FILE};
use super::directory::build_directory;
use super::ingest::{fetch_channel, scan_channel};
use super::mention::{match_tickers, record_mentions};
use super::snapshot::{rank_mentions, SnapshotWriter};
use crate::config::CollectorConfig;
use crate::stats::CycleStats;
use crate::Result;

/// 한 주기 동안만 유효한 상태
#[derive(Debug)]
pub struct CycleContext {
    pub directory: TickerDirectory,
    pub mentions: MentionMap,
    /// 이 시각보다 오래된 메시지에서 채널 스캔 중단
    pub cutoff: DateTime<Utc>,
    pub stats: CycleStats,
}

impl CycleContext {
    pub fn new(directory: TickerDirectory, cutoff: DateTime<Utc>) -> Self {
        let stats = CycleStats {
            directory_size: directory.len(),
            ..CycleStats::new()
        };
        Self {
            directory,
            mentions: MentionMap::new(),
            cutoff,
            stats,
        }
    }
}

/// 수집기 (주기 실행과 데몬 루프)
pub struct Collector {
    config: CollectorConfig,
    source: Box<dyn ChannelSource>,
    listing: Box<dyn ListingProvider>,
    tokenizer: Box<dyn Tokenizer>,
    stoplist: Stoplist,
    rules: AlertRules,
    snapshots: SnapshotWriter,
    alerts: AlertRecorder,
}

impl Collector {
    /// 수집기 생성. 이전 알림 이력을 이 시점에 읽습니다.
    pub fn new(
        config: CollectorConfig,
        source: Box<dyn ChannelSource>,
        listing: Box<dyn ListingProvider>,
        tokenizer: Box<dyn Tokenizer>,
    ) -> Self {
        let rules = AlertRules::from_config(&config.channels, &config.alert);
        let snapshots = SnapshotWriter::new(&config.output.dir, config.output.top_n);
        let alerts = AlertRecorder::load(
            config.output.dir.join(ALERT_HISTORY_FILE),
            config.alert.cap,
            config.alert.policy,
        );

        Self {
            config,
            source,
            listing,
            tokenizer,
            stoplist: Stoplist::builtin(),
            rules,
            snapshots,
            alerts,
        }
    }

    pub fn alerts(&self) -> &AlertRecorder {
        &self.alerts
    }

    /// 수집 주기 1회 실행.
    ///
    /// 디렉토리를 만들 수 없으면 채널을 하나도 보지 않고 `DirectoryUnavailable`을 반환합니다.
    /// 종료 요청은 채널 조회 직전에 확인하며, 요청이 있어도 그때까지 모은 결과는 저장합니다.
    pub async fn run_cycle(&mut self, shutdown: &CancellationToken) -> Result<CycleStats> {
        let started = Instant::now();
        tracing::info!(source = self.source.name(), "수집 주기 시작");

        let directory = build_directory(self.listing.as_ref(), &self.stoplist).await?;
        let cutoff = Utc::now() - self.config.ingest.lookback();
        let mut ctx = CycleContext::new(directory, cutoff);

        let channels = self.config.channels.channels.clone();
        let checkpoint_every = self.config.ingest.checkpoint_every.max(1);

        for (i, channel) in channels.iter().enumerate() {
            if shutdown.is_cancelled() {
                ctx.stats.channels_skipped = channels.len() - i;
                tracing::warn!(
                    remaining = ctx.stats.channels_skipped,
                    "종료 요청으로 남은 채널 건너뜀"
                );
                break;
            }

            self.ingest_channel(channel, &mut ctx).await;

            if (i + 1) % checkpoint_every == 0 {
                self.persist(&mut ctx);
                ctx.stats.checkpoints += 1;
            }
        }

        self.persist(&mut ctx);

        ctx.stats.tickers = ctx.mentions.len();
        ctx.stats.elapsed = started.elapsed();
        Ok(ctx.stats)
    }

    /// 채널 하나 조회 및 처리. 실패는 기록만 하고 넘어감.
    async fn ingest_channel(&mut self, channel: &str, ctx: &mut CycleContext) {
        let messages = match fetch_channel(
            self.source.as_ref(),
            channel,
            self.config.ingest.message_limit,
            self.config.ingest.fetch_timeout(),
        )
        .await
        {
            Ok(messages) => {
                ctx.stats.channels_ok += 1;
                messages
            }
            Err(ProviderError::Timeout(msg)) => {
                ctx.stats.channels_timed_out += 1;
                tracing::warn!(channel = %channel, "채널 조회 시간 초과, 건너뜀: {}", msg);
                return;
            }
            Err(e) => {
                ctx.stats.channels_failed += 1;
                tracing::warn!(
                    channel = %channel,
                    transient = e.is_transient(),
                    "채널 조회 실패, 건너뜀: {}",
                    e
                );
                return;
            }
        };

        let scan = scan_channel(messages, ctx.cutoff, &self.stoplist);
        ctx.stats.messages_scanned += scan.scanned;
        ctx.stats.messages_short += scan.short;
        ctx.stats.messages_ignored += scan.ignored;
        if scan.hit_horizon {
            ctx.stats.channels_past_horizon += 1;
        }

        let mut alerts_added = 0;
        for message in &scan.kept {
            let tickers = match_tickers(&message.text, &ctx.directory, &self.stoplist);
            if tickers.is_empty() {
                continue;
            }
            record_mentions(&mut ctx.mentions, &message.text, &tickers);
            alerts_added += self.alerts.record_message(&self.rules, message, &tickers);
        }
        ctx.stats.alerts_added += alerts_added;

        tracing::debug!(
            channel = %channel,
            scanned = scan.scanned,
            kept = scan.kept.len(),
            past_horizon = scan.hit_horizon,
            alerts = alerts_added,
            "채널 처리 완료"
        );
    }

    /// 랭킹 스냅샷과 알림 이력 저장.
    ///
    /// 언급이 하나도 없으면 스냅샷 파일은 그대로 둡니다. 저장 실패는 기록만 하고
    /// 메모리 상태는 유지합니다.
    fn persist(&mut self, ctx: &mut CycleContext) {
        if !ctx.mentions.is_empty() {
            let generated_at = to_snapshot_time(Utc::now());
            let entries = rank_mentions(
                &ctx.mentions,
                &ctx.directory,
                self.tokenizer.as_ref(),
                &self.stoplist,
                &generated_at,
            );
            if let Err(e) = self.snapshots.write(&entries) {
                ctx.stats.persist_failures += 1;
                tracing::error!("랭킹 스냅샷 저장 실패: {}", e);
            }
        }

        if let Err(e) = self.alerts.persist() {
            ctx.stats.persist_failures += 1;
            tracing::error!("알림 이력 저장 실패: {}", e);
        }
    }

    /// 종료 요청까지 주기 반복.
    ///
    /// 주기 실패는 기록만 하고 다음 주기로 넘어갑니다. 대기 중 종료 요청이 오면 즉시 반환합니다.
    pub async fn run_daemon(&mut self, shutdown: CancellationToken) {
        let interval = self.config.daemon.interval();
        tracing::info!(
            channels = self.config.channels.channels.len(),
            policy = %self.rules.policy(),
            interval_secs = interval.as_secs(),
            "데몬 모드 시작"
        );

        loop {
            match self.run_cycle(&shutdown).await {
                Ok(stats) => stats.log_summary("수집 주기"),
                Err(e) => tracing::error!("수집 주기 중단: {}", e),
            }

            if shutdown.is_cancelled() {
                break;
            }

            tracing::info!("다음 주기까지 {}초 대기", interval.as_secs());
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        tracing::info!("데몬 종료");
    }
}
