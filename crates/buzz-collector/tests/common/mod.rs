//! 통합 테스트용 메모리 협력자.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use buzz_collector::modules::Collector;
use buzz_collector::CollectorConfig;
use buzz_core::{ChannelMessage, ChannelSource, ListedStock, ListingProvider, ProviderError};
use buzz_data::HangulTokenizer;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

/// 채널별 응답
#[derive(Clone)]
pub enum Feed {
    Messages(Vec<ChannelMessage>),
    Fail,
    /// 타임아웃보다 오래 걸림
    Hang,
    /// 조회 중 종료 요청이 들어온 상황
    CancelDuring(CancellationToken, Vec<ChannelMessage>),
}

/// 메모리 채널 소스
#[derive(Clone, Default)]
pub struct FakeChannels {
    feeds: HashMap<String, Feed>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeChannels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, channel: &str, feed: Feed) -> Self {
        self.feeds.insert(channel.to_string(), feed);
        self
    }

    /// 조회된 채널 (순서대로)
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl ChannelSource for FakeChannels {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch_recent(
        &self,
        channel: &str,
        limit: usize,
    ) -> Result<Vec<ChannelMessage>, ProviderError> {
        self.calls.lock().unwrap().push(channel.to_string());
        match self.feeds.get(channel) {
            Some(Feed::Messages(messages)) => Ok(messages.iter().take(limit).cloned().collect()),
            Some(Feed::Fail) => Err(ProviderError::Http {
                status: 403,
                message: "private channel".to_string(),
            }),
            Some(Feed::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
            Some(Feed::CancelDuring(token, messages)) => {
                token.cancel();
                Ok(messages.clone())
            }
            None => Ok(Vec::new()),
        }
    }
}

/// 메모리 상장 목록
#[derive(Clone)]
pub struct FakeListing {
    stocks: Vec<ListedStock>,
    calls: Arc<AtomicUsize>,
}

impl FakeListing {
    pub fn new(names: &[&str]) -> Self {
        let stocks = names
            .iter()
            .enumerate()
            .map(|(i, name)| ListedStock {
                code: format!("{:06}", i + 1),
                name: name.to_string(),
                close: Decimal::from(10_000 + i as i64 * 100),
                change_pct: i as f64 * 0.5,
            })
            .collect();
        Self {
            stocks,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl ListingProvider for FakeListing {
    async fn fetch_listing(&self) -> Result<Vec<ListedStock>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.stocks.clone())
    }
}

/// 기본 테스트 종목
pub const STOCKS: &[&str] = &["OO전자", "가나바이오", "다라화학", "삼성증권", "대상", "하나30호스팩"];

pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    Utc::now() - chrono::Duration::minutes(minutes)
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - chrono::Duration::days(days)
}

pub fn message(channel: &str, text: &str, posted_at: DateTime<Utc>) -> ChannelMessage {
    ChannelMessage::new(channel, text, posted_at)
}

pub fn config_for(dir: &Path, channels: &[&str]) -> CollectorConfig {
    let mut config = CollectorConfig::default();
    config.channels.channels = channels.iter().map(|c| c.to_string()).collect();
    config.output.dir = dir.to_path_buf();
    config
}

pub fn collector(config: CollectorConfig, channels: FakeChannels, listing: FakeListing) -> Collector {
    Collector::new(
        config,
        Box::new(channels),
        Box::new(listing),
        Box::new(HangulTokenizer::new()),
    )
}
