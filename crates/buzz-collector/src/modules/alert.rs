//! 공시/키워드 알림 기록기.
//!
//! 알림 이력은 프로세스 시작 시 `alert_history.csv`에서 한 번 읽고, 이후에는
//! 기록기가 메모리에서 관리합니다. 저장할 때마다 시각 내림차순으로 정렬해
//! 최대 건수만 남깁니다.
//!
//! 정책별 판정:
//!
//! | 정책 | 공시 채널 | 그 외 채널 |
//! |------|-----------|------------|
//! | `ChannelGated` | `공시` 라벨로 기록 | 기록 안 함 |
//! | `KeywordGated` | 키워드 필요 | 키워드 필요 |
//! | `Hybrid` | `공시` 라벨로 기록 | 키워드 필요 |
//!
//! 키워드 판정은 `keyword_channel`이 설정되어 있으면 그 채널에만 적용합니다.

use std::collections::HashSet;
use std::path::PathBuf;

use buzz_core::text::truncate_chars;
use buzz_core::types::{DISCLOSURE_LABEL, NO_LINK};
use buzz_core::{AlertKey, AlertPolicy, AlertRecord};
use buzz_data::{read_csv, write_csv_atomic, StorageError};

use super::ingest::PreparedMessage;
use crate::config::{AlertConfig, ChannelConfig};

/// 알림 이력 파일
pub const ALERT_HISTORY_FILE: &str = "alert_history.csv";
/// 알림 본문 최대 길이 (문자)
pub const CONTENT_CHARS: usize = 100;

/// 메시지별 알림 판정 규칙
#[derive(Debug, Clone)]
pub struct AlertRules {
    policy: AlertPolicy,
    disclosure_channels: Vec<String>,
    keywords: Vec<String>,
    keyword_channel: Option<String>,
}

impl AlertRules {
    pub fn new(
        policy: AlertPolicy,
        disclosure_channels: Vec<String>,
        keywords: Vec<String>,
        keyword_channel: Option<String>,
    ) -> Self {
        Self {
            policy,
            disclosure_channels,
            keywords,
            keyword_channel,
        }
    }

    pub fn from_config(channels: &ChannelConfig, alert: &AlertConfig) -> Self {
        Self::new(
            alert.policy,
            channels.disclosure_channels.clone(),
            alert.keywords.clone(),
            alert.keyword_channel.clone(),
        )
    }

    pub fn policy(&self) -> AlertPolicy {
        self.policy
    }

    /// 공시 채널 여부 (공시 채널 ID가 채널 ID에 포함되면 공시 채널)
    pub fn is_disclosure_channel(&self, channel: &str) -> bool {
        self.disclosure_channels
            .iter()
            .any(|dc| channel.contains(dc.as_str()))
    }

    /// 키워드 규칙: 본문에 포함된 키워드를 쉼표로 연결
    fn keyword_label(&self, channel: &str, text: &str) -> Option<String> {
        if let Some(only) = &self.keyword_channel {
            if only != channel {
                return None;
            }
        }
        let matched: Vec<&str> = self
            .keywords
            .iter()
            .map(String::as_str)
            .filter(|kw| text.contains(kw))
            .collect();
        if matched.is_empty() {
            None
        } else {
            Some(matched.join(","))
        }
    }

    /// 메시지가 알림 대상이면 Keyword 컬럼에 들어갈 라벨 반환
    pub fn evaluate(&self, channel: &str, text: &str) -> Option<String> {
        match self.policy {
            AlertPolicy::ChannelGated => self
                .is_disclosure_channel(channel)
                .then(|| DISCLOSURE_LABEL.to_string()),
            AlertPolicy::KeywordGated => self.keyword_label(channel, text),
            AlertPolicy::Hybrid => {
                if self.is_disclosure_channel(channel) {
                    Some(DISCLOSURE_LABEL.to_string())
                } else {
                    self.keyword_label(channel, text)
                }
            }
        }
    }
}

/// 알림 이력 소유자.
#[derive(Debug)]
pub struct AlertRecorder {
    path: PathBuf,
    cap: usize,
    include_keyword: bool,
    history: Vec<AlertRecord>,
    seen: HashSet<AlertKey>,
    /// 최대 건수를 넘겨 잘린 뒤 남은 가장 오래된 시각
    floor: Option<String>,
}

impl AlertRecorder {
    /// 빈 기록기 생성
    pub fn new(path: impl Into<PathBuf>, cap: usize, policy: AlertPolicy) -> Self {
        Self {
            path: path.into(),
            cap,
            include_keyword: policy.dedup_includes_keyword(),
            history: Vec::new(),
            seen: HashSet::new(),
            floor: None,
        }
    }

    /// 이전 이력을 읽어 기록기 생성.
    ///
    /// 파일이 없거나 읽을 수 없으면 이전 이력 없이 시작합니다.
    pub fn load(path: impl Into<PathBuf>, cap: usize, policy: AlertPolicy) -> Self {
        let mut recorder = Self::new(path, cap, policy);

        match read_csv::<AlertRecord>(&recorder.path) {
            Ok(Some(records)) => {
                let total = records.len();
                for record in records {
                    recorder.record(record);
                }
                recorder.enforce_cap();
                tracing::info!(
                    path = %recorder.path.display(),
                    loaded = recorder.history.len(),
                    total,
                    "알림 이력 로드"
                );
            }
            Ok(None) => {
                tracing::info!(path = %recorder.path.display(), "알림 이력 파일 없음, 새로 시작");
            }
            Err(e) => {
                tracing::warn!("알림 이력을 읽을 수 없어 빈 이력으로 시작: {}", e);
            }
        }

        recorder
    }

    /// 알림 한 건 추가. 중복이거나 보관 범위보다 오래되었으면 `false`.
    pub fn record(&mut self, record: AlertRecord) -> bool {
        if let Some(floor) = &self.floor {
            if self.history.len() >= self.cap && record.time <= *floor {
                return false;
            }
        }
        if !self.seen.insert(record.key(self.include_keyword)) {
            return false;
        }
        self.history.push(record);
        true
    }

    /// 메시지에서 찾은 종목들에 대해 규칙을 적용해 기록. 추가된 건수 반환.
    pub fn record_message(
        &mut self,
        rules: &AlertRules,
        message: &PreparedMessage,
        tickers: &[&str],
    ) -> usize {
        if tickers.is_empty() {
            return 0;
        }
        let Some(label) = rules.evaluate(&message.channel, &message.text) else {
            return 0;
        };

        let mut added = 0;
        for ticker in tickers {
            let record = AlertRecord {
                time: message.local_time.clone(),
                ticker: ticker.to_string(),
                keyword: label.clone(),
                content: truncate_chars(&message.text, CONTENT_CHARS).to_string(),
                link: message
                    .link
                    .clone()
                    .unwrap_or_else(|| NO_LINK.to_string()),
            };
            if self.record(record) {
                tracing::info!(
                    ticker = %ticker,
                    time = %message.local_time,
                    keyword = %label,
                    channel = %message.channel,
                    "알림 기록"
                );
                added += 1;
            }
        }
        added
    }

    /// 시각 내림차순 정렬 후 최대 건수만 유지
    fn enforce_cap(&mut self) {
        self.history.sort_by(|a, b| b.time.cmp(&a.time));
        if self.history.len() > self.cap {
            self.history.truncate(self.cap);
            let include_keyword = self.include_keyword;
            self.seen = self
                .history
                .iter()
                .map(|r| r.key(include_keyword))
                .collect();
        }
        if self.history.len() >= self.cap {
            self.floor = self.history.last().map(|r| r.time.clone());
        }
    }

    /// 이력 저장. 이력이 비어 있으면 파일을 건드리지 않음.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        self.enforce_cap();
        if self.history.is_empty() {
            return Ok(());
        }
        write_csv_atomic(&self.path, &self.history)?;
        tracing::debug!(path = %self.path.display(), count = self.history.len(), "알림 이력 저장");
        Ok(())
    }

    pub fn history(&self) -> &[AlertRecord] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
