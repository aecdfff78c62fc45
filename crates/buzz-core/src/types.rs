//! 수집 파이프라인 도메인 타입.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 공시 채널 알림에 붙는 고정 라벨
pub const DISCLOSURE_LABEL: &str = "공시";
/// 링크가 없는 알림의 링크 값
pub const NO_LINK: &str = "없음";
/// 키워드가 하나도 남지 않은 종목의 테마
pub const FALLBACK_THEME: &str = "뉴스참조";
/// 트렌드 조회 미사용 시 Trend 컬럼 값
pub const TREND_PLACEHOLDER: &str = "-";
/// Context 컬럼의 메시지 구분자
pub const CONTEXT_DELIMITER: &str = " || ";

// ==================== 종목 디렉토리 ====================

/// 종목 정보 (종목명 기준)
#[derive(Debug, Clone, PartialEq)]
pub struct TickerInfo {
    /// 종목 코드
    pub code: String,
    /// 종목명 (디렉토리 키)
    pub name: String,
    /// 최근 종가
    pub last_price: Decimal,
    /// 등락률 (%)
    pub change_pct: f64,
}

/// 한 주기 동안 유효한 종목 디렉토리.
///
/// `BTreeMap`을 사용해 종목명 순회 순서가 항상 같도록 합니다.
#[derive(Debug, Clone, Default)]
pub struct TickerDirectory {
    entries: BTreeMap<String, TickerInfo>,
}

impl TickerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 종목 추가 (같은 이름이 있으면 교체)
    pub fn insert(&mut self, info: TickerInfo) {
        self.entries.insert(info.name.clone(), info);
    }

    pub fn get(&self, name: &str) -> Option<&TickerInfo> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// 종목명 목록 (사전순)
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<TickerInfo> for TickerDirectory {
    fn from_iter<I: IntoIterator<Item = TickerInfo>>(iter: I) -> Self {
        let mut directory = Self::new();
        for info in iter {
            directory.insert(info);
        }
        directory
    }
}

// ==================== 메시지 ====================

/// 채널에서 읽은 메시지 (주기 내에서만 사용)
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMessage {
    /// 채널 ID
    pub channel: String,
    /// 본문
    pub text: String,
    /// 게시 시각 (UTC)
    pub posted_at: DateTime<Utc>,
}

impl ChannelMessage {
    pub fn new(channel: impl Into<String>, text: impl Into<String>, posted_at: DateTime<Utc>) -> Self {
        Self {
            channel: channel.into(),
            text: text.into(),
            posted_at,
        }
    }
}

// ==================== 언급 맵 ====================

/// 종목명 → 해당 종목을 언급한 서로 다른 메시지 본문 목록.
///
/// 본문 목록은 발견 순서를 유지하며, 종목별로 완전히 같은 본문은 한 번만 저장합니다.
#[derive(Debug, Clone, Default)]
pub struct MentionMap {
    mentions: HashMap<String, Vec<String>>,
}

impl MentionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 언급 기록. 새로 추가된 경우 `true`.
    pub fn record(&mut self, ticker: &str, text: &str) -> bool {
        let texts = self.mentions.entry(ticker.to_string()).or_default();
        if texts.iter().any(|t| t == text) {
            return false;
        }
        texts.push(text.to_string());
        true
    }

    pub fn mentions(&self, ticker: &str) -> Option<&[String]> {
        self.mentions.get(ticker).map(Vec::as_slice)
    }

    /// 종목의 언급 수 (서로 다른 메시지 수)
    pub fn count(&self, ticker: &str) -> usize {
        self.mentions.get(ticker).map_or(0, Vec::len)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.mentions
            .iter()
            .map(|(ticker, texts)| (ticker.as_str(), texts.as_slice()))
    }

    /// 언급된 종목 수
    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }
}

// ==================== 랭킹 ====================

/// 랭킹 스냅샷 한 행.
///
/// 직렬화 컬럼명은 대시보드가 읽는 CSV 헤더와 같습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    #[serde(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Stock")]
    pub ticker: String,
    #[serde(rename = "Buzz")]
    pub mention_count: usize,
    #[serde(rename = "Price", with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(rename = "Change")]
    pub change_pct: f64,
    #[serde(rename = "Trend")]
    pub trend: String,
    #[serde(rename = "Theme")]
    pub theme: String,
    #[serde(rename = "Context")]
    pub context: String,
    #[serde(rename = "Time")]
    pub generated_at: String,
}

// ==================== 알림 ====================

/// 공시/키워드 알림 기록.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// 메시지 시각 (KST, `%Y-%m-%d %H:%M:%S`)
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Stock")]
    pub ticker: String,
    /// 매칭된 키워드 (쉼표 구분) 또는 공시 라벨
    #[serde(rename = "Keyword")]
    pub keyword: String,
    /// 본문 앞부분
    #[serde(rename = "Content")]
    pub content: String,
    /// 본문의 첫 URL 또는 `없음`
    #[serde(rename = "Link", default = "default_link")]
    pub link: String,
}

fn default_link() -> String {
    NO_LINK.to_string()
}

impl AlertRecord {
    /// 중복 판정 키
    pub fn key(&self, include_keyword: bool) -> AlertKey {
        AlertKey {
            ticker: self.ticker.clone(),
            time: self.time.clone(),
            keyword: include_keyword.then(|| self.keyword.clone()),
        }
    }
}

/// 알림 중복 판정 키 (종목 + 시각 [+ 키워드])
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlertKey {
    pub ticker: String,
    pub time: String,
    pub keyword: Option<String>,
}

/// 알림 기록 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertPolicy {
    /// 공시 채널의 종목 언급은 키워드 없이 기록
    #[default]
    ChannelGated,
    /// 알림 키워드가 함께 나온 종목 언급만 기록
    KeywordGated,
    /// 공시 채널은 채널 기준, 나머지 채널은 키워드 기준
    Hybrid,
}

impl AlertPolicy {
    /// 중복 키에 키워드를 포함하는지
    pub fn dedup_includes_keyword(self) -> bool {
        !matches!(self, Self::ChannelGated)
    }
}

impl fmt::Display for AlertPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChannelGated => write!(f, "channel"),
            Self::KeywordGated => write!(f, "keyword"),
            Self::Hybrid => write!(f, "hybrid"),
        }
    }
}

impl FromStr for AlertPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "channel" | "channel-gated" | "disclosure" => Ok(Self::ChannelGated),
            "keyword" | "keyword-gated" => Ok(Self::KeywordGated),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(format!("알 수 없는 알림 정책: {}", other)),
        }
    }
}
