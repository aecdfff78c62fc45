//! 텔레그램 공개 채널 웹 미리보기(`/s/{channel}`) 소스.
//!
//! 공개 채널의 웹 미리보기 페이지를 읽어 메시지를 추출합니다.
//! 한 페이지에는 오래된 순서로 약 20개 메시지가 있으며,
//! `?before={id}`로 이전 페이지를 이어서 조회합니다.
//!
//! 세션/인증이 필요 없으므로 비공개 채널은 조회할 수 없습니다.
//! 미러 서버를 사용하는 경우 `auth_token`을 Bearer 토큰으로 전송합니다.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use buzz_core::{ChannelMessage, ChannelSource, ProviderError};
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use super::map_reqwest_error;

/// 텔레그램 웹 소스 설정
#[derive(Clone)]
pub struct TelegramWebConfig {
    /// 기본 URL (기본값: https://t.me)
    pub base_url: String,
    /// 미러 서버용 Bearer 토큰
    pub auth_token: Option<SecretString>,
    /// 페이지 요청 타임아웃
    pub timeout: Duration,
}

impl std::fmt::Debug for TelegramWebConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramWebConfig")
            .field("base_url", &self.base_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for TelegramWebConfig {
    fn default() -> Self {
        Self {
            base_url: "https://t.me".to_string(),
            auth_token: None,
            timeout: Duration::from_secs(15),
        }
    }
}

static POST_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[^"/]+/(\d+)""#).expect("게시물 ID 패턴"));
static POST_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<time[^>]*datetime="([^"]+)""#).expect("시각 패턴"));
static POST_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<div class="tgme_widget_message_text[^"]*"[^>]*>(.*?)</div>"#)
        .expect("본문 패턴")
});
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("줄바꿈 패턴"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("태그 패턴"));
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|amp|lt|gt|quot|apos|nbsp);").expect("엔티티 패턴")
});

/// HTML 조각을 일반 텍스트로 변환
fn html_to_text(fragment: &str) -> String {
    let with_breaks = LINE_BREAK.replace_all(fragment, "\n");
    let stripped = TAG.replace_all(&with_breaks, "");
    let decoded = ENTITY.replace_all(&stripped, |caps: &regex::Captures| {
        let entity = &caps[1];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some(' '),
            _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32)
            }
            _ => entity[1..].parse::<u32>().ok().and_then(char::from_u32),
        };
        decoded.map(String::from).unwrap_or_else(|| caps[0].to_string())
    });
    decoded.trim().to_string()
}

/// 웹 미리보기 페이지에서 (게시물 ID, 메시지) 목록 추출 (페이지 순서 = 오래된 순).
///
/// 시각이 없거나 해석할 수 없는 게시물은 건너뜁니다.
pub fn parse_channel_page(channel: &str, html: &str) -> Vec<(u64, ChannelMessage)> {
    let mut posts = Vec::new();

    for segment in html.split("data-post=\"").skip(1) {
        let Some(id) = POST_ID
            .captures(segment)
            .and_then(|c| c[1].parse::<u64>().ok())
        else {
            continue;
        };

        let Some(raw_time) = POST_TIME.captures(segment).map(|c| c[1].to_string()) else {
            debug!(channel, id, "시각 없는 게시물 건너뜀");
            continue;
        };
        let posted_at = match DateTime::parse_from_rfc3339(&raw_time) {
            Ok(t) => t.with_timezone(&Utc),
            Err(e) => {
                debug!(channel, id, raw_time = %raw_time, "시각 해석 실패, 게시물 건너뜀: {}", e);
                continue;
            }
        };

        // 미디어만 있는 게시물은 본문이 없음
        let text = POST_TEXT
            .captures(segment)
            .map(|c| html_to_text(&c[1]))
            .unwrap_or_default();

        posts.push((id, ChannelMessage::new(channel, text, posted_at)));
    }

    posts
}

/// 텔레그램 공개 채널 웹 미리보기 소스
pub struct TelegramWebSource {
    client: Client,
    config: TelegramWebConfig,
}

impl TelegramWebSource {
    pub fn new(config: TelegramWebConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent("Mozilla/5.0 (stock-buzz collector)")
            .build()
            .map_err(|e| ProviderError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))?;
        Ok(Self { client, config })
    }

    async fn fetch_page(
        &self,
        channel: &str,
        before: Option<u64>,
    ) -> Result<Vec<(u64, ChannelMessage)>, ProviderError> {
        let url = format!("{}/s/{}", self.config.base_url, channel);
        let mut builder = self.client.get(&url);
        if let Some(before) = before {
            builder = builder.query(&[("before", before)]);
        }
        if let Some(token) = &self.config.auth_token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| map_reqwest_error(channel, e))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: format!("채널 {} 조회 실패", channel),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| map_reqwest_error(channel, e))?;
        Ok(parse_channel_page(channel, &html))
    }
}

#[async_trait]
impl ChannelSource for TelegramWebSource {
    fn name(&self) -> &str {
        "telegram-web"
    }

    async fn fetch_recent(
        &self,
        channel: &str,
        limit: usize,
    ) -> Result<Vec<ChannelMessage>, ProviderError> {
        let mut collected: Vec<ChannelMessage> = Vec::with_capacity(limit);
        let mut before: Option<u64> = None;

        while collected.len() < limit {
            let page = self.fetch_page(channel, before).await?;
            let Some(oldest_id) = page.iter().map(|(id, _)| *id).min() else {
                break;
            };

            // 페이지는 오래된 순 → 최신순으로 뒤집어 이어붙임
            for (_, message) in page.into_iter().rev() {
                if collected.len() >= limit {
                    break;
                }
                collected.push(message);
            }

            if oldest_id <= 1 {
                break;
            }
            if before.is_some_and(|prev| oldest_id >= prev) {
                warn!(channel, oldest_id, "이전 페이지 ID가 줄지 않음, 페이지 조회 중단");
                break;
            }
            before = Some(oldest_id);
        }

        debug!(channel, count = collected.len(), "채널 메시지 조회 완료");
        Ok(collected)
    }
}
