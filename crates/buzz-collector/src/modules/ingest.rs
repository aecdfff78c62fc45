//! 채널 메시지 수집과 선별.
//!
//! 채널 소스는 최신 메시지부터 돌려주므로, 조회 기간을 벗어난 메시지를 만나면
//! 그 채널의 나머지 메시지는 보지 않습니다.

use std::time::Duration;

use buzz_core::text::{extract_first_url, to_alert_time};
use buzz_core::{ChannelMessage, ChannelSource, ProviderError, Stoplist};
use chrono::{DateTime, Utc};

/// 이보다 짧은 메시지(문자 수)는 건너뜀
pub const MIN_MESSAGE_CHARS: usize = 3;

/// 선별을 통과한 메시지
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedMessage {
    pub channel: String,
    pub text: String,
    /// KST 시각 (`%Y-%m-%d %H:%M:%S`)
    pub local_time: String,
    /// 본문의 첫 URL
    pub link: Option<String>,
}

/// 메시지 한 건의 선별 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Screening {
    Keep(PreparedMessage),
    TooShort,
    Ignored,
    /// 조회 기간 밖 (채널 스캔 중단)
    PastHorizon,
}

/// 메시지 한 건 선별.
///
/// 조회 기간 확인이 가장 먼저이고, 그다음 길이, 무시 단어 순서로 검사합니다.
pub fn screen_message(
    message: ChannelMessage,
    cutoff: DateTime<Utc>,
    stoplist: &Stoplist,
) -> Screening {
    if message.posted_at < cutoff {
        return Screening::PastHorizon;
    }
    if message.text.chars().count() < MIN_MESSAGE_CHARS {
        return Screening::TooShort;
    }
    if stoplist.should_ignore_message(&message.text) {
        return Screening::Ignored;
    }

    let local_time = to_alert_time(message.posted_at);
    let link = extract_first_url(&message.text).map(str::to_string);
    Screening::Keep(PreparedMessage {
        channel: message.channel,
        text: message.text,
        local_time,
        link,
    })
}

/// 채널 하나의 스캔 결과
#[derive(Debug, Clone, Default)]
pub struct ChannelScan {
    pub kept: Vec<PreparedMessage>,
    pub scanned: usize,
    pub short: usize,
    pub ignored: usize,
    /// 조회 기간 밖 메시지를 만나 중단했는지
    pub hit_horizon: bool,
}

/// 최신순 메시지 목록 스캔
pub fn scan_channel(
    messages: Vec<ChannelMessage>,
    cutoff: DateTime<Utc>,
    stoplist: &Stoplist,
) -> ChannelScan {
    let mut scan = ChannelScan::default();

    for message in messages {
        scan.scanned += 1;
        match screen_message(message, cutoff, stoplist) {
            Screening::Keep(prepared) => scan.kept.push(prepared),
            Screening::TooShort => scan.short += 1,
            Screening::Ignored => scan.ignored += 1,
            Screening::PastHorizon => {
                scan.hit_horizon = true;
                break;
            }
        }
    }

    scan
}

/// 타임아웃을 걸고 채널 조회.
///
/// 시간 초과는 `ProviderError::Timeout`으로 돌려줍니다.
pub async fn fetch_channel(
    source: &dyn ChannelSource,
    channel: &str,
    limit: usize,
    timeout: Duration,
) -> Result<Vec<ChannelMessage>, ProviderError> {
    match tokio::time::timeout(timeout, source.fetch_recent(channel, limit)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(format!(
            "{} 채널 조회 {}초 초과",
            channel,
            timeout.as_secs()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, hour, 0, 0).unwrap()
    }

    fn msg(text: &str, posted_at: DateTime<Utc>) -> ChannelMessage {
        ChannelMessage::new("dart_notify", text, posted_at)
    }

    #[test]
    fn test_screen_keeps_and_converts_to_kst() {
        let stoplist = Stoplist::builtin();
        let screening = screen_message(
            msg("OO전자 공급계약 체결 https://dart.fss.or.kr/x", at(1)),
            at(0),
            &stoplist,
        );

        match screening {
            Screening::Keep(prepared) => {
                assert_eq!(prepared.local_time, "2025-01-10 10:00:00");
                assert_eq!(prepared.link.as_deref(), Some("https://dart.fss.or.kr/x"));
                assert_eq!(prepared.channel, "dart_notify");
            }
            other => panic!("unexpected screening: {:?}", other),
        }
    }

    #[test]
    fn test_screen_short_and_ignored() {
        let stoplist = Stoplist::builtin();
        assert_eq!(
            screen_message(msg("ㅋㅋ", at(1)), at(0), &stoplist),
            Screening::TooShort
        );
        assert_eq!(
            screen_message(msg("비트코인 또 급등", at(1)), at(0), &stoplist),
            Screening::Ignored
        );
        // 세 글자면 통과
        assert!(matches!(
            screen_message(msg("OO전", at(1)), at(0), &stoplist),
            Screening::Keep(_)
        ));
    }

    #[test]
    fn test_scan_stops_at_horizon() {
        let stoplist = Stoplist::builtin();
        let messages = vec![
            msg("가장 최근 메시지", at(5)),
            msg("ㅎ", at(4)),
            msg("오래된 메시지", at(0)),
            msg("더 오래된 메시지", at(0)),
        ];

        let scan = scan_channel(messages, at(2), &stoplist);

        assert!(scan.hit_horizon);
        assert_eq!(scan.scanned, 3);
        assert_eq!(scan.short, 1);
        assert_eq!(scan.kept.len(), 1);
        assert_eq!(scan.kept[0].text, "가장 최근 메시지");
    }

    #[test]
    fn test_horizon_checked_before_length() {
        let stoplist = Stoplist::builtin();
        assert_eq!(
            screen_message(msg("ㅎ", at(0)), at(2), &stoplist),
            Screening::PastHorizon
        );
    }
}
