//! 메시지 텍스트 헬퍼.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use regex::Regex;

/// 표시 시간대 (KST, UTC+9)
pub const DISPLAY_TZ: Tz = chrono_tz::Asia::Seoul;

/// 알림 시각 포맷 (중복 키에 사용)
pub const ALERT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 랭킹 스냅샷 생성 시각 포맷
pub const SNAPSHOT_TIME_FORMAT: &str = "%H:%M:%S";

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("URL 패턴은 항상 유효"));

/// 본문의 첫 번째 URL
pub fn extract_first_url(text: &str) -> Option<&str> {
    URL_PATTERN.find(text).map(|m| m.as_str())
}

/// 문자 단위로 앞에서 `max_chars`자까지 자르기
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// UTC 시각을 KST 알림 시각 문자열로 변환
pub fn to_alert_time(utc: DateTime<Utc>) -> String {
    utc.with_timezone(&DISPLAY_TZ)
        .format(ALERT_TIME_FORMAT)
        .to_string()
}

/// UTC 시각을 KST 스냅샷 시각 문자열로 변환
pub fn to_snapshot_time(utc: DateTime<Utc>) -> String {
    utc.with_timezone(&DISPLAY_TZ)
        .format(SNAPSHOT_TIME_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_extract_first_url() {
        let text = "OO전자 공시 https://dart.fss.or.kr/dsaf001/main.do?rcpNo=1 참고 http://a.b";
        assert_eq!(
            extract_first_url(text),
            Some("https://dart.fss.or.kr/dsaf001/main.do?rcpNo=1")
        );
        assert_eq!(extract_first_url("링크 없음"), None);
        assert_eq!(extract_first_url("ftp://files.example"), None);
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("가나다라마", 3), "가나다");
        assert_eq!(truncate_chars("가나", 10), "가나");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_kst_conversion() {
        let utc = Utc.with_ymd_and_hms(2025, 3, 4, 23, 30, 15).unwrap();
        assert_eq!(to_alert_time(utc), "2025-03-05 08:30:15");
        assert_eq!(to_snapshot_time(utc), "08:30:15");
    }
}
