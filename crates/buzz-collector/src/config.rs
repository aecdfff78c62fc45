//! 환경변수 기반 설정 모듈.
//!
//! `.env`를 먼저 읽은 뒤 환경변수로 설정을 구성합니다. 채널 목록은
//! `BUZZ_CHANNELS_FILE`(기본 `channels.toml`)이 있으면 그 파일을 기본으로 쓰고,
//! 같은 항목의 환경변수가 설정되어 있으면 환경변수가 우선합니다.

use std::path::{Path, PathBuf};
use std::time::Duration;

use buzz_core::AlertPolicy;
use buzz_data::{KrxListingConfig, TelegramWebConfig};
use secrecy::SecretString;
use serde::Deserialize;

use crate::error::CollectorError;
use crate::Result;

/// 기본 공시 채널
pub const DEFAULT_DISCLOSURE_CHANNELS: &[&str] = &["rassiro_gongsi", "dart_notify", "kind_disclosure"];

/// 기본 알림 키워드
pub const DEFAULT_ALERT_KEYWORDS: &[&str] = &[
    "잠정실적", "영업이익", "매출액", "유상증자", "무상증자", "합병", "분할", "공개매수", "공급계약",
    "수주", "임상", "승인", "체결", "특허", "무상", "배당", "자사주",
];

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 모니터링 채널 설정
    pub channels: ChannelConfig,
    /// 알림 기록 설정
    pub alert: AlertConfig,
    /// 메시지 수집 설정
    pub ingest: IngestConfig,
    /// 출력 파일 설정
    pub output: OutputConfig,
    /// 데몬 모드 설정
    pub daemon: DaemonConfig,
    /// 외부 데이터 제공자 설정
    pub providers: ProviderConfig,
}

/// 모니터링 채널 설정
#[derive(Debug, Clone, Default)]
pub struct ChannelConfig {
    /// 순서대로 조회할 채널 목록
    pub channels: Vec<String>,
    /// 공시 채널 (채널 ID에 포함되면 공시 채널로 봄)
    pub disclosure_channels: Vec<String>,
}

/// 알림 기록 설정
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// 알림 정책
    pub policy: AlertPolicy,
    /// 알림 키워드
    pub keywords: Vec<String>,
    /// 키워드 정책을 적용할 단일 채널 (없으면 전체 채널)
    pub keyword_channel: Option<String>,
    /// 보관 최대 건수
    pub cap: usize,
}

/// 조회 기간 허용 범위 (일)
pub const LOOKBACK_DAYS_RANGE: std::ops::RangeInclusive<i64> = 1..=365;

/// 메시지 수집 설정
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// 채널당 최대 메시지 수
    pub message_limit: usize,
    /// 조회 기간 (일)
    pub lookback_days: i64,
    /// 채널 조회 타임아웃 (초)
    pub fetch_timeout_secs: u64,
    /// 중간 저장 주기 (채널 수)
    pub checkpoint_every: usize,
}

/// 출력 파일 설정
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// CSV 파일 디렉토리
    pub dir: PathBuf,
    /// 헤드라인 랭킹 크기
    pub top_n: usize,
}

/// 데몬 모드 설정
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// 주기 사이 대기 시간 (초)
    pub interval_secs: u64,
}

/// 외부 데이터 제공자 설정
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub telegram_base_url: String,
    /// 미러 서버용 토큰 (선택)
    pub telegram_auth_token: Option<SecretString>,
    pub krx_base_url: String,
    pub krx_max_backtrack_days: u32,
}

/// 채널 설정 파일 (`channels.toml`)
#[derive(Debug, Default, Deserialize)]
struct ChannelsFile {
    #[serde(default)]
    channels: Vec<String>,
    disclosure_channels: Option<Vec<String>>,
    alert_keywords: Option<Vec<String>>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            channels: ChannelConfig {
                channels: Vec::new(),
                disclosure_channels: to_strings(DEFAULT_DISCLOSURE_CHANNELS),
            },
            alert: AlertConfig {
                policy: AlertPolicy::default(),
                keywords: to_strings(DEFAULT_ALERT_KEYWORDS),
                keyword_channel: None,
                cap: 300,
            },
            ingest: IngestConfig {
                message_limit: 100,
                lookback_days: 3,
                fetch_timeout_secs: 20,
                checkpoint_every: 5,
            },
            output: OutputConfig {
                dir: PathBuf::from("."),
                top_n: 30,
            },
            daemon: DaemonConfig { interval_secs: 30 },
            providers: ProviderConfig {
                telegram_base_url: "https://t.me".to_string(),
                telegram_auth_token: None,
                krx_base_url: "https://data.krx.co.kr".to_string(),
                krx_max_backtrack_days: 7,
            },
        }
    }
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로 설정 구성
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let channels_path = lookup("BUZZ_CHANNELS_FILE").unwrap_or_else(|| "channels.toml".to_string());
        let file = load_channels_file(Path::new(&channels_path))?;

        let channels = list_or(&lookup, "BUZZ_CHANNELS", file.channels);
        let disclosure_channels = list_or(
            &lookup,
            "BUZZ_DISCLOSURE_CHANNELS",
            file.disclosure_channels
                .unwrap_or(defaults.channels.disclosure_channels),
        );
        let keywords = list_or(
            &lookup,
            "BUZZ_ALERT_KEYWORDS",
            file.alert_keywords.unwrap_or(defaults.alert.keywords),
        );

        let policy = match lookup("BUZZ_ALERT_POLICY") {
            Some(raw) => raw.parse::<AlertPolicy>().map_err(CollectorError::Config)?,
            None => defaults.alert.policy,
        };

        let config = Self {
            channels: ChannelConfig {
                channels,
                disclosure_channels,
            },
            alert: AlertConfig {
                policy,
                keywords,
                keyword_channel: lookup("BUZZ_KEYWORD_CHANNEL")
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty()),
                cap: parse_or(&lookup, "BUZZ_ALERT_CAP", defaults.alert.cap),
            },
            ingest: IngestConfig {
                message_limit: parse_or(&lookup, "BUZZ_MESSAGE_LIMIT", defaults.ingest.message_limit),
                lookback_days: parse_or(&lookup, "BUZZ_LOOKBACK_DAYS", defaults.ingest.lookback_days),
                fetch_timeout_secs: parse_or(
                    &lookup,
                    "BUZZ_FETCH_TIMEOUT_SECS",
                    defaults.ingest.fetch_timeout_secs,
                ),
                checkpoint_every: parse_or(
                    &lookup,
                    "BUZZ_CHECKPOINT_EVERY",
                    defaults.ingest.checkpoint_every,
                ),
            },
            output: OutputConfig {
                dir: lookup("BUZZ_OUTPUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.output.dir),
                top_n: parse_or(&lookup, "BUZZ_TOP_N", defaults.output.top_n),
            },
            daemon: DaemonConfig {
                interval_secs: parse_or(&lookup, "BUZZ_INTERVAL_SECS", defaults.daemon.interval_secs),
            },
            providers: ProviderConfig {
                telegram_base_url: lookup("TELEGRAM_WEB_BASE_URL")
                    .unwrap_or(defaults.providers.telegram_base_url),
                telegram_auth_token: lookup("TELEGRAM_WEB_AUTH_TOKEN")
                    .filter(|v| !v.trim().is_empty())
                    .map(SecretString::from),
                krx_base_url: lookup("KRX_BASE_URL").unwrap_or(defaults.providers.krx_base_url),
                krx_max_backtrack_days: parse_or(
                    &lookup,
                    "KRX_MAX_BACKTRACK_DAYS",
                    defaults.providers.krx_max_backtrack_days,
                ),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// 값 범위 검증
    fn validate(&self) -> Result<()> {
        if self.alert.cap == 0 {
            return Err(CollectorError::Config("BUZZ_ALERT_CAP은 1 이상이어야 합니다".to_string()));
        }
        if self.ingest.checkpoint_every == 0 {
            return Err(CollectorError::Config(
                "BUZZ_CHECKPOINT_EVERY는 1 이상이어야 합니다".to_string(),
            ));
        }
        if !LOOKBACK_DAYS_RANGE.contains(&self.ingest.lookback_days) {
            return Err(CollectorError::Config(format!(
                "BUZZ_LOOKBACK_DAYS는 {}~{} 범위여야 합니다: {}",
                LOOKBACK_DAYS_RANGE.start(),
                LOOKBACK_DAYS_RANGE.end(),
                self.ingest.lookback_days
            )));
        }
        if self.ingest.fetch_timeout_secs == 0 {
            return Err(CollectorError::Config(
                "BUZZ_FETCH_TIMEOUT_SECS는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(())
    }

    /// 수집 명령 실행 전 채널 목록 확인
    pub fn require_channels(&self) -> Result<()> {
        if self.channels.channels.is_empty() {
            return Err(CollectorError::Config(
                "모니터링 채널이 없습니다. BUZZ_CHANNELS 또는 channels.toml을 설정하세요".to_string(),
            ));
        }
        Ok(())
    }

    /// KRX 제공자 설정
    pub fn krx_config(&self) -> KrxListingConfig {
        KrxListingConfig {
            base_url: self.providers.krx_base_url.clone(),
            max_backtrack_days: self.providers.krx_max_backtrack_days,
            ..KrxListingConfig::default()
        }
    }

    /// 텔레그램 웹 미리보기 설정
    pub fn telegram_config(&self) -> TelegramWebConfig {
        TelegramWebConfig {
            base_url: self.providers.telegram_base_url.clone(),
            auth_token: self.providers.telegram_auth_token.clone(),
            ..TelegramWebConfig::default()
        }
    }
}

impl IngestConfig {
    /// 채널 조회 타임아웃을 Duration으로 반환
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// 조회 기간을 chrono Duration으로 반환
    pub fn lookback(&self) -> chrono::Duration {
        chrono::Duration::days(self.lookback_days)
    }
}

impl DaemonConfig {
    /// 주기 사이 대기 시간을 Duration으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// 채널 설정 파일 읽기 (없으면 빈 설정)
fn load_channels_file(path: &Path) -> Result<ChannelsFile> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let file: ChannelsFile = toml::from_str(&content).map_err(|e| {
                CollectorError::Config(format!("{} 파싱 실패: {}", path.display(), e))
            })?;
            tracing::debug!(
                path = %path.display(),
                channels = file.channels.len(),
                "채널 설정 파일 로드"
            );
            Ok(file)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ChannelsFile::default()),
        Err(e) => Err(CollectorError::Config(format!(
            "{} 읽기 실패: {}",
            path.display(),
            e
        ))),
    }
}

/// 값을 파싱 (실패 시 기본값 사용)
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// 쉼표로 구분된 리스트 파싱 (미설정이면 기본값)
fn list_or<F>(lookup: &F, key: &str, default: Vec<String>) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) => v
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => default,
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::from_lookup(lookup_from(&[(
            "BUZZ_CHANNELS_FILE",
            "/nonexistent/channels.toml",
        )]))
        .unwrap();

        assert!(config.channels.channels.is_empty());
        assert_eq!(
            config.channels.disclosure_channels,
            vec!["rassiro_gongsi", "dart_notify", "kind_disclosure"]
        );
        assert_eq!(config.alert.policy, AlertPolicy::ChannelGated);
        assert_eq!(config.alert.keywords.len(), 17);
        assert_eq!(config.alert.cap, 300);
        assert_eq!(config.ingest.message_limit, 100);
        assert_eq!(config.ingest.lookback_days, 3);
        assert_eq!(config.ingest.fetch_timeout(), Duration::from_secs(20));
        assert_eq!(config.ingest.checkpoint_every, 5);
        assert_eq!(config.output.top_n, 30);
        assert_eq!(config.daemon.interval(), Duration::from_secs(30));
        assert!(config.providers.telegram_auth_token.is_none());
        assert!(config.require_channels().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = CollectorConfig::from_lookup(lookup_from(&[
            ("BUZZ_CHANNELS_FILE", "/nonexistent/channels.toml"),
            ("BUZZ_CHANNELS", "dart_notify, HanaResearch ,,stock_news"),
            ("BUZZ_ALERT_POLICY", "hybrid"),
            ("BUZZ_KEYWORD_CHANNEL", "stock_news"),
            ("BUZZ_ALERT_KEYWORDS", "수주,유상증자"),
            ("BUZZ_TOP_N", "10"),
            ("BUZZ_MESSAGE_LIMIT", "not-a-number"),
            ("TELEGRAM_WEB_AUTH_TOKEN", "secret-token"),
        ]))
        .unwrap();

        // 채널 ID는 대소문자를 유지
        assert_eq!(
            config.channels.channels,
            vec!["dart_notify", "HanaResearch", "stock_news"]
        );
        assert_eq!(config.alert.policy, AlertPolicy::Hybrid);
        assert_eq!(config.alert.keyword_channel.as_deref(), Some("stock_news"));
        assert_eq!(config.alert.keywords, vec!["수주", "유상증자"]);
        assert_eq!(config.output.top_n, 10);
        assert_eq!(config.ingest.message_limit, 100);
        assert_eq!(
            config
                .providers
                .telegram_auth_token
                .as_ref()
                .unwrap()
                .expose_secret(),
            "secret-token"
        );
        assert!(config.require_channels().is_ok());
    }

    #[test]
    fn test_invalid_policy_is_config_error() {
        let result = CollectorConfig::from_lookup(lookup_from(&[
            ("BUZZ_CHANNELS_FILE", "/nonexistent/channels.toml"),
            ("BUZZ_ALERT_POLICY", "push"),
        ]));
        assert!(matches!(result, Err(CollectorError::Config(_))));
    }

    #[test]
    fn test_lookback_days_out_of_range_rejected() {
        for days in ["0", "-3", "366", "9223372036854775807"] {
            let result = CollectorConfig::from_lookup(lookup_from(&[
                ("BUZZ_CHANNELS_FILE", "/nonexistent/channels.toml"),
                ("BUZZ_LOOKBACK_DAYS", days),
            ]));
            assert!(matches!(result, Err(CollectorError::Config(_))), "days={}", days);
        }

        let config = CollectorConfig::from_lookup(lookup_from(&[
            ("BUZZ_CHANNELS_FILE", "/nonexistent/channels.toml"),
            ("BUZZ_LOOKBACK_DAYS", "365"),
        ]))
        .unwrap();
        assert_eq!(config.ingest.lookback(), chrono::Duration::days(365));
    }

    #[test]
    fn test_zero_cap_rejected() {
        let result = CollectorConfig::from_lookup(lookup_from(&[
            ("BUZZ_CHANNELS_FILE", "/nonexistent/channels.toml"),
            ("BUZZ_ALERT_CAP", "0"),
        ]));
        assert!(matches!(result, Err(CollectorError::Config(_))));
    }

    #[test]
    fn test_channels_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("channels.toml");
        std::fs::write(
            &path,
            r#"
channels = ["dart_notify", "economy_trending"]
disclosure_channels = ["dart_notify"]
alert_keywords = ["수주"]
"#,
        )
        .unwrap();

        let path_str = path.to_string_lossy().to_string();
        let config = CollectorConfig::from_lookup(lookup_from(&[
            ("BUZZ_CHANNELS_FILE", path_str.as_str()),
            ("BUZZ_ALERT_KEYWORDS", "합병"),
        ]))
        .unwrap();

        assert_eq!(config.channels.channels, vec!["dart_notify", "economy_trending"]);
        assert_eq!(config.channels.disclosure_channels, vec!["dart_notify"]);
        // 환경변수가 파일보다 우선
        assert_eq!(config.alert.keywords, vec!["합병"]);
    }

    #[test]
    fn test_malformed_channels_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("channels.toml");
        std::fs::write(&path, "channels = dart_notify").unwrap();

        let path_str = path.to_string_lossy().to_string();
        let result =
            CollectorConfig::from_lookup(lookup_from(&[("BUZZ_CHANNELS_FILE", path_str.as_str())]));
        assert!(matches!(result, Err(CollectorError::Config(_))));
    }
}
