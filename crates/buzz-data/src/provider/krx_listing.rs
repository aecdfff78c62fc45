//! KRX 전 종목 시세 제공자.
//!
//! KRX 정보데이터시스템의 "전종목 시세" 화면(MDCSTAT01501) JSON을 조회합니다.
//! 주말/휴장일에는 해당 일자 데이터가 비어 있으므로 직전 일자로 거슬러 올라가며 재조회합니다.
//!
//! ```rust,ignore
//! let provider = KrxListingProvider::new(KrxListingConfig::default())?;
//! let listing = provider.fetch_listing().await?;
//! println!("{}개 종목", listing.len());
//! ```

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use buzz_core::{ListedStock, ListingProvider, ProviderError};
use chrono::{NaiveDate, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use super::map_reqwest_error;

const LISTING_PATH: &str = "/comm/bldAttendant/getJsonData.cmd";
const LISTING_BLD: &str = "dbms/MDC/STAT/standard/MDCSTAT01501";
const REFERER: &str = "http://data.krx.co.kr/contents/MDC/MDI/mdiLoader";

/// KRX 시세 제공자 설정
#[derive(Debug, Clone)]
pub struct KrxListingConfig {
    /// 기본 URL (테스트에서 목 서버로 교체)
    pub base_url: String,
    /// 데이터가 빈 경우 거슬러 올라갈 최대 일수
    pub max_backtrack_days: u32,
    /// 요청 타임아웃
    pub timeout: Duration,
}

impl Default for KrxListingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://data.krx.co.kr".to_string(),
            max_backtrack_days: 7,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(rename = "OutBlock_1", default)]
    out_block: Vec<ListingRow>,
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    #[serde(rename = "ISU_SRT_CD")]
    code: String,
    #[serde(rename = "ISU_ABBRV")]
    name: String,
    #[serde(rename = "TDD_CLSPRC", default)]
    close: String,
    #[serde(rename = "FLUC_RT", default)]
    change_rate: String,
}

/// KRX 숫자 문자열 파싱 ("71,000", "-1.23", "-" → None)
fn parse_krx_number(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

impl ListingRow {
    fn into_listed(self) -> ListedStock {
        let change_pct = parse_krx_number(&self.change_rate)
            .and_then(|d| d.to_string().parse::<f64>().ok())
            .unwrap_or(0.0);
        ListedStock {
            code: self.code.trim().to_string(),
            name: self.name.trim().to_string(),
            close: parse_krx_number(&self.close).unwrap_or_default(),
            change_pct,
        }
    }
}

/// KRX 전 종목 시세 제공자
pub struct KrxListingProvider {
    client: Client,
    config: KrxListingConfig,
}

impl KrxListingProvider {
    pub fn new(config: KrxListingConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent("Mozilla/5.0 (stock-buzz collector)")
            .build()
            .map_err(|e| ProviderError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))?;
        Ok(Self { client, config })
    }

    /// 특정 거래일의 전 종목 시세 조회
    async fn fetch_for_date(&self, date: NaiveDate) -> Result<Vec<ListedStock>, ProviderError> {
        let url = format!("{}{}", self.config.base_url, LISTING_PATH);
        let trade_date = date.format("%Y%m%d").to_string();
        let params = [
            ("bld", LISTING_BLD),
            ("locale", "ko_KR"),
            ("mktId", "ALL"),
            ("trdDd", trade_date.as_str()),
            ("share", "1"),
            ("money", "1"),
            ("csvxls_isNo", "false"),
        ];

        let response = self
            .client
            .post(&url)
            .header("Referer", REFERER)
            .form(&params)
            .send()
            .await
            .map_err(|e| map_reqwest_error("KRX 시세 요청", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: text,
            });
        }

        let body: ListingResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("KRX 시세 응답: {}", e)))?;

        Ok(body
            .out_block
            .into_iter()
            .filter(|row| !row.name.trim().is_empty())
            .map(ListingRow::into_listed)
            .collect())
    }

    /// 기준일부터 거슬러 올라가며 데이터가 있는 첫 거래일의 시세 조회
    pub async fn fetch_listing_as_of(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ListedStock>, ProviderError> {
        let mut current = date;
        for attempt in 0..=self.config.max_backtrack_days {
            let listing = self.fetch_for_date(current).await?;
            if !listing.is_empty() {
                info!(
                    trade_date = %current,
                    count = listing.len(),
                    "KRX 전 종목 시세 조회 완료"
                );
                return Ok(listing);
            }
            debug!(trade_date = %current, attempt, "KRX 시세 없음, 직전 일자 재조회");
            match current.pred_opt() {
                Some(prev) => current = prev,
                None => break,
            }
        }
        Err(ProviderError::NoData(format!(
            "{} 기준 {}일 이내 KRX 시세 없음",
            date, self.config.max_backtrack_days
        )))
    }
}

#[async_trait]
impl ListingProvider for KrxListingProvider {
    async fn fetch_listing(&self) -> Result<Vec<ListedStock>, ProviderError> {
        let today = Utc::now()
            .with_timezone(&buzz_core::text::DISPLAY_TZ)
            .date_naive();
        self.fetch_listing_as_of(today).await
    }
}
