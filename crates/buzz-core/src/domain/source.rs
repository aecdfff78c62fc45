//! 채널 메시지 소스와 종목 목록 제공자 트레잇.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{error::ProviderError, types::ChannelMessage};

/// 메시징 채널 소스.
///
/// 구현체는 최신 메시지부터 오래된 순서(역시간순)로 반환해야 합니다.
/// 수집 루프는 이 순서를 전제로 조회 기간을 벗어난 메시지에서 채널 스캔을 멈춥니다.
#[async_trait]
pub trait ChannelSource: Send + Sync {
    /// 소스 이름 (로그용)
    fn name(&self) -> &str;

    /// 채널의 최근 메시지를 최대 `limit`개까지 조회.
    async fn fetch_recent(
        &self,
        channel: &str,
        limit: usize,
    ) -> Result<Vec<ChannelMessage>, ProviderError>;
}

/// 상장 종목 한 건 (시세 포함).
#[derive(Debug, Clone, PartialEq)]
pub struct ListedStock {
    /// 종목 코드 (예: 005930)
    pub code: String,
    /// 종목명 (예: 삼성전자)
    pub name: String,
    /// 최근 종가
    pub close: Decimal,
    /// 전일 대비 등락률 (%)
    pub change_pct: f64,
}

/// 전 종목 시세 목록 제공자.
#[async_trait]
pub trait ListingProvider: Send + Sync {
    /// 전 종목 목록과 최근 시세 조회.
    async fn fetch_listing(&self) -> Result<Vec<ListedStock>, ProviderError>;
}
