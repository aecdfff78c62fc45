//! 종목 디렉토리 구성.
//!
//! 상장 종목 전체를 받아 블랙리스트, 노이즈, 구조적 종목(스팩/리츠/우B)을
//! 제외한 이름 → 시세 맵을 만듭니다.

use buzz_core::{
    ExclusionReason, ListedStock, ListingProvider, Stoplist, TickerDirectory, TickerInfo,
};

use crate::error::CollectorError;
use crate::Result;

/// 제외 사유별 집계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryStats {
    pub listed: usize,
    pub blacklisted: usize,
    pub noise: usize,
    pub structural: usize,
}

/// 상장 목록에서 디렉토리 생성
pub fn filter_listing(
    listing: Vec<ListedStock>,
    stoplist: &Stoplist,
) -> (TickerDirectory, DirectoryStats) {
    let mut stats = DirectoryStats {
        listed: listing.len(),
        ..Default::default()
    };
    let mut directory = TickerDirectory::new();

    for stock in listing {
        match stoplist.exclusion_reason(&stock.name) {
            Some(ExclusionReason::Blacklisted) => stats.blacklisted += 1,
            Some(ExclusionReason::Noise) => stats.noise += 1,
            Some(ExclusionReason::Structural) => stats.structural += 1,
            None => directory.insert(TickerInfo {
                code: stock.code,
                name: stock.name,
                last_price: stock.close,
                change_pct: stock.change_pct,
            }),
        }
    }

    (directory, stats)
}

/// 종목 디렉토리 조회.
///
/// 조회 실패는 `DirectoryUnavailable`로 반환합니다. 빈 디렉토리도 같은 에러로 취급해
/// 호출 측이 이번 주기를 중단하도록 합니다.
pub async fn build_directory(
    provider: &dyn ListingProvider,
    stoplist: &Stoplist,
) -> Result<TickerDirectory> {
    let listing = provider
        .fetch_listing()
        .await
        .map_err(|e| CollectorError::DirectoryUnavailable(e.to_string()))?;

    let (directory, stats) = filter_listing(listing, stoplist);
    tracing::info!(
        listed = stats.listed,
        kept = directory.len(),
        blacklisted = stats.blacklisted,
        noise = stats.noise,
        structural = stats.structural,
        "종목 디렉토리 구성 완료"
    );

    if directory.is_empty() {
        return Err(CollectorError::DirectoryUnavailable(
            "제외 후 남은 종목이 없습니다".to_string(),
        ));
    }
    Ok(directory)
}
