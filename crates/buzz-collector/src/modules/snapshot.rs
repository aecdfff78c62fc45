//! 언급량 랭킹과 스냅샷 파일 기록.
//!
//! - `market_data.csv`: 상위 N개 (헤드라인)
//! - `search_db.csv`: 전체 (검색용)
//!
//! 두 파일 모두 매번 통째로 교체합니다.

use std::path::PathBuf;

use buzz_core::types::{CONTEXT_DELIMITER, TREND_PLACEHOLDER};
use buzz_core::{MentionMap, RankedEntry, Stoplist, TickerDirectory, Tokenizer};
use buzz_data::{write_csv_atomic, StorageError};
use rust_decimal::Decimal;

use super::keyword::extract_theme;

/// 헤드라인 랭킹 파일
pub const MARKET_DATA_FILE: &str = "market_data.csv";
/// 전체 랭킹 파일
pub const SEARCH_DB_FILE: &str = "search_db.csv";
/// Context 컬럼에 넣는 메시지 수
pub const CONTEXT_MESSAGES: usize = 5;

/// 언급 맵을 랭킹으로 변환.
///
/// 언급 수 내림차순, 같으면 종목명 오름차순이며 순위는 1부터 빈틈없이 매깁니다.
pub fn rank_mentions(
    mentions: &MentionMap,
    directory: &TickerDirectory,
    tokenizer: &dyn Tokenizer,
    stoplist: &Stoplist,
    generated_at: &str,
) -> Vec<RankedEntry> {
    let mut ordered: Vec<(&str, &[String])> = mentions.iter().collect();
    ordered.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, (ticker, texts))| {
            let (price, change_pct) = directory
                .get(ticker)
                .map(|info| (info.last_price, info.change_pct))
                .unwrap_or((Decimal::ZERO, 0.0));
            let context = texts
                .iter()
                .take(CONTEXT_MESSAGES)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(CONTEXT_DELIMITER);

            RankedEntry {
                rank: i + 1,
                ticker: ticker.to_string(),
                mention_count: texts.len(),
                price,
                change_pct,
                trend: TREND_PLACEHOLDER.to_string(),
                theme: extract_theme(texts, tokenizer, stoplist),
                context,
                generated_at: generated_at.to_string(),
            }
        })
        .collect()
}

/// 스냅샷 파일 기록기
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    dir: PathBuf,
    top_n: usize,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>, top_n: usize) -> Self {
        Self {
            dir: dir.into(),
            top_n,
        }
    }

    pub fn market_data_path(&self) -> PathBuf {
        self.dir.join(MARKET_DATA_FILE)
    }

    pub fn search_db_path(&self) -> PathBuf {
        self.dir.join(SEARCH_DB_FILE)
    }

    /// 헤드라인과 전체 랭킹 기록
    pub fn write(&self, entries: &[RankedEntry]) -> Result<(), StorageError> {
        let headline = &entries[..entries.len().min(self.top_n)];
        write_csv_atomic(&self.market_data_path(), headline)?;
        write_csv_atomic(&self.search_db_path(), entries)?;

        tracing::debug!(
            dir = %self.dir.display(),
            headline = headline.len(),
            total = entries.len(),
            "랭킹 스냅샷 저장"
        );
        Ok(())
    }
}
