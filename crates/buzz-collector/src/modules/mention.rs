//! 종목 언급 집계.

use buzz_core::{MentionMap, Stoplist, TickerDirectory};

/// 본문에 부분 문자열로 등장하는 디렉토리 종목명 (사전순).
///
/// 증권/스팩/리츠 표식이 있는 이름은 디렉토리에 있어도 건너뜁니다.
pub fn match_tickers<'d>(
    text: &str,
    directory: &'d TickerDirectory,
    stoplist: &Stoplist,
) -> Vec<&'d str> {
    directory
        .names()
        .filter(|name| text.contains(name))
        .filter(|name| !stoplist.is_broker_like(name))
        .collect()
}

/// 매칭된 종목마다 본문 기록. 새로 기록된 (종목, 본문) 수를 반환.
pub fn record_mentions(map: &mut MentionMap, text: &str, tickers: &[&str]) -> usize {
    tickers
        .iter()
        .filter(|ticker| map.record(ticker, text))
        .count()
}
