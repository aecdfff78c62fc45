//! Stock Buzz 데이터 계층.
//!
//! - `provider`: KRX 전 종목 시세, 텔레그램 채널 웹 미리보기
//! - `tokenizer`: 한글 휴리스틱 형태소 분석기
//! - `storage`: 대시보드가 읽는 CSV 파일 (원자적 교체 쓰기)

pub mod provider;
pub mod storage;
pub mod tokenizer;

pub use provider::{KrxListingConfig, KrxListingProvider, TelegramWebConfig, TelegramWebSource};
pub use storage::{read_csv, write_csv_atomic, StorageError};
pub use tokenizer::HangulTokenizer;
