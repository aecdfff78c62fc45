//! Stock Buzz 공용 도메인 모듈.
//!
//! 수집기와 데이터 제공자가 공유하는 타입, 불용어 테이블, 외부 협력자 트레잇을 정의합니다.
//!
//! ```text
//! buzz-core
//! ├── types      // TickerDirectory, MentionMap, RankedEntry, AlertRecord
//! ├── stoplist   // 종목 블랙리스트, 노이즈, 불용어, 절대 무시 목록
//! ├── text       // URL 추출, 문자 단위 자르기, 표시 시간대 변환
//! ├── domain     // ChannelSource, ListingProvider, Tokenizer
//! └── error      // ProviderError, TokenizeError
//! ```

pub mod domain;
pub mod error;
pub mod stoplist;
pub mod text;
pub mod types;

pub use domain::{ChannelSource, ListedStock, ListingProvider, PosTag, Token, Tokenizer};
pub use error::{ProviderError, TokenizeError};
pub use stoplist::{ExclusionReason, Stoplist};
pub use types::{
    AlertKey, AlertPolicy, AlertRecord, ChannelMessage, MentionMap, RankedEntry, TickerDirectory,
    TickerInfo,
};
