//! 외부 협력자 인터페이스.
//!
//! 수집 파이프라인은 메시징 채널, 시세 목록, 형태소 분석기를 직접 알지 못하고
//! 이 트레잇들을 통해서만 접근합니다. 테스트에서는 메모리 구현으로 대체합니다.

pub mod source;
pub mod tokenizer;

pub use source::{ChannelSource, ListedStock, ListingProvider};
pub use tokenizer::{PosTag, Token, Tokenizer};
