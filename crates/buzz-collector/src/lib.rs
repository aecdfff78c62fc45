//! Stock Buzz 수집기.
//!
//! 텔레그램 채널의 종목 언급을 모아 언급량 랭킹, 테마 키워드, 공시 알림 이력을
//! 대시보드가 읽는 CSV로 기록합니다.
//!
//! ```text
//! buzz-collector
//! ├── config   // 환경변수 + channels.toml
//! ├── error    // CollectorError
//! ├── stats    // CycleStats
//! └── modules
//!     ├── directory  // 종목 디렉토리
//!     ├── ingest     // 채널 조회, 메시지 선별
//!     ├── mention    // 언급 집계
//!     ├── keyword    // 테마 키워드
//!     ├── snapshot   // 랭킹 스냅샷
//!     ├── alert      // 알림 이력
//!     └── cycle      // 주기 실행, 데몬 루프
//! ```

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use stats::CycleStats;
