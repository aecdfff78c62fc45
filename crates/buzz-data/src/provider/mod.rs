//! 외부 데이터 제공자.

pub mod krx_listing;
pub mod telegram_web;

pub use krx_listing::{KrxListingConfig, KrxListingProvider};
pub use telegram_web::{TelegramWebConfig, TelegramWebSource};

use buzz_core::ProviderError;

/// reqwest 에러를 제공자 에러로 변환
pub(crate) fn map_reqwest_error(context: &str, err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(format!("{}: {}", context, err))
    } else if let Some(status) = err.status() {
        ProviderError::Http {
            status: status.as_u16(),
            message: err.to_string(),
        }
    } else {
        ProviderError::Network(format!("{}: {}", context, err))
    }
}
