//! 에러 타입 정의.

use std::fmt;

use buzz_core::ProviderError;
use buzz_data::StorageError;

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 설정 에러
    Config(String),
    /// 데이터 소스 에러 (KRX, 텔레그램 등)
    DataSource(String),
    /// 종목 디렉토리를 만들 수 없음 (이번 주기 중단)
    DirectoryUnavailable(String),
    /// 파일 저장 에러
    Storage(StorageError),
    /// 일반 에러
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::DataSource(msg) => write!(f, "Data source error: {}", msg),
            Self::DirectoryUnavailable(msg) => write!(f, "Ticker directory unavailable: {}", msg),
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Other(e) => write!(f, "Error: {}", e),
        }
    }
}

impl std::error::Error for CollectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for CollectorError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<ProviderError> for CollectorError {
    fn from(err: ProviderError) -> Self {
        Self::DataSource(err.to_string())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CollectorError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::Other(err)
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = CollectorError::Config("BUZZ_CHANNELS 비어 있음".to_string());
        assert_eq!(err.to_string(), "Configuration error: BUZZ_CHANNELS 비어 있음");

        let err: CollectorError = ProviderError::Timeout("KRX".to_string()).into();
        assert!(matches!(err, CollectorError::DataSource(_)));
        assert!(err.to_string().starts_with("Data source error:"));
    }
}
