//! 외부 협력자 에러 타입.

use thiserror::Error;

/// 데이터 제공자(채널 소스, 종목 목록) 에러.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("네트워크 오류: {0}")]
    Network(String),

    #[error("요청 시간 초과: {0}")]
    Timeout(String),

    #[error("HTTP 오류 ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("응답 파싱 실패: {0}")]
    Parse(String),

    #[error("데이터 없음: {0}")]
    NoData(String),
}

impl ProviderError {
    /// 일시적인 오류인지 (다음 주기에 다시 시도할 가치가 있는지)
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            Self::Parse(_) | Self::NoData(_) => false,
        }
    }
}

/// 토크나이저 에러.
#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("토큰화 실패: {0}")]
    Failed(String),

    #[error("입력이 너무 김: {len}자")]
    InputTooLong { len: usize },
}
