//! 형태소 분석기 트레잇.

use crate::error::TokenizeError;

/// 품사 태그 (키워드 추출에 필요한 만큼만 구분)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    /// 일반 명사 (NNG)
    CommonNoun,
    /// 고유 명사 (NNP)
    ProperNoun,
    /// 외국어 (SL)
    Foreign,
    /// 숫자 (SN)
    Number,
    /// 조사 (J*)
    Particle,
    /// 용언/어미 (V*, E*)
    Predicate,
    /// 기호, 기타
    Symbol,
}

impl PosTag {
    /// 명사 계열 여부
    pub fn is_noun(self) -> bool {
        matches!(self, Self::CommonNoun | Self::ProperNoun)
    }
}

/// 토큰 (표면형 + 품사)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub form: String,
    pub tag: PosTag,
}

impl Token {
    pub fn new(form: impl Into<String>, tag: PosTag) -> Self {
        Self {
            form: form.into(),
            tag,
        }
    }

    /// 표면형 길이 (문자 수)
    pub fn char_len(&self) -> usize {
        self.form.chars().count()
    }
}

/// 텍스트를 품사 태그가 붙은 토큰열로 분해.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError>;
}
