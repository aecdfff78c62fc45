//! 한글 휴리스틱 형태소 분석기.
//!
//! 사전 없이 문자 종류(한글/영문/숫자)로 어절을 나누고,
//! 한글 어절에서는 끝의 조사와 서술형 어미를 떼어 명사 후보를 만듭니다.
//!
//! ```text
//! "OO전자가 HBM 공급계약을 체결했다"
//!   → OO/Foreign 전자/CommonNoun 가/Particle HBM/Foreign
//!     공급계약/CommonNoun 을/Particle 체결/CommonNoun 했다/Predicate
//! ```
//!
//! 형태소 사전 기반 분석기만큼 정확하지 않으므로, 테마 키워드처럼
//! 빈도 상위 몇 개만 쓰는 용도로 사용합니다.

use buzz_core::{PosTag, Token, TokenizeError, Tokenizer};

/// 입력 최대 길이 (바이트)
const MAX_INPUT_BYTES: usize = 64 * 1024;

/// 어절 끝 조사 (긴 것부터 검사)
const PARTICLES: &[&str] = &[
    "에서는", "으로는", "에게서", "까지", "부터", "에서", "으로", "에게", "처럼", "보다", "마저",
    "조차", "이나", "이며", "과의", "와의", "은", "는", "이", "가", "을", "를", "의", "에", "와",
    "과", "도", "로", "만",
];

/// 조사처럼 보여도 떼지 않는 명사 끝 (예: 신고가, 디스플레이, 카카오페이)
const NOUN_ENDINGS: &[&str] = &[
    "신고가", "신저가", "상한가", "하한가", "공모가", "목표가", "매수가", "매도가", "시초가",
    "플레이", "레이", "페이", "프로",
];

/// 서술형 어미 (긴 것부터 검사)
const PREDICATE_ENDINGS: &[&str] = &[
    "했습니다", "합니다", "됩니다", "입니다", "습니다", "했다", "한다", "된다", "됐다", "이다",
    "였다", "있다", "없다", "하는", "하며", "하고", "해서", "했고", "되는", "하자", "했던", "된",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Hangul,
    Latin,
    Digit,
    Han,
    Other,
}

fn script_of(c: char) -> Script {
    match c {
        '\u{AC00}'..='\u{D7A3}' | '\u{3131}'..='\u{318E}' => Script::Hangul,
        'a'..='z' | 'A'..='Z' => Script::Latin,
        '0'..='9' => Script::Digit,
        '\u{4E00}'..='\u{9FFF}' => Script::Han,
        _ => Script::Other,
    }
}

/// 한글 휴리스틱 토크나이저
#[derive(Debug, Clone, Default)]
pub struct HangulTokenizer;

impl HangulTokenizer {
    pub fn new() -> Self {
        Self
    }

    /// 한글 어절 하나를 명사/조사/어미로 분해
    fn split_hangul(word: &str, tokens: &mut Vec<Token>) {
        if PARTICLES.contains(&word) {
            tokens.push(Token::new(word, PosTag::Particle));
            return;
        }
        if PREDICATE_ENDINGS.contains(&word) {
            tokens.push(Token::new(word, PosTag::Predicate));
            return;
        }

        for ending in PREDICATE_ENDINGS {
            if let Some(stem) = word.strip_suffix(ending) {
                if !stem.is_empty() {
                    tokens.push(Token::new(stem, PosTag::CommonNoun));
                    tokens.push(Token::new(*ending, PosTag::Predicate));
                    return;
                }
            }
        }

        if NOUN_ENDINGS.iter().any(|ending| word.ends_with(ending)) {
            tokens.push(Token::new(word, PosTag::CommonNoun));
            return;
        }

        for particle in PARTICLES {
            if let Some(stem) = word.strip_suffix(particle) {
                // 두 글자 미만 어간은 명사 자체로 봄 (예: 주가, 인도)
                if stem.chars().count() >= 2 {
                    tokens.push(Token::new(stem, PosTag::CommonNoun));
                    tokens.push(Token::new(*particle, PosTag::Particle));
                    return;
                }
            }
        }

        tokens.push(Token::new(word, PosTag::CommonNoun));
    }
}

impl Tokenizer for HangulTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError> {
        if text.len() > MAX_INPUT_BYTES {
            return Err(TokenizeError::InputTooLong {
                len: text.chars().count(),
            });
        }

        let mut tokens = Vec::new();
        let mut run = String::new();
        let mut run_script = Script::Other;

        let flush = |run: &mut String, script: Script, tokens: &mut Vec<Token>| {
            if run.is_empty() {
                return;
            }
            match script {
                Script::Hangul => Self::split_hangul(run, tokens),
                Script::Latin => tokens.push(Token::new(run.as_str(), PosTag::Foreign)),
                Script::Digit => tokens.push(Token::new(run.as_str(), PosTag::Number)),
                Script::Han | Script::Other => tokens.push(Token::new(run.as_str(), PosTag::Symbol)),
            }
            run.clear();
        };

        for c in text.chars() {
            let script = script_of(c);
            if c.is_whitespace() || (script == Script::Other && !c.is_alphanumeric()) {
                flush(&mut run, run_script, &mut tokens);
                continue;
            }
            if script != run_script {
                flush(&mut run, run_script, &mut tokens);
                run_script = script;
            }
            run.push(c);
        }
        flush(&mut run, run_script, &mut tokens);

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forms_with_tag(tokens: &[Token], tag: PosTag) -> Vec<&str> {
        tokens
            .iter()
            .filter(|t| t.tag == tag)
            .map(|t| t.form.as_str())
            .collect()
    }

    #[test]
    fn test_splits_particles_and_endings() {
        let tokens = HangulTokenizer::new()
            .tokenize("OO전자가 HBM 공급계약을 체결했다")
            .unwrap();

        assert_eq!(
            forms_with_tag(&tokens, PosTag::CommonNoun),
            vec!["전자", "공급계약", "체결"]
        );
        assert_eq!(forms_with_tag(&tokens, PosTag::Foreign), vec!["OO", "HBM"]);
        assert_eq!(forms_with_tag(&tokens, PosTag::Particle), vec!["가", "을"]);
        assert_eq!(forms_with_tag(&tokens, PosTag::Predicate), vec!["했다"]);
    }

    #[test]
    fn test_short_stem_kept_as_noun() {
        let tokens = HangulTokenizer::new().tokenize("주가 급등").unwrap();
        assert_eq!(forms_with_tag(&tokens, PosTag::CommonNoun), vec!["주가", "급등"]);
    }

    #[test]
    fn test_market_nouns_not_split() {
        let tokens = HangulTokenizer::new()
            .tokenize("신고가 상한가 공모가 목표가 디스플레이 카카오페이 게임플레이")
            .unwrap();

        assert_eq!(
            forms_with_tag(&tokens, PosTag::CommonNoun),
            vec!["신고가", "상한가", "공모가", "목표가", "디스플레이", "카카오페이", "게임플레이"]
        );
        assert!(forms_with_tag(&tokens, PosTag::Particle).is_empty());
    }

    #[test]
    fn test_particle_after_market_noun() {
        let tokens = HangulTokenizer::new()
            .tokenize("신고가를 경신 디스플레이가 호조 카카오페이의 실적")
            .unwrap();

        assert_eq!(
            forms_with_tag(&tokens, PosTag::CommonNoun),
            vec!["신고가", "경신", "디스플레이", "호조", "카카오페이", "실적"]
        );
        assert_eq!(forms_with_tag(&tokens, PosTag::Particle), vec!["를", "가", "의"]);
    }

    #[test]
    fn test_punctuation_and_digits() {
        let tokens = HangulTokenizer::new()
            .tokenize("[속보] 영업이익 3,200억… HBM3E!")
            .unwrap();

        assert_eq!(
            forms_with_tag(&tokens, PosTag::CommonNoun),
            vec!["속보", "영업이익", "억"]
        );
        assert_eq!(forms_with_tag(&tokens, PosTag::Number), vec!["3", "200", "3"]);
        assert_eq!(forms_with_tag(&tokens, PosTag::Foreign), vec!["HBM", "E"]);
    }

    #[test]
    fn test_input_too_long() {
        let text = "가".repeat(MAX_INPUT_BYTES);
        assert!(matches!(
            HangulTokenizer::new().tokenize(&text),
            Err(TokenizeError::InputTooLong { .. })
        ));
    }
}
