//! 종목별 테마 키워드 추출.

use std::collections::HashMap;

use buzz_core::text::truncate_chars;
use buzz_core::types::FALLBACK_THEME;
use buzz_core::{PosTag, Stoplist, Token, Tokenizer};

/// 토큰화 대상 텍스트 최대 길이 (문자)
pub const KEYWORD_BLOB_CHARS: usize = 1000;
/// 테마에 쓰는 키워드 수
pub const THEME_SIZE: usize = 3;

fn is_candidate(token: &Token) -> bool {
    token.tag.is_noun() || (token.tag == PosTag::Foreign && token.char_len() > 2)
}

/// 언급 본문들로 테마 문자열 생성.
///
/// 빈도가 같은 키워드는 먼저 나온 것이 앞에 옵니다. 남는 키워드가 없거나
/// 토큰화에 실패하면 `뉴스참조`를 반환하므로 결과는 비어 있지 않습니다.
pub fn extract_theme(mentions: &[String], tokenizer: &dyn Tokenizer, stoplist: &Stoplist) -> String {
    let blob = mentions.join(" ");
    let blob = truncate_chars(&blob, KEYWORD_BLOB_CHARS);

    let tokens = match tokenizer.tokenize(blob) {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::warn!("키워드 토큰화 실패, 기본 테마 사용: {}", e);
            return FALLBACK_THEME.to_string();
        }
    };

    // (키워드, 빈도) 를 첫 등장 순서로 유지
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for token in tokens.iter().filter(|t| is_candidate(t)) {
        if token.char_len() < 2 || stoplist.is_rejected_keyword(&token.form) {
            continue;
        }
        match index.get(&token.form) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(token.form.clone(), counts.len());
                counts.push((token.form.clone(), 1));
            }
        }
    }

    // 안정 정렬이므로 동률은 첫 등장 순서 유지
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let theme = counts
        .iter()
        .take(THEME_SIZE)
        .map(|(word, _)| word.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    if theme.is_empty() {
        FALLBACK_THEME.to_string()
    } else {
        theme
    }
}
