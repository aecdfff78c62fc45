//! 종목/키워드 노이즈 필터 테이블.
//!
//! - 블랙리스트: 증권사, 금융지주 등 언급 집계를 오염시키는 기관명
//! - 노이즈: 지명, 일반 금융 용어, 그룹 접두어처럼 종목명과 겹치는 단어
//! - 불용어: 테마 키워드에서 제외할 일반 어휘와 리포트 용어
//! - 절대 무시: 이 문자열이 포함된 메시지는 처리하지 않음 (광고, 순위 모음 등)

use std::collections::HashSet;

/// 기관/증권사 블랙리스트
const BLACKLIST_STOCKS: &[&str] = &[
    "삼성증권", "NH투자증권", "한국투자증권", "미래에셋증권", "키움증권", "신한투자증권", "신한지주",
    "하나증권", "하나금융지주", "메리츠증권", "메리츠금융지주", "KB증권", "KB금융", "대신증권",
    "한화투자증권", "유안타증권", "교보증권", "현대차증권", "하이투자증권", "SK증권", "신영증권",
    "IBK투자증권", "유진투자증권", "이베스트투자증권", "LS증권", "DB금융투자", "다올투자증권",
    "부국증권", "상상인증권", "케이프투자증권", "BNK투자증권", "DS투자증권", "한양증권",
    "흥국증권", "흥국화재", "DB손해보험", "DB", "상상인", "상상인저축은행", "한국금융지주",
    "우리금융지주", "BNK금융지주", "DGB금융지주", "JB금융지주",
    "리서치", "금융투자", "투자증권", "스팩", "제호", "제호스팩", "기업인수목적",
];

/// 종목명과 겹치는 일반 단어
const NOISE_STOCKS: &[&str] = &[
    "전방", "대상", "지구", "신세계", "가스", "전선", "화재", "국보", "백산", "나노", "레이", "보물",
    "유진", "대원", "효성", "선진", "동방", "서원", "대성", "우진", "한화", "두산", "삼성", "현대",
    "SK", "LG", "부국", "국내", "미국", "중국", "일본", "해외", "시장", "금융", "증권", "투자",
    "매수", "매도", "추천", "비중", "전망", "분석", "이슈", "테마", "섹터", "코스피", "코스닥",
    "지수", "상한가", "하한가", "베뉴지", "홀딩스", "그룹", "우", "채널", "입장", "보기", "매매",
    "공부", "참여", "문의", "상담", "종목", "주식", "코리아", "서울", "부산", "대구", "인천", "광주",
    "대전", "울산", "세종", "경기", "강원", "충북", "충남", "전북", "전남", "경북", "경남", "제주",
    "흥국", "상상인", "다올", "케이프", "신영", "교보", "현대차", "DB", "하이", "이베스트", "유안타",
    "메리츠", "하나", "신한", "KB", "NH",
    "TP", "Target", "Price", "EPS", "PER", "PBR", "ROE", "EBITDA",
];

/// 테마 키워드 불용어
const STOP_KEYWORDS: &[&str] = &[
    "상승", "하락", "뉴스", "종목", "주가", "특징", "오후", "오전", "오늘", "내일", "이번", "관련",
    "검색", "키워드", "순위", "링크", "참고", "공시", "속보", "예정", "전망", "개시", "체결", "확인",
    "시간", "대비", "기준", "달성", "기록", "규모", "진행", "제공", "무료", "증가", "감소", "영향",
    "기대", "우려", "지속", "유지", "확대", "축소", "돌파", "시작", "엔터", "하이브", "보합", "매수",
    "매도", "목표", "리포트", "브리핑", "의견", "제시", "신규",
    "발표", "개최", "참여", "가능", "여부", "분기", "실적", "영업", "이익", "매출", "순이익", "흑자",
    "적자", "전년", "동기", "직전", "최대", "최저", "경신", "연속", "상장", "거래", "현황", "동향",
    "분석", "이유", "원인", "배경", "결과", "내용", "상황", "상태", "수준", "정도", "부분", "분야",
    "업계", "시장", "글로벌", "국내", "해외", "미국", "중국", "유럽", "일본", "한국", "정부", "정책",
    "지원", "육성", "강화", "추진", "계획", "방안", "마련", "도입", "시행", "적용", "운영", "관리",
    "감독", "규제", "완화", "개선", "개혁", "혁신", "성장", "발전", "확보", "유치", "협력", "제휴",
    "공동", "개발", "출시", "공개", "선보", "공급", "계약", "수주", "납품", "생산", "판매", "수출",
    "수입", "소비", "수요",
    "TP", "Target", "Price", "목표가", "목표주가", "적정주가", "투자의견", "괴리율", "상향", "하향",
    "조정", "커버리지", "중립", "비중", "Outperform", "Buy", "Hold", "Sell", "Neutral", "Trading",
    "Consensus", "컨센서스", "추정", "예상", "부합", "하회", "상회",
];

/// 메시지 자체를 버리는 부분 문자열
const ABSOLUTE_IGNORE: &[&str] = &[
    "검색", "키워드", "순위", "랭킹", "인기글", "실시간", "링크", "모음", "정리", "광고", "무료",
    "입장", "클릭", "Touch", "비트코인", "코인",
];

/// 스팩, 리츠, 우선주(우B) 구조 표식
const STRUCTURAL_MARKERS: &[&str] = &["스팩", "리츠", "우B"];

/// 언급 집계 단계에서 다시 거르는 증권사/스팩/리츠 표식
const BROKER_MARKERS: &[&str] = &["증권", "스팩", "리츠"];

/// 상장 종목이 디렉토리에서 제외된 이유
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExclusionReason {
    Blacklisted,
    Noise,
    Structural,
}

/// 노이즈 필터 테이블 묶음.
#[derive(Debug, Clone)]
pub struct Stoplist {
    blacklist: HashSet<String>,
    noise: HashSet<String>,
    stop_keywords: HashSet<String>,
    /// 대소문자 무시 비교용 (대문자화)
    stop_keywords_upper: HashSet<String>,
    absolute_ignore: Vec<String>,
    structural_markers: Vec<String>,
    broker_markers: Vec<String>,
}

impl Default for Stoplist {
    fn default() -> Self {
        Self::builtin()
    }
}

fn to_set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn to_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Stoplist {
    /// 내장 테이블로 생성
    pub fn builtin() -> Self {
        Self {
            blacklist: to_set(BLACKLIST_STOCKS),
            noise: to_set(NOISE_STOCKS),
            stop_keywords: to_set(STOP_KEYWORDS),
            stop_keywords_upper: STOP_KEYWORDS.iter().map(|s| s.to_uppercase()).collect(),
            absolute_ignore: to_vec(ABSOLUTE_IGNORE),
            structural_markers: to_vec(STRUCTURAL_MARKERS),
            broker_markers: to_vec(BROKER_MARKERS),
        }
    }

    /// 상장 종목명이 디렉토리에서 제외되어야 하는지 (블랙리스트 → 노이즈 → 구조 순서)
    pub fn exclusion_reason(&self, name: &str) -> Option<ExclusionReason> {
        if self.blacklist.contains(name) {
            return Some(ExclusionReason::Blacklisted);
        }
        if self.noise.contains(name) {
            return Some(ExclusionReason::Noise);
        }
        if self.structural_markers.iter().any(|m| name.contains(m.as_str())) {
            return Some(ExclusionReason::Structural);
        }
        None
    }

    /// 증권사/스팩/리츠 표식이 있는 종목명
    pub fn is_broker_like(&self, name: &str) -> bool {
        self.broker_markers.iter().any(|m| name.contains(m.as_str()))
    }

    /// 메시지를 통째로 버려야 하는지
    pub fn should_ignore_message(&self, text: &str) -> bool {
        self.absolute_ignore.iter().any(|bad| text.contains(bad.as_str()))
    }

    /// 테마 키워드로 쓸 수 없는 토큰인지.
    ///
    /// 불용어, 절대 무시 단어, 블랙리스트와 정확히 같거나,
    /// 영문으로만 된 토큰이 대소문자 무시로 불용어와 같으면 제외합니다.
    pub fn is_rejected_keyword(&self, token: &str) -> bool {
        if self.stop_keywords.contains(token)
            || self.absolute_ignore.iter().any(|w| w == token)
            || self.blacklist.contains(token)
        {
            return true;
        }
        let ascii_alpha = !token.is_empty() && token.chars().all(|c| c.is_ascii_alphabetic());
        ascii_alpha && self.stop_keywords_upper.contains(&token.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusion_order() {
        let stoplist = Stoplist::builtin();
        // DB는 블랙리스트와 노이즈 모두에 있으나 블랙리스트가 우선
        assert_eq!(stoplist.exclusion_reason("DB"), Some(ExclusionReason::Blacklisted));
        assert_eq!(stoplist.exclusion_reason("삼성"), Some(ExclusionReason::Noise));
        assert_eq!(
            stoplist.exclusion_reason("하나30호스팩"),
            Some(ExclusionReason::Structural)
        );
        assert_eq!(
            stoplist.exclusion_reason("OO리츠"),
            Some(ExclusionReason::Structural)
        );
        assert_eq!(
            stoplist.exclusion_reason("대상우B"),
            Some(ExclusionReason::Structural)
        );
        assert_eq!(stoplist.exclusion_reason("삼성전자"), None);
    }

    #[test]
    fn test_message_ignore() {
        let stoplist = Stoplist::builtin();
        assert!(stoplist.should_ignore_message("실시간 검색어 순위 모음"));
        assert!(stoplist.should_ignore_message("비트코인 급등"));
        assert!(!stoplist.should_ignore_message("OO전자 영업이익 급증"));
    }

    #[test]
    fn test_keyword_rejection_case_insensitive() {
        let stoplist = Stoplist::builtin();
        assert!(stoplist.is_rejected_keyword("목표가"));
        assert!(stoplist.is_rejected_keyword("tp"));
        assert!(stoplist.is_rejected_keyword("BUY"));
        assert!(stoplist.is_rejected_keyword("outperform"));
        assert!(stoplist.is_rejected_keyword("랭킹"));
        assert!(stoplist.is_rejected_keyword("삼성증권"));
        assert!(!stoplist.is_rejected_keyword("HBM"));
        assert!(!stoplist.is_rejected_keyword("반도체"));
    }

    #[test]
    fn test_broker_like() {
        let stoplist = Stoplist::builtin();
        assert!(stoplist.is_broker_like("가나증권"));
        assert!(stoplist.is_broker_like("다라스팩1호"));
        assert!(!stoplist.is_broker_like("가나전자"));
    }
}
