//! 正規表現による人名判定ルール。
use once_cell::sync::Lazy;
use regex::Regex;

use super::PersonClassifier;
use crate::language::Language;

/// 括弧内の職業・生没マーカー。例: `Tom Hanks (actor)`
static PARENTHETICAL_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\(.*\b(?:born|died|footballer|actor|actress|singer|politician|writer|artist|baseball|basketball|tennis)\b.*\)",
    )
    .expect("compile parenthetical marker regex")
});

static BORN_OR_DIED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:born|died)\b").expect("compile born/died regex"));

/// 韓国語の生没・職業名詞。
static KOREAN_OCCUPATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"출생|사망|배우|가수|정치인|작가|화가|시인|체조|야구(?:선수)?|축구(?:선수)?|농구(?:선수)?|테니스(?:선수)?",
    )
    .expect("compile korean occupation regex")
});

/// `Ada Lovelace`, `Jean-Luc Picard` のような大文字始まりの複数語。
static ENGLISH_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][a-z]+(?:[-\s][A-Z][a-z]+)+$").expect("compile english name regex")
});

/// 姓と名の間に空白がある緩い人名形状。部分一致で判定する。
static KOREAN_LOOSE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[가-힣]{2,4}\s[가-힣]{1,4}").expect("compile korean loose name regex")
});

/// 文字列全体が `홍길동`, `홍 길동 (배우)` の形状。
static KOREAN_TIGHT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[가-힣]{1,2}\s?[가-힣]{2,3}(?:\s?\([^)]+\))?$")
        .expect("compile korean tight name regex")
});

const KOREAN_SURNAMES: &[char] = &[
    '김', '이', '박', '최', '정', '강', '조', '윤', '장', '임', '한', '오', '서', '신', '권', '황',
    '안', '송', '전', '홍', '유', '류', '고', '문', '양', '손', '배', '백', '허', '남', '심', '노',
    '하', '곽', '성', '차', '주', '우', '구', '나', '민', '진', '지', '엄', '채', '원', '천', '방',
    '공', '현', '함', '변',
];

const KOREAN_COMPOUND_SURNAMES: &[&str] = &["남궁", "황보", "제갈", "선우", "독고", "사공", "서문"];

/// 既定の人名判定ヒューリスティック。
///
/// いずれかのルールに一致すれば人物とみなす。
/// 英語と韓国語以外では言語非依存のルールのみを使う。
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    fn matches_common_rules(title: &str) -> bool {
        PARENTHETICAL_MARKER.is_match(title)
            || BORN_OR_DIED.is_match(title)
            || KOREAN_OCCUPATION.is_match(title)
    }

    fn matches_korean_name(title: &str) -> bool {
        if KOREAN_LOOSE_NAME.is_match(title) {
            return true;
        }
        // 3文字の普通名詞も同じ形状になるので、先頭が姓であることを要求する
        KOREAN_TIGHT_NAME.is_match(title) && starts_with_surname(title)
    }
}

impl PersonClassifier for HeuristicClassifier {
    fn is_likely_person(&self, title: &str, lang: &Language) -> bool {
        if Self::matches_common_rules(title) {
            return true;
        }

        match lang {
            Language::English => ENGLISH_NAME.is_match(title),
            Language::Korean => Self::matches_korean_name(title),
            Language::Other(_) => false,
        }
    }
}

fn starts_with_surname(title: &str) -> bool {
    if KOREAN_COMPOUND_SURNAMES
        .iter()
        .any(|surname| title.starts_with(surname))
    {
        return true;
    }
    title
        .chars()
        .next()
        .is_some_and(|first| KOREAN_SURNAMES.contains(&first))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Tom Hanks (actor)", true)]
    #[case("Graphite", false)]
    #[case("Ada Lovelace", true)]
    #[case("Jean-Luc Picard", true)]
    #[case("Died Pretty", true)]
    #[case("List of rivers (Norway)", false)]
    #[case("Pablo (artist)", true)]
    #[case("ATP Tour", false)]
    #[case("Quantum mechanics", false)]
    fn english_titles(#[case] title: &str, #[case] expected: bool) {
        assert_eq!(
            HeuristicClassifier.is_likely_person(title, &Language::English),
            expected,
            "title: {title}"
        );
    }

    #[rstest]
    #[case("아이유 (가수)", true)]
    #[case("소나무", false)]
    #[case("홍길동", true)]
    #[case("김 철수", true)]
    #[case("남궁민수", true)]
    #[case("이순신 (1545년 출생)", true)]
    #[case("서울 지하철 2호선", true)]
    #[case("도플러 효과", true)]
    #[case("플랑크톤", false)]
    #[case("야구장", true)]
    #[case("암흑물질", false)]
    fn korean_titles(#[case] title: &str, #[case] expected: bool) {
        assert_eq!(
            HeuristicClassifier.is_likely_person(title, &Language::Korean),
            expected,
            "title: {title}"
        );
    }

    #[test]
    fn english_name_shape_only_applies_to_english() {
        assert!(!HeuristicClassifier.is_likely_person("Ada Lovelace", &Language::Korean));
        assert!(
            !HeuristicClassifier
                .is_likely_person("Ada Lovelace", &Language::Other("de".to_string()))
        );
    }

    #[test]
    fn korean_name_shape_only_applies_to_korean() {
        assert!(!HeuristicClassifier.is_likely_person("홍길동", &Language::English));
    }

    #[test]
    fn common_rules_apply_to_every_language() {
        let lang = Language::Other("fr".to_string());
        assert!(HeuristicClassifier.is_likely_person("Marie Curie (born 1867)", &lang));
        assert!(HeuristicClassifier.is_likely_person("BORN in the USA", &lang));
        assert!(HeuristicClassifier.is_likely_person("배우", &lang));
    }

    #[test]
    fn total_over_degenerate_input() {
        for title in ["", " ", "(", ")", "()", "((born", "\u{0}", "가"] {
            let first = HeuristicClassifier.is_likely_person(title, &Language::Korean);
            let second = HeuristicClassifier.is_likely_person(title, &Language::Korean);
            assert_eq!(first, second);
        }
    }
}
