//! キーワードから検索クエリを展開する小さな固定シソーラス。
use once_cell::sync::Lazy;
use regex::Regex;

use super::dedup::TitleSet;
use crate::language::Language;

/// 展開後のクエリ数の上限。
pub const MAX_THEME_QUERIES: usize = 12;

struct SynonymEntry {
    lang: &'static str,
    key: &'static str,
    terms: &'static [&'static str],
}

const THEME_SYNONYMS: &[SynonymEntry] = &[
    SynonymEntry {
        lang: "ko",
        key: "회전",
        terms: &[
            "회전",
            "회전운동",
            "자전",
            "공전",
            "스핀",
            "각운동량",
            "원운동",
            "소용돌이",
            "선풍",
            "토네이도",
            "회전체",
            "드릴",
            "턴테이블",
            "빙글빙글",
        ],
    },
    SynonymEntry {
        lang: "en",
        key: "rotation",
        terms: &[
            "rotation",
            "spin",
            "angular momentum",
            "circular motion",
            "vortex",
            "spiral",
            "whirl",
            "gyroscope",
            "centrifugal",
            "torque",
            "turntable",
            "swirl",
        ],
    },
];

static KOREAN_ROTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new("회전|자전|공전").expect("compile korean rotation regex"));

static ENGLISH_ROTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new("rotation|spin").expect("compile english rotation regex"));

const ROTATION_TERMS_EN: &[&str] = &["rotation", "spin", "vortex", "angular momentum"];
const ROTATION_TERMS_KO: &[&str] = &["회전", "자전", "공전", "각운동량", "소용돌이"];

/// キーワードを検索クエリの集合に展開する。
///
/// 先頭は常にトリム済みのキーワード。続いて言語横断の回転語、
/// 辞書の同義語の順に追加し、[`MAX_THEME_QUERIES`] 件で打ち切る。
/// 空白のみのキーワードは空を返す。
#[must_use]
pub fn expand_theme_queries(lang: &Language, keyword: &str) -> Vec<String> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Vec::new();
    }

    let lower = keyword.to_lowercase();
    let mut bag = TitleSet::new();
    bag.insert(keyword.to_string());

    // Cross-language terms go first so the cap never drops them.
    let cross_language: &[&str] = match lang {
        Language::Korean if KOREAN_ROTATION.is_match(keyword) => ROTATION_TERMS_EN,
        Language::English if ENGLISH_ROTATION.is_match(&lower) => ROTATION_TERMS_KO,
        _ => &[],
    };
    bag.extend(cross_language.iter().map(|term| (*term).to_string()));

    for entry in THEME_SYNONYMS
        .iter()
        .filter(|entry| entry.lang == lang.code())
        .filter(|entry| entry.key == keyword || entry.key == lower)
    {
        bag.extend(entry.terms.iter().map(|term| (*term).to_string()));
    }

    let mut queries = bag.into_vec();
    queries.truncate(MAX_THEME_QUERIES);
    queries
}
