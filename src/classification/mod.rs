//! タイトルが人物記事らしいかを判定する分類器。
//!
//! 判定は正規表現ベースのヒューリスティックで、言語タグごとにルールが異なる。
//! サンプラーは [`PersonClassifier`] トレイト越しに呼び出すため、
//! 言語やルールを追加してもサンプリングの制御フローには影響しない。
use crate::language::Language;

mod heuristic;

pub use heuristic::HeuristicClassifier;

/// 分類結果。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleClass {
    Person,
    NonPerson,
}

/// 人名判定の差し替え可能なインターフェース。
pub trait PersonClassifier: Send + Sync {
    /// タイトルが人物記事らしい場合に `true` を返す。
    ///
    /// 純粋関数であること。同じ入力には常に同じ結果を返し、パニックしない。
    fn is_likely_person(&self, title: &str, lang: &Language) -> bool;

    fn classify(&self, title: &str, lang: &Language) -> TitleClass {
        if self.is_likely_person(title, lang) {
            TitleClass::Person
        } else {
            TitleClass::NonPerson
        }
    }
}

/// デフォルトのヒューリスティックで人名判定する。
#[must_use]
pub fn is_likely_person(title: &str, lang: &Language) -> bool {
    HeuristicClassifier.is_likely_person(title, lang)
}

/// タイトルを人物とそれ以外に振り分ける。入力の順序は各グループ内で保たれる。
pub fn partition_titles<C>(
    classifier: &C,
    titles: impl IntoIterator<Item = String>,
    lang: &Language,
) -> (Vec<String>, Vec<String>)
where
    C: PersonClassifier + ?Sized,
{
    titles
        .into_iter()
        .partition(|title| classifier.classify(title, lang) == TitleClass::Person)
}
