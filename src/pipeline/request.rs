//! サンプリング要求の型。
use crate::language::Language;

/// 要求件数の下限と上限。
pub const MIN_WANT: usize = 1;
pub const MAX_WANT: usize = 40;
/// 過剰取得の総数上限。
pub const MAX_TRY_COUNT: usize = 120;

pub const DEFAULT_PERSON_CAP: f64 = 0.2;
pub const DEFAULT_OVERSAMPLE_FACTOR: f64 = 3.0;

/// どこからタイトルを集めるか。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamplingStrategy {
    /// ランダムなページを過剰取得する。
    Random,
    /// キーワードを展開した検索結果から集める。
    Themed { keyword: String },
}

/// 1回のサンプリング呼び出しのパラメータ。呼び出し中は変更しない。
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingRequest {
    language: Language,
    want: usize,
    person_cap: f64,
    oversample_factor: f64,
    allow_backfill: bool,
    strategy: SamplingStrategy,
}

impl SamplingRequest {
    /// ランダム取得の要求。ローカル補充は既定で有効。
    #[must_use]
    pub fn random(language: Language, total: usize) -> Self {
        Self {
            language,
            want: total.clamp(MIN_WANT, MAX_WANT),
            person_cap: DEFAULT_PERSON_CAP,
            oversample_factor: DEFAULT_OVERSAMPLE_FACTOR,
            allow_backfill: true,
            strategy: SamplingStrategy::Random,
        }
    }

    /// キーワード取得の要求。ローカル補充は既定で無効。
    #[must_use]
    pub fn themed(language: Language, keyword: impl Into<String>, total: usize) -> Self {
        Self {
            language,
            want: total.clamp(MIN_WANT, MAX_WANT),
            person_cap: DEFAULT_PERSON_CAP,
            oversample_factor: DEFAULT_OVERSAMPLE_FACTOR,
            allow_backfill: false,
            strategy: SamplingStrategy::Themed {
                keyword: keyword.into(),
            },
        }
    }

    /// 人名の割合上限。[0, 1] に丸める。NaN は 0 とみなす。
    #[must_use]
    pub fn with_person_cap(mut self, cap: f64) -> Self {
        self.person_cap = if cap.is_nan() { 0.0 } else { cap.clamp(0.0, 1.0) };
        self
    }

    /// 過剰取得の倍率。1 未満は 1 に丸める。
    #[must_use]
    pub fn with_oversample_factor(mut self, factor: f64) -> Self {
        self.oversample_factor = if factor.is_nan() { 1.0 } else { factor.max(1.0) };
        self
    }

    #[must_use]
    pub fn with_backfill(mut self, allow: bool) -> Self {
        self.allow_backfill = allow;
        self
    }

    #[must_use]
    pub fn language(&self) -> &Language {
        &self.language
    }

    #[must_use]
    pub fn want(&self) -> usize {
        self.want
    }

    #[must_use]
    pub fn person_cap(&self) -> f64 {
        self.person_cap
    }

    #[must_use]
    pub fn oversample_factor(&self) -> f64 {
        self.oversample_factor
    }

    #[must_use]
    pub fn allow_backfill(&self) -> bool {
        self.allow_backfill
    }

    #[must_use]
    pub fn strategy(&self) -> &SamplingStrategy {
        &self.strategy
    }

    /// `floor(want * person_cap)`
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn max_persons(&self) -> usize {
        (self.want as f64 * self.person_cap).floor() as usize
    }

    /// ランダム取得で要求する総数。`clamp(ceil(want * factor), want, 120)`
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn try_count(&self) -> usize {
        let raw = (self.want as f64 * self.oversample_factor).ceil() as usize;
        raw.clamp(self.want, MAX_TRY_COUNT.max(self.want))
    }

    /// キーワード取得を打ち切る集合サイズ。
    #[must_use]
    pub fn themed_pool_target(&self) -> usize {
        self.want * 5
    }
}
