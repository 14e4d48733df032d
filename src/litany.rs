//! リタニー（名詞の羅列）生成セッション。
//!
//! 単語リスト、取得済みタイトル、シード、補充フラグといった状態を
//! すべてこの構造体に持たせ、生成操作に明示的に渡す。
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_64;

use crate::classification::PersonClassifier;
use crate::language::Language;
use crate::local_pool::LocalPool;
use crate::pipeline::balance::draw;
use crate::pipeline::{BalancedSampler, SourceError, TitleSource};

pub const MIN_COUNT: usize = 6;
pub const MAX_COUNT: usize = 40;
pub const DEFAULT_COUNT: usize = 20;

/// Wikipedia 取得時の人名上限（20%）。
pub const WIKI_PERSON_CAP: f64 = 0.2;
/// Wikipedia 取得時の過剰取得倍率。
pub const WIKI_OVERSAMPLE: f64 = 3.0;

#[derive(Debug, Error)]
pub enum LitanyError {
    #[error("keyword must not be empty")]
    EmptyKeyword,
    #[error("title source returned no results")]
    NoResults,
    #[error("not enough results for keyword {keyword:?}")]
    NotEnoughResults { keyword: String },
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// 現在の描画元。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LitanySource {
    #[default]
    Local,
    Wiki,
}

/// シード文字列を32bitシードに変換する。空なら `rng` から引く。
#[allow(clippy::cast_possible_truncation)]
pub fn seed_from_input<R>(input: &str, rng: &mut R) -> u32
where
    R: Rng + ?Sized,
{
    let input = input.trim();
    if input.is_empty() {
        rng.random()
    } else {
        // upper 32 bits are discarded
        xxh3_64(input.as_bytes()) as u32
    }
}

#[derive(Debug, Clone)]
pub struct LitanySession {
    local: LocalPool,
    wiki_things: Vec<String>,
    source: LitanySource,
    language: Language,
    count: usize,
    caps: bool,
    last_seed: u32,
    backfill_local_when_short: bool,
    person_cap: f64,
    oversample_factor: f64,
    litany: Vec<String>,
}

impl Default for LitanySession {
    fn default() -> Self {
        Self::new(LocalPool::default())
    }
}

impl LitanySession {
    #[must_use]
    pub fn new(local: LocalPool) -> Self {
        Self {
            local,
            wiki_things: Vec::new(),
            source: LitanySource::Local,
            language: Language::default(),
            count: DEFAULT_COUNT,
            caps: false,
            last_seed: 0,
            backfill_local_when_short: true,
            person_cap: WIKI_PERSON_CAP,
            oversample_factor: WIKI_OVERSAMPLE,
            litany: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// 生成件数を設定する。[`MIN_COUNT`, `MAX_COUNT`] に丸める。
    pub fn set_count(&mut self, count: usize) {
        self.count = count.clamp(MIN_COUNT, MAX_COUNT);
    }

    pub fn set_caps(&mut self, caps: bool) {
        self.caps = caps;
    }

    /// Wikipedia 取得時の人名上限と過剰取得倍率を変える。
    #[must_use]
    pub fn with_sampling(mut self, person_cap: f64, oversample_factor: f64) -> Self {
        self.person_cap = person_cap;
        self.oversample_factor = oversample_factor;
        self
    }

    pub fn set_source(&mut self, source: LitanySource) {
        self.source = source;
    }

    /// ローカル単語リストを差し替える。
    pub fn replace_local(&mut self, local: LocalPool) {
        self.local = local;
    }

    #[must_use]
    pub fn local(&self) -> &LocalPool {
        &self.local
    }

    #[must_use]
    pub fn wiki_things(&self) -> &[String] {
        &self.wiki_things
    }

    #[must_use]
    pub fn source(&self) -> LitanySource {
        self.source
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn last_seed(&self) -> u32 {
        self.last_seed
    }

    #[must_use]
    pub fn backfill_local_when_short(&self) -> bool {
        self.backfill_local_when_short
    }

    #[must_use]
    pub fn litany(&self) -> &[String] {
        &self.litany
    }

    /// シードを更新して返す。
    pub fn reseed<R>(&mut self, seed_input: &str, rng: &mut R) -> u32
    where
        R: Rng + ?Sized,
    {
        self.last_seed = seed_from_input(seed_input, rng);
        self.last_seed
    }

    /// 現在のシードでリタニーを引き直す。
    ///
    /// 描画元の件数が足りない場合はローカルリストから補うが、
    /// Wikipedia 由来で補充が無効になっているときは補わない。
    pub fn generate(&mut self) -> &[String] {
        let mut pool = match self.source {
            LitanySource::Local => self.local.things().to_vec(),
            LitanySource::Wiki => self.wiki_things.clone(),
        };

        let backfill_blocked =
            self.source == LitanySource::Wiki && !self.backfill_local_when_short;
        if pool.len() < self.count && !backfill_blocked {
            let extra: Vec<String> = self
                .local
                .things()
                .iter()
                .filter(|thing| !pool.contains(*thing))
                .cloned()
                .collect();
            pool.extend(extra);
        }

        let mut rng = StdRng::seed_from_u64(u64::from(self.last_seed.max(1)));
        self.litany = draw(&mut pool, self.count, &mut rng);

        debug!(
            seed = self.last_seed,
            count = self.litany.len(),
            source = ?self.source,
            "generated litany"
        );
        &self.litany
    }

    /// ランダム取得で Wikipedia の項目を読み込み、リタニーを作り直す。
    ///
    /// # Errors
    /// 取得に失敗した場合、または1件も得られなかった場合。
    pub async fn pull_from_wiki<S, C, R>(
        &mut self,
        sampler: &BalancedSampler<S, C>,
        seed_input: &str,
        rng: &mut R,
    ) -> Result<&[String], LitanyError>
    where
        S: TitleSource,
        C: PersonClassifier,
        R: Rng + ?Sized,
    {
        let titles = sampler
            .fetch_balanced_things(
                self.language.clone(),
                self.count,
                self.local.things(),
                self.person_cap,
                self.oversample_factor,
                rng,
            )
            .await?;

        if titles.is_empty() {
            return Err(LitanyError::NoResults);
        }

        info!(
            lang = %self.language,
            count = titles.len(),
            "loaded balanced wikipedia titles"
        );

        self.wiki_things = titles;
        self.source = LitanySource::Wiki;
        self.backfill_local_when_short = true;
        self.reseed(seed_input, rng);
        Ok(self.generate())
    }

    /// キーワードに関連する項目を読み込み、補充を無効にしてリタニーを作り直す。
    ///
    /// # Errors
    /// キーワードが空の場合（通信しない）、取得に失敗した場合、結果が空の場合。
    pub async fn pull_theme<S, C, R>(
        &mut self,
        sampler: &BalancedSampler<S, C>,
        keyword: &str,
        seed_input: &str,
        rng: &mut R,
    ) -> Result<&[String], LitanyError>
    where
        S: TitleSource,
        C: PersonClassifier,
        R: Rng + ?Sized,
    {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(LitanyError::EmptyKeyword);
        }

        let titles = sampler
            .fetch_themed_things(
                self.language.clone(),
                keyword,
                self.count,
                self.person_cap,
                rng,
            )
            .await?;

        if titles.is_empty() {
            return Err(LitanyError::NotEnoughResults {
                keyword: keyword.to_string(),
            });
        }

        info!(
            lang = %self.language,
            keyword,
            count = titles.len(),
            "loaded themed wikipedia titles"
        );

        self.wiki_things = titles;
        self.source = LitanySource::Wiki;
        self.backfill_local_when_short = false;
        self.reseed(seed_input, rng);
        Ok(self.generate())
    }

    /// `a, b, c.` 形式の本文。
    #[must_use]
    pub fn text(&self) -> String {
        let text = format!("{}.", self.litany.join(", "));
        if self.caps { text.to_uppercase() } else { text }
    }
}
