//! 外部タイトルを人名上限付きでサンプリングする。
use rand::Rng;
use tracing::{debug, info};

use super::balance::assemble;
use super::dedup::{TitleSet, dedup_titles};
use super::request::{SamplingRequest, SamplingStrategy};
use super::source::{RANDOM_LIMIT_MAX, SourceError, TitleSource};
use super::theme::expand_theme_queries;
use crate::classification::{HeuristicClassifier, PersonClassifier, partition_titles};
use crate::language::Language;

/// キーワード検索1クエリあたりの取得件数。
pub const THEMED_SEARCH_LIMIT: usize = 40;

/// サンプリング結果。`titles` の順序に意味はない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplingOutcome {
    pub titles: Vec<String>,
    /// 重複排除後に取得できたタイトル数
    pub fetched: usize,
    pub persons_in_pool: usize,
    /// 結果に含まれる、ソース由来の人名タイトル数
    pub persons_from_source: usize,
    /// 結果に含まれる補充タイトル数
    pub from_backfill: usize,
}

impl SamplingOutcome {
    #[must_use]
    pub fn is_short_of(&self, want: usize) -> bool {
        self.titles.len() < want
    }
}

/// タイトルソースと分類器を組み合わせたサンプラー。
///
/// 呼び出しごとにローカルなプールを作るので、共有状態は持たない。
#[derive(Debug, Clone)]
pub struct BalancedSampler<S, C = HeuristicClassifier> {
    source: S,
    classifier: C,
}

impl<S> BalancedSampler<S, HeuristicClassifier>
where
    S: TitleSource,
{
    pub fn new(source: S) -> Self {
        Self::with_classifier(source, HeuristicClassifier)
    }
}

impl<S, C> BalancedSampler<S, C>
where
    S: TitleSource,
    C: PersonClassifier,
{
    pub fn with_classifier(source: S, classifier: C) -> Self {
        Self { source, classifier }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// 要求に従ってタイトルを集め、上限を守って結果を組み立てる。
    ///
    /// 件数不足はエラーではなく短い結果として返す。
    /// キーワードが空の場合はソースを呼ばずに空の結果を返す。
    ///
    /// # Errors
    /// タイトルソースが通信エラーを返した場合はそのまま伝播する。
    pub async fn sample<R>(
        &self,
        request: &SamplingRequest,
        backfill: &[String],
        rng: &mut R,
    ) -> Result<SamplingOutcome, SourceError>
    where
        R: Rng + ?Sized,
    {
        let pool = match request.strategy() {
            SamplingStrategy::Random => self.collect_random(request).await?,
            SamplingStrategy::Themed { keyword } => {
                let queries = expand_theme_queries(request.language(), keyword);
                if queries.is_empty() {
                    debug!("empty keyword, skipping themed fetch");
                    return Ok(SamplingOutcome::default());
                }
                self.collect_themed(request, &queries).await?
            }
        };

        let fetched = pool.len();
        let (persons, non_persons) = partition_titles(&self.classifier, pool, request.language());
        let persons_in_pool = persons.len();
        let max_persons = request.max_persons();

        debug!(
            lang = %request.language(),
            fetched,
            persons = persons_in_pool,
            non_persons = non_persons.len(),
            max_persons,
            "partitioned fetched titles"
        );

        let backfill = request.allow_backfill().then_some(backfill);
        let assembly = assemble(
            persons,
            non_persons,
            backfill,
            request.want(),
            max_persons,
            rng,
        );

        info!(
            lang = %request.language(),
            want = request.want(),
            returned = assembly.titles.len(),
            persons = assembly.persons_from_source,
            from_backfill = assembly.from_backfill,
            "sampling finished"
        );

        Ok(SamplingOutcome {
            titles: assembly.titles,
            fetched,
            persons_in_pool,
            persons_from_source: assembly.persons_from_source,
            from_backfill: assembly.from_backfill,
        })
    }

    /// ランダム取得で人名比率を抑えたタイトル列を返す。不足分は `local_pool` で補う。
    ///
    /// # Errors
    /// タイトルソースが通信エラーを返した場合。
    pub async fn fetch_balanced_things<R>(
        &self,
        lang: Language,
        total: usize,
        local_pool: &[String],
        person_cap: f64,
        oversample_factor: f64,
        rng: &mut R,
    ) -> Result<Vec<String>, SourceError>
    where
        R: Rng + ?Sized,
    {
        let request = SamplingRequest::random(lang, total)
            .with_person_cap(person_cap)
            .with_oversample_factor(oversample_factor);
        Ok(self.sample(&request, local_pool, rng).await?.titles)
    }

    /// キーワード検索で集めたタイトル列を返す。ローカル補充は行わない。
    ///
    /// 結果が `total` より短いことがあるが、それは正常な結果。
    ///
    /// # Errors
    /// タイトルソースが通信エラーを返した場合。
    pub async fn fetch_themed_things<R>(
        &self,
        lang: Language,
        keyword: &str,
        total: usize,
        person_cap: f64,
        rng: &mut R,
    ) -> Result<Vec<String>, SourceError>
    where
        R: Rng + ?Sized,
    {
        let request = SamplingRequest::themed(lang, keyword, total).with_person_cap(person_cap);
        Ok(self.sample(&request, &[], rng).await?.titles)
    }

    async fn collect_random(&self, request: &SamplingRequest) -> Result<Vec<String>, SourceError> {
        let try_count = request.try_count();
        let mut fetched = Vec::with_capacity(try_count);
        let mut remain = try_count;

        while remain > 0 {
            let take = remain.min(RANDOM_LIMIT_MAX);
            let chunk = self
                .source
                .fetch_random_titles(request.language(), take)
                .await?;
            debug!(requested = take, received = chunk.len(), "random chunk");
            fetched.extend(chunk);
            remain -= take;
        }

        Ok(dedup_titles(fetched))
    }

    async fn collect_themed(
        &self,
        request: &SamplingRequest,
        queries: &[String],
    ) -> Result<Vec<String>, SourceError> {
        let target = request.themed_pool_target();
        let mut bag = TitleSet::new();

        for query in queries {
            let titles = self
                .source
                .fetch_search_titles(request.language(), query, THEMED_SEARCH_LIMIT)
                .await?;
            debug!(query, received = titles.len(), "search chunk");
            bag.extend(titles);
            if bag.len() >= target {
                break;
            }
        }

        Ok(bag.into_vec())
    }
}
