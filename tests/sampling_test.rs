//! スタブのタイトルソースを使ったサンプリングの結合テスト。
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rstest::rstest;

use litanizer::litany::LitanySource;
use litanizer::pipeline::SourceError;
use litanizer::{
    BalancedSampler, Language, LitanyError, LitanySession, LocalPool, TitleSource,
    expand_theme_queries, is_likely_person,
};

const PEOPLE: &[&str] = &[
    "Ada Lovelace",
    "Alan Turing",
    "Grace Hopper",
    "Marie Curie",
    "Niels Bohr",
    "Emmy Noether",
    "Carl Sagan",
    "Rosalind Franklin",
    "Lise Meitner",
    "Tom Hanks",
];

const OBJECTS: &[&str] = &[
    "Graphite",
    "Basalt",
    "Obsidian",
    "Tide pool",
    "Neutrino",
    "Comet tail",
    "Glacier",
    "Plankton",
    "Yeast",
    "Mold spore",
    "Bicycle chain",
    "Keycap",
    "Zipper bag",
    "Rosemary",
    "Doppler effect",
    "Subwoofer",
    "Harmonics",
    "Ergodic path",
    "Protocol",
    "Lagrange point",
];

/// 常に同じ30件を返すソース。
#[derive(Default)]
struct FixedSource {
    random_calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl FixedSource {
    fn titles() -> Vec<String> {
        PEOPLE
            .iter()
            .chain(OBJECTS)
            .map(|title| (*title).to_string())
            .collect()
    }
}

#[async_trait]
impl TitleSource for FixedSource {
    async fn fetch_random_titles(
        &self,
        _lang: &Language,
        limit: usize,
    ) -> Result<Vec<String>, SourceError> {
        self.random_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::titles().into_iter().take(limit).collect())
    }

    async fn fetch_search_titles(
        &self,
        _lang: &Language,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, SourceError> {
        self.queries
            .lock()
            .expect("queries lock")
            .push(query.to_string());
        Ok(OBJECTS
            .iter()
            .take(limit.min(8))
            .map(|title| (*title).to_string())
            .collect())
    }
}

fn person_count(titles: &[String]) -> usize {
    titles
        .iter()
        .filter(|title| PEOPLE.contains(&title.as_str()))
        .count()
}

#[rstest]
#[case(10, 2)]
#[case(20, 4)]
#[tokio::test]
async fn balanced_fetch_caps_people(#[case] total: usize, #[case] max_people: usize) {
    let sampler = BalancedSampler::new(FixedSource::default());
    let mut rng = StdRng::seed_from_u64(7);

    let titles = sampler
        .fetch_balanced_things(Language::English, total, &[], 0.2, 3.0, &mut rng)
        .await
        .expect("sampling should succeed");

    assert_eq!(titles.len(), total);
    assert!(person_count(&titles) <= max_people);

    let mut unique = titles.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), titles.len());
}

#[tokio::test]
async fn balanced_fetch_is_reproducible_with_the_same_seed() {
    let sampler = BalancedSampler::new(FixedSource::default());

    let first = sampler
        .fetch_balanced_things(
            Language::English,
            12,
            &[],
            0.2,
            3.0,
            &mut StdRng::seed_from_u64(42),
        )
        .await
        .expect("first run");
    let second = sampler
        .fetch_balanced_things(
            Language::English,
            12,
            &[],
            0.2,
            3.0,
            &mut StdRng::seed_from_u64(42),
        )
        .await
        .expect("second run");

    assert_eq!(first, second);
}

#[tokio::test]
async fn themed_fetch_with_blank_keyword_makes_no_calls() {
    let sampler = BalancedSampler::new(FixedSource::default());
    let mut rng = StdRng::seed_from_u64(1);

    let titles = sampler
        .fetch_themed_things(Language::Korean, "   ", 20, 0.2, &mut rng)
        .await
        .expect("blank keyword is not an error");

    assert!(titles.is_empty());
    assert!(sampler.source().queries.lock().expect("lock").is_empty());
    assert_eq!(sampler.source().random_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn korean_rotation_expands_across_languages() {
    let queries = expand_theme_queries(&Language::Korean, "회전");

    assert_eq!(queries[0], "회전");
    assert!(queries.iter().any(|query| query == "rotation"));
    assert!(queries.len() <= 12);
}

#[rstest]
#[case("Tom Hanks (actor)", Language::English, true)]
#[case("Ada Lovelace", Language::English, true)]
#[case("Graphite", Language::English, false)]
#[case("홍길동", Language::Korean, true)]
#[case("아이유 (가수)", Language::Korean, true)]
#[case("소나무", Language::Korean, false)]
fn classifier_examples(#[case] title: &str, #[case] lang: Language, #[case] expected: bool) {
    assert_eq!(is_likely_person(title, &lang), expected);
}

#[tokio::test]
async fn session_wiki_pull_enables_backfill() {
    let sampler = BalancedSampler::new(FixedSource::default());
    let mut session = LitanySession::new(LocalPool::default()).with_language(Language::English);
    session.set_count(10);
    let mut rng = StdRng::seed_from_u64(3);

    let litany = session
        .pull_from_wiki(&sampler, "things", &mut rng)
        .await
        .expect("wiki pull")
        .to_vec();

    assert_eq!(litany.len(), 10);
    assert!(person_count(&litany) <= 2);
    assert_eq!(session.source(), LitanySource::Wiki);
    assert!(session.backfill_local_when_short());
}

#[tokio::test]
async fn session_theme_pull_disables_backfill() {
    let sampler = BalancedSampler::new(FixedSource::default());
    let mut session = LitanySession::new(LocalPool::default()).with_language(Language::English);
    session.set_count(10);
    let mut rng = StdRng::seed_from_u64(3);

    let litany = session
        .pull_theme(&sampler, "spin", "", &mut rng)
        .await
        .expect("theme pull")
        .to_vec();

    // 8 distinct search hits and no local top-up
    assert_eq!(litany.len(), 8);
    assert!(litany.iter().all(|title| OBJECTS.contains(&title.as_str())));
    assert!(!session.backfill_local_when_short());
}

#[tokio::test]
async fn session_theme_pull_rejects_blank_keyword() {
    let sampler = BalancedSampler::new(FixedSource::default());
    let mut session = LitanySession::default();
    let mut rng = StdRng::seed_from_u64(3);

    let error = session
        .pull_theme(&sampler, " ", "", &mut rng)
        .await
        .expect_err("blank keyword");

    assert!(matches!(error, LitanyError::EmptyKeyword));
    assert!(sampler.source().queries.lock().expect("lock").is_empty());
}
