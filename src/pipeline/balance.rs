//! 人名上限を守りながら結果リストを組み立てる。
use rand::Rng;
use rand::seq::SliceRandom;

/// 組み立て結果と、その内訳。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Assembly {
    pub(crate) titles: Vec<String>,
    pub(crate) persons_from_source: usize,
    pub(crate) from_backfill: usize,
}

/// `pool` から一様に `n` 件を非復元抽出する。`pool` から取り除かれる。
pub(crate) fn draw<R>(pool: &mut Vec<String>, n: usize, rng: &mut R) -> Vec<String>
where
    R: Rng + ?Sized,
{
    let take = n.min(pool.len());
    let mut out = Vec::with_capacity(take);
    for _ in 0..take {
        let index = rng.random_range(0..pool.len());
        out.push(pool.swap_remove(index));
    }
    out
}

/// 優先順位に従って結果を埋める。
///
/// 1. 非人名から `want - max_persons` 件
/// 2. 人名から上限 `max_persons` 件まで
/// 3. 残りの非人名で不足分
/// 4. `backfill` が与えられていれば、その中から不足分
///
/// 最後にシャッフルして `want` 件に切り詰める。補充分は再分類しない。
pub(crate) fn assemble<R>(
    mut persons: Vec<String>,
    mut non_persons: Vec<String>,
    backfill: Option<&[String]>,
    want: usize,
    max_persons: usize,
    rng: &mut R,
) -> Assembly
where
    R: Rng + ?Sized,
{
    let mut titles = Vec::with_capacity(want);

    titles.extend(draw(&mut non_persons, want.saturating_sub(max_persons), rng));

    let remaining = want.saturating_sub(titles.len());
    let picked_persons = draw(&mut persons, remaining.min(max_persons), rng);
    let persons_from_source = picked_persons.len();
    titles.extend(picked_persons);

    let remaining = want.saturating_sub(titles.len());
    titles.extend(draw(&mut non_persons, remaining, rng));

    let mut from_backfill = 0;
    let remaining = want.saturating_sub(titles.len());
    if let Some(pool) = backfill.filter(|pool| remaining > 0 && !pool.is_empty()) {
        let mut pool = pool.to_vec();
        let picked = draw(&mut pool, remaining, rng);
        from_backfill = picked.len();
        titles.extend(picked);
    }

    titles.shuffle(rng);
    titles.truncate(want);

    Assembly {
        titles,
        persons_from_source,
        from_backfill,
    }
}
