use std::collections::HashSet;

/// 挿入順を保つ重複排除済みのタイトル集合。
#[derive(Debug, Default, Clone)]
pub(crate) struct TitleSet {
    seen: HashSet<String>,
    titles: Vec<String>,
}

impl TitleSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 新規のタイトルだった場合に `true` を返す。
    pub(crate) fn insert(&mut self, title: String) -> bool {
        if self.seen.contains(&title) {
            return false;
        }
        self.seen.insert(title.clone());
        self.titles.push(title);
        true
    }

    pub(crate) fn extend(&mut self, titles: impl IntoIterator<Item = String>) {
        for title in titles {
            self.insert(title);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.titles.len()
    }

    pub(crate) fn into_vec(self) -> Vec<String> {
        self.titles
    }
}

/// 完全一致で重複を取り除く。最初の出現を残す。
pub(crate) fn dedup_titles(titles: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut set = TitleSet::new();
    set.extend(titles);
    set.into_vec()
}
