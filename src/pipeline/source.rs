//! 外部タイトル取得のインターフェース。
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::language::Language;

/// ランダム取得1回あたりの上限。
pub const RANDOM_LIMIT_MAX: usize = 40;
/// 検索1回あたりの上限。
pub const SEARCH_LIMIT_MAX: usize = 50;

/// タイトル取得時の通信エラー。サンプラー内部では再試行しない。
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("title source returned error status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("title source request failed")]
    Request(#[source] reqwest::Error),
    #[error("failed to decode title source response")]
    Decode(#[source] reqwest::Error),
    #[error("invalid title source URL: {0}")]
    Url(String),
}

/// ページタイトルを返す外部データソース。
#[async_trait]
pub trait TitleSource: Send + Sync {
    /// 名前空間0のランダムなタイトルを最大 `limit` 件返す。
    ///
    /// 要求より少ない件数が返ることがある。順序は保証しない。
    async fn fetch_random_titles(
        &self,
        lang: &Language,
        limit: usize,
    ) -> Result<Vec<String>, SourceError>;

    /// 全文検索の結果タイトルを最大 `limit` 件返す。
    ///
    /// 空白のみのクエリは通信せずに空を返すこと。
    async fn fetch_search_titles(
        &self,
        lang: &Language,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, SourceError>;
}
