/// MediaWiki API からページタイトルを取得するクライアント。
///
/// ランダム取得と全文検索の2種類をサポートします。再試行は行いません。
use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::language::Language;
use crate::pipeline::source::{RANDOM_LIMIT_MAX, SEARCH_LIMIT_MAX, SourceError, TitleSource};

/// API URL テンプレート中の言語プレースホルダ。
pub const LANG_PLACEHOLDER: &str = "{lang}";

/// `generator=random` の応答。
#[derive(Debug, Deserialize)]
struct RandomResponse {
    query: Option<RandomQuery>,
}

#[derive(Debug, Deserialize)]
struct RandomQuery {
    #[serde(default)]
    pages: BTreeMap<String, PageInfo>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    title: Option<String>,
}

/// `list=search` の応答。
#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: Option<String>,
}

/// Wikipedia クライアントの設定。
#[derive(Debug, Clone)]
pub struct WikipediaConfig {
    /// `https://{lang}.wikipedia.org/w/api.php` のような URL テンプレート
    pub api_template: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub total_timeout: Duration,
}

/// Wikipedia との通信を管理するクライアント。
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    client: Client,
    api_template: String,
}

impl WikipediaClient {
    /// 新しいクライアントを作成する。
    ///
    /// # Errors
    /// HTTPクライアントの構築に失敗した場合はエラーを返します。
    pub fn new(config: WikipediaConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.total_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(SourceError::Request)?;

        Ok(Self {
            client,
            api_template: config.api_template,
        })
    }

    fn api_url(&self, lang: &Language) -> Result<Url, SourceError> {
        let raw = self.api_template.replace(LANG_PLACEHOLDER, lang.code());
        Url::parse(&raw).map_err(|error| SourceError::Url(format!("{raw}: {error}")))
    }

    async fn get_json<T>(&self, url: Url) -> Result<T, SourceError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(SourceError::Request)?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status { status, body });
        }

        response.json::<T>().await.map_err(SourceError::Decode)
    }
}

#[async_trait]
impl TitleSource for WikipediaClient {
    async fn fetch_random_titles(
        &self,
        lang: &Language,
        limit: usize,
    ) -> Result<Vec<String>, SourceError> {
        let capped = limit.clamp(1, RANDOM_LIMIT_MAX);
        let mut url = self.api_url(lang)?;
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("format", "json")
            .append_pair("generator", "random")
            .append_pair("grnnamespace", "0")
            .append_pair("grnlimit", &capped.to_string())
            .append_pair("prop", "info")
            .append_pair("origin", "*");

        debug!(lang = %lang, limit = capped, "fetching random titles");

        let body: RandomResponse = self.get_json(url).await?;
        let mut titles: Vec<String> = Vec::new();
        for title in body
            .query
            .into_iter()
            .flat_map(|q| q.pages.into_values())
            .filter_map(|page| page.title)
        {
            if !titles.contains(&title) {
                titles.push(title);
            }
        }

        debug!(lang = %lang, count = titles.len(), "fetched random titles");
        Ok(titles)
    }

    async fn fetch_search_titles(
        &self,
        lang: &Language,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, SourceError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let capped = limit.clamp(1, SEARCH_LIMIT_MAX);
        let mut url = self.api_url(lang)?;
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("format", "json")
            .append_pair("list", "search")
            .append_pair("srsearch", query)
            .append_pair("srlimit", &capped.to_string())
            .append_pair("srnamespace", "0")
            .append_pair("origin", "*");

        debug!(lang = %lang, query, limit = capped, "searching titles");

        let body: SearchResponse = self.get_json(url).await?;
        let titles: Vec<String> = body
            .query
            .into_iter()
            .flat_map(|q| q.search)
            .filter_map(|hit| hit.title)
            .collect();

        debug!(lang = %lang, query, count = titles.len(), "fetched search titles");
        Ok(titles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> WikipediaConfig {
        WikipediaConfig {
            api_template: format!("{base_url}/{LANG_PLACEHOLDER}/w/api.php"),
            user_agent: "litanizer-test/0.1".to_string(),
            connect_timeout: Duration::from_secs(3),
            total_timeout: Duration::from_secs(10),
        }
    }

    #[tokio::test]
    async fn fetch_random_titles_dedups_and_caps_limit() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "batchcomplete": "",
            "query": {
                "pages": {
                    "101": {"pageid": 101, "ns": 0, "title": "소나무"},
                    "102": {"pageid": 102, "ns": 0, "title": "황사"},
                    "103": {"pageid": 103, "ns": 0, "title": "소나무"}
                }
            }
        });

        Mock::given(method("GET"))
            .and(path("/ko/w/api.php"))
            .and(query_param("generator", "random"))
            .and(query_param("grnnamespace", "0"))
            .and(query_param("grnlimit", "40"))
            .and(header("user-agent", "litanizer-test/0.1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let client = WikipediaClient::new(test_config(&server.uri())).expect("client should build");
        let titles = client
            .fetch_random_titles(&Language::Korean, 100)
            .await
            .expect("fetch should succeed");

        assert_eq!(titles, vec!["소나무", "황사"]);
    }

    #[tokio::test]
    async fn fetch_random_titles_tolerates_missing_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/en/w/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = WikipediaClient::new(test_config(&server.uri())).expect("client should build");
        let titles = client
            .fetch_random_titles(&Language::English, 5)
            .await
            .expect("fetch should succeed");

        assert!(titles.is_empty());
    }

    #[tokio::test]
    async fn fetch_random_titles_surfaces_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/en/w/api.php"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = WikipediaClient::new(test_config(&server.uri())).expect("client should build");
        let error = client
            .fetch_random_titles(&Language::English, 5)
            .await
            .expect_err("503 should fail");

        match error {
            SourceError::Status { status, body } => {
                assert_eq!(status.as_u16(), 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_search_titles_returns_hits_in_order() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "query": {
                "search": [
                    {"ns": 0, "title": "Rotation", "pageid": 1},
                    {"ns": 0, "title": "Angular momentum", "pageid": 2},
                    {"ns": 0, "pageid": 3}
                ]
            }
        });

        Mock::given(method("GET"))
            .and(path("/en/w/api.php"))
            .and(query_param("list", "search"))
            .and(query_param("srsearch", "spin"))
            .and(query_param("srlimit", "50"))
            .and(query_param("srnamespace", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = WikipediaClient::new(test_config(&server.uri())).expect("client should build");
        let titles = client
            .fetch_search_titles(&Language::English, "  spin ", 80)
            .await
            .expect("search should succeed");

        assert_eq!(titles, vec!["Rotation", "Angular momentum"]);
    }

    #[tokio::test]
    async fn fetch_search_titles_skips_request_for_blank_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = WikipediaClient::new(test_config(&server.uri())).expect("client should build");
        let titles = client
            .fetch_search_titles(&Language::Korean, "   ", 20)
            .await
            .expect("blank query should not fail");

        assert!(titles.is_empty());
    }

    #[tokio::test]
    async fn fetch_search_titles_reports_decode_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let client = WikipediaClient::new(test_config(&server.uri())).expect("client should build");
        let error = client
            .fetch_search_titles(&Language::Korean, "회전", 20)
            .await
            .expect_err("html body should fail to decode");

        assert!(matches!(error, SourceError::Decode(_)));
    }
}
