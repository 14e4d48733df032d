//! 編集可能なローカル単語リスト。取得結果が足りないときの補充元にもなる。
use std::fs;
use std::path::Path;

use thiserror::Error;

const LOCAL_DEFAULT: &[&str] = &[
    "소나무",
    "황사",
    "빙하 조각",
    "수달",
    "플랑크톤",
    "파리지옥",
    "효모",
    "곰팡이 포자",
    "스마트폰",
    "로봇램프",
    "자전거 체인",
    "드론 배터리",
    "점자블록",
    "태양광 패널",
    "글라도스",
    "하트 컨테이너",
    "루피",
    "RTX 쉐이더",
    "중성미자",
    "라그랑주점",
    "암흑물질",
    "혜성 꼬리",
    "머그컵",
    "볼펜 스프링",
    "커피 찌꺼기",
    "택배 송장",
    "키캡",
    "마스킹테이프",
    "지퍼백",
    "거버넌스",
    "에르고딕 경로",
    "평평한 존재론",
    "프로토콜",
    "에러 404",
    "꿀 아이스크림",
    "로즈마리",
    "유자청",
    "발아 콩나물",
    "서브우퍼 저역",
    "도플러 효과",
    "LED 플리커",
    "스테핑모터 진동",
    "하모닉스",
];

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to read word list {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("word list is not a JSON array of strings")]
    Json(#[from] serde_json::Error),
}

/// ローカル単語リスト。空白のみの項目は保持しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPool {
    things: Vec<String>,
}

impl Default for LocalPool {
    fn default() -> Self {
        Self {
            things: LOCAL_DEFAULT.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl LocalPool {
    /// 改行区切りのテキストから作る。各行はトリムし、空行は捨てる。
    #[must_use]
    pub fn from_lines(text: &str) -> Self {
        Self::from_items(text.lines())
    }

    /// 任意の文字列列から作る。トリム後に空のものは捨てる。
    pub fn from_items<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let things = items
            .into_iter()
            .map(|item| item.as_ref().trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();
        Self { things }
    }

    /// JSON 配列から作る。文字列以外の要素は無視し、結果が空なら既定リストを返す。
    ///
    /// # Errors
    /// JSON として解釈できない、または配列でない場合。
    pub fn from_json_array(raw: &str) -> Result<Self, PoolError> {
        let values: Vec<serde_json::Value> = serde_json::from_str(raw)?;
        let pool = Self::from_items(values.iter().filter_map(serde_json::Value::as_str));
        if pool.is_empty() {
            return Ok(Self::default());
        }
        Ok(pool)
    }

    /// ファイルから読み込む。先頭が `[` なら JSON 配列、それ以外は改行区切りとして扱う。
    ///
    /// # Errors
    /// 読み込みまたは JSON の解析に失敗した場合。
    pub fn load(path: &Path) -> Result<Self, PoolError> {
        let raw = fs::read_to_string(path).map_err(|source| PoolError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if raw.trim_start().starts_with('[') {
            Self::from_json_array(&raw)
        } else {
            Ok(Self::from_lines(&raw))
        }
    }

    /// 既定リストに戻す。
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn things(&self) -> &[String] {
        &self.things
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.things.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.things.is_empty()
    }
}
