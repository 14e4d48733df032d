//! Wikipedia の言語タグ。
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// サンプリング対象の言語。
///
/// `Korean` と `English` は人名判定ルールを持つ。その他の言語は
/// 言語非依存のルールのみで判定される。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    Korean,
    English,
    Other(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("language tag must not be empty")]
pub struct EmptyLanguageTag;

impl Language {
    /// 言語コードから変換する。空文字列でも失敗しない。
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "ko" => Self::Korean,
            "en" => Self::English,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wikipedia のホスト名に使うタグ。
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Korean => "ko",
            Self::English => "en",
            Self::Other(code) => code,
        }
    }
}

impl FromStr for Language {
    type Err = EmptyLanguageTag;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().is_empty() {
            return Err(EmptyLanguageTag);
        }
        Ok(Self::from_code(raw))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
