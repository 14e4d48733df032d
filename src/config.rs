use std::{env, time::Duration};

use thiserror::Error;

use crate::clients::WikipediaConfig;
use crate::clients::wikipedia::LANG_PLACEHOLDER;
use crate::language::Language;
use crate::litany::{DEFAULT_COUNT, MAX_COUNT, MIN_COUNT};

#[cfg(test)]
use once_cell::sync::Lazy;
#[cfg(test)]
pub(crate) static ENV_MUTEX: Lazy<std::sync::Mutex<()>> = Lazy::new(|| std::sync::Mutex::new(()));

const DEFAULT_WIKI_API_TEMPLATE: &str = "https://{lang}.wikipedia.org/w/api.php";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    wiki_api_template: String,
    user_agent: String,
    connect_timeout: Duration,
    total_timeout: Duration,
    language: Language,
    person_cap: f64,
    oversample_factor: f64,
    count: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl Config {
    /// 環境変数から設定値を読み込み、検証する。未設定の項目は既定値を使う。
    ///
    /// # Errors
    /// 値のパースに失敗した場合、または範囲外の場合は [`ConfigError`] を返す。
    pub fn from_env() -> Result<Self, ConfigError> {
        let wiki_api_template = parse_api_template("LITANIZER_WIKI_API_TEMPLATE")?;
        let user_agent = env::var("LITANIZER_USER_AGENT").unwrap_or_else(|_| {
            format!(
                "litanizer/{} (https://github.com/litanizer)",
                env!("CARGO_PKG_VERSION")
            )
        });

        // HTTP timeout settings
        let connect_timeout = parse_duration_ms("LITANIZER_CONNECT_TIMEOUT_MS", 3000)?;
        let total_timeout = parse_duration_ms("LITANIZER_TOTAL_TIMEOUT_MS", 15000)?;

        // Sampling defaults
        let language = parse_language("LITANIZER_LANG", "ko")?;
        let person_cap = parse_fraction("LITANIZER_PERSON_CAP", 0.2)?;
        let oversample_factor = parse_f64("LITANIZER_OVERSAMPLE_FACTOR", 3.0)?;
        if oversample_factor.is_nan() || oversample_factor < 1.0 {
            return Err(ConfigError::Invalid {
                name: "LITANIZER_OVERSAMPLE_FACTOR",
                source: anyhow::anyhow!("must be at least 1"),
            });
        }
        let count = parse_usize("LITANIZER_COUNT", DEFAULT_COUNT)?.clamp(MIN_COUNT, MAX_COUNT);

        Ok(Self {
            wiki_api_template,
            user_agent,
            connect_timeout,
            total_timeout,
            language,
            person_cap,
            oversample_factor,
            count,
        })
    }

    #[must_use]
    pub fn wiki_api_template(&self) -> &str {
        &self.wiki_api_template
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    #[must_use]
    pub fn total_timeout(&self) -> Duration {
        self.total_timeout
    }

    #[must_use]
    pub fn language(&self) -> &Language {
        &self.language
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
    pub fn count(&self) -> usize {
        self.count
    }

    /// Wikipedia クライアント用の設定を組み立てる。
    #[must_use]
    pub fn wikipedia(&self) -> WikipediaConfig {
        WikipediaConfig {
            api_template: self.wiki_api_template.clone(),
            user_agent: self.user_agent.clone(),
            connect_timeout: self.connect_timeout,
            total_timeout: self.total_timeout,
        }
    }
}

fn parse_api_template(name: &'static str) -> Result<String, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| DEFAULT_WIKI_API_TEMPLATE.to_string());
    if !raw.contains(LANG_PLACEHOLDER) {
        return Err(ConfigError::Invalid {
            name,
            source: anyhow::anyhow!("template must contain {LANG_PLACEHOLDER}"),
        });
    }
    Ok(raw)
}

fn parse_language(name: &'static str, default: &str) -> Result<Language, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<Language>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_duration_ms(name: &'static str, default_ms: u64) -> Result<Duration, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default_ms.to_string());
    let ms = raw.parse::<u64>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })?;
    Ok(Duration::from_millis(ms))
}

fn parse_usize(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<usize>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_f64(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<f64>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_fraction(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    let value = parse_f64(name, default)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Invalid {
            name,
            source: anyhow::anyhow!("value must be between 0 and 1"),
        });
    }
    Ok(value)
}
