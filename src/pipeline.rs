//! 取得 → 重複排除 → 人名分類 → 上限付き組み立て のサンプリングパイプライン。
pub(crate) mod balance;
pub(crate) mod dedup;
pub mod request;
pub mod sampler;
pub mod source;
pub mod theme;

pub use request::{SamplingRequest, SamplingStrategy};
pub use sampler::{BalancedSampler, SamplingOutcome};
pub use source::{SourceError, TitleSource};
pub use theme::expand_theme_queries;
