#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classification;
pub mod clients;
pub mod config;
pub mod language;
pub mod litany;
pub mod local_pool;
pub mod observability;
pub mod pipeline;

pub use classification::{HeuristicClassifier, PersonClassifier, is_likely_person};
pub use language::Language;
pub use litany::{LitanyError, LitanySession};
pub use local_pool::LocalPool;
pub use pipeline::{BalancedSampler, SamplingRequest, TitleSource, expand_theme_queries};
