pub mod config;
pub mod dict;
pub mod engine;
pub mod fuzzy;
pub mod index;
pub mod pipeline;
pub mod query;
pub mod snippet;
pub mod source;

pub use config::SearchOptions;
pub use engine::{Hit, SearchEngine};
pub use index::{DocStat, Document, StemIndex};
pub use pipeline::StopWords;
