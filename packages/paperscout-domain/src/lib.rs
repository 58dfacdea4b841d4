pub mod catalog;
pub mod filter;
pub mod paper;
pub mod prompt;
pub mod relevance;
pub mod summary;
pub mod text;
pub mod verdict;

pub use catalog::{KeywordEntry, Topic, UnknownTopic, Weight};
pub use paper::PaperRecord;
pub use summary::{SummaryParseError, SummaryText};
pub use verdict::Verdict;
