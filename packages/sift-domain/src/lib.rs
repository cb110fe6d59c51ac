pub mod document;
pub mod lexical;
pub mod mail;
pub mod ranking;
pub mod similarity;
pub mod tokenizer;

pub use document::Document;
pub use ranking::ScoredCandidate;
