//! 索引模块
//!
//! 词法检索所需的分词、倒排索引与评分函数。

pub mod scoring;
pub mod token_index;
pub mod tokenizer;

pub use token_index::{IndexDocument, TokenIndex};
pub use tokenizer::Tokenizer;
