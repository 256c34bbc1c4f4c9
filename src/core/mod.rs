pub mod aggregator;
pub mod engine;
pub mod extractor;
pub mod locator;
pub mod parser;

pub use crate::domain::model::{AggregateResult, Course, Document, Selection, Specialization};
pub use crate::domain::ports::{
    ConfigProvider, DocumentDecoder, DocumentFetcher, GradeSource, Pipeline, Prompter, Storage,
};
pub use crate::utils::error::Result;
