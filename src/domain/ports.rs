use crate::domain::model::{AggregateResult, Course, Document, Selection};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// Retrieves the raw curriculum document.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Turns raw document bytes into pages of tables.
pub trait DocumentDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Document>;
}

/// Supplies the selected courses and their grades.
#[async_trait]
pub trait GradeSource: Send + Sync {
    async fn collect(&self, courses: &[Course]) -> Result<Selection>;
}

/// The generic prompt capability used by interactive front ends.
pub trait Prompter {
    fn ask_integer(&mut self, prompt: &str, min: i64, max: i64) -> Result<i64>;
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize>;
    fn multi_select(&mut self, prompt: &str, options: &[String]) -> Result<Vec<usize>>;
    fn ask_decimal(&mut self, prompt: &str, min: f64, max: f64) -> Result<f64>;
    fn say(&mut self, message: &str) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn academic_year(&self) -> &str;
    fn header_tokens(&self) -> &[String];
    fn strip_course_codes(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Locates and retrieves the curriculum document.
    async fn extract(&self) -> Result<Vec<u8>>;
    /// Decodes the document and parses its course rows.
    async fn transform(&self, document: Vec<u8>) -> Result<Vec<Course>>;
    /// Collects grades for the chosen courses and aggregates them.
    async fn evaluate(&self, courses: &[Course]) -> Result<AggregateResult>;
}
