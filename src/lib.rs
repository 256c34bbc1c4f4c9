pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{http::HttpFetcher, storage::LocalStorage};
pub use app::pipelines::{CurriculumPipeline, DocumentSource};
pub use config::{Overrides, Settings};
pub use crate::core::{engine::GradeEngine, AggregateResult, Course, Specialization};
pub use utils::error::{GradeCalcError, Result};
