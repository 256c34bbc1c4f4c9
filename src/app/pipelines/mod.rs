pub mod curriculum_pipeline;

pub use curriculum_pipeline::{CurriculumPipeline, DocumentSource};
