use crate::core::aggregator::aggregate;
use crate::core::extractor::extract_rows;
use crate::core::locator::CurriculumLocator;
use crate::core::parser::{CourseParser, ParserOptions};
use crate::core::{
    AggregateResult, ConfigProvider, Course, DocumentDecoder, DocumentFetcher, GradeSource,
    Pipeline, Specialization, Storage,
};
use crate::utils::error::Result;

/// Where the curriculum document comes from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Remote {
        study_year: u32,
        specialization: Specialization,
    },
    Local {
        path: String,
    },
}

pub struct CurriculumPipeline<F: DocumentFetcher, S: Storage, C: ConfigProvider> {
    source: DocumentSource,
    fetcher: F,
    storage: S,
    config: C,
    decoder: Box<dyn DocumentDecoder>,
    grades: Box<dyn GradeSource>,
}

impl<F: DocumentFetcher, S: Storage, C: ConfigProvider> CurriculumPipeline<F, S, C> {
    pub fn new(
        source: DocumentSource,
        fetcher: F,
        storage: S,
        config: C,
        decoder: Box<dyn DocumentDecoder>,
        grades: Box<dyn GradeSource>,
    ) -> Self {
        Self {
            source,
            fetcher,
            storage,
            config,
            decoder,
            grades,
        }
    }

    fn parser(&self) -> CourseParser {
        CourseParser::new(ParserOptions {
            header_tokens: self.config.header_tokens().to_vec(),
            strip_course_codes: self.config.strip_course_codes(),
        })
    }
}

#[async_trait::async_trait]
impl<F: DocumentFetcher, S: Storage, C: ConfigProvider> Pipeline for CurriculumPipeline<F, S, C> {
    async fn extract(&self) -> Result<Vec<u8>> {
        match &self.source {
            DocumentSource::Remote {
                study_year,
                specialization,
            } => {
                let locator =
                    CurriculumLocator::new(self.config.base_url(), self.config.academic_year())?;
                let url = locator.resource_url(*study_year, *specialization)?;
                tracing::info!("🌐 Fetching PDF from: {}", url);
                self.fetcher.fetch(&url).await
            }
            DocumentSource::Local { path } => {
                tracing::info!("📁 Reading document from: {}", path);
                self.storage.read_file(path).await
            }
        }
    }

    async fn transform(&self, document: Vec<u8>) -> Result<Vec<Course>> {
        let document = self.decoder.decode(&document)?;
        tracing::debug!(
            "Decoded {} page(s) with {} table(s)",
            document.pages.len(),
            document.table_count()
        );

        let rows = extract_rows(&document)?;
        Ok(self.parser().parse(rows))
    }

    async fn evaluate(&self, courses: &[Course]) -> Result<AggregateResult> {
        let selection = self.grades.collect(courses).await?;
        tracing::debug!("{} course(s) selected", selection.len());
        aggregate(courses, &selection)
    }
}
