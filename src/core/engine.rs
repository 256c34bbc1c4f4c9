use crate::core::{AggregateResult, Course, Pipeline};
use crate::utils::error::{GradeCalcError, Result};
use crate::utils::monitor::SystemMonitor;

#[derive(Debug, Clone)]
pub struct EngineOutput {
    pub courses: Vec<Course>,
    pub result: AggregateResult,
}

pub struct GradeEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> GradeEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Fetches and parses the curriculum, stopping before grade collection.
    pub async fn load_courses(&self) -> Result<Vec<Course>> {
        tracing::info!("📥 Fetching curriculum document...");
        let document = self.pipeline.extract().await?;
        tracing::info!("Fetched {} bytes", document.len());
        self.monitor.log_stats("Fetch");

        tracing::info!("🔄 Extracting course tables...");
        let courses = self.pipeline.transform(document).await?;
        self.monitor.log_stats("Parse");

        if courses.is_empty() {
            return Err(GradeCalcError::extraction(
                "no course rows were found in the curriculum tables",
            ));
        }
        tracing::info!("✓ Loaded {} courses from curriculum", courses.len());

        Ok(courses)
    }

    pub async fn run(&self) -> Result<EngineOutput> {
        let courses = self.load_courses().await?;

        tracing::info!("🧮 Calculating weighted harmonic mean...");
        let result = self.pipeline.evaluate(&courses).await?;
        self.monitor.log_stats("Aggregate");
        self.monitor.log_final_stats();

        tracing::info!(
            "Mean {:.2} over {} courses ({} credits)",
            result.display_mean(),
            result.course_count,
            result.total_credits
        );

        Ok(EngineOutput { courses, result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::aggregate;
    use crate::domain::model::Selection;

    struct StaticPipeline {
        rows: Vec<(&'static str, f64)>,
        grades: Vec<(usize, f64)>,
    }

    #[async_trait::async_trait]
    impl Pipeline for StaticPipeline {
        async fn extract(&self) -> Result<Vec<u8>> {
            Ok(b"static".to_vec())
        }

        async fn transform(&self, _document: Vec<u8>) -> Result<Vec<Course>> {
            self.rows
                .iter()
                .map(|(name, credits)| Course::new(*name, *credits))
                .collect()
        }

        async fn evaluate(&self, courses: &[Course]) -> Result<AggregateResult> {
            let selection: Selection = self.grades.iter().copied().collect();
            aggregate(courses, &selection)
        }
    }

    #[tokio::test]
    async fn test_engine_runs_all_stages() {
        let engine = GradeEngine::new(StaticPipeline {
            rows: vec![("Algoritmi", 6.0), ("Baze de Date", 5.0)],
            grades: vec![(0, 9.5), (1, 8.7)],
        });

        let output = engine.run().await.unwrap();
        assert_eq!(output.courses.len(), 2);
        assert_eq!(output.result.display_mean(), 9.12);
    }

    #[test]
    fn test_engine_rejects_empty_listing() {
        let engine = GradeEngine::new(StaticPipeline {
            rows: vec![],
            grades: vec![],
        });

        let result = tokio_test::block_on(engine.load_courses());
        assert!(matches!(result, Err(GradeCalcError::ExtractionFailed { .. })));
    }
}
