use crate::core::Storage;
use crate::utils::error::{GradeCalcError, Result};
use std::path::Path;

/// Reads previously downloaded curriculum documents from disk.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        tracing::debug!("Reading document from {}", full_path.display());

        tokio::fs::read(&full_path)
            .await
            .map_err(|e| GradeCalcError::FetchFailed {
                url: full_path.display().to_string(),
                reason: e.to_string(),
            })
    }
}
