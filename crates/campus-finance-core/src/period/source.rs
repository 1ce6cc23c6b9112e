use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use super::PeriodData;
use crate::error::CampusFinanceError;
use crate::CampusFinanceResult;

/// Store of historical actuals and transition records, keyed by plan version.
pub trait ProjectionDataSource {
    fn period_data(&self, version_id: &str) -> CampusFinanceResult<PeriodData>;

    /// Short name used in log lines and warnings.
    fn name(&self) -> &str;
}

/// No stored data: every year is calculated.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDataSource;

impl ProjectionDataSource for NoDataSource {
    fn period_data(&self, _version_id: &str) -> CampusFinanceResult<PeriodData> {
        Ok(PeriodData::default())
    }

    fn name(&self) -> &str {
        "none"
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    versions: HashMap<String, PeriodData>,
}

impl InMemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, version_id: impl Into<String>, data: PeriodData) {
        self.versions.insert(version_id.into(), data);
    }
}

impl ProjectionDataSource for InMemoryDataSource {
    fn period_data(&self, version_id: &str) -> CampusFinanceResult<PeriodData> {
        self.versions.get(version_id).cloned().ok_or_else(|| {
            CampusFinanceError::DataUnavailable(format!("No period data for version '{version_id}'"))
        })
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

/// One `<version>.json` file per plan version in a directory.
#[derive(Debug, Clone)]
pub struct JsonDataDirectory {
    dir: PathBuf,
}

impl JsonDataDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, version_id: &str) -> CampusFinanceResult<PathBuf> {
        let valid = !version_id.is_empty()
            && version_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(CampusFinanceError::InvalidInput {
                field: "version_id".into(),
                reason: format!("'{version_id}' is not a valid version identifier"),
            });
        }
        Ok(self.dir.join(format!("{version_id}.json")))
    }
}

impl ProjectionDataSource for JsonDataDirectory {
    fn period_data(&self, version_id: &str) -> CampusFinanceResult<PeriodData> {
        let path = self.path_for(version_id)?;
        let contents = fs::read_to_string(&path).map_err(|e| {
            CampusFinanceError::DataUnavailable(format!("Failed to read '{}': {e}", path.display()))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            CampusFinanceError::DataUnavailable(format!("Failed to parse '{}': {e}", path.display()))
        })
    }

    fn name(&self) -> &str {
        "json-directory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::HistoricalActuals;
    use rust_decimal_macros::dec;

    #[test]
    fn test_in_memory_lookup_by_version() {
        let mut source = InMemoryDataSource::new();
        source.insert(
            "v2",
            PeriodData {
                historical: vec![HistoricalActuals {
                    year: 2023,
                    revenue: Some(dec!(42000000)),
                    ..Default::default()
                }],
                ..Default::default()
            },
        );
        let data = source.period_data("v2").unwrap();
        assert_eq!(data.actuals(2023).unwrap().revenue, Some(dec!(42000000)));
        assert_eq!(source.period_data("v3").unwrap_err().code(), "DATA_UNAVAILABLE");
    }

    #[test]
    fn test_no_data_source_is_empty() {
        assert!(NoDataSource.period_data("anything").unwrap().is_empty());
    }

    #[test]
    fn test_directory_rejects_path_like_versions() {
        let source = JsonDataDirectory::new("/tmp");
        let err = source.period_data("../etc/passwd").unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[test]
    fn test_directory_missing_file() {
        let source = JsonDataDirectory::new("/nonexistent/campus");
        let err = source.period_data("v1").unwrap_err();
        assert_eq!(err.code(), "DATA_UNAVAILABLE");
    }
}
