//! Balance snapshots handed to the normalizer.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::BalanceRecord;

/// Synchronous accessor for the current wallet balances.
///
/// Each call returns a fresh snapshot; nothing is re-read between calls.
pub trait BalanceSource {
    fn balances(&self) -> Result<Vec<BalanceRecord>>;
}

impl BalanceSource for Vec<BalanceRecord> {
    fn balances(&self) -> Result<Vec<BalanceRecord>> {
        Ok(self.clone())
    }
}

/// Reads a JSON array of balance records from disk on every call.
#[derive(Debug, Clone)]
pub struct JsonFileBalanceSource {
    path: PathBuf,
}

impl JsonFileBalanceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BalanceSource for JsonFileBalanceSource {
    fn balances(&self) -> Result<Vec<BalanceRecord>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read balances file: {}", self.path.display()))?;
        let records: Vec<BalanceRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse balances file: {}", self.path.display()))?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_snapshot_each_call() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("balances.json");
        std::fs::write(&path, r#"[{"currency":"SWTH","amount":"10","chain":"Ethereum"}]"#)?;

        let source = JsonFileBalanceSource::new(&path);
        assert_eq!(source.balances()?.len(), 1);

        std::fs::write(&path, "[]")?;
        assert!(source.balances()?.is_empty());
        Ok(())
    }

    #[test]
    fn missing_file_names_path() {
        let source = JsonFileBalanceSource::new("/nonexistent/balances.json");
        let err = source.balances().unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/balances.json"));
    }

    #[test]
    fn vec_source_returns_copy() -> Result<()> {
        let records = vec![BalanceRecord::new("ETH", "1", "Arbitrum")];
        assert_eq!(records.balances()?, records);
        Ok(())
    }
}
