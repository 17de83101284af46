//! Flat-file record store.
//!
//! The whole collection lives in one JSON array and every operation reads or
//! rewrites the entire file. Mutations run their full read-modify-write cycle
//! under an async mutex, so two concurrent requests cannot lose each other's
//! write.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::Result;

/// One tracked book checkout.
///
/// `name` is the informal lookup key: edit mutates the first match, delete
/// removes every match. Dates are stored as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fecha")]
    pub loan_date: NaiveDate,
    #[serde(rename = "fechaVencimiento")]
    pub due_date: NaiveDate,
    #[serde(rename = "correo")]
    pub email: String,
}

/// JSON file holding the loan collection.
///
/// The file is expected to exist and contain a valid JSON array (`[]`
/// included) before the first request.
pub struct RecordStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole collection. Takes the same lock as mutations so a
    /// reader never observes a half-written file.
    pub async fn load(&self) -> Result<Vec<LoanRecord>> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    /// Replace the whole collection.
    pub async fn save(&self, records: &[LoanRecord]) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.write_all(records).await
    }

    /// Full read-modify-write cycle under the lock. Concurrent mutations
    /// serialize here instead of racing on the file.
    pub async fn update<T>(&self, f: impl FnOnce(&mut Vec<LoanRecord>) -> T) -> Result<T> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        let out = f(&mut records);
        self.write_all(&records).await?;
        Ok(out)
    }

    async fn read_all(&self) -> Result<Vec<LoanRecord>> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&contents)?)
    }

    async fn write_all(&self, records: &[LoanRecord]) -> Result<()> {
        let contents = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }
}
