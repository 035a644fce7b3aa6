//! Persisted list of looked-up XLM addresses

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::transaction::types::format_xlm;

/// How many records `recent()` returns
pub const RECENT_LIMIT: usize = 10;

/// Source chain addresses when an XLM address was derived from a private key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceInfo {
    pub btc_address: Option<String>,
    pub flo_address: Option<String>,
}

/// One looked-up address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchedAddress {
    pub id: u64,
    pub xlm_address: String,
    pub btc_address: Option<String>,
    pub flo_address: Option<String>,
    pub balance: f64,
    /// Unix milliseconds of the last lookup
    pub timestamp: i64,
    /// e.g. "12.5000000 XLM"
    pub formatted_balance: String,
    pub is_from_private_key: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistory {
    next_id: u64,
    records: Vec<SearchedAddress>,
}

fn formatted_balance(balance: f64) -> String {
    format!("{} XLM", format_xlm(balance))
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file; a missing file is an empty history
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no history file yet");
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Serialization(format!("Invalid history file {}: {}", path.display(), e)))
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("Failed to create {}: {}", parent.display(), e)))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        fs::write(path, content)
            .map_err(|e| Error::Storage(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Record a lookup and return the record's id
    ///
    /// An address already present keeps its id and source addresses; only
    /// balance and timestamp are refreshed.
    pub fn record(
        &mut self,
        xlm_address: &str,
        balance: f64,
        timestamp: i64,
        source: Option<SourceInfo>,
    ) -> u64 {
        if let Some(existing) = self.records.iter_mut().find(|r| r.xlm_address == xlm_address) {
            existing.balance = balance;
            existing.timestamp = timestamp;
            existing.formatted_balance = formatted_balance(balance);
            return existing.id;
        }

        self.next_id += 1;
        let source = source.unwrap_or_default();
        let is_from_private_key = source.btc_address.is_some() || source.flo_address.is_some();
        self.records.push(SearchedAddress {
            id: self.next_id,
            xlm_address: xlm_address.to_string(),
            btc_address: source.btc_address,
            flo_address: source.flo_address,
            balance,
            timestamp,
            formatted_balance: formatted_balance(balance),
            is_from_private_key,
        });
        self.next_id
    }

    /// `record` stamped with the current time
    pub fn record_now(&mut self, xlm_address: &str, balance: f64, source: Option<SourceInfo>) -> u64 {
        self.record(xlm_address, balance, chrono::Utc::now().timestamp_millis(), source)
    }

    /// Newest first, at most `RECENT_LIMIT`
    pub fn recent(&self) -> Vec<&SearchedAddress> {
        let mut records: Vec<_> = self.records.iter().collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(RECENT_LIMIT);
        records
    }

    pub fn get(&self, id: u64) -> Option<&SearchedAddress> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Remove a record, returning whether it existed
    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
